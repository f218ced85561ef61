//! Stimulation grid
//!
//! The motor setting is a cell on a 5x5 grid of (amplitude index,
//! frequency index). Moving "left" lowers the frequency index, moving "up"
//! lowers the amplitude index. `(0,0)` is the calm cell the search aims for.

use core::fmt;

/// Number of steps along each grid axis
pub const GRID_SIZE: u8 = 5;

/// A cell on the stimulation grid, both indices in `0..GRID_SIZE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GridCell {
    amp: u8,
    freq: u8,
}

impl GridCell {
    /// The goal cell
    pub const CALM: GridCell = GridCell { amp: 0, freq: 0 };

    /// Where every run starts: strongest amplitude and frequency
    pub const START: GridCell = GridCell {
        amp: GRID_SIZE - 1,
        freq: GRID_SIZE - 1,
    };

    /// Create a cell, or `None` if either index is off the grid
    pub const fn new(amp: u8, freq: u8) -> Option<Self> {
        if amp < GRID_SIZE && freq < GRID_SIZE {
            Some(Self { amp, freq })
        } else {
            None
        }
    }

    /// Create a cell with both indices clamped onto the grid
    pub fn clamped(amp: u8, freq: u8) -> Self {
        Self {
            amp: amp.min(GRID_SIZE - 1),
            freq: freq.min(GRID_SIZE - 1),
        }
    }

    /// Amplitude index
    pub const fn amp(self) -> u8 {
        self.amp
    }

    /// Frequency index
    pub const fn freq(self) -> u8 {
        self.freq
    }

    pub const fn is_calm(self) -> bool {
        self.amp == 0 && self.freq == 0
    }

    /// Neighbour with one lower frequency index, `None` at the left wall
    pub fn left(self) -> Option<Self> {
        self.freq.checked_sub(1).map(|freq| Self { freq, ..self })
    }

    /// Neighbour with one lower amplitude index, `None` at the upper wall
    pub fn up(self) -> Option<Self> {
        self.amp.checked_sub(1).map(|amp| Self { amp, ..self })
    }
}

/// Renders the one-based operator notation, e.g. `A5 F5` for the start cell
impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "A{} F{}", self.amp + 1, self.freq + 1)
    }
}

/// Move made from the last anchor and not yet evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Move {
    /// Sitting on an anchor, nothing pending
    Idle,
    /// Frequency index was lowered
    Left,
    /// Amplitude index was lowered
    Up,
}
