//! Controller state
//!
//! One value per run. Only the controller's step function mutates it.

use crate::grid::{GridCell, Move};
use crate::vitals::{Regime, Vitals};

/// Search mode
///
/// `Panic` is terminal for the run: once entered it is never left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Hill-climbing, with the move awaiting evaluation
    Normal(Move),
    /// Pinned to the calm cell
    Panic,
}

impl Mode {
    pub fn is_panic(self) -> bool {
        self == Mode::Panic
    }
}

/// Mutable search state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControllerState {
    /// Cell last commanded (or backtracked to)
    pub cell: GridCell,
    /// Cell to return to when a move does not pay off
    pub backtrack: GridCell,
    pub mode: Mode,
    /// Anchor the tried flags belong to
    pub anchor: Option<GridCell>,
    pub tried_left: bool,
    pub tried_up: bool,
    /// Heart rate seen on the previous step
    pub last_bpm: Option<u8>,
    /// Crying level seen on the previous step
    pub last_cry: Option<u8>,
    /// Regime chosen on the last normal step
    pub regime: Regime,
    /// Milliseconds from controller start to the first calm command
    pub calm_after_ms: Option<u32>,
}

impl ControllerState {
    /// Fresh state sitting idle on `cell`
    pub fn at(cell: GridCell) -> Self {
        Self {
            cell,
            backtrack: cell,
            mode: Mode::Normal(Move::Idle),
            anchor: None,
            tried_left: false,
            tried_up: false,
            last_bpm: None,
            last_cry: None,
            regime: Regime::Heartbeat,
            calm_after_ms: None,
        }
    }

    pub fn is_panicking(&self) -> bool {
        self.mode.is_panic()
    }

    pub fn is_calm(&self) -> bool {
        self.calm_after_ms.is_some()
    }

    /// Make `cell` the current anchor, clearing the tried flags if it is new
    ///
    /// Returns true if the anchor changed.
    pub(crate) fn adopt_anchor(&mut self, cell: GridCell) -> bool {
        if self.anchor == Some(cell) {
            return false;
        }
        self.anchor = Some(cell);
        self.tried_left = false;
        self.tried_up = false;
        true
    }

    pub(crate) fn record(&mut self, vitals: Vitals) {
        self.last_bpm = Some(vitals.bpm);
        self.last_cry = Some(vitals.cry);
    }
}

impl Default for ControllerState {
    fn default() -> Self {
        Self::at(GridCell::START)
    }
}
