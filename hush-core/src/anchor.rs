//! Anchor registry
//!
//! Anchors are cells the search has settled on while idle or after an
//! improving move. Each distinct cell is registered once, with a rank that
//! strictly decreases in discovery order. The registry is for traceability
//! only; path selection never reads it.

use heapless::Vec;

use crate::grid::{GridCell, GRID_SIZE};

/// Rank offset: the first anchor gets `ANCHOR_RANK_BASE - 1`
pub const ANCHOR_RANK_BASE: i8 = 10;

const CELLS: usize = (GRID_SIZE as usize) * (GRID_SIZE as usize);

/// A registered anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AnchorEntry {
    pub cell: GridCell,
    /// Discovery order, starting at 1
    pub level: u8,
    /// Priority value, `ANCHOR_RANK_BASE - level`
    pub rank: i8,
}

/// Every anchor discovered during the current run
#[derive(Debug, Clone)]
pub struct AnchorRegistry {
    ranks: [[Option<i8>; GRID_SIZE as usize]; GRID_SIZE as usize],
    level: u8,
    order: Vec<GridCell, CELLS>,
}

impl Default for AnchorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AnchorRegistry {
    pub const fn new() -> Self {
        Self {
            ranks: [[None; GRID_SIZE as usize]; GRID_SIZE as usize],
            level: 0,
            order: Vec::new(),
        }
    }

    /// Register `cell`; returns the new entry, or `None` if already known
    pub fn register(&mut self, cell: GridCell) -> Option<AnchorEntry> {
        let slot = &mut self.ranks[cell.amp() as usize][cell.freq() as usize];
        if slot.is_some() {
            return None;
        }

        self.level += 1;
        let rank = ANCHOR_RANK_BASE - self.level as i8;
        *slot = Some(rank);
        // Capacity equals the number of cells, and each cell is pushed once
        let _ = self.order.push(cell);

        Some(AnchorEntry {
            cell,
            level: self.level,
            rank,
        })
    }

    /// Rank of `cell`, if it is an anchor
    pub fn rank_of(&self, cell: GridCell) -> Option<i8> {
        self.ranks[cell.amp() as usize][cell.freq() as usize]
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Anchors in discovery order
    pub fn iter(&self) -> impl Iterator<Item = AnchorEntry> + '_ {
        self.order.iter().enumerate().map(|(i, &cell)| {
            let level = i as u8 + 1;
            AnchorEntry {
                cell,
                level,
                rank: ANCHOR_RANK_BASE - level as i8,
            }
        })
    }

    /// Forget every anchor
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}
