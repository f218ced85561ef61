//! Decision trace events
//!
//! The controller never logs. It reports what it decided as a list of
//! trace events per step; the firmware forwards them to the log sink.

use core::fmt;

use crate::grid::GridCell;

/// One traceable controller decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Trace {
    /// Heart rate jumped; panic mode entered
    Panic { bpm: u8, cry: u8 },
    /// Heart rate within the stability window
    HeartbeatStable { delta: u8 },
    /// Crying level unchanged
    CryingStable,
    /// New anchor registered
    AnchorSet { cell: GridCell, level: u8 },
    /// Left move wanted but frequency is already lowest
    LeftWall,
    /// Up move wanted but amplitude is already lowest
    UpperWall,
    TryLeft { from: GridCell },
    TryUp { from: GridCell },
    /// Sitting on the calm cell with nothing left to try
    CalmHolding { at: GridCell },
    /// Both directions exhausted away from the calm cell
    Stuck { at: GridCell },
    Improved { anchor: GridCell },
    ImprovedLeft { from: GridCell },
    ImprovedUp { from: GridCell },
    /// Up probe from the previous anchor after a flat left move
    ReverseDiagonal { from: GridCell },
    /// Returning to the backtrack target
    NoImprovement { to: GridCell },
    CalmReached { elapsed_ms: u32 },
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trace::Panic { bpm, cry } => write!(f, "PANIC(BPM={}, CRY={})", bpm, cry),
            Trace::HeartbeatStable { delta } => write!(f, "HB stable dBPM={}", delta),
            Trace::CryingStable => f.write_str("CRY stable dCRY=0"),
            Trace::AnchorSet { cell, level } => write!(f, "set {} as anchor L{}", cell, level),
            Trace::LeftWall => f.write_str("Hit left wall"),
            Trace::UpperWall => f.write_str("Hit upper wall"),
            Trace::TryLeft { from } => write!(f, "TRY-> LEFT from {}", from),
            Trace::TryUp { from } => write!(f, "Blocked-> UP from {}", from),
            Trace::CalmHolding { at } => write!(f, "BABY CALM holding {}", at),
            Trace::Stuck { at } => write!(f, "STUCK holding {}", at),
            Trace::Improved { anchor } => write!(f, "IMPROVED -> anchor {}", anchor),
            Trace::ImprovedLeft { from } => write!(f, "IMPROVED-> LEFT from {}", from),
            Trace::ImprovedUp { from } => write!(f, "IMPROVED-> try UP from {}", from),
            Trace::ReverseDiagonal { from } => write!(f, "SAME-> R.D from {}", from),
            Trace::NoImprovement { to } => write!(f, "NO IMPROVEMENT -> {}", to),
            Trace::CalmReached { elapsed_ms } => write!(f, "CALM reached in {} ms", elapsed_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write;
    use heapless::String;

    fn render(trace: Trace) -> String<48> {
        let mut out = String::new();
        write!(out, "{}", trace).unwrap();
        out
    }

    #[test]
    fn test_trace_lines() {
        let from = GridCell::new(2, 2).unwrap();
        assert_eq!(render(Trace::TryLeft { from }), "TRY-> LEFT from A3 F3");
        assert_eq!(
            render(Trace::Panic { bpm: 140, cry: 0 }),
            "PANIC(BPM=140, CRY=0)"
        );
        assert_eq!(
            render(Trace::AnchorSet {
                cell: GridCell::START,
                level: 1
            }),
            "set A5 F5 as anchor L1"
        );
    }
}
