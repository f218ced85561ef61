//! Anchor-directed hill-climbing search
//!
//! Each step consumes one vitals sample and emits at most one grid cell to
//! command. From an anchor the search first tries lowering the frequency
//! (left), then the amplitude (up). A move that improves the chosen signal
//! makes the new cell an anchor; anything else returns to the previous
//! anchor, except a flat left move, which gets one reverse-diagonal probe.
//!
//! A large heart rate jump puts the controller into panic for the rest of
//! the run, pinning the output to the calm cell.

use heapless::Vec;

use super::state::{ControllerState, Mode};
use super::trace::Trace;
use crate::anchor::AnchorRegistry;
use crate::config::ControllerTuning;
use crate::grid::{GridCell, Move};
use crate::vitals::{Regime, Vitals};

/// Trace capacity per step
pub const MAX_TRACES: usize = 8;

/// Result of one controller step
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Step {
    /// Cell to send to the motor, if any
    pub command: Option<GridCell>,
    /// An idle move was blocked by the grid edge
    pub boundary_hit: bool,
    /// Regime in effect after this step
    pub regime: Regime,
    /// Decisions made, in order
    pub traces: Vec<Trace, MAX_TRACES>,
}

impl Step {
    fn new(regime: Regime) -> Self {
        Self {
            command: None,
            boundary_hit: false,
            regime,
            traces: Vec::new(),
        }
    }

    fn trace(&mut self, trace: Trace) {
        // Paths emit at most five events
        let pushed = self.traces.push(trace);
        debug_assert!(pushed.is_ok(), "trace buffer full");
    }
}

/// The search controller for one run
#[derive(Debug, Clone)]
pub struct Controller {
    state: ControllerState,
    anchors: AnchorRegistry,
    tuning: ControllerTuning,
    started_at_ms: u32,
}

impl Controller {
    /// Start a run at the strongest setting
    pub fn new(tuning: ControllerTuning, now_ms: u32) -> Self {
        Self::starting_at(GridCell::START, tuning, now_ms)
    }

    /// Start a run idle on `cell`
    pub fn starting_at(cell: GridCell, tuning: ControllerTuning, now_ms: u32) -> Self {
        Self {
            state: ControllerState::at(cell),
            anchors: AnchorRegistry::new(),
            tuning,
            started_at_ms: now_ms,
        }
    }

    /// Discard all run state and start over at the strongest setting
    pub fn reset(&mut self, now_ms: u32) {
        self.state = ControllerState::default();
        self.anchors.clear();
        self.started_at_ms = now_ms;
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn anchors(&self) -> &AnchorRegistry {
        &self.anchors
    }

    pub fn tuning(&self) -> &ControllerTuning {
        &self.tuning
    }

    pub fn cell(&self) -> GridCell {
        self.state.cell
    }

    pub fn started_at_ms(&self) -> u32 {
        self.started_at_ms
    }

    /// Run time so far, frozen once calm was reached
    pub fn elapsed_ms(&self, now_ms: u32) -> u32 {
        self.state
            .calm_after_ms
            .unwrap_or_else(|| now_ms.wrapping_sub(self.started_at_ms))
    }

    /// Evaluate one vitals sample
    pub fn step(&mut self, vitals: Vitals, now_ms: u32) -> Step {
        let mut step = Step::new(self.state.regime);
        let prior_bpm = self.state.last_bpm.filter(|&bpm| bpm > 0);

        if !self.state.is_panicking() {
            let jump = prior_bpm.map_or(false, |prior| {
                i16::from(vitals.bpm) - i16::from(prior) >= i16::from(self.tuning.panic_jump_bpm)
            });
            if jump {
                self.state.mode = Mode::Panic;
                step.trace(Trace::Panic {
                    bpm: vitals.bpm,
                    cry: vitals.cry,
                });
            }
        }

        let pending = match self.state.mode {
            Mode::Panic => {
                self.command(GridCell::CALM, now_ms, &mut step);
                self.state.record(vitals);
                return step;
            }
            Mode::Normal(pending) => pending,
        };

        let regime = self.tuning.regime_for(vitals);
        self.state.regime = regime;
        step.regime = regime;

        let improved = match regime {
            Regime::Heartbeat => self.heartbeat_improved(vitals.bpm),
            Regime::Crying => self.crying_improved(vitals.cry),
        };
        let stable = prior_bpm.is_some() && self.stable(regime, vitals, &mut step);
        let same = stable && pending == Move::Left;

        match pending {
            Move::Idle => self.leave_anchor(now_ms, &mut step),
            Move::Left | Move::Up => self.evaluate_move(improved, same, now_ms, &mut step),
        }

        self.state.record(vitals);
        step
    }

    fn heartbeat_improved(&self, bpm: u8) -> bool {
        self.state
            .last_bpm
            .filter(|&prior| prior > 0)
            .map_or(false, |prior| {
                i16::from(prior) - i16::from(bpm) >= i16::from(self.tuning.improve_bpm)
            })
    }

    fn crying_improved(&self, cry: u8) -> bool {
        if cry <= self.tuning.improve_cry {
            return true;
        }
        self.state
            .last_cry
            .filter(|&prior| prior > 0)
            .map_or(false, |prior| {
                i16::from(prior) - i16::from(cry) >= i16::from(self.tuning.improve_cry)
            })
    }

    /// Stability check; only called when a prior heart rate is known
    fn stable(&self, regime: Regime, vitals: Vitals, step: &mut Step) -> bool {
        match regime {
            Regime::Heartbeat => {
                let prior = self.state.last_bpm.unwrap_or(vitals.bpm);
                let delta = vitals.bpm.abs_diff(prior);
                if delta <= self.tuning.stable_bpm {
                    step.trace(Trace::HeartbeatStable { delta });
                    true
                } else {
                    false
                }
            }
            Regime::Crying => {
                // An unknown prior counts as no change
                if self.state.last_cry.map_or(true, |prior| prior == vitals.cry) {
                    step.trace(Trace::CryingStable);
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Idle on an anchor: pick the first move to explore
    fn leave_anchor(&mut self, now_ms: u32, step: &mut Step) {
        let cell = self.state.cell;

        if self.state.adopt_anchor(cell) {
            self.register_anchor(cell, step);
        }
        self.state.backtrack = cell;

        if !self.state.tried_left && cell.left().is_none() {
            step.boundary_hit = true;
            step.trace(Trace::LeftWall);
        } else if !self.state.tried_up && cell.up().is_none() {
            step.boundary_hit = true;
            step.trace(Trace::UpperWall);
        }

        if !self.state.tried_left {
            if let Some(target) = cell.left() {
                self.state.mode = Mode::Normal(Move::Left);
                self.state.tried_left = true;
                step.trace(Trace::TryLeft { from: cell });
                self.command(target, now_ms, step);
                return;
            }
        }

        if !self.state.tried_up {
            if let Some(target) = cell.up() {
                self.state.mode = Mode::Normal(Move::Up);
                self.state.tried_up = true;
                step.trace(Trace::TryUp { from: cell });
                self.command(target, now_ms, step);
                return;
            }
        }

        if cell.is_calm() {
            step.trace(Trace::CalmHolding { at: cell });
        } else {
            step.trace(Trace::Stuck { at: cell });
        }
    }

    /// A move is pending: keep going, probe the reverse diagonal, or backtrack
    fn evaluate_move(&mut self, improved: bool, same: bool, now_ms: u32, step: &mut Step) {
        let cell = self.state.cell;

        if improved {
            step.trace(Trace::Improved { anchor: cell });
            self.register_anchor(cell, step);
            self.state.adopt_anchor(cell);
            self.state.backtrack = cell;

            if let Some(target) = cell.left() {
                self.state.mode = Mode::Normal(Move::Left);
                self.state.tried_left = true;
                step.trace(Trace::ImprovedLeft { from: cell });
                self.command(target, now_ms, step);
            } else if let Some(target) = cell.up() {
                // tried_up stays as is here
                self.state.mode = Mode::Normal(Move::Up);
                step.trace(Trace::ImprovedUp { from: cell });
                self.command(target, now_ms, step);
            }
            return;
        }

        if same {
            let from = self.state.backtrack;
            if let Some(target) = from.up() {
                step.trace(Trace::ReverseDiagonal { from });
                self.state.mode = Mode::Normal(Move::Up);
                self.state.tried_up = true;
                self.state.backtrack = cell;
                self.command(target, now_ms, step);
                return;
            }
        }

        let target = self.state.backtrack;
        if target != cell {
            step.trace(Trace::NoImprovement { to: target });
            self.command(target, now_ms, step);
        }
        self.state.cell = target;
        self.state.mode = Mode::Normal(Move::Idle);
    }

    fn register_anchor(&mut self, cell: GridCell, step: &mut Step) {
        if let Some(entry) = self.anchors.register(cell) {
            step.trace(Trace::AnchorSet {
                cell,
                level: entry.level,
            });
        }
    }

    /// Commit `cell` as the output and latch calm the first time it is reached
    fn command(&mut self, cell: GridCell, now_ms: u32, step: &mut Step) {
        self.state.cell = cell;
        step.command = Some(cell);

        if cell.is_calm() && !self.state.is_panicking() && self.state.calm_after_ms.is_none() {
            let elapsed_ms = now_ms.wrapping_sub(self.started_at_ms);
            self.state.calm_after_ms = Some(elapsed_ms);
            step.trace(Trace::CalmReached { elapsed_ms });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(amp: u8, freq: u8) -> GridCell {
        GridCell::new(amp, freq).unwrap()
    }

    fn controller_at(amp: u8, freq: u8) -> Controller {
        Controller::starting_at(cell(amp, freq), ControllerTuning::default(), 0)
    }

    fn hb(bpm: u8) -> Vitals {
        Vitals::new(bpm, 0)
    }

    #[test]
    fn test_idle_tries_left_first() {
        let mut ctrl = controller_at(2, 2);
        let step = ctrl.step(hb(180), 0);

        assert_eq!(step.command, Some(cell(2, 1)));
        assert!(!step.boundary_hit);
        assert_eq!(ctrl.state().mode, Mode::Normal(Move::Left));
        assert!(ctrl.state().tried_left);
        assert!(!ctrl.state().tried_up);
        assert_eq!(ctrl.state().backtrack, cell(2, 2));
        assert_eq!(ctrl.anchors().rank_of(cell(2, 2)), Some(9));
    }

    #[test]
    fn test_improvement_continues_left() {
        let mut ctrl = controller_at(2, 2);
        ctrl.step(hb(180), 0);
        let step = ctrl.step(hb(165), 14_000);

        assert_eq!(step.command, Some(cell(2, 0)));
        assert_eq!(ctrl.state().anchor, Some(cell(2, 1)));
        assert_eq!(ctrl.state().backtrack, cell(2, 1));
        assert_eq!(ctrl.anchors().rank_of(cell(2, 1)), Some(8));
        assert!(step.traces.contains(&Trace::Improved { anchor: cell(2, 1) }));
    }

    #[test]
    fn test_improvement_at_left_wall_goes_up_without_marking() {
        let mut ctrl = controller_at(2, 1);
        ctrl.step(hb(180), 0);
        let step = ctrl.step(hb(165), 14_000);

        assert_eq!(step.command, Some(cell(1, 0)));
        assert_eq!(ctrl.state().mode, Mode::Normal(Move::Up));
        assert!(!ctrl.state().tried_up);
    }

    #[test]
    fn test_no_improvement_backtracks() {
        let mut ctrl = controller_at(3, 3);
        ctrl.step(hb(180), 0);
        let step = ctrl.step(hb(186), 14_000);

        assert_eq!(step.command, Some(cell(3, 3)));
        assert_eq!(ctrl.cell(), cell(3, 3));
        assert_eq!(ctrl.state().mode, Mode::Normal(Move::Idle));
        assert!(step.traces.contains(&Trace::NoImprovement { to: cell(3, 3) }));
    }

    #[test]
    fn test_after_backtrack_tries_up() {
        let mut ctrl = controller_at(3, 3);
        ctrl.step(hb(180), 0);
        ctrl.step(hb(186), 14_000);
        let step = ctrl.step(hb(186), 28_000);

        assert_eq!(step.command, Some(cell(2, 3)));
        assert_eq!(ctrl.state().mode, Mode::Normal(Move::Up));
        assert!(ctrl.state().tried_up);
    }

    #[test]
    fn test_flat_left_move_probes_reverse_diagonal() {
        let mut ctrl = controller_at(2, 2);
        ctrl.step(hb(180), 0);
        let step = ctrl.step(hb(181), 14_000);

        assert_eq!(step.command, Some(cell(1, 2)));
        assert_eq!(ctrl.state().mode, Mode::Normal(Move::Up));
        assert!(ctrl.state().tried_up);
        assert_eq!(ctrl.state().backtrack, cell(2, 1));
        assert!(step.traces.contains(&Trace::HeartbeatStable { delta: 1 }));
    }

    #[test]
    fn test_flat_left_move_on_top_row_backtracks() {
        let mut ctrl = controller_at(0, 2);
        ctrl.step(hb(180), 0);
        let step = ctrl.step(hb(180), 4_000);

        assert_eq!(step.command, Some(cell(0, 2)));
        assert_eq!(ctrl.state().mode, Mode::Normal(Move::Idle));
    }

    #[test]
    fn test_flat_up_move_backtracks() {
        let mut ctrl = controller_at(2, 0);
        let first = ctrl.step(hb(180), 0);
        assert!(first.boundary_hit);
        assert_eq!(first.command, Some(cell(1, 0)));

        let step = ctrl.step(hb(180), 4_000);
        assert_eq!(step.command, Some(cell(2, 0)));
    }

    #[test]
    fn test_panic_is_sticky() {
        let mut ctrl = controller_at(4, 4);
        ctrl.step(hb(100), 0);
        let step = ctrl.step(hb(140), 14_000);

        assert_eq!(step.command, Some(GridCell::CALM));
        assert!(ctrl.state().is_panicking());
        assert!(step.traces.contains(&Trace::Panic { bpm: 140, cry: 0 }));

        for bpm in [60, 200, 90, 0] {
            let step = ctrl.step(hb(bpm), 20_000);
            assert_eq!(step.command, Some(GridCell::CALM));
        }
        assert!(!ctrl.state().is_calm());
    }

    #[test]
    fn test_panic_needs_known_prior() {
        let mut ctrl = controller_at(4, 4);
        ctrl.step(hb(0), 0);
        ctrl.step(hb(200), 14_000);
        assert!(!ctrl.state().is_panicking());
    }

    #[test]
    fn test_calm_latch() {
        let mut ctrl = Controller::starting_at(cell(0, 1), ControllerTuning::default(), 1_000);
        let step = ctrl.step(hb(180), 5_000);

        assert!(step.boundary_hit);
        assert_eq!(step.command, Some(GridCell::CALM));
        assert_eq!(ctrl.state().calm_after_ms, Some(4_000));
        assert!(step.traces.contains(&Trace::CalmReached { elapsed_ms: 4_000 }));

        // Improved at the calm cell: nothing to command, move stays pending
        let step = ctrl.step(hb(165), 9_000);
        assert_eq!(step.command, None);
        assert_eq!(ctrl.state().mode, Mode::Normal(Move::Left));

        // Not improved: backtrack target is the calm cell itself
        let step = ctrl.step(hb(170), 13_000);
        assert_eq!(step.command, None);
        assert_eq!(ctrl.state().mode, Mode::Normal(Move::Idle));

        let step = ctrl.step(hb(170), 17_000);
        assert!(step.traces.contains(&Trace::CalmHolding { at: GridCell::CALM }));
        assert_eq!(ctrl.state().calm_after_ms, Some(4_000));
        assert_eq!(ctrl.elapsed_ms(60_000), 4_000);
    }

    #[test]
    fn test_stuck_when_both_directions_tried() {
        let mut ctrl = controller_at(2, 2);
        ctrl.state.anchor = Some(cell(2, 2));
        ctrl.state.tried_left = true;
        ctrl.state.tried_up = true;

        let step = ctrl.step(hb(180), 0);
        assert_eq!(step.command, None);
        assert!(step.traces.contains(&Trace::Stuck { at: cell(2, 2) }));
    }

    #[test]
    fn test_crying_regime_improvement() {
        let mut ctrl = controller_at(2, 2);
        let first = ctrl.step(Vitals::new(140, 40), 0);
        assert_eq!(first.regime, Regime::Crying);

        let step = ctrl.step(Vitals::new(140, 39), 4_000);
        assert_eq!(step.command, Some(cell(2, 0)));
    }

    #[test]
    fn test_low_crying_falls_back_to_heartbeat_regime() {
        let mut ctrl = controller_at(2, 2);
        ctrl.step(Vitals::new(140, 40), 0);
        // Crying 1 is below the band, so heartbeat rules pick the regime
        let step = ctrl.step(Vitals::new(140, 1), 4_000);
        assert_eq!(step.regime, Regime::Heartbeat);
        assert_eq!(step.command, Some(cell(1, 2)));
    }

    #[test]
    fn test_crying_unchanged_is_stable() {
        let mut ctrl = controller_at(2, 2);
        ctrl.step(Vitals::new(140, 40), 0);
        let step = ctrl.step(Vitals::new(120, 40), 4_000);

        assert!(step.traces.contains(&Trace::CryingStable));
        assert_eq!(step.command, Some(cell(1, 2)));
    }

    #[test]
    fn test_reset_clears_run() {
        let mut ctrl = controller_at(2, 2);
        ctrl.step(hb(180), 0);
        ctrl.reset(50_000);

        assert_eq!(ctrl.cell(), GridCell::START);
        assert!(ctrl.anchors().is_empty());
        assert_eq!(ctrl.started_at_ms(), 50_000);
        assert_eq!(ctrl.state().last_bpm, None);
    }
}
