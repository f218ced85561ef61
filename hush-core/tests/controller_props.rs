//! Property tests for the controller over arbitrary vitals sequences

use hush_core::config::ControllerTuning;
use hush_core::controller::MAX_TRACES;
use hush_core::{Controller, GridCell, Vitals, GRID_SIZE};
use proptest::prelude::*;

const STEP_MS: u32 = 4_000;
/// Most events any single step records
const MAX_STEP_TRACES: usize = 5;

const _: () = assert!(MAX_STEP_TRACES <= MAX_TRACES);

fn vitals() -> impl Strategy<Value = Vitals> {
    (0u8..=250, 0u8..=100).prop_map(|(bpm, cry)| Vitals::new(bpm, cry))
}

fn start_cell() -> impl Strategy<Value = GridCell> {
    (0..GRID_SIZE, 0..GRID_SIZE).prop_map(|(amp, freq)| GridCell::clamped(amp, freq))
}

proptest! {
    #[test]
    fn test_commands_stay_on_grid(
        start in start_cell(),
        samples in prop::collection::vec(vitals(), 1..60),
    ) {
        let mut controller = Controller::starting_at(start, ControllerTuning::default(), 0);

        for (i, v) in samples.into_iter().enumerate() {
            let step = controller.step(v, i as u32 * STEP_MS);
            prop_assert!(step.traces.len() <= MAX_STEP_TRACES);
            if let Some(cell) = step.command {
                prop_assert!(cell.amp() < GRID_SIZE);
                prop_assert!(cell.freq() < GRID_SIZE);
                prop_assert_eq!(cell, controller.cell());
            }
        }
    }

    #[test]
    fn test_panic_is_sticky_and_pins_calm(
        samples in prop::collection::vec(vitals(), 1..60),
    ) {
        let mut controller = Controller::new(ControllerTuning::default(), 0);
        let mut panicked = false;

        for (i, v) in samples.into_iter().enumerate() {
            let step = controller.step(v, i as u32 * STEP_MS);
            if panicked {
                prop_assert!(controller.state().is_panicking());
            }
            if controller.state().is_panicking() {
                panicked = true;
                prop_assert_eq!(step.command, Some(GridCell::CALM));
            }
        }
    }

    #[test]
    fn test_calm_time_latches(
        samples in prop::collection::vec(vitals(), 1..80),
    ) {
        let mut controller = Controller::new(ControllerTuning::default(), 0);
        let mut latched: Option<u32> = None;

        for (i, v) in samples.into_iter().enumerate() {
            let now = i as u32 * STEP_MS;
            controller.step(v, now);
            match latched {
                Some(at) => {
                    prop_assert_eq!(controller.state().calm_after_ms, Some(at));
                    prop_assert_eq!(controller.elapsed_ms(now + 99_999), at);
                }
                None => latched = controller.state().calm_after_ms,
            }
        }
    }

    #[test]
    fn test_anchor_ranks_strictly_decrease(
        start in start_cell(),
        samples in prop::collection::vec(vitals(), 1..80),
    ) {
        let mut controller = Controller::starting_at(start, ControllerTuning::default(), 0);
        for (i, v) in samples.into_iter().enumerate() {
            controller.step(v, i as u32 * STEP_MS);
        }

        let anchors = controller.anchors();
        let mut previous: Option<i8> = None;
        for entry in anchors.iter() {
            prop_assert_eq!(anchors.rank_of(entry.cell), Some(entry.rank));
            if let Some(prev) = previous {
                prop_assert!(entry.rank < prev);
            }
            previous = Some(entry.rank);
        }
    }
}
