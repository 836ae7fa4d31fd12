use heatweave_core::{decide, ExecutionOutcome, ScheduleDecision};

#[test]
fn inactive_days_are_noops_regardless_of_observation() {
    for observed in [0, 1, 9, 1000] {
        assert_eq!(
            decide(ScheduleDecision::Inactive, observed),
            ExecutionOutcome::NoOp
        );
    }
}

#[test]
fn partial_progress_requests_the_remaining_delta() {
    assert_eq!(
        decide(ScheduleDecision::Active { target: 9 }, 3),
        ExecutionOutcome::Write { units: 6 }
    );
    assert_eq!(
        decide(ScheduleDecision::Active { target: 1 }, 0),
        ExecutionOutcome::Write { units: 1 }
    );
}

#[test]
fn meeting_or_exceeding_the_target_is_an_overrun() {
    assert_eq!(
        decide(ScheduleDecision::Active { target: 9 }, 9),
        ExecutionOutcome::Overrun {
            observed: 9,
            target: 9
        }
    );
    assert_eq!(
        decide(ScheduleDecision::Active { target: 2 }, 7),
        ExecutionOutcome::Overrun {
            observed: 7,
            target: 2
        }
    );
}

#[test]
fn repeated_ticks_converge_without_negative_units() {
    // Simulate a day of arbitrary re-invocation: after every write the
    // external counter absorbs the written units, and the next tick
    // re-reads it fresh.
    let target = 6u32;
    let mut observed = 0u32;
    let mut writes = 0;

    loop {
        match decide(ScheduleDecision::Active { target }, observed) {
            ExecutionOutcome::Write { units } => {
                assert!(units > 0);
                assert!(units <= target - observed);
                observed += units;
                writes += 1;
                assert!(writes < 100, "guard failed to converge");
            }
            ExecutionOutcome::Overrun {
                observed: seen,
                target: want,
            } => {
                assert_eq!(seen, target);
                assert_eq!(want, target);
                break;
            }
            ExecutionOutcome::NoOp => panic!("active day must not no-op"),
        }
    }
    assert_eq!(writes, 1, "a single tick should close the whole gap");

    // Ticks after convergence keep reporting overrun, never more writes.
    for _ in 0..5 {
        assert!(matches!(
            decide(ScheduleDecision::Active { target }, observed),
            ExecutionOutcome::Overrun { .. }
        ));
    }
}

#[test]
fn external_progress_mid_day_shrinks_the_delta() {
    // Another actor pushed 4 commits since the last tick.
    let mut observed = 0u32;
    observed += 4;
    assert_eq!(
        decide(ScheduleDecision::Active { target: 9 }, observed),
        ExecutionOutcome::Write { units: 5 }
    );
}
