//! Property-based invariant tests for the wraparound math and frame clock.
//!
//! 1. `wrap_offset` lands in `(-cycle, 0]` for any finite input
//! 2. `wrap_offset` is idempotent
//! 3. `wrap_offset` is invariant under whole-cycle shifts (within rounding)
//! 4. `fold_into_cycle` lands in `[0, cycle)` for any finite input
//! 5. Frame deltas are never negative and sum to the covered span
//! 6. Coalesced scroll flushes keep only the latest position

use std::time::Duration;

use drift_core::event::HostNotification;
use drift_core::event_coalescer::NotificationCoalescer;
use drift_core::frame_clock::FrameClock;
use drift_core::wrap::{fold_into_cycle, wrap_offset};
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

fn cycle_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![1.0f64..5_000.0, 0.001f64..1.0, 5_000.0f64..1.0e6]
}

fn offset_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![
        -10_000.0f64..10_000.0,
        -1.0e12f64..1.0e12,
        Just(0.0),
        Just(-0.0),
        Just(f64::MIN_POSITIVE),
    ]
}

// ── Wraparound ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn wrap_offset_stays_in_half_open_range(offset in offset_strategy(), cycle in cycle_strategy()) {
        let v = wrap_offset(offset, cycle);
        prop_assert!(v > -cycle, "{v} <= -{cycle} for offset {offset}");
        prop_assert!(v <= 0.0, "{v} > 0 for offset {offset}");
    }

    #[test]
    fn wrap_offset_is_idempotent(offset in offset_strategy(), cycle in cycle_strategy()) {
        let once = wrap_offset(offset, cycle);
        prop_assert_eq!(wrap_offset(once, cycle), once);
    }

    #[test]
    fn wrap_offset_ignores_whole_cycles(
        offset in -5_000.0f64..0.0,
        cycle in 10.0f64..2_000.0,
        k in -8i32..8,
    ) {
        let a = wrap_offset(offset, cycle);
        let b = wrap_offset(offset + f64::from(k) * cycle, cycle);
        let diff = (a - b).abs();
        // Either equal, or the two values straddle the identified boundary.
        prop_assert!(diff < 1e-6 || (diff - cycle).abs() < 1e-6, "a={a} b={b}");
    }

    #[test]
    fn fold_into_cycle_stays_in_range(position in offset_strategy(), cycle in cycle_strategy()) {
        let v = fold_into_cycle(position, cycle).expect("finite input with ready cycle");
        prop_assert!(v >= 0.0 && v < cycle, "{v} outside [0, {cycle})");
    }

    #[test]
    fn fold_keeps_values_already_in_range(cycle in cycle_strategy(), frac in 0.0f64..1.0) {
        let position = cycle * frac;
        prop_assume!(position < cycle);
        prop_assert_eq!(fold_into_cycle(position, cycle), Some(position));
    }
}

// ── Frame clock ─────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn frame_deltas_never_negative(stamps in prop::collection::vec(0u64..100_000, 1..64)) {
        let mut clock: FrameClock<()> = FrameClock::new();
        for ms in &stamps {
            let tick = clock.advance(Duration::from_millis(*ms));
            prop_assert!(tick.delta <= Duration::from_millis(100_000));
        }
        prop_assert_eq!(clock.frame_index(), stamps.len() as u64);
    }

    #[test]
    fn monotonic_deltas_sum_to_span(mut stamps in prop::collection::vec(0u64..100_000, 2..64)) {
        stamps.sort_unstable();
        let mut clock: FrameClock<()> = FrameClock::new();
        let mut total = Duration::ZERO;
        for ms in &stamps {
            total += clock.advance(Duration::from_millis(*ms)).delta;
        }
        let span = Duration::from_millis(stamps[stamps.len() - 1] - stamps[0]);
        prop_assert_eq!(total, span);
    }

    #[test]
    fn cancelled_tasks_never_delivered(ops in prop::collection::vec(any::<bool>(), 1..40)) {
        let mut clock = FrameClock::new();
        let mut kept = Vec::new();
        for (i, cancel) in ops.iter().enumerate() {
            let handle = clock.request_frame(i);
            if *cancel {
                prop_assert!(clock.cancel_frame(handle));
            } else {
                kept.push((handle, i));
            }
        }
        let tick = clock.advance(Duration::ZERO);
        prop_assert_eq!(tick.tasks, kept);
        prop_assert!(!clock.wants_frame());
    }
}

// ── Coalescer ───────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn coalesced_scroll_is_latest(positions in prop::collection::vec(0.0f64..50_000.0, 1..100)) {
        let mut coalescer = NotificationCoalescer::new();
        for p in &positions {
            let immediate = coalescer.push(HostNotification::Scroll { position: *p });
            prop_assert!(immediate.is_none());
        }
        let last = positions[positions.len() - 1];
        prop_assert_eq!(coalescer.flush(), vec![HostNotification::Scroll { position: last }]);
    }
}
