//! Property-based invariant tests for the two vertical loop strategies.
//!
//! Wraparound:
//! 1. Every correction target is in `[0, cycle_height)`
//! 2. The notification caused by a correction is swallowed exactly once
//!
//! Recycling:
//! 3. `sum(shift_amount) == cumulative_shift()` after every pass
//! 4. Relocations never move the virtual position
//! 5. Scrolling down then back up along the same path restores the natural
//!    order, an empty stack and the starting position

use drift_core::config::RecycleConfig;
use drift_runtime::{
    GuardState, ItemId, LoopAction, PageLoopController, RecycleItem, RecyclingLoopController,
};
use proptest::prelude::*;

// ── Wraparound ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn corrections_land_inside_the_cycle(
        total in 200.0f64..20_000.0,
        positions in prop::collection::vec(0.0f64..60_000.0, 1..60),
    ) {
        let mut loop_ = PageLoopController::new();
        loop_.run_resize_tasks(total, 0.0);
        let cycle = total / 2.0;
        for p in positions {
            if loop_.on_scroll(p) == LoopAction::ScheduleCorrection {
                let target = loop_.apply_correction(p).expect("position past cycle");
                prop_assert!(target >= 0.0 && target < cycle, "{target} vs {cycle}");
                prop_assert_eq!(loop_.guard_state(), GuardState::AwaitingOwnNotification);
                prop_assert_eq!(loop_.on_scroll(target), LoopAction::Idle);
                prop_assert_eq!(loop_.guard_state(), GuardState::Idle);
            }
            prop_assert!(!loop_.is_correction_pending());
        }
    }

    #[test]
    fn return_target_always_folds(
        total in 200.0f64..20_000.0,
        target in -50_000.0f64..50_000.0,
    ) {
        let mut loop_ = PageLoopController::new();
        loop_.set_return_scroll(target);
        match loop_.run_resize_tasks(total, -1.0) {
            LoopAction::JumpTo(y) => prop_assert!(y >= 0.0 && y < total / 2.0),
            other => prop_assert!(false, "unexpected {other:?}"),
        }
    }
}

// ── Recycling ───────────────────────────────────────────────────────────

fn items_strategy() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(20.0f64..400.0, 2..30)
}

fn controller(heights: &[f64], gap: f64) -> RecyclingLoopController {
    let mut c = RecyclingLoopController::new(RecycleConfig {
        item_gap: gap,
        ..RecycleConfig::default()
    });
    c.set_items(
        heights
            .iter()
            .enumerate()
            .map(|(i, h)| RecycleItem::new(ItemId::new(i as u32), *h)),
    );
    c
}

fn stack_sum(c: &RecyclingLoopController) -> f64 {
    c.stack().iter().map(|e| e.shift_amount).sum()
}

proptest! {
    #[test]
    fn shift_conservation_and_virtual_stability(
        heights in items_strategy(),
        gap in 0.0f64..8.0,
        steps in prop::collection::vec(-16.0f64..40.0, 1..200),
    ) {
        let mut c = controller(&heights, gap);
        let mut physical = 0.0_f64;
        for dv in steps {
            physical = (physical + dv).max(0.0);
            let before = c.virtual_position(physical);
            let pass = c.on_scroll(physical);
            physical += pass.scroll_delta;
            prop_assert!((c.virtual_position(physical) - before).abs() < 1e-6);
            prop_assert!((stack_sum(&c) - c.cumulative_shift()).abs() < 1e-6);
            prop_assert!(pass.effects.len() <= heights.len());
        }
    }

    #[test]
    fn down_then_up_round_trip(
        heights in items_strategy(),
        gap in 0.0f64..8.0,
        steps in prop::collection::vec(0.5f64..16.0, 1..300),
    ) {
        let mut c = controller(&heights, gap);
        let natural: Vec<ItemId> = c.order().collect();
        let mut physical = 0.0_f64;

        for dv in &steps {
            physical += dv;
            physical += c.on_scroll(physical).scroll_delta;
        }
        for dv in steps.iter().rev() {
            physical -= dv;
            prop_assert!(physical >= -1e-9, "went negative: {physical}");
            physical += c.on_scroll(physical).scroll_delta;
        }

        prop_assert!(c.stack().is_empty(), "depth {}", c.stack().len());
        prop_assert_eq!(c.order().collect::<Vec<_>>(), natural);
        prop_assert!(physical.abs() < 1e-6, "ended at {physical}");
    }

    #[test]
    fn reset_restores_natural_order(
        heights in items_strategy(),
        depth in 0.0f64..20_000.0,
    ) {
        let mut c = controller(&heights, 0.0);
        let natural: Vec<ItemId> = c.order().collect();
        let pass = c.on_scroll(depth);
        let physical = depth + pass.scroll_delta;
        let cumulative = c.cumulative_shift();
        let reset = c.reset();
        prop_assert!((reset.scroll_delta - cumulative).abs() < 1e-6);
        prop_assert!((physical + reset.scroll_delta - depth).abs() < 1e-6);
        prop_assert_eq!(c.order().collect::<Vec<_>>(), natural);
    }
}
