#![no_main]

use arbitrary::Arbitrary;
use drift_core::config::RecycleConfig;
use drift_runtime::{ItemId, PageLoopController, RecycleItem, RecyclingLoopController};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Session {
    heights: Vec<u8>,
    total_height: u16,
    positions: Vec<i16>,
}

fuzz_target!(|session: Session| {
    if session.heights.len() > 64 || session.positions.len() > 256 {
        return;
    }

    // Recycling: the ring stays a rotation of the natural order.
    let items: Vec<RecycleItem> = session
        .heights
        .iter()
        .enumerate()
        .map(|(i, &h)| RecycleItem::new(ItemId::new(i as u32), f64::from(h.max(1))))
        .collect();
    let natural: Vec<ItemId> = items.iter().map(|item| item.id).collect();
    let mut recycling = RecyclingLoopController::new(RecycleConfig::default());
    recycling.set_items(items);

    for &p in &session.positions {
        let pass = recycling.on_scroll(f64::from(p));
        assert!(pass.effects.len() <= natural.len());

        if !natural.is_empty() {
            let mut expected = natural.clone();
            expected.rotate_left(recycling.stack().len() % natural.len());
            assert_eq!(recycling.order().collect::<Vec<_>>(), expected);
        }

        let sum: f64 = recycling.stack().iter().map(|e| e.shift_amount).sum();
        assert!((sum - recycling.cumulative_shift()).abs() < 1e-6);
    }
    recycling.reset();
    assert!(recycling.stack().is_empty());
    assert_eq!(recycling.order().collect::<Vec<_>>(), natural);

    // Wraparound: every correction lands inside the cycle.
    let mut page = PageLoopController::new();
    let total = f64::from(session.total_height);
    let _ = page.run_resize_tasks(total, 0.0);
    for &p in &session.positions {
        let _ = page.on_scroll(f64::from(p));
        if let Some(target) = page.apply_correction(f64::from(p)) {
            let cycle = page.cycle_height().expect("correction implies a cycle");
            assert!((0.0..cycle).contains(&target));
            let _ = page.on_scroll(target);
        }
    }
});
