//! Property-based invariant tests for the masonry packer.
//!
//! 1. Column count is within `[1, items]` for ready inputs
//! 2. Every item is in range, in input order, and sized to the column width
//! 3. Column spread never exceeds the tallest item plus one gap
//! 4. Square items in an exact-fit width produce `k` balanced columns
//! 5. Packing is deterministic
//! 6. No item overlaps another item in the same column

use drift_layout::{MasonryConfig, MasonryPacker};
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

fn ratio_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![
        8 => 0.25f64..4.0,
        1 => Just(0.0),
        1 => Just(f64::NAN),
        1 => -3.0f64..0.0,
    ]
}

fn ratios_strategy() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(ratio_strategy(), 1..80)
}

fn config_strategy() -> impl Strategy<Value = MasonryConfig> {
    (0.0f64..24.0, 120.0f64..320.0, 0.0f64..200.0).prop_map(|(gap, min, extra)| MasonryConfig {
        gap,
        min_column_width: min,
        max_column_width: min + extra,
    })
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn column_count_bounded(
        config in config_strategy(),
        width in 1.0f64..4_000.0,
        ratios in ratios_strategy(),
    ) {
        let layout = MasonryPacker::new(config).pack(width, &ratios);
        prop_assert!(layout.column_count >= 1);
        prop_assert!(layout.column_count <= ratios.len());
        prop_assert_eq!(layout.column_heights.len(), layout.column_count);
    }

    #[test]
    fn items_in_order_and_sized(
        config in config_strategy(),
        width in 1.0f64..4_000.0,
        ratios in ratios_strategy(),
    ) {
        let layout = MasonryPacker::new(config).pack(width, &ratios);
        prop_assert_eq!(layout.items.len(), ratios.len());
        for (i, item) in layout.items.iter().enumerate() {
            prop_assert_eq!(item.index, i);
            prop_assert!(item.column < layout.column_count);
            prop_assert_eq!(item.width, layout.column_width);
            prop_assert!(item.aspect_ratio > 0.0 && item.aspect_ratio.is_finite());
            prop_assert!(item.height.is_finite() && item.height >= 0.0);
            prop_assert!(item.y >= 0.0);
        }
    }

    #[test]
    fn spread_bounded_by_tallest_item(
        config in config_strategy(),
        width in 1.0f64..4_000.0,
        ratios in ratios_strategy(),
    ) {
        let layout = MasonryPacker::new(config).pack(width, &ratios);
        let tallest = layout.items.iter().map(|i| i.height).fold(0.0, f64::max);
        prop_assert!(
            layout.column_spread() <= tallest + config.gap + 1e-6,
            "spread {} tallest {}", layout.column_spread(), tallest
        );
    }

    #[test]
    fn exact_fit_squares_balance(k in 1usize..8, n in 1usize..60) {
        let config = MasonryConfig::default();
        let width = k as f64 * (config.min_column_width + config.gap) - config.gap;
        let layout = MasonryPacker::new(config).pack(width, &vec![1.0; n]);
        prop_assert_eq!(layout.column_count, k.min(n));
        if n >= k {
            let item_height = layout.items[0].height;
            prop_assert!(layout.column_spread() <= item_height + config.gap + 1e-9);
        }
    }

    #[test]
    fn packing_is_deterministic(
        config in config_strategy(),
        width in 1.0f64..4_000.0,
        ratios in ratios_strategy(),
    ) {
        let packer = MasonryPacker::new(config);
        let a = packer.pack(width, &ratios);
        let b = packer.pack(width, &ratios);
        prop_assert_eq!(a.column_count, b.column_count);
        prop_assert_eq!(a.items.len(), b.items.len());
        for (x, y) in a.items.iter().zip(&b.items) {
            prop_assert_eq!(x.column, y.column);
            prop_assert_eq!(x.y.to_bits(), y.y.to_bits());
        }
    }

    #[test]
    fn items_in_a_column_do_not_overlap(
        config in config_strategy(),
        width in 1.0f64..4_000.0,
        ratios in ratios_strategy(),
    ) {
        let layout = MasonryPacker::new(config).pack(width, &ratios);
        for column in 0..layout.column_count {
            let mut bottom = 0.0_f64;
            for item in layout.items.iter().filter(|i| i.column == column) {
                prop_assert!(item.y + 1e-9 >= bottom);
                bottom = item.y + item.height;
            }
        }
    }
}
