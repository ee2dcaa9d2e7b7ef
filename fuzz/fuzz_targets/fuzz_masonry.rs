#![no_main]

use arbitrary::Arbitrary;
use drift_core::config::MasonryConfig;
use drift_layout::MasonryPacker;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Gallery {
    width: u16,
    gap: u8,
    min_column_width: u16,
    extra_column_width: u16,
    ratios: Vec<f64>,
}

fuzz_target!(|gallery: Gallery| {
    if gallery.ratios.len() > 512 {
        return;
    }
    let min_column_width = f64::from(gallery.min_column_width.max(1));
    let config = MasonryConfig {
        gap: f64::from(gallery.gap),
        min_column_width,
        max_column_width: min_column_width + f64::from(gallery.extra_column_width),
    };
    let width = f64::from(gallery.width);
    let layout = MasonryPacker::new(config).pack(width, &gallery.ratios);

    if width <= 0.0 || gallery.ratios.is_empty() {
        assert!(layout.is_empty());
        assert_eq!(layout.column_count, 0);
        return;
    }

    assert!(layout.column_count >= 1);
    assert!(layout.column_count <= gallery.ratios.len());
    assert_eq!(layout.items.len(), gallery.ratios.len());
    assert_eq!(layout.column_heights.len(), layout.column_count);
    assert!(layout.height >= 0.0);

    for (index, item) in layout.items.iter().enumerate() {
        assert_eq!(item.index, index);
        assert!(item.column < layout.column_count);
        assert!(item.aspect_ratio.is_finite() && item.aspect_ratio > 0.0);
        assert!(item.x.is_finite() && item.y.is_finite());
        assert!(item.y >= 0.0 && item.height >= 0.0);
        assert_eq!(item.width, layout.column_width);
    }
});
