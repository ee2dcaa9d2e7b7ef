#![no_main]

use drift_core::wrap::{fold_into_cycle, wrap_offset};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (f64, f64)| {
    let (value, cycle) = input;

    let wrapped = wrap_offset(value, cycle);
    let folded = fold_into_cycle(value, cycle);

    if !(cycle.is_finite() && cycle > 0.0) || !value.is_finite() {
        assert_eq!(wrapped, 0.0);
        assert!(folded.is_none());
        return;
    }

    assert!(wrapped <= 0.0 && wrapped > -cycle, "wrap {value} in {cycle} -> {wrapped}");
    let folded = folded.expect("ready cycle folds");
    assert!((0.0..cycle).contains(&folded), "fold {value} in {cycle} -> {folded}");

    if value <= 0.0 && value > -cycle {
        assert_eq!(wrapped, value);
    }
    if (0.0..cycle).contains(&value) {
        assert_eq!(folded, value);
    }
});
