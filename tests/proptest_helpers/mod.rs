#![allow(dead_code)]

use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

/// Tolerance for recovering normalized values from written pixel boxes.
pub const EPS_NORMALIZED: f64 = 1e-9;

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// A label row as (cx, cy, w, h), all in [0, 1].
pub fn arb_row() -> impl Strategy<Value = (f64, f64, f64, f64)> {
    (0.0f64..=1.0, 0.0f64..=1.0, 0.0f64..=1.0, 0.0f64..=1.0)
}

pub fn arb_rows(max_rows: usize) -> impl Strategy<Value = Vec<(f64, f64, f64, f64)>> {
    prop::collection::vec(arb_row(), 0..=max_rows)
}

/// Frame sides from tiny thumbnails up to large scans.
pub fn arb_frame_side() -> impl Strategy<Value = u32> {
    prop_oneof![Just(256u32), 1u32..=8192]
}

/// Renders rows as label-file text using the shortest round-trip notation.
pub fn render_label_text(rows: &[(f64, f64, f64, f64)]) -> String {
    rows.iter()
        .map(|(cx, cy, w, h)| format!("0 {cx} {cy} {w} {h}\n"))
        .collect()
}

pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() <= eps
}
