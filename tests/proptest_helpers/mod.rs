#![allow(dead_code)]

use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub const LABELS: [(&str, &str); 4] = [
    ("/m/01", "Cat"),
    ("/m/02", "Dog"),
    ("/m/03", "Fish & Chips"),
    ("/m/04", "Tie, bow"),
];

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

/// A well-formed normalized box as (xmin, xmax, ymin, ymax), column order.
pub fn arb_norm_box() -> impl Strategy<Value = (f64, f64, f64, f64)> {
    (0.0f64..=1.0, 0.0f64..=1.0, 0.0f64..=1.0, 0.0f64..=1.0).prop_map(|(a, b, c, d)| {
        (a.min(b), a.max(b), c.min(d), c.max(d))
    })
}

/// Rows as (image index, label index, box, truncated).
pub fn arb_rows(
    max_images: usize,
    max_rows: usize,
) -> impl Strategy<Value = Vec<(usize, usize, (f64, f64, f64, f64), u8)>> {
    proptest::collection::vec(
        (0..max_images, 0..LABELS.len(), arb_norm_box(), 0u8..=1),
        1..=max_rows,
    )
}

/// Text that survives an XML write/parse cycle: no surrounding whitespace and
/// a few characters that need escaping.
pub fn arb_xml_text() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z][A-Za-z0-9 &<>'\"/]{0,12}[A-Za-z0-9]")
        .expect("valid text regex")
}

pub fn image_id(idx: usize) -> String {
    format!("img{idx:03}")
}

pub fn image_size(idx: usize) -> (u32, u32) {
    (64 + 37 * idx as u32, 48 + 53 * idx as u32)
}

pub fn class_descriptions_csv() -> String {
    LABELS
        .iter()
        .map(|(code, name)| format!("{code},\"{name}\"\n"))
        .collect()
}
