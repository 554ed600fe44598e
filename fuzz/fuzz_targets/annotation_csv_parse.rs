//! Fuzz target for Open Images annotation CSV parsing.
//!
//! Feeds arbitrary bytes to the annotation reader and groups whatever parses,
//! checking for panics, crashes, or hangs.

#![no_main]

use libfuzzer_sys::fuzz_target;
use oidvoc::openimages::group_rows;
use oidvoc::openimages::rows::from_annotation_csv_slice;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    if let Ok(rows) = from_annotation_csv_slice(data) {
        let _ = group_rows(rows);
    }
});
