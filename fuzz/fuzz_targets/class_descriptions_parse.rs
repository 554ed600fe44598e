//! Fuzz target for class-description table parsing.

#![no_main]

use libfuzzer_sys::fuzz_target;
use oidvoc::openimages::labels::from_class_descriptions_slice;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let _ = from_class_descriptions_slice(data);
});
