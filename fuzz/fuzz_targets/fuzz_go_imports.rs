//! Fuzz target for the Go import scanner and the `go.mod` module directive parser.
//!
//! Goal: both should **never panic** on any input.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_go_imports
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = layerguard_repo::fuzz::scan_go_imports(text);
        let _ = layerguard_repo::fuzz::parse_go_mod(text);
    }
});
