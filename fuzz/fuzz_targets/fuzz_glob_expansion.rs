//! Fuzz target for `Exclude` glob matching.
//!
//! Goal: glob matching should **never panic** on any input.
//! It may return errors for invalid patterns, but panics are unacceptable.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_glob_expansion
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct GlobInput {
    /// Exclude globs (e.g. "internal/gen/**", "**/*_mock.go")
    patterns: Vec<String>,
    /// Repo-relative paths to match against
    candidates: Vec<String>,
}

fuzz_target!(|input: GlobInput| {
    if input.patterns.len() > 20 || input.candidates.len() > 100 {
        return;
    }

    let patterns: Vec<String> = input
        .patterns
        .into_iter()
        .filter(|p| p.len() <= 256)
        .collect();
    let candidates: Vec<String> = input
        .candidates
        .into_iter()
        .filter(|c| c.len() <= 512)
        .collect();

    let _ = layerguard_repo::fuzz::expand_globs(&patterns, &candidates);
});
