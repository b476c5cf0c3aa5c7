//! Fuzz target for config parsing and policy evaluation.
//!
//! Goal: parsing either format, validating the policy and deciding an edge should
//! **never panic**, including with broken package patterns.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_config_parser
//! ```

#![no_main]

use arbitrary::Arbitrary;
use layerguard_settings::ConfigFormat;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct ConfigInput {
    text: String,
    toml: bool,
    dependant: String,
    identifier: String,
}

fuzz_target!(|input: ConfigInput| {
    if input.text.len() > 4096 {
        return;
    }
    let format = if input.toml {
        ConfigFormat::Toml
    } else {
        ConfigFormat::Json
    };
    if let Ok(cfg) = layerguard_settings::parse_config(&input.text, format) {
        let policy = cfg.policy();
        let _ = policy.validate();
        let trace = policy.trace(&input.dependant, &input.identifier);
        assert_eq!(trace.decision, policy.can_depend(&input.dependant, &input.identifier));
    }
});
