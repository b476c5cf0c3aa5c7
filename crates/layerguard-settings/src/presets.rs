use layerguard_domain::{EffectiveConfig, FailOn, Policy, Scope};
use layerguard_types::Severity;

pub const DEFAULT_PROFILE: &str = "strict";

/// Preset profiles are opinionated defaults.
///
/// Keep these small and readable. Anything complex should go into repo config.
pub fn preset(profile: &str, policy: Policy) -> EffectiveConfig {
    match profile {
        "strict" => strict_profile(policy),
        "warn" => warn_profile(policy),
        "compat" => compat_profile(policy),
        other => {
            tracing::warn!(profile = other, "unknown profile; using strict");
            strict_profile(policy)
        }
    }
}

fn strict_profile(policy: Policy) -> EffectiveConfig {
    EffectiveConfig {
        profile: "strict".to_string(),
        scope: Scope::Repo,
        fail_on: FailOn::Error,
        max_findings: 200,
        skip_tests: false,
        violation_severity: Severity::Error,
        policy,
    }
}

fn warn_profile(policy: Policy) -> EffectiveConfig {
    EffectiveConfig {
        profile: "warn".to_string(),
        violation_severity: Severity::Warning,
        ..strict_profile(policy)
    }
}

fn compat_profile(policy: Policy) -> EffectiveConfig {
    // Matches what the analyzer reported before test files were checked.
    EffectiveConfig {
        profile: "compat".to_string(),
        violation_severity: Severity::Warning,
        skip_tests: true,
        ..strict_profile(policy)
    }
}
