use crate::policy::Policy;
use layerguard_types::Severity;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scope {
    Repo,
    Diff,
}

impl Scope {
    pub fn as_str(self) -> &'static str {
        match self {
            Scope::Repo => "repo",
            Scope::Diff => "diff",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailOn {
    Error,
    Warning,
}

/// Everything `evaluate` needs: the policy and how to report against it.
#[derive(Clone, Debug)]
pub struct EffectiveConfig {
    pub profile: String,
    pub scope: Scope,
    pub fail_on: FailOn,
    pub max_findings: usize,
    /// Skip test units and `_test.go` files.
    pub skip_tests: bool,
    /// Severity of `layers.forbidden_import` findings.
    pub violation_severity: Severity,
    pub policy: Policy,
}

impl EffectiveConfig {
    pub fn new(policy: Policy) -> Self {
        Self {
            profile: "strict".to_string(),
            scope: Scope::Repo,
            fail_on: FailOn::Error,
            max_findings: 200,
            skip_tests: false,
            violation_severity: Severity::Error,
            policy,
        }
    }
}
