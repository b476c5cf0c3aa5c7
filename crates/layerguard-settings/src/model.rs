use layerguard_domain::{Layer, OrderedSet, Policy, Rule};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `layerguard.json` schema v1.
///
/// `Layers` and `Rules` keep the PascalCase keys of the established config format. The host
/// options are all optional so that a bare layer/rule document stays valid.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct LayerguardConfigV1 {
    /// Optional schema string for tooling (`layerguard.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// `strict` (default), `warn` or `compat`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// `repo` or `diff`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// When to fail the check: `error` (default) or `warning`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_on: Option<String>,

    /// How many findings to emit before truncating the list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_findings: Option<u32>,

    /// Skip external test packages and `_test.go` files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_tests: Option<bool>,

    /// Repo-relative globs that are never scanned.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,

    #[serde(default)]
    pub layers: OrderedSet<Layer>,

    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl LayerguardConfigV1 {
    pub fn policy(&self) -> Policy {
        Policy {
            layers: self.layers.clone(),
            rules: self.rules.clone(),
        }
    }
}
