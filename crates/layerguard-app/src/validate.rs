//! The `validate` use case: load a config and report its issues without scanning.

use layerguard_domain::ConfigIssue;
use layerguard_settings::{ConfigFormat, Overrides, ResolvedConfig};

#[derive(Clone, Debug)]
pub struct ValidateOutput {
    pub resolved: ResolvedConfig,
}

impl ValidateOutput {
    pub fn issues(&self) -> &[ConfigIssue] {
        &self.resolved.issues
    }

    /// 0 when the config is usable as written, 2 when a layer silently matches nothing.
    pub fn exit_code(&self) -> i32 {
        if self.resolved.has_errors() { 2 } else { 0 }
    }
}

pub fn run_validate(
    config_text: &str,
    format: ConfigFormat,
    overrides: Overrides,
) -> anyhow::Result<ValidateOutput> {
    let cfg = crate::load_config(config_text, format)?;
    let resolved = layerguard_settings::resolve_config(cfg, overrides)?;
    Ok(ValidateOutput { resolved })
}

/// One line per issue, then a summary line.
pub fn format_validation(output: &ValidateOutput) -> String {
    let policy = &output.resolved.effective.policy;
    let mut out = String::new();
    for issue in output.issues() {
        let level = if issue.is_error() { "error" } else { "info" };
        out.push_str(&format!("{level}: {issue}\n"));
    }
    let errors = output.issues().iter().filter(|i| i.is_error()).count();
    out.push_str(&format!(
        "{} layers, {} rules, profile {}: {} issues ({errors} errors)\n",
        policy.layers.len(),
        policy.rules.len(),
        output.resolved.effective.profile,
        output.issues().len(),
    ));
    out
}
