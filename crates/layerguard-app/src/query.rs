//! The `query` use case: explain a single `can_depend` decision.

use layerguard_domain::DecisionTrace;
use layerguard_settings::ConfigFormat;

#[derive(Clone, Debug)]
pub struct QueryInput<'a> {
    pub config_text: &'a str,
    pub config_format: ConfigFormat,
    /// Name of the dependant layer.
    pub layer: &'a str,
    /// Dependency identifier (import path).
    pub identifier: &'a str,
}

pub fn run_query(input: QueryInput<'_>) -> anyhow::Result<DecisionTrace> {
    let cfg = crate::load_config(input.config_text, input.config_format)?;
    let policy = cfg.policy();
    if policy.find_layer(input.layer).is_none() {
        tracing::warn!(layer = input.layer, "querying a layer that is not declared");
    }
    let trace = policy.trace(input.layer, input.identifier);
    tracing::debug!(decision = %trace.decision, rule = ?trace.rule_index, "query");
    Ok(trace)
}

pub fn format_trace(trace: &DecisionTrace) -> String {
    let matched = if trace.matched_layers.is_empty() {
        "(none)".to_string()
    } else {
        trace.matched_layers.join(", ")
    };
    let rule = match trace.rule_index {
        Some(i) => format!("#{i}"),
        None => "none (default deny)".to_string(),
    };
    let mut out = format!(
        "{}: {} -> {}\n  matched layers: {matched}\n  rule: {rule}\n",
        trace.decision, trace.dependant, trace.identifier,
    );
    if !trace.denied_by.is_empty() {
        out.push_str(&format!("  denied by: {}\n", trace.denied_by.join(", ")));
    }
    out
}
