use crate::config::EffectiveConfig;
use crate::fingerprint::fingerprint_for_config;
use crate::policy::ConfigIssue;
use layerguard_types::{Finding, Severity, ids};
use serde_json::json;

pub fn run(cfg: &EffectiveConfig, out: &mut Vec<Finding>) {
    for issue in cfg.policy.validate() {
        out.push(issue_finding(&issue));
    }
}

fn issue_finding(issue: &ConfigIssue) -> Finding {
    let (check_id, code, help, data, subject): (&str, &str, &str, _, Vec<&str>) = match issue {
        ConfigIssue::PatternCompile { layer, error } => (
            ids::CHECK_CONFIG_PATTERNS,
            ids::CODE_PATTERN_COMPILE_ERROR,
            "Fix the pattern syntax; until then the layer matches nothing.",
            json!({
                "layer": layer,
                "pattern": error.pattern,
                "error": error.message,
            }),
            vec![layer.as_str()],
        ),
        ConfigIssue::ShadowedRule {
            layer,
            index,
            first_index,
        } => (
            ids::CHECK_CONFIG_RULES,
            ids::CODE_SHADOWED_RULE,
            "Merge this rule into the first rule for the same layer.",
            json!({
                "layer": layer,
                "index": index,
                "first_index": first_index,
            }),
            vec![layer.as_str()],
        ),
        ConfigIssue::UndeclaredLayer {
            rule_layer,
            referenced,
        } => (
            ids::CHECK_CONFIG_RULES,
            ids::CODE_UNDECLARED_LAYER,
            "Declare the layer under Layers or fix the spelling.",
            json!({
                "rule_layer": rule_layer,
                "referenced": referenced,
            }),
            vec![rule_layer.as_str(), referenced.as_str()],
        ),
        ConfigIssue::EmptyLayer { layer } => (
            ids::CHECK_CONFIG_LAYERS,
            ids::CODE_EMPTY_LAYER,
            "Add PackageNames or PackageNamePatterns to the layer.",
            json!({ "layer": layer }),
            vec![layer.as_str()],
        ),
    };

    // Shadowed rules are identified by position as well as by layer.
    let index_key = match issue {
        ConfigIssue::ShadowedRule { index, .. } => Some(index.to_string()),
        _ => None,
    };
    let mut parts = subject;
    if let Some(i) = &index_key {
        parts.push(i.as_str());
    }

    Finding {
        severity: if issue.is_error() {
            Severity::Error
        } else {
            Severity::Info
        },
        check_id: check_id.to_string(),
        code: code.to_string(),
        message: issue.to_string(),
        location: None,
        help: Some(help.to_string()),
        url: None,
        fingerprint: Some(fingerprint_for_config(check_id, code, &parts)),
        data,
    }
}
