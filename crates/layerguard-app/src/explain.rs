//! The `explain` use case: look up check/code documentation.

use layerguard_types::explain::{self, Explanation};

/// Output from the explain use case.
#[derive(Clone, Debug)]
pub enum ExplainOutput {
    Found(Explanation),
    /// Unknown identifier; includes available check_ids and codes.
    NotFound {
        identifier: String,
        available_check_ids: &'static [&'static str],
        available_codes: &'static [&'static str],
    },
}

/// Look up an explanation for a check_id or code.
pub fn run_explain(identifier: &str) -> ExplainOutput {
    match explain::lookup_explanation(identifier) {
        Some(exp) => ExplainOutput::Found(exp),
        None => ExplainOutput::NotFound {
            identifier: identifier.to_string(),
            available_check_ids: explain::all_check_ids(),
            available_codes: explain::all_codes(),
        },
    }
}

/// Format an explanation for terminal display.
pub fn format_explanation(exp: &Explanation) -> String {
    let mut out = String::new();

    out.push_str(exp.title);
    out.push('\n');
    out.push_str(&"=".repeat(exp.title.len()));
    out.push_str("\n\n");
    out.push_str(exp.description);
    out.push_str("\n\nRemediation\n-----------\n");
    out.push_str(exp.remediation);
    out.push_str("\n\nExamples\n--------\n\n");
    push_example(&mut out, "Before (violation):", exp.examples.before);
    out.push('\n');
    push_example(&mut out, "After (fixed):", exp.examples.after);

    out
}

fn push_example(out: &mut String, label: &str, body: &str) {
    out.push_str(label);
    out.push_str("\n```json\n");
    out.push_str(body);
    out.push_str("\n```\n");
}

/// Format the "not found" error message for terminal display.
pub fn format_not_found(identifier: &str, check_ids: &[&str], codes: &[&str]) -> String {
    let mut out = format!("Unknown check_id or code: {identifier}\n\nAvailable check_ids:\n");
    for id in check_ids {
        out.push_str(&format!("  - {id}\n"));
    }
    out.push_str("\nAvailable codes:\n");
    for code in codes {
        out.push_str(&format!("  - {code}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn found(output: ExplainOutput) -> Explanation {
        match output {
            ExplainOutput::Found(exp) => exp,
            ExplainOutput::NotFound { identifier, .. } => panic!("{identifier} not found"),
        }
    }

    #[test]
    fn explain_known_check_id() {
        let exp = found(run_explain("layers.forbidden_import"));
        assert_eq!(exp.title, "Forbidden Layer Import");
    }

    #[test]
    fn explain_known_code() {
        let exp = found(run_explain("no_rule_for_layer"));
        assert_eq!(exp.title, "No Rule For Layer");
    }

    #[test]
    fn explain_unknown() {
        match run_explain("not_a_real_thing") {
            ExplainOutput::NotFound {
                identifier,
                available_check_ids,
                available_codes,
            } => {
                assert_eq!(identifier, "not_a_real_thing");
                assert!(available_check_ids.contains(&"layers.forbidden_import"));
                assert!(available_codes.contains(&"denied_import"));
            }
            ExplainOutput::Found(_) => panic!("unexpected explanation"),
        }
    }

    #[test]
    fn format_explanation_output() {
        let formatted = format_explanation(&found(run_explain("denied_import")));
        assert!(formatted.starts_with("Denied Import\n=============\n"));
        assert!(formatted.contains("Remediation"));
        assert!(formatted.contains("Before (violation):\n```json\n"));
        assert!(formatted.contains("After (fixed):\n```json\n"));
    }

    #[test]
    fn format_not_found_output() {
        let formatted = format_not_found("missing", &["check.one", "check.two"], &["code.one"]);
        assert!(formatted.contains("Unknown check_id or code: missing"));
        assert!(formatted.contains("  - check.two\n"));
        assert!(formatted.contains("Available codes:\n  - code.one\n"));
    }
}
