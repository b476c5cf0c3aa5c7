use crate::{RenderableReport, RenderableSeverity};

/// Render findings as GitHub Actions workflow command annotations.
///
/// Format:
/// `::{level} file={path},line={line},col={col},title={title}::{message}`
pub fn render_github_annotations(report: &RenderableReport) -> Vec<String> {
    let mut out = Vec::new();

    for f in &report.findings {
        let level = match f.severity {
            RenderableSeverity::Error => "error",
            RenderableSeverity::Warning => "warning",
            RenderableSeverity::Info => "notice",
        };

        let mut props: Vec<String> = Vec::new();
        if let Some(loc) = &f.location {
            props.push(format!("file={}", escape_property(&loc.path)));
            if let Some(line) = loc.line {
                props.push(format!("line={line}"));
            }
            if let Some(col) = loc.col {
                props.push(format!("col={col}"));
            }
        }
        props.push(format!(
            "title={}",
            escape_property(&format!("layerguard {}", f.code))
        ));

        let mut message = f.message.clone();
        if let Some(help) = &f.help {
            message.push('\n');
            message.push_str(help);
        }

        out.push(format!(
            "::{level} {}::{}",
            props.join(","),
            escape_data(&message)
        ));
    }

    out
}

fn escape_data(s: &str) -> String {
    s.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(s: &str) -> String {
    escape_data(s).replace(':', "%3A").replace(',', "%2C")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        RenderableData, RenderableFinding, RenderableLocation, RenderableVerdictStatus,
    };

    fn finding(location: Option<RenderableLocation>, help: Option<&str>) -> RenderableFinding {
        RenderableFinding {
            severity: RenderableSeverity::Error,
            check_id: "layers.forbidden_import".to_string(),
            code: "denied_import".to_string(),
            message: "\"fmt\" cannot be imported by App".to_string(),
            location,
            help: help.map(str::to_string),
            layer: Some("App".to_string()),
            import: Some("fmt".to_string()),
        }
    }

    fn report(findings: Vec<RenderableFinding>) -> RenderableReport {
        RenderableReport {
            verdict: RenderableVerdictStatus::Fail,
            findings,
            data: RenderableData::default(),
        }
    }

    #[test]
    fn annotation_with_location() {
        let lines = render_github_annotations(&report(vec![finding(
            Some(RenderableLocation {
                path: "cmd/app/main.go".to_string(),
                line: Some(7),
                col: Some(2),
            }),
            None,
        )]));
        insta::assert_snapshot!(lines.join("\n"), @r#"::error file=cmd/app/main.go,line=7,col=2,title=layerguard denied_import::"fmt" cannot be imported by App"#);
    }

    #[test]
    fn annotation_without_location_escapes_help() {
        let lines = render_github_annotations(&report(vec![finding(None, Some("100% sure, really"))]));
        assert_eq!(
            lines,
            vec![
                "::error title=layerguard denied_import::\"fmt\" cannot be imported by App%0A100%25 sure, really"
                    .to_string()
            ]
        );
    }

    #[test]
    fn property_values_escape_separators() {
        assert_eq!(escape_property("a,b:c"), "a%2Cb%3Ac");
    }
}
