use anyhow::Context;
use layerguard_render::{
    RenderableData, RenderableFinding, RenderableLocation, RenderableReport, RenderableSeverity,
    RenderableVerdictStatus,
};
use layerguard_types::{
    Finding, LayerguardData, LayerguardReport, SCHEMA_REPORT_V1, Severity, ToolMeta, Verdict, ids,
};
use time::OffsetDateTime;

pub fn parse_report_json(text: &str) -> anyhow::Result<LayerguardReport> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    if schema != SCHEMA_REPORT_V1 {
        anyhow::bail!("unknown report schema: {schema:?} (expected {SCHEMA_REPORT_V1})");
    }
    serde_json::from_value(value).context("parse layerguard report")
}

pub fn serialize_report(report: &LayerguardReport) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(report).context("serialize report")
}

pub fn to_renderable(report: &LayerguardReport) -> RenderableReport {
    RenderableReport {
        verdict: match report.verdict {
            Verdict::Pass => RenderableVerdictStatus::Pass,
            Verdict::Warn => RenderableVerdictStatus::Warn,
            Verdict::Fail => RenderableVerdictStatus::Fail,
        },
        findings: report.findings.iter().map(renderable_finding).collect(),
        data: RenderableData {
            scope: report.data.scope.clone(),
            profile: report.data.profile.clone(),
            units_scanned: report.data.units_scanned,
            units_classified: report.data.units_classified,
            imports_scanned: report.data.imports_scanned,
            findings_emitted: report.data.findings_emitted,
            findings_total: report.data.findings_total,
            truncated_reason: report.data.truncated_reason.clone(),
        },
    }
}

fn renderable_finding(f: &Finding) -> RenderableFinding {
    let data_str = |key: &str| f.data.get(key).and_then(|v| v.as_str()).map(str::to_string);
    RenderableFinding {
        severity: match f.severity {
            Severity::Info => RenderableSeverity::Info,
            Severity::Warning => RenderableSeverity::Warning,
            Severity::Error => RenderableSeverity::Error,
        },
        check_id: f.check_id.clone(),
        code: f.code.clone(),
        message: f.message.clone(),
        location: f.location.as_ref().map(|loc| RenderableLocation {
            path: loc.path.as_str().to_string(),
            line: loc.line,
            col: loc.col,
        }),
        help: f.help.clone(),
        layer: data_str("layer"),
        import: data_str("import"),
    }
}

/// A failing report with a single `tool.runtime` finding, written when the check itself
/// could not run.
pub fn runtime_error_report(message: &str) -> LayerguardReport {
    let now = OffsetDateTime::now_utc();
    LayerguardReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: "layerguard".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at: now,
        finished_at: now,
        verdict: Verdict::Fail,
        findings: vec![Finding {
            severity: Severity::Error,
            check_id: ids::CHECK_TOOL_RUNTIME.to_string(),
            code: ids::CODE_RUNTIME_ERROR.to_string(),
            message: message.to_string(),
            location: None,
            help: Some("Fix the tool error and re-run layerguard.".to_string()),
            url: None,
            fingerprint: None,
            data: serde_json::Value::Null,
        }],
        data: LayerguardData {
            scope: "repo".to_string(),
            profile: "unknown".to_string(),
            findings_total: 1,
            findings_emitted: 1,
            ..LayerguardData::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layerguard_types::{Location, RepoPath};
    use serde_json::json;

    fn sample() -> LayerguardReport {
        let mut report = runtime_error_report("boom");
        report.verdict = Verdict::Fail;
        report.findings = vec![Finding {
            severity: Severity::Error,
            check_id: ids::CHECK_LAYERS_FORBIDDEN_IMPORT.to_string(),
            code: ids::CODE_DENIED_IMPORT.to_string(),
            message: "\"fmt\" cannot be imported by App".to_string(),
            location: Some(Location {
                path: RepoPath::new("a.go"),
                line: Some(4),
                col: Some(2),
            }),
            help: None,
            url: None,
            fingerprint: Some("abc".to_string()),
            data: json!({
                "unit": "github.com/aereal/a",
                "layer": "App",
                "import": "fmt",
                "import_layers": ["Print"],
            }),
        }];
        report.data.profile = "strict".to_string();
        report
    }

    #[test]
    fn serialize_then_parse() {
        let report = sample();
        let bytes = serialize_report(&report).expect("serialize");
        let text = String::from_utf8(bytes).expect("utf8");
        let back = parse_report_json(&text).expect("parse");
        assert_eq!(back, report);
    }

    #[test]
    fn parse_rejects_foreign_schema() {
        let err = parse_report_json(r#"{"schema":"other.report.v1"}"#).expect_err("schema");
        assert!(err.to_string().contains("unknown report schema"));
    }

    #[test]
    fn parse_rejects_invalid_json() {
        assert!(parse_report_json("{not json").is_err());
    }

    #[test]
    fn renderable_pulls_layer_and_import_from_data() {
        let renderable = to_renderable(&sample());
        assert_eq!(renderable.verdict, RenderableVerdictStatus::Fail);
        let f = &renderable.findings[0];
        assert_eq!(f.layer.as_deref(), Some("App"));
        assert_eq!(f.import.as_deref(), Some("fmt"));
        assert_eq!(
            f.location.as_ref().map(RenderableLocation::display).as_deref(),
            Some("a.go:4:2")
        );
        assert_eq!(renderable.data.profile, "strict");
    }

    #[test]
    fn runtime_error_report_fails() {
        let report = runtime_error_report("read config");
        assert_eq!(report.verdict, Verdict::Fail);
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].check_id, ids::CHECK_TOOL_RUNTIME);
        assert_eq!(report.findings[0].message, "read config");
        assert_eq!(report.data.findings_total, 1);
    }
}
