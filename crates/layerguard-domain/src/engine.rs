use crate::checks;
use crate::config::{EffectiveConfig, FailOn};
use crate::model::WorkspaceModel;
use crate::report::{DomainReport, SeverityCounts};
use layerguard_types::{Finding, LayerguardData, Severity, Verdict};

pub fn evaluate(model: &WorkspaceModel, cfg: &EffectiveConfig) -> DomainReport {
    let mut findings: Vec<Finding> = Vec::new();

    checks::run_all(model, cfg, &mut findings);

    // Deterministic ordering before truncation.
    findings.sort_by(compare_findings);

    let total = findings.len() as u32;

    // Truncation only limits what is emitted; the gate sees every finding.
    let verdict = compute_verdict(&findings, cfg.fail_on);
    let counts = SeverityCounts::from_findings(&findings);

    let mut emitted = findings;
    let mut truncated_reason: Option<String> = None;
    if emitted.len() > cfg.max_findings {
        emitted.truncate(cfg.max_findings);
        truncated_reason = Some(format!(
            "findings truncated to max_findings={}",
            cfg.max_findings
        ));
    }

    let units_in_scope = model
        .units
        .iter()
        .filter(|u| !(cfg.skip_tests && u.test))
        .collect::<Vec<_>>();
    let units_classified = units_in_scope
        .iter()
        .filter(|u| cfg.policy.find_layer_containing(&u.path).is_some())
        .count();

    tracing::debug!(
        units = units_in_scope.len(),
        classified = units_classified,
        findings = total,
        "evaluation finished"
    );

    let data = LayerguardData {
        scope: cfg.scope.as_str().to_string(),
        profile: cfg.profile.clone(),
        units_scanned: units_in_scope.len() as u32,
        units_classified: units_classified as u32,
        imports_scanned: model.imports_scanned() as u32,
        findings_total: total,
        findings_emitted: emitted.len() as u32,
        truncated_reason,
    };

    DomainReport {
        verdict,
        findings: emitted,
        data,
        counts,
    }
}

fn compute_verdict(findings: &[Finding], fail_on: FailOn) -> Verdict {
    if findings.iter().any(|f| f.severity == Severity::Error) {
        return Verdict::Fail;
    }

    if findings.iter().any(|f| f.severity == Severity::Warning) {
        return match fail_on {
            FailOn::Warning => Verdict::Fail,
            FailOn::Error => Verdict::Warn,
        };
    }

    Verdict::Pass
}

fn compare_findings(a: &Finding, b: &Finding) -> std::cmp::Ordering {
    // Ordering priority:
    // 1) severity (error -> warning -> info)
    // 2) location.path (missing last)
    // 3) location.line, then col (missing last)
    // 4) check_id
    // 5) code
    // 6) message
    let severity_rank = |sev: Severity| match sev {
        Severity::Error => 0,
        Severity::Warning => 1,
        Severity::Info => 2,
    };
    let key = |f: &Finding| match &f.location {
        Some(l) => (
            l.path.as_str().to_string(),
            l.line.unwrap_or(u32::MAX),
            l.col.unwrap_or(u32::MAX),
        ),
        None => ("~".to_string(), u32::MAX, u32::MAX),
    };

    severity_rank(a.severity)
        .cmp(&severity_rank(b.severity))
        .then_with(|| key(a).cmp(&key(b)))
        .then_with(|| a.check_id.cmp(&b.check_id))
        .then_with(|| a.code.cmp(&b.code))
        .then_with(|| a.message.cmp(&b.message))
}
