//! The `check` use case: evaluate policy and produce a report.

use anyhow::Context;
use camino::Utf8Path;
use layerguard_domain::Scope as DomainScope;
use layerguard_repo::{ScanOptions, ScopeInput};
use layerguard_settings::{ConfigFormat, Overrides, ResolvedConfig};
use layerguard_types::{LayerguardReport, RepoPath, SCHEMA_REPORT_V1, ToolMeta, Verdict};
use time::OffsetDateTime;

/// Input for the check use case.
#[derive(Clone, Debug)]
pub struct CheckInput<'a> {
    /// Repository root path (directory containing `go.mod`).
    pub repo_root: &'a Utf8Path,
    /// Config file contents.
    pub config_text: &'a str,
    pub config_format: ConfigFormat,
    /// CLI overrides.
    pub overrides: Overrides,
    /// For diff scope: list of changed files (relative to repo root).
    pub changed_files: Option<Vec<RepoPath>>,
}

/// Output from the check use case.
#[derive(Clone, Debug)]
pub struct CheckOutput {
    pub report: LayerguardReport,
    /// The resolved configuration used.
    pub resolved_config: ResolvedConfig,
}

/// Run the check use case: parse config, scan the module, evaluate policy, produce report.
pub fn run_check(input: CheckInput<'_>) -> anyhow::Result<CheckOutput> {
    let started_at = OffsetDateTime::now_utc();

    let cfg = crate::load_config(input.config_text, input.config_format)?;
    let resolved = layerguard_settings::resolve_config(cfg, input.overrides.clone())
        .context("resolve config")?;

    let scope_input = match resolved.effective.scope {
        DomainScope::Repo => ScopeInput::Repo,
        DomainScope::Diff => {
            let changed_files = input
                .changed_files
                .clone()
                .context("diff scope requires changed_files")?;
            ScopeInput::Diff { changed_files }
        }
    };

    let options = ScanOptions {
        exclude: resolved.exclude.clone(),
    };
    let model = layerguard_repo::build_workspace_model(input.repo_root, scope_input, &options)
        .context("build workspace model")?;

    let domain_report = layerguard_domain::evaluate(&model, &resolved.effective);
    tracing::info!(
        verdict = ?domain_report.verdict,
        errors = domain_report.counts.error,
        warnings = domain_report.counts.warning,
        "check finished"
    );

    let report = LayerguardReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: "layerguard".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at,
        finished_at: OffsetDateTime::now_utc(),
        verdict: domain_report.verdict,
        findings: domain_report.findings,
        data: domain_report.data,
    };

    Ok(CheckOutput {
        report,
        resolved_config: resolved,
    })
}

/// Map verdict to exit code: 0 = pass/warn, 2 = fail.
pub fn verdict_exit_code(verdict: &Verdict) -> i32 {
    match verdict {
        Verdict::Pass => 0,
        Verdict::Warn => 0,
        Verdict::Fail => 2,
    }
}
