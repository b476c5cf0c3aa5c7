use crate::{RenderableFinding, RenderableReport, RenderableVerdictStatus};
use std::fmt::Write;

/// Render a report as GitHub-flavored Markdown.
///
/// Forbidden imports go into a table; everything else (configuration and runtime findings)
/// is listed below it.
pub fn render_markdown(report: &RenderableReport) -> String {
    let mut out = String::new();
    let d = &report.data;

    out.push_str("# Layerguard report\n\n");
    let verdict = match report.verdict {
        RenderableVerdictStatus::Pass => "PASS",
        RenderableVerdictStatus::Warn => "WARN",
        RenderableVerdictStatus::Fail => "FAIL",
    };
    let _ = writeln!(out, "- Verdict: **{verdict}**");
    let _ = writeln!(out, "- Scope: {} (profile: {})", d.scope, d.profile);
    let _ = writeln!(
        out,
        "- Units: {} scanned, {} in a layer; {} imports",
        d.units_scanned, d.units_classified, d.imports_scanned
    );
    let _ = writeln!(
        out,
        "- Findings: {} (emitted) / {} (total)\n",
        d.findings_emitted, d.findings_total
    );

    if let Some(r) = &d.truncated_reason {
        let _ = writeln!(out, "> Note: {r}\n");
    }

    if report.findings.is_empty() {
        out.push_str("No findings.\n");
        return out;
    }

    let (imports, other): (Vec<&RenderableFinding>, Vec<&RenderableFinding>) = report
        .findings
        .iter()
        .partition(|f| f.import.is_some());

    if !imports.is_empty() {
        out.push_str("## Forbidden imports\n\n");
        out.push_str("| Severity | Location | Import | Layer | Code |\n");
        out.push_str("|---|---|---|---|---|\n");
        for f in &imports {
            let location = f
                .location
                .as_ref()
                .map(|l| format!("`{}`", l.display()))
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "| {} | {} | `{}` | {} | `{}` |",
                f.severity.label(),
                location,
                cell(f.import.as_deref().unwrap_or_default()),
                cell(f.layer.as_deref().unwrap_or_default()),
                f.code
            );
        }
        out.push('\n');
    }

    if !other.is_empty() {
        out.push_str("## Other findings\n\n");
        for f in &other {
            let _ = write!(
                out,
                "- [{}] `{}` / `{}`: {}",
                f.severity.label(),
                f.check_id,
                f.code,
                f.message
            );
            if let Some(loc) = &f.location {
                let _ = write!(out, " (`{}`)", loc.display());
            }
            out.push('\n');
            if let Some(help) = &f.help {
                let _ = writeln!(out, "  - help: {help}");
            }
        }
    }

    out
}

fn cell(s: &str) -> String {
    s.replace('|', "\\|")
}
