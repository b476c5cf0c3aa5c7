//! Use case orchestration for layerguard.
//!
//! This crate provides the application layer: use cases that coordinate the domain, repo, and
//! render layers. It is intentionally thin and delegates heavy lifting to the appropriate layers.
//!
//! The CLI crate depends on this; it only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod check;
mod explain;
mod query;
mod render;
mod report;
mod validate;

pub use check::{CheckInput, CheckOutput, run_check, verdict_exit_code};
pub use explain::{ExplainOutput, format_explanation, format_not_found, run_explain};
pub use query::{QueryInput, format_trace, run_query};
pub use render::{render_annotations, render_markdown};
pub use report::{parse_report_json, runtime_error_report, serialize_report, to_renderable};
pub use validate::{ValidateOutput, format_validation, run_validate};

use anyhow::Context;
use layerguard_settings::{ConfigFormat, LayerguardConfigV1};

/// Parse config text with a context naming the format.
pub(crate) fn load_config(text: &str, format: ConfigFormat) -> anyhow::Result<LayerguardConfigV1> {
    layerguard_settings::parse_config(text, format).with_context(|| match format {
        ConfigFormat::Json => "parse config (JSON)",
        ConfigFormat::Toml => "parse config (TOML)",
    })
}
