//! Stable DTOs and IDs used across the layerguard workspace.
//!
//! This crate is intentionally boring:
//! - data types for the emitted report
//! - stable string IDs and codes
//! - canonical repo-relative path handling
//! - explain registry for remediation guidance

#![forbid(unsafe_code)]

pub mod explain;
pub mod ids;
pub mod path;
pub mod receipt;

pub use explain::{lookup_explanation, ExamplePair, Explanation};
pub use path::RepoPath;
pub use receipt::{
    Finding, LayerguardData, LayerguardReport, LayerguardReportV1, Location, ReportEnvelope,
    Severity, ToolMeta, Verdict, SCHEMA_CONFIG_V1, SCHEMA_REPORT_V1,
};
