//! Rendering utilities for CI surfaces (Markdown, GitHub annotations).
//!
//! Renderers work on a small presentation model so that they do not depend on the report
//! schema; `layerguard-app` does the conversion.

#![forbid(unsafe_code)]

mod gha;
mod markdown;
mod model;

pub use gha::render_github_annotations;
pub use markdown::render_markdown;
pub use model::{
    RenderableData, RenderableFinding, RenderableLocation, RenderableReport, RenderableSeverity,
    RenderableVerdictStatus,
};
