//! Config parsing and profile/preset resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod error;
mod model;
mod presets;
mod resolve;

pub use error::ConfigError;
pub use model::LayerguardConfigV1;
pub use resolve::{Overrides, ResolvedConfig};

use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// `.toml` selects TOML; anything else is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Json,
        }
    }
}

/// Parse `layerguard.json` (or `.toml`) into a typed model.
///
/// A blank document is a valid config with no layers.
pub fn parse_config(input: &str, format: ConfigFormat) -> Result<LayerguardConfigV1, ConfigError> {
    if input.trim().is_empty() {
        return Ok(LayerguardConfigV1::default());
    }
    let cfg = match format {
        ConfigFormat::Json => serde_json::from_str(input)?,
        ConfigFormat::Toml => toml::from_str(input)?,
    };
    Ok(cfg)
}

/// Serialize a config back to its document form. Lists keep their (deduplicated) order.
pub fn render_config(cfg: &LayerguardConfigV1, format: ConfigFormat) -> Result<String, ConfigError> {
    match format {
        ConfigFormat::Json => Ok(serde_json::to_string_pretty(cfg)?),
        ConfigFormat::Toml => toml::to_string_pretty(cfg).map_err(ConfigError::TomlEncode),
    }
}

/// Resolve the effective config used by the engine (profiles + overrides + policy).
pub fn resolve_config(
    cfg: LayerguardConfigV1,
    overrides: Overrides,
) -> Result<ResolvedConfig, ConfigError> {
    resolve::resolve_config(cfg, overrides)
}
