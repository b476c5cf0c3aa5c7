use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to encode TOML config: {0}")]
    TomlEncode(toml::ser::Error),

    #[error("unknown {field}: {value} (expected {expected})")]
    InvalidValue {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("invalid Exclude glob {pattern:?}: {source}")]
    InvalidExclude {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}
