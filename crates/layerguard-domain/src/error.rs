use thiserror::Error;

/// A layer's pattern set could not be assembled into a matcher.
///
/// The pattern set that produced it keeps matching nothing; this value is only
/// for diagnostics (see [`crate::Policy::validate`]).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{}", render(.pattern.as_deref(), .message))]
pub struct PatternCompileError {
    /// First pattern that fails on its own, when one can be singled out.
    pub pattern: Option<String>,
    pub message: String,
}

fn render(pattern: Option<&str>, message: &str) -> String {
    match pattern {
        Some(p) => format!("invalid package pattern {p:?}: {message}"),
        None => format!("invalid package pattern set: {message}"),
    }
}
