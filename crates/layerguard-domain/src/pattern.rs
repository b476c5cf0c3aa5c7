//! Regex-based package membership.
//!
//! A [`PackagePatternSet`] combines all of a layer's patterns into one composite regex the
//! first time it is asked to match. Compilation happens at most once per instance, even
//! under concurrent first use, and a failed compilation is sticky: the set then matches
//! nothing and never retries.

use crate::error::PatternCompileError;
use crate::ordered_set::{Keyed, OrderedSet};
use regex::Regex;
use schemars::{JsonSchema, Schema, SchemaGenerator};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;
use std::sync::OnceLock;

/// One raw pattern string (Rust `regex` syntax, unanchored).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct PackagePattern(String);

impl PackagePattern {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self(pattern.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Keyed for PackagePattern {
    fn key(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PackagePattern {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

type Compiled = Result<Option<Regex>, PatternCompileError>;

pub struct PackagePatternSet {
    patterns: OrderedSet<PackagePattern>,
    compiled: OnceLock<Compiled>,
    #[cfg(test)]
    compilations: std::sync::atomic::AtomicUsize,
}

impl PackagePatternSet {
    pub fn new<I, P>(patterns: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PackagePattern>,
    {
        Self::from_ordered(patterns.into_iter().map(Into::into).collect())
    }

    fn from_ordered(patterns: OrderedSet<PackagePattern>) -> Self {
        Self {
            patterns,
            compiled: OnceLock::new(),
            #[cfg(test)]
            compilations: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Add a pattern. A newly inserted pattern discards any compiled matcher.
    pub fn add(&mut self, pattern: impl Into<PackagePattern>) -> bool {
        let inserted = self.patterns.add(pattern.into());
        if inserted {
            self.compiled = OnceLock::new();
        }
        inserted
    }

    pub fn patterns(&self) -> &OrderedSet<PackagePattern> {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled.get().is_some()
    }

    /// Whether `identifier` matches any pattern. Never matches if compilation failed.
    pub fn is_match(&self, identifier: &str) -> bool {
        match self.compile() {
            Ok(Some(re)) => re.is_match(identifier),
            Ok(None) | Err(_) => false,
        }
    }

    /// The sticky compilation error, if any. Triggers compilation on first call.
    pub fn compile_error(&self) -> Option<&PatternCompileError> {
        self.compile().as_ref().err()
    }

    fn compile(&self) -> &Compiled {
        self.compiled.get_or_init(|| {
            #[cfg(test)]
            self.compilations
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            let compiled = compile_patterns(&self.patterns);
            if let Err(err) = &compiled {
                tracing::warn!(error = %err, "package pattern set failed to compile; it will match nothing");
            }
            compiled
        })
    }

    #[cfg(test)]
    fn compilations(&self) -> usize {
        self.compilations.load(std::sync::atomic::Ordering::SeqCst)
    }
}

/// Join every pattern as an alternative of a single regex: `(?:p1)|(?:p2)|...`.
///
/// Each pattern is checked on its own first: wrapping can turn a broken pattern such as
/// `a)|(b` into a valid composite, and the error should name the pattern at fault.
fn compile_patterns(patterns: &OrderedSet<PackagePattern>) -> Compiled {
    if patterns.is_empty() {
        return Ok(None);
    }

    for p in patterns {
        if let Err(err) = Regex::new(p.as_str()) {
            return Err(PatternCompileError {
                pattern: Some(p.as_str().to_string()),
                message: err.to_string(),
            });
        }
    }

    let assembled = patterns
        .iter()
        .map(|p| format!("(?:{})", p.as_str()))
        .collect::<Vec<_>>()
        .join("|");

    Regex::new(&assembled)
        .map(Some)
        .map_err(|err| PatternCompileError {
            pattern: None,
            message: err.to_string(),
        })
}

impl Default for PackagePatternSet {
    fn default() -> Self {
        Self::from_ordered(OrderedSet::new())
    }
}

/// Clones start uncompiled.
impl Clone for PackagePatternSet {
    fn clone(&self) -> Self {
        Self::from_ordered(self.patterns.clone())
    }
}

impl PartialEq for PackagePatternSet {
    fn eq(&self, other: &Self) -> bool {
        self.patterns == other.patterns
    }
}

impl Eq for PackagePatternSet {}

impl fmt::Debug for PackagePatternSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PackagePatternSet")
            .field("patterns", &self.patterns)
            .field("compiled", &self.is_compiled())
            .finish()
    }
}

impl<P: Into<PackagePattern>> FromIterator<P> for PackagePatternSet {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl Serialize for PackagePatternSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.patterns.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PackagePatternSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        OrderedSet::<PackagePattern>::deserialize(deserializer).map(Self::from_ordered)
    }
}

impl JsonSchema for PackagePatternSet {
    fn schema_name() -> Cow<'static, str> {
        "PackagePatternSet".into()
    }

    fn inline_schema() -> bool {
        true
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        Vec::<PackagePattern>::json_schema(generator)
    }
}
