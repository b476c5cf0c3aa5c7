use crate::decision::Decision;
use crate::ordered_set::{Keyed, OrderedSet};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Reserved rule-list entry matching any layer.
pub const WILDCARD: &str = "*";

/// Allowed/denied layer names for one dependant layer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct Rule {
    /// Name of the dependant layer this rule governs.
    pub layer: String,

    /// Layer names that may appear among a dependency's layers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed: Vec<String>,

    /// Layer names that may NOT appear among a dependency's layers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub denied: Vec<String>,
}

impl Rule {
    pub fn new(layer: impl Into<String>) -> Self {
        Self {
            layer: layer.into(),
            allowed: Vec::new(),
            denied: Vec::new(),
        }
    }

    pub fn allow<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn deny<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.denied.extend(names.into_iter().map(Into::into));
        self
    }

    /// Decide a dependency whose layers are `matched`.
    ///
    /// Blocklist semantics: the result is `Allow` unless an entry of `denied` names one of
    /// the matched layers or is the wildcard. `allowed` entries only ever AND in `Allow`,
    /// so being absent from `allowed` never denies.
    pub fn evaluate<T: Keyed>(&self, matched: &OrderedSet<T>) -> Decision {
        let mut decision = Decision::Allow;
        for name in &self.allowed {
            if fires(name, matched) {
                decision = decision.and(Decision::Allow);
            }
        }
        for name in &self.denied {
            if fires(name, matched) {
                decision = decision.and(Decision::Deny);
            }
        }
        decision
    }

    /// The `denied` entries that fire against `matched`, in rule order.
    pub fn denied_by<'r, T: Keyed>(&'r self, matched: &OrderedSet<T>) -> Vec<&'r str> {
        self.denied
            .iter()
            .filter(|name| fires(name, matched))
            .map(String::as_str)
            .collect()
    }

    /// Every layer name the rule mentions (subject first), wildcards excluded.
    pub fn referenced_layers(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.layer.as_str())
            .chain(self.allowed.iter().map(String::as_str))
            .chain(self.denied.iter().map(String::as_str))
            .filter(|name| *name != WILDCARD)
    }
}

fn fires<T: Keyed>(name: &str, matched: &OrderedSet<T>) -> bool {
    name == WILDCARD || matched.has_key(name)
}
