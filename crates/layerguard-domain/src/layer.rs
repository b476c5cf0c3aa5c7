use crate::ordered_set::{Keyed, OrderedSet};
use crate::pattern::{PackagePattern, PackagePatternSet};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An import path or module identifier, compared literally.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Package(String);

impl Package {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Keyed for Package {
    fn key(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Package {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A named set of packages, given literally and/or by pattern.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct Layer {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_names: Option<OrderedSet<Package>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_name_patterns: Option<PackagePatternSet>,
}

impl Layer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package_names: None,
            package_name_patterns: None,
        }
    }

    pub fn with_packages<I, P>(mut self, packages: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Package>,
    {
        self.package_names
            .get_or_insert_with(OrderedSet::new)
            .extend(packages.into_iter().map(Into::into));
        self
    }

    pub fn with_patterns<I, P>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PackagePattern>,
    {
        let set = self
            .package_name_patterns
            .get_or_insert_with(PackagePatternSet::default);
        for p in patterns {
            set.add(p);
        }
        self
    }

    /// Literal membership first, then the pattern set.
    pub fn matches(&self, identifier: &str) -> bool {
        if let Some(names) = &self.package_names
            && names.has_key(identifier)
        {
            return true;
        }
        self.package_name_patterns
            .as_ref()
            .is_some_and(|patterns| patterns.is_match(identifier))
    }

    /// Whether any membership mechanism is configured with at least one entry.
    pub fn has_membership(&self) -> bool {
        let has_names = self.package_names.as_ref().is_some_and(|n| !n.is_empty());
        let has_patterns = self
            .package_name_patterns
            .as_ref()
            .is_some_and(|p| !p.is_empty());
        has_names || has_patterns
    }
}

impl Keyed for Layer {
    fn key(&self) -> &str {
        &self.name
    }
}
