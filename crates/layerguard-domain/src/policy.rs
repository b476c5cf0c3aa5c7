//! The layer policy: declared layers plus the rules between them.

use crate::decision::Decision;
use crate::error::PatternCompileError;
use crate::layer::Layer;
use crate::ordered_set::OrderedSet;
use crate::rule::Rule;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// One loaded layer configuration. Read-only once built.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct Policy {
    #[serde(default)]
    pub layers: OrderedSet<Layer>,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

/// How a single `can_depend` call reached its decision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DecisionTrace {
    pub dependant: String,
    pub identifier: String,
    /// Layers the identifier belongs to, in declaration order.
    pub matched_layers: Vec<String>,
    /// Index into `Policy::rules` of the governing rule; `None` means default deny.
    pub rule_index: Option<usize>,
    pub denied_by: Vec<String>,
    pub decision: Decision,
}

impl DecisionTrace {
    pub fn is_default_deny(&self) -> bool {
        self.rule_index.is_none()
    }
}

/// Something in a policy that is legal but almost certainly a mistake.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigIssue {
    PatternCompile {
        layer: String,
        error: PatternCompileError,
    },
    ShadowedRule {
        layer: String,
        index: usize,
        first_index: usize,
    },
    UndeclaredLayer {
        rule_layer: String,
        referenced: String,
    },
    EmptyLayer {
        layer: String,
    },
}

impl ConfigIssue {
    /// Whether the issue changes matching behavior (a layer silently matches nothing).
    pub fn is_error(&self) -> bool {
        matches!(self, ConfigIssue::PatternCompile { .. })
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigIssue::PatternCompile { layer, error } => {
                write!(f, "layer {layer}: {error}; the layer matches nothing")
            }
            ConfigIssue::ShadowedRule {
                layer,
                index,
                first_index,
            } => write!(
                f,
                "rule #{index} for layer {layer} is never used; rule #{first_index} already governs it"
            ),
            ConfigIssue::UndeclaredLayer {
                rule_layer,
                referenced,
            } => write!(
                f,
                "rule for layer {rule_layer} references undeclared layer {referenced}"
            ),
            ConfigIssue::EmptyLayer { layer } => {
                write!(f, "layer {layer} has no package names or patterns")
            }
        }
    }
}

impl Policy {
    pub fn new(layers: impl IntoIterator<Item = Layer>, rules: Vec<Rule>) -> Self {
        Self {
            layers: layers.into_iter().collect(),
            rules,
        }
    }

    pub fn find_layer(&self, name: &str) -> Option<&Layer> {
        self.layers.get(name)
    }

    /// Every layer `identifier` belongs to, in declaration order.
    pub fn find_layers_for(&self, identifier: &str) -> OrderedSet<&Layer> {
        self.layers
            .iter()
            .filter(|layer| layer.matches(identifier))
            .collect()
    }

    /// The first rule whose subject is `dependant`. Later rules for the same layer are ignored.
    pub fn find_rule_for(&self, dependant: &str) -> Option<&Rule> {
        self.rule_position(dependant).map(|i| &self.rules[i])
    }

    fn rule_position(&self, dependant: &str) -> Option<usize> {
        self.rules.iter().position(|rule| rule.layer == dependant)
    }

    /// The first declared layer `identifier` belongs to.
    pub fn find_layer_containing(&self, identifier: &str) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.matches(identifier))
    }

    /// May a unit in layer `dependant` depend on `identifier`?
    ///
    /// A dependant layer without a rule may depend on nothing.
    pub fn can_depend(&self, dependant: &str, identifier: &str) -> Decision {
        let matched = self.find_layers_for(identifier);
        match self.find_rule_for(dependant) {
            Some(rule) => rule.evaluate(&matched),
            None => Decision::Deny,
        }
    }

    /// Like [`Policy::can_depend`], but keeps the intermediate results.
    pub fn trace(&self, dependant: &str, identifier: &str) -> DecisionTrace {
        let matched = self.find_layers_for(identifier);
        let rule_index = self.rule_position(dependant);

        let (denied_by, decision) = match rule_index {
            Some(i) => {
                let rule = &self.rules[i];
                let denied_by = rule
                    .denied_by(&matched)
                    .into_iter()
                    .map(str::to_string)
                    .collect();
                (denied_by, rule.evaluate(&matched))
            }
            None => (Vec::new(), Decision::Deny),
        };

        DecisionTrace {
            dependant: dependant.to_string(),
            identifier: identifier.to_string(),
            matched_layers: matched.iter().map(|l| l.name.clone()).collect(),
            rule_index,
            denied_by,
            decision,
        }
    }

    /// Report suspicious configuration: layers first, then rules, each in declaration order.
    ///
    /// Forces compilation of every pattern set.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        for layer in &self.layers {
            if !layer.has_membership() {
                issues.push(ConfigIssue::EmptyLayer {
                    layer: layer.name.clone(),
                });
            }
            if let Some(patterns) = &layer.package_name_patterns
                && let Some(error) = patterns.compile_error()
            {
                issues.push(ConfigIssue::PatternCompile {
                    layer: layer.name.clone(),
                    error: error.clone(),
                });
            }
        }

        let mut first_rule: HashMap<&str, usize> = HashMap::new();
        for (index, rule) in self.rules.iter().enumerate() {
            if let Some(&first_index) = first_rule.get(rule.layer.as_str()) {
                issues.push(ConfigIssue::ShadowedRule {
                    layer: rule.layer.clone(),
                    index,
                    first_index,
                });
                continue;
            }
            first_rule.insert(rule.layer.as_str(), index);

            let mut reported: Vec<&str> = Vec::new();
            for name in rule.referenced_layers() {
                if self.layers.has_key(name) || reported.contains(&name) {
                    continue;
                }
                reported.push(name);
                issues.push(ConfigIssue::UndeclaredLayer {
                    rule_layer: rule.layer.clone(),
                    referenced: name.to_string(),
                });
            }
        }

        issues
    }
}
