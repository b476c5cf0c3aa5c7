//! Property-based tests for the policy engine.
//!
//! These tests use proptest to verify invariants around:
//! - the decision algebra of rules and policies
//! - layer lookup order
//! - ordered-set deduplication
//! - findings ordering determinism

use crate::decision::Decision;
use crate::engine::evaluate;
use crate::layer::Layer;
use crate::ordered_set::{Keyed, OrderedSet};
use crate::policy::Policy;
use crate::rule::{Rule, WILDCARD};
use crate::test_support::{config, model, source_file, unit};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

const LAYER_NAMES: &[&str] = &["a", "b", "c", "d", "e"];
const PACKAGES: &[&str] = &["pkg/1", "pkg/2", "pkg/3", "pkg/4", "pkg/5", "pkg/6", "other/x"];
// "(" never compiles, so any layer that draws it fails closed on its patterns.
const PATTERNS: &[&str] = &["^pkg/[12]$", "^other/", "5$", "("];

fn arb_layer_name() -> impl Strategy<Value = String> {
    prop::sample::select(LAYER_NAMES).prop_map(str::to_string)
}

/// Layer names as they may appear in rule lists, including the wildcard and undeclared names.
fn arb_rule_entry() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => arb_layer_name(),
        1 => Just(WILDCARD.to_string()),
        1 => Just("ghost".to_string()),
    ]
}

fn arb_layer() -> impl Strategy<Value = Layer> {
    (
        arb_layer_name(),
        prop::collection::vec(prop::sample::select(PACKAGES), 0..4),
        prop::collection::vec(prop::sample::select(PATTERNS), 0..2),
    )
        .prop_map(|(name, packages, patterns)| {
            let mut layer = Layer::new(name);
            if !packages.is_empty() {
                layer = layer.with_packages(packages);
            }
            if !patterns.is_empty() {
                layer = layer.with_patterns(patterns);
            }
            layer
        })
}

fn arb_rule() -> impl Strategy<Value = Rule> {
    (
        arb_layer_name(),
        prop::collection::vec(arb_rule_entry(), 0..3),
        prop::collection::vec(arb_rule_entry(), 0..3),
    )
        .prop_map(|(layer, allowed, denied)| Rule::new(layer).allow(allowed).deny(denied))
}

fn arb_policy() -> impl Strategy<Value = Policy> {
    (
        prop::collection::vec(arb_layer(), 0..6),
        prop::collection::vec(arb_rule(), 0..5),
    )
        .prop_map(|(layers, rules)| Policy::new(layers, rules))
}

fn arb_identifier() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(PACKAGES).prop_map(str::to_string),
        "[a-z]{1,6}(/[a-z0-9]{1,6}){0,2}",
    ]
}

#[derive(Clone, Debug, PartialEq)]
struct Tagged {
    key: String,
    seq: usize,
}

impl Keyed for Tagged {
    fn key(&self) -> &str {
        &self.key
    }
}

// ============================================================================
// Decision algebra
// ============================================================================

proptest! {
    #[test]
    fn and_is_commutative_and_deny_absorbs(x in any::<bool>(), y in any::<bool>()) {
        let d = |b: bool| if b { Decision::Allow } else { Decision::Deny };
        prop_assert_eq!(d(x).and(d(y)), d(y).and(d(x)));
        prop_assert_eq!(d(x).and(Decision::Deny), Decision::Deny);
        prop_assert_eq!(d(x).and(Decision::Allow), d(x));
    }

    /// The trace never disagrees with the decision it explains.
    #[test]
    fn trace_agrees_with_can_depend(
        policy in arb_policy(),
        dependant in arb_rule_entry(),
        identifier in arb_identifier(),
    ) {
        let trace = policy.trace(&dependant, &identifier);
        prop_assert_eq!(trace.decision, policy.can_depend(&dependant, &identifier));
        prop_assert_eq!(trace.decision.is_deny(), trace.is_default_deny() || !trace.denied_by.is_empty());
    }

    #[test]
    fn no_rule_means_deny(policy in arb_policy(), identifier in arb_identifier()) {
        prop_assert_eq!(policy.can_depend("nobody-has-this-rule", &identifier), Decision::Deny);
    }

    /// A denied wildcard in the governing rule denies any identifier.
    #[test]
    fn wildcard_deny_always_denies(
        mut policy in arb_policy(),
        allowed in prop::collection::vec(arb_rule_entry(), 0..3),
        identifier in arb_identifier(),
    ) {
        policy.rules.insert(0, Rule::new("a").allow(allowed).deny([WILDCARD]));
        prop_assert_eq!(policy.can_depend("a", &identifier), Decision::Deny);
    }

    /// Allowed lists never deny on their own.
    #[test]
    fn allowed_only_rule_never_denies(
        layers in prop::collection::vec(arb_layer(), 0..6),
        allowed in prop::collection::vec(arb_rule_entry(), 0..4),
        identifier in arb_identifier(),
    ) {
        let policy = Policy::new(layers, vec![Rule::new("a").allow(allowed)]);
        prop_assert_eq!(policy.can_depend("a", &identifier), Decision::Allow);
    }

    /// Deny exactly when some denied entry is the wildcard or names a matched layer.
    #[test]
    fn rule_denies_iff_a_denied_entry_fires(
        policy in arb_policy(),
        rule in arb_rule(),
        identifier in arb_identifier(),
    ) {
        let matched = policy.find_layers_for(&identifier);
        let expected = rule
            .denied
            .iter()
            .any(|n| n == WILDCARD || matched.has_key(n));
        prop_assert_eq!(rule.evaluate(&matched).is_deny(), expected);
    }
}

// ============================================================================
// Layer lookup
// ============================================================================

proptest! {
    #[test]
    fn find_layers_for_follows_declaration_order(policy in arb_policy(), identifier in arb_identifier()) {
        let found: Vec<&str> = policy
            .find_layers_for(&identifier)
            .iter()
            .map(|l| l.name.as_str())
            .collect();
        let expected: Vec<&str> = policy
            .layers
            .iter()
            .filter(|l| l.matches(&identifier))
            .map(|l| l.name.as_str())
            .collect();
        prop_assert_eq!(&found, &expected);

        let first = policy.find_layer_containing(&identifier).map(|l| l.name.as_str());
        prop_assert_eq!(first, found.first().copied());
    }

    /// Layers whose patterns fail to compile contribute only their literal names.
    #[test]
    fn broken_patterns_fail_closed(identifier in arb_identifier()) {
        let layer = Layer::new("broken").with_patterns(["(", ".*"]);
        prop_assert!(!layer.matches(&identifier));
    }
}

// ============================================================================
// OrderedSet
// ============================================================================

proptest! {
    #[test]
    fn ordered_set_keeps_first_occurrences(keys in prop::collection::vec("[a-e]", 0..30)) {
        let set: OrderedSet<Tagged> = keys
            .iter()
            .enumerate()
            .map(|(seq, key)| Tagged { key: key.clone(), seq })
            .collect();

        let mut expected: Vec<(String, usize)> = Vec::new();
        for (seq, key) in keys.iter().enumerate() {
            if !expected.iter().any(|(k, _)| k == key) {
                expected.push((key.clone(), seq));
            }
        }

        let actual: Vec<(String, usize)> = set.iter().map(|t| (t.key.clone(), t.seq)).collect();
        prop_assert_eq!(actual, expected);
    }
}

// ============================================================================
// Engine determinism
// ============================================================================

proptest! {
    #[test]
    fn evaluation_order_ignores_file_order(
        policy in arb_policy(),
        imports in prop::collection::vec(arb_identifier(), 0..8),
    ) {
        let as_refs: Vec<&str> = imports.iter().map(String::as_str).collect();
        let mut reversed = as_refs.clone();
        reversed.reverse();

        let forward = model(vec![unit("pkg/1", "p", vec![
            source_file("p/a.go", &as_refs),
            source_file("p/b.go", &reversed),
        ])]);
        let backward = model(vec![unit("pkg/1", "p", vec![
            source_file("p/b.go", &reversed),
            source_file("p/a.go", &as_refs),
        ])]);

        let cfg = config(policy);
        let a = evaluate(&forward, &cfg);
        let b = evaluate(&backward, &cfg);
        prop_assert_eq!(a.findings, b.findings);
        prop_assert_eq!(a.verdict, b.verdict);
    }
}
