//! Explain registry for checks and codes.
//!
//! Maps check IDs and codes to human-readable explanations with remediation guidance.

use crate::ids;

/// Explanation entry for a check or code.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the check/code.
    pub title: &'static str,
    /// What the check does and why it exists.
    pub description: &'static str,
    /// How to fix violations.
    pub remediation: &'static str,
    /// Before/after configuration examples.
    pub examples: ExamplePair,
}

/// Before and after examples (layerguard.json snippets).
#[derive(Debug, Clone)]
pub struct ExamplePair {
    pub before: &'static str,
    pub after: &'static str,
}

/// Look up an explanation by check_id or code.
pub fn lookup_explanation(identifier: &str) -> Option<Explanation> {
    match identifier {
        // Check IDs
        ids::CHECK_LAYERS_FORBIDDEN_IMPORT => Some(explain_forbidden_import()),
        ids::CHECK_CONFIG_PATTERNS => Some(explain_config_patterns()),
        ids::CHECK_CONFIG_RULES => Some(explain_config_rules()),
        ids::CHECK_CONFIG_LAYERS => Some(explain_config_layers()),

        // Codes
        ids::CODE_DENIED_IMPORT => Some(explain_denied_import()),
        ids::CODE_NO_RULE_FOR_LAYER => Some(explain_no_rule_for_layer()),
        ids::CODE_PATTERN_COMPILE_ERROR => Some(explain_pattern_compile_error()),
        ids::CODE_SHADOWED_RULE => Some(explain_shadowed_rule()),
        ids::CODE_UNDECLARED_LAYER => Some(explain_undeclared_layer()),
        ids::CODE_EMPTY_LAYER => Some(explain_empty_layer()),

        _ => None,
    }
}

/// List all known check IDs.
pub fn all_check_ids() -> &'static [&'static str] {
    &[
        ids::CHECK_LAYERS_FORBIDDEN_IMPORT,
        ids::CHECK_CONFIG_PATTERNS,
        ids::CHECK_CONFIG_RULES,
        ids::CHECK_CONFIG_LAYERS,
    ]
}

/// List all known codes.
pub fn all_codes() -> &'static [&'static str] {
    &[
        ids::CODE_DENIED_IMPORT,
        ids::CODE_NO_RULE_FOR_LAYER,
        ids::CODE_PATTERN_COMPILE_ERROR,
        ids::CODE_SHADOWED_RULE,
        ids::CODE_UNDECLARED_LAYER,
        ids::CODE_EMPTY_LAYER,
    ]
}

// --- Check-level explanations ---

fn explain_forbidden_import() -> Explanation {
    Explanation {
        title: "Forbidden Layer Import",
        description: "\
Reports imports that cross a layer boundary in a direction the configuration forbids.

Every compilation unit is classified into the first declared layer whose `PackageNames`
or `PackageNamePatterns` match its import path. Each import of that unit is then
classified into every layer it matches, and the rule for the unit's layer decides:
- an import matching a layer listed in `Denied` (or `Denied: [\"*\"]`) is rejected
- everything else, including imports that match no layer, is allowed
- a layer without any rule rejects all of its imports",
        remediation: "\
Move the dependency behind an interface owned by an allowed layer, or, if the
dependency is intended, remove its layer from the rule's `Denied` list.",
        examples: ExamplePair {
            before: r#"{ "Layer": "App", "Denied": ["Print"] }"#,
            after: r#"{ "Layer": "App", "Allowed": ["Print"] }"#,
        },
    }
}

fn explain_config_patterns() -> Explanation {
    Explanation {
        title: "Layer Pattern Compilation",
        description: "\
Reports layers whose `PackageNamePatterns` do not compile as regular expressions.

All patterns of a layer are combined into one regular expression. If that fails, the
layer fails closed: it matches nothing for the rest of the run. Denied rules that name
the layer silently stop firing, so a broken pattern is reported as an error.",
        remediation: "\
Fix the pattern syntax. Patterns use Rust `regex` syntax and are matched anywhere in
the import path; anchor them with `^` and `$` when needed.",
        examples: ExamplePair {
            before: r#"{ "Name": "Encoding", "PackageNamePatterns": ["^encoding/("] }"#,
            after: r#"{ "Name": "Encoding", "PackageNamePatterns": ["^encoding/"] }"#,
        },
    }
}

fn explain_config_rules() -> Explanation {
    Explanation {
        title: "Rule Hygiene",
        description: "\
Reports rules that can never take effect or that reference layers nobody declared.

Only the first rule for a dependant layer is consulted. Referencing an undeclared layer
is legal, but such a reference never matches anything except through `*`.",
        remediation: "\
Merge duplicate rules into the first one and fix misspelled layer names.",
        examples: ExamplePair {
            before: r#"[{ "Layer": "App", "Denied": ["Print"] }, { "Layer": "App", "Denied": ["Infra"] }]"#,
            after: r#"[{ "Layer": "App", "Denied": ["Print", "Infra"] }]"#,
        },
    }
}

fn explain_config_layers() -> Explanation {
    Explanation {
        title: "Layer Hygiene",
        description: "\
Reports layers that declare neither `PackageNames` nor `PackageNamePatterns`.
Such a layer matches nothing.",
        remediation: "Add package names or patterns to the layer, or delete it.",
        examples: ExamplePair {
            before: r#"{ "Name": "Infra" }"#,
            after: r#"{ "Name": "Infra", "PackageNamePatterns": ["/infra/"] }"#,
        },
    }
}

// --- Code-level explanations ---

fn explain_denied_import() -> Explanation {
    Explanation {
        title: "Denied Import",
        description: "\
The imported package belongs to a layer listed in the `Denied` entries of the rule for
the importing unit's layer (or `Denied` contains `*`).",
        remediation: "\
Remove the import or route the dependency through a layer the rule does not deny.",
        examples: ExamplePair {
            before: r#"{ "Layer": "App", "Denied": ["Encoding"] }"#,
            after: r#"{ "Layer": "App", "Denied": [] }"#,
        },
    }
}

fn explain_no_rule_for_layer() -> Explanation {
    Explanation {
        title: "No Rule For Layer",
        description: "\
The importing unit belongs to a declared layer, but no rule names that layer. Without
a rule every import of the layer is denied.",
        remediation: "\
Add a rule for the layer. `{ \"Layer\": \"X\", \"Allowed\": [\"*\"] }` allows everything.",
        examples: ExamplePair {
            before: r#"{ "Rules": [] }"#,
            after: r#"{ "Rules": [{ "Layer": "App", "Allowed": ["*"] }] }"#,
        },
    }
}

fn explain_pattern_compile_error() -> Explanation {
    Explanation {
        title: "Pattern Compile Error",
        description: "\
One of the layer's patterns is not a valid regular expression. The layer matches
nothing until the pattern is fixed.",
        remediation: "Fix the pattern; run `layerguard validate` to check the config.",
        examples: ExamplePair {
            before: r#"{ "PackageNamePatterns": ["[unclosed"] }"#,
            after: r#"{ "PackageNamePatterns": ["\\[unclosed"] }"#,
        },
    }
}

fn explain_shadowed_rule() -> Explanation {
    Explanation {
        title: "Shadowed Rule",
        description: "\
A rule names a dependant layer that an earlier rule already governs. Only the first
rule is ever consulted, so this one is unreachable.",
        remediation: "Merge the rules.",
        examples: ExamplePair {
            before: r#"[{ "Layer": "App" }, { "Layer": "App", "Denied": ["Infra"] }]"#,
            after: r#"[{ "Layer": "App", "Denied": ["Infra"] }]"#,
        },
    }
}

fn explain_undeclared_layer() -> Explanation {
    Explanation {
        title: "Undeclared Layer Reference",
        description: "\
A rule refers to a layer name that is not declared in `Layers`. This is allowed but the
reference never matches.",
        remediation: "Declare the layer or fix the spelling.",
        examples: ExamplePair {
            before: r#"{ "Layer": "App", "Denied": ["Prnt"] }"#,
            after: r#"{ "Layer": "App", "Denied": ["Print"] }"#,
        },
    }
}

fn explain_empty_layer() -> Explanation {
    Explanation {
        title: "Empty Layer",
        description: "The layer has no package names and no patterns, so it matches nothing.",
        remediation: "Add `PackageNames` or `PackageNamePatterns`.",
        examples: ExamplePair {
            before: r#"{ "Name": "Print" }"#,
            after: r#"{ "Name": "Print", "PackageNames": ["fmt", "log"] }"#,
        },
    }
}
