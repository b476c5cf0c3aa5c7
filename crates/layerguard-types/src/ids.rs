//! Stable identifiers for checks and finding codes.
//!
//! `check_id` is a dotted namespace. `code` is a short snake_case discriminator.

// Checks
pub const CHECK_LAYERS_FORBIDDEN_IMPORT: &str = "layers.forbidden_import";
pub const CHECK_CONFIG_PATTERNS: &str = "config.patterns";
pub const CHECK_CONFIG_RULES: &str = "config.rules";
pub const CHECK_CONFIG_LAYERS: &str = "config.layers";

// Codes: layers.forbidden_import
pub const CODE_DENIED_IMPORT: &str = "denied_import";
pub const CODE_NO_RULE_FOR_LAYER: &str = "no_rule_for_layer";

// Codes: config.patterns
pub const CODE_PATTERN_COMPILE_ERROR: &str = "pattern_compile_error";

// Codes: config.rules
pub const CODE_SHADOWED_RULE: &str = "shadowed_rule";
pub const CODE_UNDECLARED_LAYER: &str = "undeclared_layer";

// Codes: config.layers
pub const CODE_EMPTY_LAYER: &str = "empty_layer";

// Tool-level
pub const CHECK_TOOL_RUNTIME: &str = "tool.runtime";
pub const CODE_RUNTIME_ERROR: &str = "runtime_error";
