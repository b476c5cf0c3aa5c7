use super::{config_issues, forbidden_import};
use crate::layer::Layer;
use crate::policy::Policy;
use crate::rule::{Rule, WILDCARD};
use crate::test_support::{app_policy, config, model, source_file, unit};
use layerguard_types::{Severity, ids};

fn app_model() -> crate::model::WorkspaceModel {
    model(vec![unit(
        "example.com/app",
        ".",
        vec![source_file(
            "main.go",
            &["encoding/base64", "encoding/json", "errors", "fmt", "strings"],
        )],
    )])
}

#[test]
fn forbidden_import_reports_denied_layers() {
    let cfg = config(app_policy());
    let mut out = Vec::new();
    forbidden_import::run(&app_model(), &cfg, &mut out);

    let messages: Vec<&str> = out.iter().map(|f| f.message.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            "\"encoding/base64\" cannot be imported by App",
            "\"encoding/json\" cannot be imported by App",
            "\"fmt\" cannot be imported by App",
        ]
    );

    let finding = &out[2];
    assert_eq!(finding.check_id, ids::CHECK_LAYERS_FORBIDDEN_IMPORT);
    assert_eq!(finding.code, ids::CODE_DENIED_IMPORT);
    assert_eq!(finding.severity, Severity::Error);
    let location = finding.location.as_ref().expect("location");
    assert_eq!(location.path.as_str(), "main.go");
    assert_eq!(location.line, Some(6));
    assert_eq!(finding.data["import_layers"], serde_json::json!(["Print"]));
    assert!(finding.fingerprint.is_some());
}

#[test]
fn repeated_import_in_one_file_has_distinct_fingerprints() {
    let cfg = config(app_policy());
    let m = model(vec![unit(
        "example.com/app",
        ".",
        vec![source_file("main.go", &["fmt", "errors", "fmt"])],
    )]);
    let mut out = Vec::new();
    forbidden_import::run(&m, &cfg, &mut out);

    assert_eq!(out.len(), 2);
    assert_ne!(out[0].fingerprint, out[1].fingerprint);
}

#[test]
fn forbidden_import_uses_configured_severity() {
    let mut cfg = config(app_policy());
    cfg.violation_severity = Severity::Warning;
    let mut out = Vec::new();
    forbidden_import::run(&app_model(), &cfg, &mut out);
    assert!(out.iter().all(|f| f.severity == Severity::Warning));
}

#[test]
fn layer_without_rule_gets_its_own_code() {
    let policy = Policy::new(
        [Layer::new("App").with_packages(["example.com/app"])],
        Vec::new(),
    );
    let cfg = config(policy);
    let mut out = Vec::new();
    forbidden_import::run(&app_model(), &cfg, &mut out);

    assert_eq!(out.len(), 5);
    assert!(out.iter().all(|f| f.code == ids::CODE_NO_RULE_FOR_LAYER));
}

#[test]
fn unclassified_units_are_skipped() {
    let cfg = config(app_policy());
    let m = model(vec![unit(
        "example.com/app/tools",
        "tools",
        vec![source_file("tools/gen.go", &["fmt"])],
    )]);
    let mut out = Vec::new();
    forbidden_import::run(&m, &cfg, &mut out);
    assert!(out.is_empty());
}

#[test]
fn skip_tests_ignores_test_units_and_files() {
    let m = model(vec![
        unit(
            "example.com/app",
            ".",
            vec![
                source_file("main.go", &["errors"]),
                source_file("main_test.go", &["fmt"]),
            ],
        ),
        unit(
            "example.com/app_test",
            ".",
            vec![source_file("ext_test.go", &["log"])],
        ),
    ]);

    let mut cfg = config(app_policy());
    let mut out = Vec::new();
    forbidden_import::run(&m, &cfg, &mut out);
    assert_eq!(out.len(), 2);

    cfg.skip_tests = true;
    out.clear();
    forbidden_import::run(&m, &cfg, &mut out);
    assert!(out.is_empty());
}

#[test]
fn wildcard_deny_rejects_unknown_imports() {
    let policy = Policy::new(
        [Layer::new("App").with_packages(["example.com/app"])],
        vec![Rule::new("App").deny([WILDCARD])],
    );
    let cfg = config(policy);
    let mut out = Vec::new();
    forbidden_import::run(&app_model(), &cfg, &mut out);
    assert_eq!(out.len(), 5);
    assert!(out.iter().all(|f| f.code == ids::CODE_DENIED_IMPORT));
}

#[test]
fn config_issues_become_findings() {
    let policy = Policy::new(
        [
            Layer::new("Empty"),
            Layer::new("Bad").with_patterns(["(("]),
        ],
        vec![Rule::new("Bad").deny(["Typo"]), Rule::new("Bad")],
    );
    let cfg = config(policy);
    let mut out = Vec::new();
    config_issues::run(&cfg, &mut out);

    let codes: Vec<&str> = out.iter().map(|f| f.code.as_str()).collect();
    assert_eq!(
        codes,
        vec![
            ids::CODE_EMPTY_LAYER,
            ids::CODE_PATTERN_COMPILE_ERROR,
            ids::CODE_UNDECLARED_LAYER,
            ids::CODE_SHADOWED_RULE,
        ]
    );
    assert_eq!(out[1].severity, Severity::Error);
    assert_eq!(out[1].check_id, ids::CHECK_CONFIG_PATTERNS);
    assert_eq!(out[1].data["pattern"], "((");
    assert!(out.iter().filter(|f| f.code != ids::CODE_PATTERN_COMPILE_ERROR).all(|f| f.severity == Severity::Info));
}
