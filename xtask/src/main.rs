//! Developer tasks (schema generation, conformance checks).
//!
//! Keeping this separate avoids bloating the end-user CLI.

use anyhow::{Context, bail};
use layerguard_settings::ConfigFormat;
use schemars::schema_for;
use std::fs;
use std::path::{Path, PathBuf};

/// The workspace root (parent of the xtask directory).
fn project_root() -> anyhow::Result<PathBuf> {
    let manifest_dir = match std::env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => std::env::current_dir().context("determine current directory")?,
    };
    if manifest_dir.ends_with("xtask")
        && let Some(parent) = manifest_dir.parent()
    {
        return Ok(parent.to_path_buf());
    }
    Ok(manifest_dir)
}

fn schemas_dir() -> anyhow::Result<PathBuf> {
    Ok(project_root()?.join("schemas"))
}

fn fixtures_dir() -> anyhow::Result<PathBuf> {
    Ok(project_root()?.join("tests").join("fixtures"))
}

/// Schema definition with its target filename.
struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: "layerguard.report.v1.json",
            generate: || schema_for!(layerguard_types::LayerguardReport),
        },
        SchemaSpec {
            filename: "layerguard.config.v1.json",
            generate: || schema_for!(layerguard_settings::LayerguardConfigV1),
        },
    ]
}

/// Pretty-printed JSON with trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("serialize schema")?;
    json.push('\n');
    Ok(json)
}

fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir()?;
    fs::create_dir_all(&dir).context("create schemas directory")?;

    for spec in schema_specs() {
        let json = serialize_schema(&(spec.generate)())?;
        let path = dir.join(spec.filename);
        fs::write(&path, &json).with_context(|| format!("write {}", path.display()))?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

/// Fail if schemas/ differs from what the types generate.
fn validate_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir()?;
    let mut missing = Vec::new();
    let mut mismatched = Vec::new();

    for spec in schema_specs() {
        let path = dir.join(spec.filename);
        if !path.exists() {
            missing.push(spec.filename);
            continue;
        }
        let expected = serialize_schema(&(spec.generate)())?;
        let actual =
            fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
        if expected != actual {
            mismatched.push(spec.filename);
        }
    }

    if missing.is_empty() && mismatched.is_empty() {
        println!("All schemas are up to date.");
        return Ok(());
    }
    for name in &missing {
        eprintln!("missing: {name}");
    }
    for name in &mismatched {
        eprintln!("out of date: {name}");
    }
    eprintln!("\nRun `cargo xtask emit-schemas` to regenerate.");
    bail!("schema validation failed")
}

/// Every fixture config must match the config schema and load without errors.
fn conform() -> anyhow::Result<()> {
    let schema = serde_json::to_value(schema_for!(layerguard_settings::LayerguardConfigV1))
        .context("serialize config schema")?;
    let validator = jsonschema::validator_for(&schema)
        .map_err(|e| anyhow::anyhow!("compile config schema: {e}"))?;

    let dir = fixtures_dir()?;
    let mut checked = 0;
    let mut errors = Vec::new();

    for entry in fs::read_dir(&dir).with_context(|| format!("read {}", dir.display()))? {
        let config = entry?.path().join("layerguard.json");
        if !config.exists() {
            continue;
        }
        checked += 1;
        errors.extend(check_fixture_config(&config, &validator)?);
    }

    if !errors.is_empty() {
        for error in &errors {
            eprintln!("  - {error}");
        }
        bail!("{} fixture config errors", errors.len());
    }
    println!("{checked} fixture configs conform to layerguard.config.v1");
    Ok(())
}

fn check_fixture_config(path: &Path, validator: &jsonschema::Validator) -> anyhow::Result<Vec<String>> {
    let name = path.display().to_string();
    let text = fs::read_to_string(path).with_context(|| format!("read {name}"))?;
    let value: serde_json::Value =
        serde_json::from_str(&text).with_context(|| format!("parse {name}"))?;

    let mut errors: Vec<String> = validator
        .iter_errors(&value)
        .map(|err| format!("{name}: {err}"))
        .collect();

    match layerguard_settings::parse_config(&text, ConfigFormat::Json) {
        Ok(cfg) => {
            for issue in cfg.policy().validate().iter().filter(|i| i.is_error()) {
                errors.push(format!("{name}: {issue}"));
            }
        }
        Err(err) => errors.push(format!("{name}: {err}")),
    }
    Ok(errors)
}

/// Every check ID and code has a complete explanation.
fn explain_coverage() -> anyhow::Result<()> {
    use layerguard_types::explain;

    let check_ids = explain::all_check_ids();
    let codes = explain::all_codes();
    let mut errors = Vec::new();

    for id in check_ids.iter().chain(codes) {
        match explain::lookup_explanation(id) {
            Some(exp) => {
                if exp.title.is_empty() || exp.description.is_empty() || exp.remediation.is_empty() {
                    errors.push(format!("'{id}' has an incomplete explanation"));
                }
            }
            None => errors.push(format!("'{id}' has no explanation")),
        }
    }

    if !errors.is_empty() {
        for error in &errors {
            eprintln!("  - {error}");
        }
        bail!("explain coverage failed with {} errors", errors.len());
    }
    println!("{} check IDs and {} codes have explanations", check_ids.len(), codes.len());
    Ok(())
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  emit-schemas      Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas  Check if schemas/ matches generated output (for CI)");
    eprintln!("  print-schema-ids  Print known schema IDs");
    eprintln!("  conform           Validate fixture configs against layerguard.config.v1");
    eprintln!("  explain-coverage  Validate all check IDs and codes have explanations");
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(String::as_str).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "conform" => conform(),
        "explain-coverage" => explain_coverage(),
        "print-schema-ids" => {
            for spec in schema_specs() {
                println!("{}", spec.filename.trim_end_matches(".json"));
            }
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}
