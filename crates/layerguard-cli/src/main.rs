//! CLI entry point for layerguard.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, and exit codes.
//! All business logic lives in the `layerguard-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use layerguard_app::{
    CheckInput, ExplainOutput, QueryInput, format_explanation, format_not_found, format_trace,
    format_validation, parse_report_json, render_annotations, render_markdown, run_check,
    run_explain, run_query, run_validate, runtime_error_report, serialize_report, to_renderable,
    verdict_exit_code,
};
use layerguard_settings::{ConfigFormat, Overrides};
use layerguard_types::{LayerguardReport, RepoPath};
use std::process::Command;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "layerguard",
    version,
    about = "Layered architecture dependency rules for Go modules"
)]
struct Cli {
    /// Repository root (directory containing go.mod).
    #[arg(long, default_value = ".", global = true)]
    repo_root: Utf8PathBuf,

    /// Path to the layer config (JSON, or TOML with a .toml extension), relative to the repo root.
    #[arg(long, default_value = "layerguard.json", global = true)]
    config: Utf8PathBuf,

    /// Override profile (strict|warn|compat).
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Override scope (repo|diff).
    #[arg(long, global = true)]
    scope: Option<String>,

    /// Override maximum findings to emit.
    #[arg(long, global = true)]
    max_findings: Option<u32>,

    /// Log at debug level (LAYERGUARD_LOG takes precedence).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan the module, evaluate the layer rules and write artifacts.
    Check {
        /// Do not check test units or `_test.go` files.
        #[arg(long)]
        skip_tests: bool,

        /// In diff scope: git base revision (e.g. origin/main).
        #[arg(long)]
        base: Option<String>,
        /// In diff scope: git head revision (e.g. HEAD).
        #[arg(long)]
        head: Option<String>,

        /// Where to write the JSON report.
        #[arg(long, default_value = "artifacts/layerguard/report.json")]
        report_out: Utf8PathBuf,

        /// Write a Markdown report alongside the JSON.
        #[arg(long)]
        write_markdown: bool,

        /// Where to write the Markdown report (if enabled).
        #[arg(long, default_value = "artifacts/layerguard/comment.md")]
        markdown_out: Utf8PathBuf,
    },

    /// Load the config and report suspicious layers and rules.
    Validate,

    /// Show how a single dependency edge is decided.
    Query {
        /// Dependant layer name.
        layer: String,
        /// Imported package path.
        identifier: String,
    },

    /// Render markdown from an existing JSON report.
    Md {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/layerguard/report.json")]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Render GitHub Actions annotations from an existing JSON report.
    Annotations {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/layerguard/report.json")]
        report: Utf8PathBuf,

        /// Maximum number of annotations to emit.
        #[arg(long, default_value = "10")]
        max: usize,
    },

    /// Explain a check_id or code with remediation guidance.
    Explain {
        /// The check_id (e.g. "layers.forbidden_import") or code (e.g. "denied_import").
        identifier: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.cmd {
        Commands::Check {
            skip_tests,
            base,
            head,
            report_out,
            write_markdown,
            markdown_out,
        } => cmd_check(
            &cli,
            CheckArgs {
                skip_tests: *skip_tests,
                base: base.clone(),
                head: head.clone(),
                report_out: report_out.clone(),
                write_markdown: *write_markdown,
                markdown_out: markdown_out.clone(),
            },
        ),
        Commands::Validate => cmd_validate(&cli),
        Commands::Query { layer, identifier } => cmd_query(&cli, layer, identifier),
        Commands::Md { report, output } => cmd_md(report, output.as_deref()),
        Commands::Annotations { report, max } => cmd_annotations(report, *max),
        Commands::Explain { identifier } => cmd_explain(identifier),
    };

    match result {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("layerguard error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("LAYERGUARD_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

struct CheckArgs {
    skip_tests: bool,
    base: Option<String>,
    head: Option<String>,
    report_out: Utf8PathBuf,
    write_markdown: bool,
    markdown_out: Utf8PathBuf,
}

fn overrides(cli: &Cli) -> Overrides {
    Overrides {
        profile: cli.profile.clone(),
        scope: cli.scope.clone(),
        max_findings: cli.max_findings,
        skip_tests: None,
    }
}

fn repo_root(cli: &Cli) -> Utf8PathBuf {
    cli.repo_root
        .canonicalize_utf8()
        .unwrap_or_else(|_| cli.repo_root.clone())
}

/// Read the config file named by `--config`. A missing file is an error.
fn read_config(repo_root: &Utf8Path, config: &Utf8Path) -> anyhow::Result<(String, ConfigFormat)> {
    let path = repo_root.join(config);
    let text =
        std::fs::read_to_string(&path).with_context(|| format!("read config: {path}"))?;
    tracing::debug!(%path, "loaded config");
    Ok((text, ConfigFormat::from_path(path.as_std_path())))
}

fn cmd_check(cli: &Cli, args: CheckArgs) -> anyhow::Result<i32> {
    let repo_root = repo_root(cli);

    let result = (|| -> anyhow::Result<i32> {
        if !repo_root.exists() {
            anyhow::bail!("repo root does not exist: {repo_root}");
        }
        let (cfg_text, cfg_format) = read_config(&repo_root, &cli.config)?;

        let mut overrides = overrides(cli);
        if args.skip_tests {
            overrides.skip_tests = Some(true);
        }

        let changed_files = if wants_diff_scope(cli, &cfg_text, cfg_format) {
            let base = args.base.clone().context("diff scope requires --base")?;
            let head = args.head.clone().context("diff scope requires --head")?;
            Some(
                git_changed_files(&repo_root, &base, &head)
                    .context("git diff --name-only failed")?,
            )
        } else {
            None
        };

        let output = run_check(CheckInput {
            repo_root: &repo_root,
            config_text: &cfg_text,
            config_format: cfg_format,
            overrides,
            changed_files,
        })?;

        write_report_file(&args.report_out, &output.report).context("write report json")?;

        if args.write_markdown {
            let md = render_markdown(&to_renderable(&output.report));
            write_text_file(&args.markdown_out, &md).context("write markdown")?;
        }

        Ok(verdict_exit_code(&output.report.verdict))
    })();

    match result {
        Ok(code) => Ok(code),
        Err(err) => {
            let report = runtime_error_report(&format!("{err:#}"));
            if let Err(write_err) = write_report_file(&args.report_out, &report) {
                tracing::warn!(error = %write_err, "could not write runtime error report");
            }
            Err(err)
        }
    }
}

/// Whether the check runs in diff scope: the `--scope` flag wins over the config's `Scope`.
fn wants_diff_scope(cli: &Cli, cfg_text: &str, cfg_format: ConfigFormat) -> bool {
    if let Some(scope) = cli.scope.as_deref() {
        return scope == "diff";
    }
    layerguard_settings::parse_config(cfg_text, cfg_format)
        .ok()
        .and_then(|cfg| cfg.scope)
        .is_some_and(|scope| scope == "diff")
}

fn git_changed_files(repo_root: &Utf8Path, base: &str, head: &str) -> anyhow::Result<Vec<RepoPath>> {
    let output = Command::new("git")
        .current_dir(repo_root)
        .args(["diff", "--name-only", &format!("{base}..{head}")])
        .output()
        .context("spawn git")?;

    if !output.status.success() {
        anyhow::bail!("git diff returned non-zero exit status");
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let paths = stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(RepoPath::new)
        .collect::<Vec<_>>();
    tracing::debug!(count = paths.len(), "changed files");

    Ok(paths)
}

fn write_report_file(path: &Utf8Path, report: &LayerguardReport) -> anyhow::Result<()> {
    let data = serialize_report(report)?;
    write_bytes(path, &data).with_context(|| format!("write report: {path}"))
}

fn write_text_file(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    write_bytes(path, text.as_bytes()).with_context(|| format!("write text: {path}"))
}

fn write_bytes(path: &Utf8Path, data: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {parent}"))?;
    }
    std::fs::write(path, data)?;
    Ok(())
}

fn cmd_validate(cli: &Cli) -> anyhow::Result<i32> {
    let repo_root = repo_root(cli);
    let (cfg_text, cfg_format) = read_config(&repo_root, &cli.config)?;
    let output = run_validate(&cfg_text, cfg_format, overrides(cli))?;
    print!("{}", format_validation(&output));
    Ok(output.exit_code())
}

fn cmd_query(cli: &Cli, layer: &str, identifier: &str) -> anyhow::Result<i32> {
    let repo_root = repo_root(cli);
    let (cfg_text, cfg_format) = read_config(&repo_root, &cli.config)?;
    let trace = run_query(QueryInput {
        config_text: &cfg_text,
        config_format: cfg_format,
        layer,
        identifier,
    })?;
    print!("{}", format_trace(&trace));
    Ok(if trace.decision.is_allow() { 0 } else { 2 })
}

fn read_report(report_path: &Utf8Path) -> anyhow::Result<LayerguardReport> {
    let report_text = std::fs::read_to_string(report_path)
        .with_context(|| format!("read report: {report_path}"))?;
    parse_report_json(&report_text)
}

fn cmd_md(report_path: &Utf8Path, output: Option<&Utf8Path>) -> anyhow::Result<i32> {
    let report = read_report(report_path)?;
    let md = render_markdown(&to_renderable(&report));

    match output {
        Some(out_path) => write_text_file(out_path, &md).context("write markdown output")?,
        None => print!("{md}"),
    }
    Ok(0)
}

fn cmd_annotations(report_path: &Utf8Path, max: usize) -> anyhow::Result<i32> {
    let report = read_report(report_path)?;
    for annotation in render_annotations(&to_renderable(&report), max) {
        println!("{annotation}");
    }
    Ok(0)
}

fn cmd_explain(identifier: &str) -> anyhow::Result<i32> {
    match run_explain(identifier) {
        ExplainOutput::Found(exp) => {
            print!("{}", format_explanation(&exp));
            Ok(0)
        }
        ExplainOutput::NotFound {
            identifier,
            available_check_ids,
            available_codes,
        } => {
            eprint!(
                "{}",
                format_not_found(&identifier, available_check_ids, available_codes)
            );
            Ok(1)
        }
    }
}
