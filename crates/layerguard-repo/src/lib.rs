//! Repository adapters: discover a Go module, group its files into compilation units and
//! scan their import declarations.
//!
//! This crate is allowed to do filesystem IO. It should not spawn external processes;
//! diff scoping should be supplied as a list of changed paths by the caller (typically the CLI).

#![forbid(unsafe_code)]

mod discover;
mod parse;

use anyhow::Context;
use camino::Utf8Path;
use layerguard_domain::model::{ImportDecl, SourceFile, UnitModel, WorkspaceModel};
use layerguard_types::{Location, RepoPath};
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

pub use discover::{discover_go_files, parse_module_directive, read_module_path};
pub use parse::{GoFileHeader, ScannedImport, scan_go_file};

/// Fuzz-friendly API for testing parsing robustness without filesystem access.
/// These functions are designed to never panic on any input.
pub mod fuzz {
    use super::*;

    /// Scan arbitrary text as a Go source file header. **Never panics** on any input.
    pub fn scan_go_imports(text: &str) -> anyhow::Result<Vec<String>> {
        let header = parse::scan_go_file(text)?;
        Ok(header.imports.into_iter().map(|i| i.path).collect())
    }

    /// Parse arbitrary text as `go.mod`. **Never panics** on any input.
    pub fn parse_go_mod(text: &str) -> anyhow::Result<String> {
        discover::parse_module_directive(text)
    }

    /// Match `Exclude` glob patterns against a list of candidate paths.
    ///
    /// Returns `Ok(matched_paths)` if every pattern is valid, `Err(...)` otherwise.
    /// **Never panics** on any input.
    pub fn expand_globs(patterns: &[String], candidates: &[String]) -> anyhow::Result<Vec<String>> {
        use globset::{Glob, GlobSetBuilder};

        let mut builder = GlobSetBuilder::new();
        for p in patterns {
            builder.add(Glob::new(p)?);
        }
        let set = builder.build()?;

        Ok(candidates
            .iter()
            .filter(|c| set.is_match(c))
            .cloned()
            .collect())
    }
}

/// Input to scope selection. In `Diff`, the caller provides the changed files (from git).
#[derive(Clone, Debug)]
pub enum ScopeInput {
    Repo,
    Diff { changed_files: Vec<RepoPath> },
}

#[derive(Clone, Debug, Default)]
pub struct ScanOptions {
    /// Repo-relative globs of files or directories that are never scanned.
    pub exclude: Vec<String>,
}

/// Build the in-memory workspace model used by the policy engine.
///
/// `repo_root` must contain `go.mod`. Each directory becomes one unit named after its import
/// path; files whose package clause ends in `_test` form a separate `<path>_test` unit.
pub fn build_workspace_model(
    repo_root: &Utf8Path,
    scope: ScopeInput,
    options: &ScanOptions,
) -> anyhow::Result<WorkspaceModel> {
    let module = read_module_path(repo_root).context("read module path")?;
    let files = discover_go_files(repo_root, &options.exclude).context("discover Go files")?;
    tracing::debug!(module = %module, files = files.len(), "discovered Go files");

    let scanned: Vec<(RepoPath, GoFileHeader)> = files
        .par_iter()
        .map(|rel| {
            let abs = repo_root.join(rel.as_str());
            let text = std::fs::read_to_string(&abs).with_context(|| format!("read {abs}"))?;
            let header = scan_go_file(&text).with_context(|| format!("parse {}", rel.as_str()))?;
            Ok((rel.clone(), header))
        })
        .collect::<anyhow::Result<_>>()?;

    let mut units: BTreeMap<String, UnitModel> = BTreeMap::new();
    for (rel, header) in scanned {
        let dir = rel.parent();
        let base = unit_import_path(&module, &dir);
        let test_package = header.package.ends_with("_test");
        let unit_path = if test_package {
            format!("{base}_test")
        } else {
            base
        };

        let unit = units.entry(unit_path.clone()).or_insert_with(|| UnitModel {
            path: unit_path,
            dir: dir.clone(),
            test: test_package,
            files: Vec::new(),
        });
        unit.files.push(source_file(rel, header));
    }

    let mut units: Vec<UnitModel> = units.into_values().collect();

    if let ScopeInput::Diff { changed_files } = scope {
        let changed: BTreeSet<&str> = changed_files.iter().map(|p| p.as_str()).collect();
        units.retain(|u| u.files.iter().any(|f| changed.contains(f.path.as_str())));
    }

    Ok(WorkspaceModel {
        repo_root: RepoPath::from(repo_root),
        module: Some(module),
        units,
    })
}

fn unit_import_path(module: &str, dir: &RepoPath) -> String {
    if dir.is_root() {
        module.to_string()
    } else {
        format!("{module}/{}", dir.as_str())
    }
}

fn source_file(path: RepoPath, header: GoFileHeader) -> SourceFile {
    let imports = header
        .imports
        .into_iter()
        .map(|i| ImportDecl {
            path: i.path,
            location: Some(Location {
                path: path.clone(),
                line: Some(i.line),
                col: Some(i.col),
            }),
        })
        .collect();

    SourceFile {
        test: path.file_name().ends_with("_test.go"),
        path,
        imports,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn utf8_root(tmp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8 path")
    }

    fn write_file(path: &Utf8Path, contents: &str) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(path, contents).expect("write file");
    }

    fn fixture() -> TempDir {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);
        write_file(&root.join("go.mod"), "module example.com/app\n\ngo 1.22\n");
        write_file(&root.join("main.go"), "package main\n\nimport \"fmt\"\n");
        write_file(
            &root.join("main_test.go"),
            "package main\n\nimport (\n\t\"testing\"\n)\n",
        );
        write_file(
            &root.join("ext_test.go"),
            "package main_test\n\nimport \"example.com/app/db\"\n",
        );
        write_file(
            &root.join("db/db.go"),
            "package db\n\nimport (\n\t\"database/sql\"\n\t\"errors\"\n)\n",
        );
        tmp
    }

    #[test]
    fn repo_scope_groups_units_by_directory_and_test_package() {
        let tmp = fixture();
        let model = build_workspace_model(&utf8_root(&tmp), ScopeInput::Repo, &ScanOptions::default())
            .expect("build model");

        assert_eq!(model.module.as_deref(), Some("example.com/app"));
        let units: Vec<(&str, bool, usize)> = model
            .units
            .iter()
            .map(|u| (u.path.as_str(), u.test, u.files.len()))
            .collect();
        assert_eq!(
            units,
            vec![
                ("example.com/app", false, 2),
                ("example.com/app/db", false, 1),
                ("example.com/app_test", true, 1),
            ]
        );

        let root_unit = &model.units[0];
        let files: Vec<(&str, bool)> = root_unit
            .files
            .iter()
            .map(|f| (f.path.as_str(), f.test))
            .collect();
        assert_eq!(files, vec![("main.go", false), ("main_test.go", true)]);

        let db = &model.units[1];
        let imports: Vec<&str> = db.files[0].imports.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(imports, vec!["database/sql", "errors"]);
        let loc = db.files[0].imports[1].location.as_ref().expect("location");
        assert_eq!(loc.path.as_str(), "db/db.go");
        assert_eq!(loc.line, Some(5));
        assert_eq!(model.imports_scanned(), 5);
    }

    #[test]
    fn diff_scope_keeps_units_with_changed_files() {
        let tmp = fixture();
        let model = build_workspace_model(
            &utf8_root(&tmp),
            ScopeInput::Diff {
                changed_files: vec![RepoPath::new("db/db.go"), RepoPath::new("README.md")],
            },
            &ScanOptions::default(),
        )
        .expect("build model");

        let units: Vec<&str> = model.units.iter().map(|u| u.path.as_str()).collect();
        assert_eq!(units, vec!["example.com/app/db"]);
    }

    #[test]
    fn exclude_option_is_applied() {
        let tmp = fixture();
        let model = build_workspace_model(
            &utf8_root(&tmp),
            ScopeInput::Repo,
            &ScanOptions {
                exclude: vec!["db".to_string()],
            },
        )
        .expect("build model");
        assert!(model.units.iter().all(|u| u.path != "example.com/app/db"));
    }

    #[test]
    fn malformed_file_names_the_file() {
        let tmp = fixture();
        let root = utf8_root(&tmp);
        write_file(&root.join("broken/b.go"), "package b\nimport (\n");
        let err = build_workspace_model(&root, ScopeInput::Repo, &ScanOptions::default())
            .expect_err("broken file");
        assert!(format!("{err:#}").contains("broken/b.go"), "{err:#}");
    }

    proptest! {
        #[test]
        fn fuzz_parsers_never_panic(input in ".*") {
            let _ = fuzz::scan_go_imports(&input);
            let _ = fuzz::parse_go_mod(&input);
        }

        #[test]
        fn scanned_import_paths_survive_any_prefix_comment(
            comment in "[^*]{0,20}",
            path in "[a-z]{1,8}(/[a-z0-9]{1,8}){0,3}",
        ) {
            let src = format!("/*{comment}*/ package p\nimport (\n\t\"{path}\"\n)\n");
            let imports = fuzz::scan_go_imports(&src).expect("scan");
            prop_assert_eq!(imports, vec![path]);
        }
    }
}
