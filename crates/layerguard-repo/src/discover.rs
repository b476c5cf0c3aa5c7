use anyhow::{Context, bail};
use camino::{Utf8Path, Utf8PathBuf};
use globset::{Glob, GlobSet, GlobSetBuilder};
use layerguard_types::RepoPath;
use std::path::PathBuf;
use walkdir::{DirEntry, WalkDir};

/// Read the module path from `<repo_root>/go.mod`.
pub fn read_module_path(repo_root: &Utf8Path) -> anyhow::Result<String> {
    let go_mod = repo_root.join("go.mod");
    let text = std::fs::read_to_string(&go_mod).with_context(|| format!("read {go_mod}"))?;
    parse_module_directive(&text).with_context(|| format!("parse {go_mod}"))
}

/// Extract the `module` directive from go.mod text.
pub fn parse_module_directive(text: &str) -> anyhow::Result<String> {
    for raw in text.lines() {
        let line = raw.split("//").next().unwrap_or("").trim();
        let Some(rest) = line.strip_prefix("module") else {
            continue;
        };
        if !rest.starts_with(char::is_whitespace) && !rest.starts_with('"') {
            continue;
        }
        let module = rest.trim().trim_matches('"').trim_matches('`');
        if module.is_empty() {
            bail!("empty module directive");
        }
        return Ok(module.to_string());
    }
    bail!("no module directive")
}

/// Discover `.go` files under `repo_root`, sorted by path.
///
/// Skipped: `vendor/` and `testdata/` directories, directories starting with `.` or `_`,
/// nested modules (directories with their own `go.mod`), and anything matching `exclude`.
pub fn discover_go_files(repo_root: &Utf8Path, exclude: &[String]) -> anyhow::Result<Vec<RepoPath>> {
    let exclude_set = build_globset(exclude).context("compile exclude globset")?;

    let mut out: Vec<RepoPath> = Vec::new();
    let walker = WalkDir::new(repo_root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0 || !(is_skipped_dir(e) || is_excluded_dir(e, repo_root, &exclude_set))
        });

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                tracing::debug!(error = %err, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(abs) = pathbuf_to_utf8(entry.path().to_path_buf()) else {
            tracing::debug!(path = %entry.path().display(), "skipping non-UTF-8 path");
            continue;
        };
        if abs.extension() != Some("go") {
            continue;
        }

        let rel = RepoPath::from(abs.strip_prefix(repo_root).unwrap_or(&abs));
        if exclude_set.is_match(rel.as_str()) {
            tracing::trace!(path = rel.as_str(), "excluded");
            continue;
        }
        out.push(rel);
    }

    out.sort();
    out.dedup();
    Ok(out)
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name == "vendor"
        || name == "testdata"
        || name.starts_with('.')
        || name.starts_with('_')
        || entry.path().join("go.mod").is_file()
}

/// An excluded directory prunes its whole subtree.
fn is_excluded_dir(entry: &DirEntry, repo_root: &Utf8Path, exclude: &GlobSet) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let Some(abs) = Utf8Path::from_path(entry.path()) else {
        return false;
    };
    let rel = RepoPath::from(abs.strip_prefix(repo_root).unwrap_or(abs));
    let excluded = exclude.is_match(rel.as_str());
    if excluded {
        tracing::trace!(dir = rel.as_str(), "excluded directory");
    }
    excluded
}

fn build_globset(patterns: &[String]) -> anyhow::Result<GlobSet> {
    let mut b = GlobSetBuilder::new();
    for p in patterns {
        b.add(Glob::new(p)?);
    }
    Ok(b.build()?)
}

fn pathbuf_to_utf8(path: PathBuf) -> Option<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path).ok()
}
