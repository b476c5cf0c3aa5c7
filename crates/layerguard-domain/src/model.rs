use layerguard_types::{Location, RepoPath};

/// The source tree as seen by the engine: compilation units and their imports.
#[derive(Clone, Debug, Default)]
pub struct WorkspaceModel {
    pub repo_root: RepoPath,

    /// Module path from `go.mod`, if one was found.
    pub module: Option<String>,

    /// Units in scope, sorted by import path.
    pub units: Vec<UnitModel>,
}

/// One Go package: a directory, or the external `_test` package of a directory.
#[derive(Clone, Debug, Default)]
pub struct UnitModel {
    /// Import path, e.g. `example.com/app/internal/db` or `example.com/app_test`.
    pub path: String,
    pub dir: RepoPath,
    /// External test package (package clause ends in `_test`).
    pub test: bool,
    pub files: Vec<SourceFile>,
}

#[derive(Clone, Debug, Default)]
pub struct SourceFile {
    pub path: RepoPath,
    /// `_test.go` file.
    pub test: bool,
    pub imports: Vec<ImportDecl>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportDecl {
    pub path: String,
    pub location: Option<Location>,
}

impl WorkspaceModel {
    pub fn imports_scanned(&self) -> usize {
        self.units
            .iter()
            .flat_map(|u| &u.files)
            .map(|f| f.imports.len())
            .sum()
    }
}
