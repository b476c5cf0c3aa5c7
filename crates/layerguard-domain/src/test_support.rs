use crate::config::EffectiveConfig;
use crate::layer::Layer;
use crate::model::{ImportDecl, SourceFile, UnitModel, WorkspaceModel};
use crate::policy::Policy;
use crate::rule::Rule;
use layerguard_types::{Location, RepoPath};

pub fn import(path: &str, file: &str, line: u32) -> ImportDecl {
    ImportDecl {
        path: path.to_string(),
        location: Some(Location {
            path: RepoPath::new(file),
            line: Some(line),
            col: Some(2),
        }),
    }
}

/// A file whose imports sit on consecutive lines starting at 3.
pub fn source_file(path: &str, imports: &[&str]) -> SourceFile {
    SourceFile {
        path: RepoPath::new(path),
        test: path.ends_with("_test.go"),
        imports: imports
            .iter()
            .enumerate()
            .map(|(i, p)| import(p, path, 3 + i as u32))
            .collect(),
    }
}

pub fn unit(path: &str, dir: &str, files: Vec<SourceFile>) -> UnitModel {
    UnitModel {
        path: path.to_string(),
        dir: RepoPath::new(dir),
        test: path.ends_with("_test"),
        files,
    }
}

pub fn model(units: Vec<UnitModel>) -> WorkspaceModel {
    WorkspaceModel {
        repo_root: RepoPath::new("."),
        module: Some("example.com/app".to_string()),
        units,
    }
}

/// The App/Errors/Print/Encoding policy used throughout the tests.
pub fn app_policy() -> Policy {
    Policy::new(
        [
            Layer::new("App").with_packages(["example.com/app", "example.com/app_test"]),
            Layer::new("Errors").with_packages(["errors"]),
            Layer::new("Print").with_packages(["fmt", "log"]),
            Layer::new("Encoding").with_patterns(["^encoding/"]),
        ],
        vec![Rule::new("App")
            .allow(["Errors"])
            .deny(["Print", "Encoding"])],
    )
}

pub fn config(policy: Policy) -> EffectiveConfig {
    let mut cfg = EffectiveConfig::new(policy);
    cfg.profile = "test".to_string();
    cfg
}
