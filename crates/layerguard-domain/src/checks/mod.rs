use crate::config::EffectiveConfig;
use crate::model::WorkspaceModel;
use layerguard_types::Finding;

mod config_issues;
mod forbidden_import;

#[cfg(test)]
mod tests;

pub fn run_all(model: &WorkspaceModel, cfg: &EffectiveConfig, out: &mut Vec<Finding>) {
    config_issues::run(cfg, out);
    forbidden_import::run(model, cfg, out);
}
