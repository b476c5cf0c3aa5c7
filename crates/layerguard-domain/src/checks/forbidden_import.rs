use crate::config::EffectiveConfig;
use crate::fingerprint::fingerprint_for_import;
use crate::model::WorkspaceModel;
use layerguard_types::{Finding, ids};
use serde_json::json;

pub fn run(model: &WorkspaceModel, cfg: &EffectiveConfig, out: &mut Vec<Finding>) {
    let policy = &cfg.policy;

    for unit in &model.units {
        if cfg.skip_tests && unit.test {
            continue;
        }
        let Some(layer) = policy.find_layer_containing(&unit.path) else {
            tracing::trace!(unit = %unit.path, "unit belongs to no layer");
            continue;
        };
        let has_rule = policy.find_rule_for(&layer.name).is_some();

        for file in &unit.files {
            if cfg.skip_tests && file.test {
                continue;
            }
            for (index, import) in file.imports.iter().enumerate() {
                if policy.can_depend(&layer.name, &import.path).is_allow() {
                    continue;
                }

                let (code, help) = if has_rule {
                    (
                        ids::CODE_DENIED_IMPORT,
                        format!(
                            "The rule for layer {} denies a layer this package belongs to.",
                            layer.name
                        ),
                    )
                } else {
                    (
                        ids::CODE_NO_RULE_FOR_LAYER,
                        format!(
                            "Layer {} has no rule, so it may not import anything. Add a rule for it.",
                            layer.name
                        ),
                    )
                };
                let occurrence = file.imports[..index]
                    .iter()
                    .filter(|earlier| earlier.path == import.path)
                    .count();
                let matched: Vec<&str> = policy
                    .find_layers_for(&import.path)
                    .iter()
                    .map(|l| l.name.as_str())
                    .collect();

                out.push(Finding {
                    severity: cfg.violation_severity,
                    check_id: ids::CHECK_LAYERS_FORBIDDEN_IMPORT.to_string(),
                    code: code.to_string(),
                    message: format!("{:?} cannot be imported by {}", import.path, layer.name),
                    location: import.location.clone(),
                    help: Some(help),
                    url: None,
                    fingerprint: Some(fingerprint_for_import(
                        ids::CHECK_LAYERS_FORBIDDEN_IMPORT,
                        code,
                        &unit.path,
                        file.path.as_str(),
                        &import.path,
                        occurrence,
                    )),
                    data: json!({
                        "unit": unit.path,
                        "layer": layer.name,
                        "import": import.path,
                        "import_layers": matched,
                    }),
                });
            }
        }
    }
}
