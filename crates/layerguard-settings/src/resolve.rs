use crate::error::ConfigError;
use crate::model::LayerguardConfigV1;
use crate::presets;
use globset::Glob;
use layerguard_domain::{ConfigIssue, EffectiveConfig, FailOn, Scope};

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub scope: Option<String>,
    pub max_findings: Option<u32>,
    pub skip_tests: Option<bool>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub effective: EffectiveConfig,
    /// Validated `Exclude` globs.
    pub exclude: Vec<String>,
    /// Result of `Policy::validate`, computed once at load time.
    pub issues: Vec<ConfigIssue>,
}

impl ResolvedConfig {
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(ConfigIssue::is_error)
    }
}

pub fn resolve_config(
    cfg: LayerguardConfigV1,
    overrides: Overrides,
) -> Result<ResolvedConfig, ConfigError> {
    let profile = overrides
        .profile
        .clone()
        .or(cfg.profile.clone())
        .unwrap_or_else(|| presets::DEFAULT_PROFILE.to_string());

    let mut effective = presets::preset(&profile, cfg.policy());

    if let Some(scope_s) = overrides.scope.as_deref().or(cfg.scope.as_deref()) {
        effective.scope = parse_scope(scope_s)?;
    }

    if let Some(mf) = overrides.max_findings.or(cfg.max_findings) {
        effective.max_findings = mf as usize;
    }

    if let Some(skip) = overrides.skip_tests.or(cfg.skip_tests) {
        effective.skip_tests = skip;
    }

    if let Some(fail_on_s) = cfg.fail_on.as_deref() {
        effective.fail_on = parse_fail_on(fail_on_s)?;
    }

    validate_excludes(&cfg.exclude)?;

    let issues = effective.policy.validate();
    for issue in &issues {
        if issue.is_error() {
            tracing::warn!(%issue, "config issue");
        } else {
            tracing::debug!(%issue, "config issue");
        }
    }

    Ok(ResolvedConfig {
        effective,
        exclude: cfg.exclude,
        issues,
    })
}

fn validate_excludes(patterns: &[String]) -> Result<(), ConfigError> {
    for pattern in patterns {
        Glob::new(pattern).map_err(|source| ConfigError::InvalidExclude {
            pattern: pattern.clone(),
            source,
        })?;
    }
    Ok(())
}

fn parse_scope(v: &str) -> Result<Scope, ConfigError> {
    match v {
        "repo" => Ok(Scope::Repo),
        "diff" => Ok(Scope::Diff),
        other => Err(ConfigError::InvalidValue {
            field: "scope",
            value: other.to_string(),
            expected: "'repo' or 'diff'",
        }),
    }
}

fn parse_fail_on(v: &str) -> Result<FailOn, ConfigError> {
    match v {
        "error" => Ok(FailOn::Error),
        "warning" | "warn" => Ok(FailOn::Warning),
        other => Err(ConfigError::InvalidValue {
            field: "fail_on",
            value: other.to_string(),
            expected: "error|warning",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layerguard_domain::{Layer, Rule};
    use layerguard_types::Severity;

    fn cfg() -> LayerguardConfigV1 {
        LayerguardConfigV1 {
            layers: [Layer::new("App").with_packages(["app"])].into_iter().collect(),
            rules: vec![Rule::new("App")],
            ..LayerguardConfigV1::default()
        }
    }

    #[test]
    fn default_profile_is_strict() {
        let r = resolve_config(cfg(), Overrides::default()).expect("resolve");
        assert_eq!(r.effective.profile, "strict");
        assert_eq!(r.effective.violation_severity, Severity::Error);
        assert_eq!(r.effective.fail_on, FailOn::Error);
        assert!(!r.effective.skip_tests);
        assert!(r.issues.is_empty());
    }

    #[test]
    fn profiles() {
        let warn = resolve_config(
            LayerguardConfigV1 {
                profile: Some("warn".to_string()),
                ..cfg()
            },
            Overrides::default(),
        )
        .expect("resolve");
        assert_eq!(warn.effective.violation_severity, Severity::Warning);
        assert_eq!(warn.effective.fail_on, FailOn::Error);
        assert!(!warn.effective.skip_tests);

        let compat = resolve_config(
            cfg(),
            Overrides {
                profile: Some("compat".to_string()),
                ..Overrides::default()
            },
        )
        .expect("resolve");
        assert_eq!(compat.effective.profile, "compat");
        assert!(compat.effective.skip_tests);
    }

    #[test]
    fn unknown_profile_falls_back_to_strict() {
        let r = resolve_config(
            LayerguardConfigV1 {
                profile: Some("paranoid".to_string()),
                ..cfg()
            },
            Overrides::default(),
        )
        .expect("resolve");
        assert_eq!(r.effective.profile, "strict");
    }

    #[test]
    fn overrides_beat_config() {
        let r = resolve_config(
            LayerguardConfigV1 {
                max_findings: Some(10),
                skip_tests: Some(false),
                scope: Some("repo".to_string()),
                ..cfg()
            },
            Overrides {
                profile: Some("compat".to_string()),
                scope: Some("diff".to_string()),
                max_findings: Some(3),
                skip_tests: Some(false),
            },
        )
        .expect("resolve");
        assert_eq!(r.effective.max_findings, 3);
        assert_eq!(r.effective.scope, Scope::Diff);
        assert!(!r.effective.skip_tests);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = resolve_config(
            LayerguardConfigV1 {
                fail_on: Some("sometimes".to_string()),
                ..cfg()
            },
            Overrides::default(),
        )
        .expect_err("bad fail_on");
        assert_eq!(
            err.to_string(),
            "unknown fail_on: sometimes (expected error|warning)"
        );

        let err = resolve_config(
            cfg(),
            Overrides {
                scope: Some("everything".to_string()),
                ..Overrides::default()
            },
        )
        .expect_err("bad scope");
        assert!(matches!(err, ConfigError::InvalidValue { field: "scope", .. }));
    }

    #[test]
    fn invalid_exclude_glob_is_rejected() {
        let err = resolve_config(
            LayerguardConfigV1 {
                exclude: vec!["gen/{a,b".to_string()],
                ..cfg()
            },
            Overrides::default(),
        )
        .expect_err("bad glob");
        assert!(matches!(err, ConfigError::InvalidExclude { .. }));
    }

    #[test]
    fn policy_issues_are_collected() {
        let r = resolve_config(
            LayerguardConfigV1 {
                layers: [Layer::new("App").with_patterns(["["])].into_iter().collect(),
                ..LayerguardConfigV1::default()
            },
            Overrides::default(),
        )
        .expect("resolve");
        assert!(r.has_errors());
        assert_eq!(r.issues.len(), 1);
    }
}
