//! Config file discovery and layered loading.
//!
//! Implements the `Config::load()` algorithm (§2.1):
//!
//! 1. Start from `Config::default()`, reflected into a `toml::Value`.
//! 2. Merge `<project>/.arcadia/config.toml`, if present.
//! 3. Merge the `ARCADIA_*` environment overlay.
//! 4. Deserialize the merged tree back into a `Config`.
//! 5. Validate.
//! 6. Return a [`ResolvedConfig`] carrying the per-field layer provenance.

use std::path::Path;

use tracing::debug;

use crate::env::overlay_from_env;
use crate::error::{ConfigError, ConfigResult};
use crate::merge::{deep_merge_tracking, ConfigLayer, FieldSources};
use crate::show::ResolvedConfig;
use crate::types::Config;

/// Project-relative path to the optional config file.
const PROJECT_CONFIG_RELATIVE_PATH: &str = ".arcadia/config.toml";

/// Load the unified configuration with defaults → project file →
/// environment precedence.
///
/// `project_root` is the root of the current project (its `.arcadia/`
/// directory). If `None`, or if no config file exists there, only the
/// defaults and environment layers apply.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the project config file exists but
/// can't be read or parsed, an `ARCADIA_*` variable holds a value of
/// the wrong type, or the final merged configuration fails validation.
pub fn load(project_root: Option<&Path>) -> ConfigResult<ResolvedConfig> {
    let mut sources = FieldSources::new();
    let mut merged = toml::Value::try_from(Config::default())?;

    if let Some(root) = project_root {
        let path = root.join(PROJECT_CONFIG_RELATIVE_PATH);
        if path.is_file() {
            debug!(path = %path.display(), "loading project configuration");
            let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read { path: path.clone(), source })?;
            let project_value: toml::Value =
                toml::from_str(&text).map_err(|source| ConfigError::Parse { path: path.clone(), source })?;
            deep_merge_tracking(&mut merged, &project_value, "", &ConfigLayer::Project, &mut sources);
        }
    }

    let env_overlay = overlay_from_env()?;
    deep_merge_tracking(&mut merged, &env_overlay, "", &ConfigLayer::Environment, &mut sources);

    let config: Config = merged.try_into()?;
    config.validate()?;

    Ok(ResolvedConfig { config, sources })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_project_root_falls_back_to_defaults() {
        let resolved = load(None).unwrap();
        assert!((resolved.config.budget.session_max_usd - 1.0).abs() < f64::EPSILON);
        assert!(resolved.sources.is_empty());
    }

    #[test]
    fn a_project_config_file_overrides_the_default() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(".arcadia")).unwrap();
        std::fs::write(dir.path().join(".arcadia/config.toml"), "[budget]\nsession_max_usd = 10.0\n").unwrap();

        let resolved = load(Some(dir.path())).unwrap();
        assert!((resolved.config.budget.session_max_usd - 10.0).abs() < f64::EPSILON);
        assert_eq!(resolved.sources.get("budget.session_max_usd"), Some(&ConfigLayer::Project));
    }

    #[test]
    fn a_malformed_project_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(".arcadia")).unwrap();
        std::fs::write(dir.path().join(".arcadia/config.toml"), "not valid toml {{{").unwrap();

        assert!(load(Some(dir.path())).is_err());
    }
}
