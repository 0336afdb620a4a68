//! Resolved configuration display and serialization.

use serde::Serialize;

use crate::error::ConfigResult;
use crate::merge::FieldSources;
use crate::types::Config;

/// The merged configuration plus which layer set each field, for a
/// `config show` style diagnostic.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The fully merged, validated configuration.
    pub config: Config,
    /// Which layer (default, project file, environment) set each
    /// overridden field. Fields left at their compiled-in default are
    /// absent from this map.
    pub sources: FieldSources,
}

/// Output format for [`ResolvedConfig::render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowFormat {
    /// Pretty-printed TOML.
    Toml,
    /// Pretty-printed JSON.
    Json,
}

impl ResolvedConfig {
    /// Render the resolved configuration in the requested format.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::ConfigError`] if the configuration can't be
    /// serialized in the requested format.
    pub fn render(&self, format: ShowFormat) -> ConfigResult<String> {
        match format {
            ShowFormat::Toml => Ok(toml::to_string_pretty(&self.config)?),
            ShowFormat::Json => Ok(render_json(&self.config)),
        }
    }

    /// Every field path that was overridden away from its compiled-in
    /// default, paired with the layer that set it.
    #[must_use]
    pub fn overridden_fields(&self) -> Vec<(&str, &crate::merge::ConfigLayer)> {
        let mut fields: Vec<_> = self.sources.iter().map(|(k, v)| (k.as_str(), v)).collect();
        fields.sort_by_key(|(path, _)| *path);
        fields
    }
}

fn render_json(config: &Config) -> String {
    #[derive(Serialize)]
    struct Wrapper<'a> {
        #[serde(flatten)]
        config: &'a Config,
    }
    serde_json::to_string_pretty(&Wrapper { config }).unwrap_or_else(|_| "{}".to_owned())
}
