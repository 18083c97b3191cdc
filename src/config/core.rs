use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};

use crate::engine::SortOrder;

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

/// What happens to a planned batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionMode {
    #[default]
    Ask,
    Show,
    Rename,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogNames {
    pub actions: String,
    pub visits: String,
}

/// Fully merged settings for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub action: ActionMode,
    pub print: u32,
    pub collision: String,
    pub sort: SortOrder,
    pub line_input: bool,
    pub case_sensitive: bool,
    pub logs: LogNames,
}

/// Values given on the command line. Unset fields leave the lower layers alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<ActionMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub print: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collision: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_input: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_sensitive: Option<bool>,
}

pub struct ReneConfig {
    figment: Figment,
}

impl ReneConfig {
    pub fn load(custom_config: Option<&str>, overrides: Option<&Overrides>) -> Result<Self> {
        tracing::trace!("CONFIG LOAD: Starting");
        let user = Self::user_config_base_path();

        let mut figment = Figment::new()
            .merge(Toml::string(DEFAULT_CONFIG))
            .merge(Toml::file(format!("{user}.toml")))
            .merge(Json::file(format!("{user}.json")))
            .merge(Yaml::file(format!("{user}.yaml")))
            .merge(Yaml::file(format!("{user}.yml")));

        if let Some(path) = custom_config {
            figment = match path.rsplit_once('.').map(|(_, ext)| ext) {
                Some("json") => figment.merge(Json::file(path)),
                Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
                _ => figment.merge(Toml::file(path)),
            };
        }

        figment = figment.merge(Env::prefixed("RENE_").split("__"));

        if let Some(overrides) = overrides {
            tracing::trace!("CONFIG LOAD: Applying CLI overrides");
            figment = figment.merge(Serialized::defaults(overrides));
        }

        Ok(ReneConfig { figment })
    }

    /// Typed view of the merged configuration
    pub fn settings(&self) -> Result<Settings> {
        self.figment
            .extract()
            .context("Invalid configuration")
    }

    /// Get the full merged configuration as a structured value
    pub fn get_full_config(&self) -> Result<serde_json::Value> {
        Ok(self.figment.extract()?)
    }

    fn user_config_base_path() -> String {
        match std::env::var("HOME") {
            Ok(home) => format!("{}/.config/rene/config", home),
            Err(_) => "~/.config/rene/config".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_loading() {
        let config = ReneConfig::load(None, None);
        assert!(config.is_ok(), "Should load default config successfully");
    }

    #[test]
    fn test_custom_config_loading() {
        // A missing custom file falls back to the other layers
        let config = ReneConfig::load(Some("non_existent.toml"), None).unwrap();
        assert!(config.settings().is_ok());
    }

    #[test]
    fn test_full_config_has_log_names() {
        let config = ReneConfig::load(None, None).unwrap();
        let full = config.get_full_config().unwrap();
        assert_eq!(full["logs"]["visits"], "reneActr");
    }
}
