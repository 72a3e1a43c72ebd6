//! iFL03 client configuration.
//!
//! TOML-based configuration for the bridge client, release checks and page
//! behaviour. All sections use sensible defaults so partial configs work
//! out of the box.

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{ClientConfig, LogLevel, CONFIG_SCHEMA_VERSION};

use ifl03_common::ConfigError;
use std::path::Path;

/// Load config from the platform default path, creating it when missing.
pub fn load_config() -> Result<ClientConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Load config from an explicit path (CLI override).
pub fn load_config_from(path: &Path) -> Result<ClientConfig, ConfigError> {
    let config = toml_loader::load_from_path(path)?;
    validation::validate(&config)?;
    Ok(config)
}

/// Effective config as pretty JSON, for `ifl03 config`.
pub fn config_to_json(config: &ClientConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_to_json_contains_all_sections() {
        let json = config_to_json(&ClientConfig::default());
        assert!(json.contains("\"bridge\""));
        assert!(json.contains("\"updates\""));
        assert!(json.contains("\"ui\""));
        assert!(json.contains("\"logging\""));
        assert!(json.contains("\"onIFL03State\""));
    }

    #[test]
    fn default_config_round_trips_through_json() {
        let json = config_to_json(&ClientConfig::default());
        let parsed: ClientConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.updates.repo_slug(), "SemSodermans31/iFL03");
        assert_eq!(parsed.logging.level, LogLevel::Info);
        assert_eq!(parsed.ui.version_file, "version.json");
    }
}
