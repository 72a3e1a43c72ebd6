//! Reading `client.toml`.

use std::io::ErrorKind;
use std::path::Path;

use ifl03_common::ConfigError;

use super::paths::{create_default_config, default_config_path};
use crate::schema::ClientConfig;
use crate::validation;

/// Parse the config at `path`.
///
/// Absent keys take their defaults. A file that parses but breaks a range
/// or identifier rule is dropped in favour of the full default config.
pub fn load_from_path(path: &Path) -> Result<ClientConfig, ConfigError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ConfigError::FileNotFound(path.to_path_buf()))
        }
        Err(e) => {
            return Err(ConfigError::ParseError(format!(
                "cannot read {}: {e}",
                path.display()
            )))
        }
    };

    let config: ClientConfig = toml::from_str(&text).map_err(|e| {
        ConfigError::ParseError(format!("{}: {}", path.display(), e.message()))
    })?;

    match validation::validate(&config) {
        Ok(()) => {
            tracing::info!(path = %path.display(), "client config loaded");
            Ok(config)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "invalid client config, using defaults");
            Ok(ClientConfig::default())
        }
    }
}

/// Load the default config file, seeding it from the template on first run.
pub fn load_default() -> Result<ClientConfig, ConfigError> {
    let path = default_config_path()?;
    match load_from_path(&path) {
        Err(ConfigError::FileNotFound(_)) => {
            create_default_config(&path)?;
            Ok(ClientConfig::default())
        }
        other => other,
    }
}
