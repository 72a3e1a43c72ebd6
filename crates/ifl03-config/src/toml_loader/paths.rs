//! Where the client config lives, and seeding it on first run.

use std::ffi::OsString;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use ifl03_common::ConfigError;

use super::template::default_config_toml;

/// Environment variable that replaces the default config location.
pub const CONFIG_PATH_ENV: &str = "IFL03_CONFIG";

/// `$IFL03_CONFIG` if set, else `<config_dir>/ifl03/client.toml`
/// (`%APPDATA%\ifl03\client.toml` on Windows).
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    resolve_config_path(std::env::var_os(CONFIG_PATH_ENV), dirs::config_dir())
}

fn resolve_config_path(
    env_override: Option<OsString>,
    config_dir: Option<PathBuf>,
) -> Result<PathBuf, ConfigError> {
    if let Some(path) = env_override.filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    config_dir
        .map(|dir| dir.join("ifl03").join("client.toml"))
        .ok_or_else(|| ConfigError::ParseError("no platform config directory".into()))
}

/// Write the commented template to `path`. An existing file is left alone.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    let io_err = |what: &str, target: &Path, e: std::io::Error| {
        ConfigError::ParseError(format!("cannot {what} {}: {e}", target.display()))
    };

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| io_err("create", dir, e))?;
    }

    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            tracing::debug!(path = %path.display(), "config already present");
            return Ok(());
        }
        Err(e) => return Err(io_err("create", path, e)),
    };
    file.write_all(default_config_toml().as_bytes())
        .map_err(|e| io_err("write", path, e))?;

    tracing::info!(path = %path.display(), "wrote default client config");
    Ok(())
}
