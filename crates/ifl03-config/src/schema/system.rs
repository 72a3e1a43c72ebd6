//! System configuration types: updates and logging.

use serde::{Deserialize, Serialize};

/// Release check configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdatesConfig {
    pub enabled: bool,
    pub check_on_startup: bool,
    pub repo_owner: String,
    pub repo_name: String,
    /// HTTP timeout in seconds (valid range: 1-120).
    pub timeout_secs: u32,
}

impl Default for UpdatesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            check_on_startup: true,
            repo_owner: "SemSodermans31".into(),
            repo_name: "iFL03".into(),
            timeout_secs: 10,
        }
    }
}

impl UpdatesConfig {
    /// `owner/name` slug used in GitHub API paths.
    pub fn repo_slug(&self) -> String {
        format!("{}/{}", self.repo_owner, self.repo_name)
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}
