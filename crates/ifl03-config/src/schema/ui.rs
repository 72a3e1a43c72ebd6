//! Page behaviour configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Local version descriptor read once at startup.
    pub version_file: String,
    /// Status banner lifetime in milliseconds (valid range: 500-30000).
    pub status_ttl_ms: u32,
    /// "Saved!" button feedback lifetime in milliseconds (valid range: 500-30000).
    pub save_feedback_ms: u32,
    /// Pixels per overlay nudge (valid range: 1-100).
    pub nudge_step: u32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            version_file: "version.json".into(),
            status_ttl_ms: 3000,
            save_feedback_ms: 2000,
            nudge_step: 1,
        }
    }
}
