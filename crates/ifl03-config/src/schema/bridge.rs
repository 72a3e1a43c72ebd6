//! Bridge gateway configuration.

use serde::{Deserialize, Serialize};

/// Page-global callback the host invokes to push a fresh snapshot.
pub const DEFAULT_PUSH_CALLBACK: &str = "onIFL03State";

/// How the client reaches the native host.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// JS identifier of the push callback.
    pub push_callback: String,
    /// Host executable speaking line-delimited JSON over stdio.
    /// Without one the client runs detached and every call is rejected.
    pub host_command: Option<String>,
    pub host_args: Vec<String>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            push_callback: DEFAULT_PUSH_CALLBACK.into(),
            host_command: None,
            host_args: Vec::new(),
        }
    }
}
