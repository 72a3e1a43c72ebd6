//! Configuration schema types for the iFL03 client.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod bridge;
mod system;
mod ui;

pub use bridge::*;
pub use system::*;
pub use ui::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for the client.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    pub bridge: BridgeConfig,
    pub updates: UpdatesConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}
