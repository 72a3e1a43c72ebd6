//! Local version descriptor (`version.json` next to the install).

use std::path::Path;

use ifl03_common::version::normalize_version;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct VersionFile {
    version: Option<Value>,
}

/// Installed version from the descriptor, leading `v` stripped.
///
/// Any failure (missing file, bad JSON, no `version`) yields `None`.
pub fn read_installed_version(path: &Path) -> Option<String> {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "no version descriptor");
            return None;
        }
    };
    let file: VersionFile = serde_json::from_str(&contents)
        .inspect_err(|e| tracing::debug!(error = %e, "unreadable version descriptor"))
        .ok()?;

    let raw = match file.version? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    let version = normalize_version(&raw);
    (!version.is_empty()).then_some(version)
}
