//! Full configuration validation.
//!
//! Each section has its own check; all errors are collected into a
//! single `ConfigError`.

mod helpers;


use std::sync::OnceLock;

use crate::schema::ClientConfig;
use ifl03_common::ConfigError;
use regex::Regex;

use helpers::{validate_non_empty, validate_range};

fn js_identifier() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("valid identifier regex"))
}

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &ClientConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_bridge(&mut errors, config);
    validate_updates(&mut errors, config);
    validate_ui(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_bridge(errors: &mut Vec<String>, config: &ClientConfig) {
    if !js_identifier().is_match(&config.bridge.push_callback) {
        errors.push(format!(
            "bridge.push_callback = {:?} is not a valid JavaScript identifier",
            config.bridge.push_callback
        ));
    }
    if let Some(cmd) = &config.bridge.host_command {
        validate_non_empty(errors, "bridge.host_command", cmd);
    }
}

fn validate_updates(errors: &mut Vec<String>, config: &ClientConfig) {
    validate_non_empty(errors, "updates.repo_owner", &config.updates.repo_owner);
    validate_non_empty(errors, "updates.repo_name", &config.updates.repo_name);
    validate_range(
        errors,
        "updates.timeout_secs",
        config.updates.timeout_secs,
        1,
        120,
    );
}

fn validate_ui(errors: &mut Vec<String>, config: &ClientConfig) {
    validate_non_empty(errors, "ui.version_file", &config.ui.version_file);
    validate_range(errors, "ui.status_ttl_ms", config.ui.status_ttl_ms, 500, 30000);
    validate_range(
        errors,
        "ui.save_feedback_ms",
        config.ui.save_feedback_ms,
        500,
        30000,
    );
    validate_range(errors, "ui.nudge_step", config.ui.nudge_step, 1, 100);
}
