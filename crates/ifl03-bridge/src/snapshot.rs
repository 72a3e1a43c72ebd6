//! Whole-state snapshot returned by the host.
//!
//! The snapshot is an open JSON object; the accessors below read the
//! fields the pages care about and return `None` when a field is missing
//! or has the wrong type. Defaults are the renderer's business, not ours.

use ifl03_common::ConnectionStatus;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateSnapshot {
    root: Map<String, Value>,
}

/// Ghost telemetry file listing from the `ghostTelemetry` field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GhostTelemetry {
    pub files: Vec<String>,
    pub selected: Option<String>,
}

impl StateSnapshot {
    pub fn new(root: Map<String, Value>) -> Self {
        Self { root }
    }

    /// Wrap a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(root) => Some(Self { root }),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.root.clone())
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.root.get(field)
    }

    pub fn connection_status(&self) -> ConnectionStatus {
        ConnectionStatus::from_wire(self.root.get("connectionStatus").and_then(Value::as_str))
    }

    pub fn ui_edit(&self) -> Option<bool> {
        self.root.get("uiEdit").and_then(Value::as_bool)
    }

    pub fn preview_mode(&self) -> Option<bool> {
        self.root.get("previewMode").and_then(Value::as_bool)
    }

    /// Per-overlay enabled flags from the `overlays` field.
    pub fn overlay_enabled(&self, key: &str) -> Option<bool> {
        self.root
            .get("overlays")
            .and_then(Value::as_object)
            .and_then(|o| o.get(key))
            .and_then(Value::as_bool)
    }

    /// Settings mapping for one config component.
    pub fn component(&self, name: &str) -> Option<&Map<String, Value>> {
        self.root
            .get("config")
            .and_then(Value::as_object)
            .and_then(|c| c.get(name))
            .and_then(Value::as_object)
    }

    pub fn config_value(&self, component: &str, key: &str) -> Option<&Value> {
        self.component(component).and_then(|c| c.get(key))
    }

    pub fn config_bool(&self, component: &str, key: &str) -> Option<bool> {
        self.config_value(component, key).and_then(Value::as_bool)
    }

    /// Integer setting; floats with no fractional part are accepted.
    pub fn config_i64(&self, component: &str, key: &str) -> Option<i64> {
        let value = self.config_value(component, key)?;
        value.as_i64().or_else(|| {
            value
                .as_f64()
                .filter(|f| f.fract() == 0.0 && f.is_finite())
                .map(|f| f as i64)
        })
    }

    pub fn config_f64(&self, component: &str, key: &str) -> Option<f64> {
        self.config_value(component, key).and_then(Value::as_f64)
    }

    pub fn config_str(&self, component: &str, key: &str) -> Option<&str> {
        self.config_value(component, key).and_then(Value::as_str)
    }

    /// String list setting; non-string entries are skipped.
    pub fn config_string_list(&self, component: &str, key: &str) -> Option<Vec<&str>> {
        self.config_value(component, key)
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
    }

    pub fn current_car(&self) -> Option<&str> {
        self.root.get("currentCar").and_then(Value::as_str)
    }

    pub fn current_car_config(&self) -> Option<&str> {
        self.root.get("currentCarConfig").and_then(Value::as_str)
    }

    pub fn available_car_configs(&self) -> Vec<&str> {
        self.root
            .get("availableCarConfigs")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    pub fn ghost_telemetry(&self) -> GhostTelemetry {
        let Some(ghost) = self.root.get("ghostTelemetry").and_then(Value::as_object) else {
            return GhostTelemetry::default();
        };
        GhostTelemetry {
            files: ghost
                .get("files")
                .and_then(Value::as_array)
                .map(|f| f.iter().filter_map(Value::as_str).map(String::from).collect())
                .unwrap_or_default(),
            selected: ghost
                .get("selected")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(String::from),
        }
    }

    /// App version reported by the backend: `app.version`, then `version`,
    /// then `appVersion`.
    pub fn app_version(&self) -> Option<String> {
        let nested = self
            .root
            .get("app")
            .and_then(Value::as_object)
            .and_then(|a| a.get("version"));
        [nested, self.root.get("version"), self.root.get("appVersion")]
            .into_iter()
            .flatten()
            .find_map(|v| match v {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
    }
}
