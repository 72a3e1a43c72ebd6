//! Typed commands understood by the native host.
//!
//! Each variant serializes to a flat JSON object whose `cmd` field names the
//! operation, e.g. `{"cmd":"setOverlay","key":"OverlayDDU","on":true}`.
//! The backend remains the authority on what it accepts.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "camelCase")]
pub enum Command {
    GetState,

    SetUiEdit {
        on: bool,
    },
    SetPreviewMode {
        on: bool,
    },
    SetPerformanceMode {
        on: bool,
    },

    SetOverlay {
        key: String,
        on: bool,
    },
    ToggleOverlay {
        key: String,
    },

    SetConfigBool {
        component: String,
        key: String,
        value: bool,
    },
    SetConfigInt {
        component: String,
        key: String,
        value: i64,
    },
    SetConfigFloat {
        component: String,
        key: String,
        value: f64,
    },
    SetConfigString {
        component: String,
        key: String,
        value: String,
    },
    SetConfigStringVec {
        component: String,
        key: String,
        values: Vec<String>,
    },

    SetHotkey {
        component: String,
        key: String,
        value: String,
    },
    SetOverlayPosition {
        component: String,
        position: String,
    },
    SetOverlayOpacity {
        component: String,
        opacity: i64,
    },
    MoveOverlayDelta {
        component: String,
        dx: i32,
        dy: i32,
    },
    CenterOverlay {
        component: String,
    },
    SetPreviewWeatherType {
        value: i64,
    },

    SaveSettings {
        #[serde(skip_serializing_if = "Option::is_none", default)]
        performance_mode_30hz: Option<bool>,
    },
    ResetConfig,

    SaveCarConfig {
        #[serde(rename = "carName")]
        car_name: String,
    },
    LoadCarConfig {
        #[serde(rename = "carName")]
        car_name: String,
    },
    CopyCarConfig {
        #[serde(rename = "fromCar")]
        from_car: String,
        #[serde(rename = "toCar")]
        to_car: String,
    },
    DeleteCarConfig {
        #[serde(rename = "carName")]
        car_name: String,
    },

    OpenExternal {
        url: String,
    },
    GetReleaseNotes,
    UpdateApp,
}

impl Command {
    /// Wire name of the operation (the `cmd` field).
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetState => "getState",
            Self::SetUiEdit { .. } => "setUiEdit",
            Self::SetPreviewMode { .. } => "setPreviewMode",
            Self::SetPerformanceMode { .. } => "setPerformanceMode",
            Self::SetOverlay { .. } => "setOverlay",
            Self::ToggleOverlay { .. } => "toggleOverlay",
            Self::SetConfigBool { .. } => "setConfigBool",
            Self::SetConfigInt { .. } => "setConfigInt",
            Self::SetConfigFloat { .. } => "setConfigFloat",
            Self::SetConfigString { .. } => "setConfigString",
            Self::SetConfigStringVec { .. } => "setConfigStringVec",
            Self::SetHotkey { .. } => "setHotkey",
            Self::SetOverlayPosition { .. } => "setOverlayPosition",
            Self::SetOverlayOpacity { .. } => "setOverlayOpacity",
            Self::MoveOverlayDelta { .. } => "moveOverlayDelta",
            Self::CenterOverlay { .. } => "centerOverlay",
            Self::SetPreviewWeatherType { .. } => "setPreviewWeatherType",
            Self::SaveSettings { .. } => "saveSettings",
            Self::ResetConfig => "resetConfig",
            Self::SaveCarConfig { .. } => "saveCarConfig",
            Self::LoadCarConfig { .. } => "loadCarConfig",
            Self::CopyCarConfig { .. } => "copyCarConfig",
            Self::DeleteCarConfig { .. } => "deleteCarConfig",
            Self::OpenExternal { .. } => "openExternal",
            Self::GetReleaseNotes => "getReleaseNotes",
            Self::UpdateApp => "updateApp",
        }
    }

    pub fn set_overlay(key: impl Into<String>, on: bool) -> Self {
        Self::SetOverlay {
            key: key.into(),
            on,
        }
    }

    pub fn config_bool(component: impl Into<String>, key: impl Into<String>, value: bool) -> Self {
        Self::SetConfigBool {
            component: component.into(),
            key: key.into(),
            value,
        }
    }

    pub fn config_int(component: impl Into<String>, key: impl Into<String>, value: i64) -> Self {
        Self::SetConfigInt {
            component: component.into(),
            key: key.into(),
            value,
        }
    }

    /// `None` for NaN or infinite values, which JSON cannot carry.
    pub fn config_float(
        component: impl Into<String>,
        key: impl Into<String>,
        value: f64,
    ) -> Option<Self> {
        value.is_finite().then(|| Self::SetConfigFloat {
            component: component.into(),
            key: key.into(),
            value,
        })
    }

    pub fn config_string(
        component: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::SetConfigString {
            component: component.into(),
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn config_string_vec(
        component: impl Into<String>,
        key: impl Into<String>,
        values: Vec<String>,
    ) -> Self {
        Self::SetConfigStringVec {
            component: component.into(),
            key: key.into(),
            values,
        }
    }

    /// Whether the command changes backend state (everything but reads).
    pub fn is_mutating(&self) -> bool {
        !matches!(
            self,
            Self::GetState | Self::GetReleaseNotes | Self::OpenExternal { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn wire(cmd: &Command) -> serde_json::Value {
        serde_json::to_value(cmd).unwrap()
    }

    #[test]
    fn unit_commands_carry_only_cmd() {
        assert_eq!(wire(&Command::GetState), json!({ "cmd": "getState" }));
        assert_eq!(wire(&Command::ResetConfig), json!({ "cmd": "resetConfig" }));
        assert_eq!(wire(&Command::UpdateApp), json!({ "cmd": "updateApp" }));
    }

    #[test]
    fn set_overlay_wire_shape() {
        assert_eq!(
            wire(&Command::set_overlay("OverlayDDU", true)),
            json!({ "cmd": "setOverlay", "key": "OverlayDDU", "on": true })
        );
    }

    #[test]
    fn config_string_vec_uses_values_field() {
        let cmd = Command::config_string_vec("General", "buddies", vec!["Max".into()]);
        assert_eq!(
            wire(&cmd),
            json!({ "cmd": "setConfigStringVec", "component": "General", "key": "buddies", "values": ["Max"] })
        );
    }

    #[test]
    fn car_config_fields_are_camel_case() {
        let cmd = Command::CopyCarConfig {
            from_car: "Porsche 911 GT3 R".into(),
            to_car: "BMW M4 GT3".into(),
        };
        assert_eq!(
            wire(&cmd),
            json!({ "cmd": "copyCarConfig", "fromCar": "Porsche 911 GT3 R", "toCar": "BMW M4 GT3" })
        );

        let cmd = Command::SaveCarConfig {
            car_name: "Mazda MX-5".into(),
        };
        assert_eq!(wire(&cmd)["carName"], "Mazda MX-5");
    }

    #[test]
    fn save_settings_omits_missing_performance_flag() {
        let cmd = Command::SaveSettings {
            performance_mode_30hz: None,
        };
        assert_eq!(wire(&cmd), json!({ "cmd": "saveSettings" }));

        let cmd = Command::SaveSettings {
            performance_mode_30hz: Some(true),
        };
        assert_eq!(
            wire(&cmd),
            json!({ "cmd": "saveSettings", "performance_mode_30hz": true })
        );
    }

    #[test]
    fn non_finite_float_is_rejected() {
        assert!(Command::config_float("OverlayTire", "temp_opt_c", f64::NAN).is_none());
        assert!(Command::config_float("OverlayTire", "temp_opt_c", f64::INFINITY).is_none());
        assert!(Command::config_float("OverlayTire", "temp_opt_c", 85.5).is_some());
    }

    #[test]
    fn name_matches_serialized_tag() {
        let cmds = [
            Command::GetState,
            Command::SetUiEdit { on: true },
            Command::MoveOverlayDelta {
                component: "OverlayRadar".into(),
                dx: -1,
                dy: 0,
            },
            Command::CenterOverlay {
                component: "OverlayRadar".into(),
            },
            Command::SetPreviewWeatherType { value: 2 },
            Command::OpenExternal {
                url: "https://example.com".into(),
            },
        ];
        for cmd in &cmds {
            assert_eq!(wire(cmd)["cmd"], cmd.name());
        }
    }

    #[test]
    fn parses_host_side() {
        let cmd: Command =
            serde_json::from_str(r#"{"cmd":"setOverlayOpacity","component":"OverlayDDU","opacity":80}"#)
                .unwrap();
        assert_eq!(
            cmd,
            Command::SetOverlayOpacity {
                component: "OverlayDDU".into(),
                opacity: 80
            }
        );
    }

    #[test]
    fn reads_are_not_mutating() {
        assert!(!Command::GetState.is_mutating());
        assert!(Command::set_overlay("OverlayDDU", false).is_mutating());
    }
}
