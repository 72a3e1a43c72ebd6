use serde::{Deserialize, Serialize};

/// Backend connection state as reported in a snapshot's `connectionStatus`.
///
/// Anything the backend sends that is not one of the three known values
/// maps to `Unknown`; the client never infers a state on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConnectionStatus {
    Driving,
    Connected,
    Disconnected,
    #[default]
    #[serde(other)]
    Unknown,
}

impl ConnectionStatus {
    /// Map a raw `connectionStatus` value (possibly missing).
    pub fn from_wire(raw: Option<&str>) -> Self {
        match raw {
            Some("DRIVING") => Self::Driving,
            Some("CONNECTED") => Self::Connected,
            Some("DISCONNECTED") => Self::Disconnected,
            _ => Self::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Driving => "DRIVING",
            Self::Connected => "CONNECTED",
            Self::Disconnected => "DISCONNECTED",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Tailwind background class for the indicator dot.
    pub fn color_class(&self) -> &'static str {
        match self {
            Self::Driving => "bg-green-500",
            Self::Connected => "bg-yellow-500",
            Self::Disconnected => "bg-red-500",
            Self::Unknown => "bg-slate-500",
        }
    }
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_values_map_to_states() {
        assert_eq!(
            ConnectionStatus::from_wire(Some("DRIVING")),
            ConnectionStatus::Driving
        );
        assert_eq!(
            ConnectionStatus::from_wire(Some("CONNECTED")),
            ConnectionStatus::Connected
        );
        assert_eq!(
            ConnectionStatus::from_wire(Some("DISCONNECTED")),
            ConnectionStatus::Disconnected
        );
    }

    #[test]
    fn missing_or_unrecognized_is_unknown() {
        assert_eq!(ConnectionStatus::from_wire(None), ConnectionStatus::Unknown);
        assert_eq!(
            ConnectionStatus::from_wire(Some("driving")),
            ConnectionStatus::Unknown
        );
        assert_eq!(
            ConnectionStatus::from_wire(Some("SPECTATING")),
            ConnectionStatus::Unknown
        );
    }

    #[test]
    fn labels_and_colors() {
        assert_eq!(ConnectionStatus::Driving.label(), "DRIVING");
        assert_eq!(ConnectionStatus::Driving.color_class(), "bg-green-500");
        assert_eq!(ConnectionStatus::Unknown.to_string(), "UNKNOWN");
        assert_eq!(ConnectionStatus::Unknown.color_class(), "bg-slate-500");
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&ConnectionStatus::Disconnected).unwrap();
        assert_eq!(json, "\"DISCONNECTED\"");
        let parsed: ConnectionStatus = serde_json::from_str("\"REPLAY\"").unwrap();
        assert_eq!(parsed, ConnectionStatus::Unknown);
    }
}
