//! Wire encoding between the client and the native host.
//!
//! Requests travel as the JSON text of a [`Command`]. Responses and pushes
//! are the JSON text of a whole-state object. On the push side the host
//! evaluates a script calling the page-global callback with the snapshot.

use ifl03_common::BridgeError;
use serde_json::Value;

use crate::command::Command;
use crate::snapshot::StateSnapshot;

/// Encode a command as the request text handed to the gateway.
pub fn encode_request(command: &Command) -> String {
    serde_json::to_string(command)
        .unwrap_or_else(|_| format!(r#"{{"cmd":"{}"}}"#, command.name()))
}

/// Decode success text into a snapshot.
///
/// Empty text and JSON `null` mean "no state in this response" and decode
/// to `None`. Anything else must be a JSON object.
pub fn decode_response(text: &str) -> Result<Option<StateSnapshot>, BridgeError> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    let value: Value = serde_json::from_str(text)
        .map_err(|e| BridgeError::MalformedResponse(format!("invalid JSON: {e}")))?;
    decode_value(value)
}

/// Same rules as [`decode_response`] for an already-parsed value.
pub fn decode_value(value: Value) -> Result<Option<StateSnapshot>, BridgeError> {
    match value {
        Value::Null => Ok(None),
        Value::Object(root) => Ok(Some(StateSnapshot::new(root))),
        other => Err(BridgeError::MalformedResponse(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

/// Generate the host-side script that pushes a snapshot to the page.
pub fn push_script(callback: &str, snapshot: &StateSnapshot) -> String {
    let payload = serde_json::to_string(snapshot).unwrap_or_else(|_| "null".to_string());
    format!(
        "if (typeof window[{name}] === 'function') {{ window[{name}]({payload}); }}",
        name = serde_json::to_string(callback).unwrap_or_else(|_| "\"onIFL03State\"".to_string()),
    )
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn encode_is_flat_json() {
        let text = encode_request(&Command::SetUiEdit { on: false });
        assert_eq!(text, r#"{"cmd":"setUiEdit","on":false}"#);
    }

    #[test]
    fn decode_object() {
        let snap = decode_response(r#"{"connectionStatus":"CONNECTED"}"#)
            .unwrap()
            .unwrap();
        assert_eq!(snap.get("connectionStatus"), Some(&json!("CONNECTED")));
    }

    #[test]
    fn decode_empty_and_null_carry_no_state() {
        assert_eq!(decode_response("").unwrap(), None);
        assert_eq!(decode_response("  \n").unwrap(), None);
        assert_eq!(decode_response("null").unwrap(), None);
    }

    #[test]
    fn decode_invalid_json_is_malformed() {
        let err = decode_response("{\"uiEdit\": tru").unwrap_err();
        assert!(matches!(err, BridgeError::MalformedResponse(ref m) if m.starts_with("invalid JSON")));
    }

    #[test]
    fn decode_non_object_is_malformed() {
        let err = decode_response("[1,2,3]").unwrap_err();
        assert_eq!(
            err,
            BridgeError::MalformedResponse("expected a JSON object, got array".into())
        );
        assert!(decode_response("\"ok\"").is_err());
    }

    #[test]
    fn push_script_calls_named_callback() {
        let snap = StateSnapshot::from_value(json!({ "uiEdit": true })).unwrap();
        let script = push_script("onIFL03State", &snap);
        assert_eq!(
            script,
            r#"if (typeof window["onIFL03State"] === 'function') { window["onIFL03State"]({"uiEdit":true}); }"#
        );
    }

    #[test]
    fn push_script_escapes_callback_name() {
        let snap = StateSnapshot::default();
        let script = push_script("on\"State", &snap);
        assert!(script.contains(r#"window["on\"State"]({})"#));
    }
}
