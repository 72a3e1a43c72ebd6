//! Tests for the request/response cycle and snapshot discipline.

use std::sync::Arc;

use ifl03_common::{BridgeError, ConnectionStatus};
use serde_json::json;

use super::*;
use crate::gateway::{ChannelGateway, GatewayFailure, HandlerGateway};

fn echo(body: &'static str) -> Arc<dyn BridgeGateway> {
    Arc::new(HandlerGateway::new(move |_: &str| Ok(body.to_string())))
}

async fn seeded(body: &'static str) -> BridgeClient {
    let client = BridgeClient::new(echo(body));
    client.send(&Command::GetState).await.unwrap();
    client
}

#[tokio::test]
async fn detached_client_rejects_and_keeps_state() {
    let client = seeded(r#"{"connectionStatus":"DRIVING"}"#).await;
    client.detach_gateway();
    assert!(!client.is_available());

    let commands = [
        Command::GetState,
        Command::set_overlay("OverlayDDU", true),
        Command::ResetConfig,
    ];
    for cmd in &commands {
        let err = client.send(cmd).await.unwrap_err();
        assert_eq!(err, BridgeError::BridgeUnavailable);
    }

    let current = client.snapshot().unwrap();
    assert_eq!(current.connection_status(), ConnectionStatus::Driving);
    assert_eq!(client.store().generation(), 1);
}

#[tokio::test]
async fn never_attached_client_has_no_snapshot() {
    let client = BridgeClient::detached();
    assert_eq!(
        client.send(&Command::GetState).await.unwrap_err(),
        BridgeError::BridgeUnavailable
    );
    assert!(client.snapshot().is_none());
}

#[tokio::test]
async fn success_replaces_snapshot() {
    let client = BridgeClient::new(echo(
        r#"{"config":{"OverlayDDU":{"enabled":true}}}"#,
    ));
    let returned = client
        .send(&Command::set_overlay("OverlayDDU", true))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(returned.config_bool("OverlayDDU", "enabled"), Some(true));
    assert_eq!(*client.snapshot().unwrap(), *returned);
}

#[tokio::test]
async fn request_text_is_encoded_command() {
    let (gateway, mut host) = ChannelGateway::new();
    let client = Arc::new(BridgeClient::new(Arc::new(gateway)));

    let task = {
        let client = Arc::clone(&client);
        tokio::spawn(async move {
            client
                .send(&Command::config_bool("OverlayStandings", "show_in_race", false))
                .await
        })
    };

    let pending = host.next_query().await.unwrap();
    let sent: serde_json::Value = serde_json::from_str(&pending.request).unwrap();
    assert_eq!(
        sent,
        json!({ "cmd": "setConfigBool", "component": "OverlayStandings", "key": "show_in_race", "value": false })
    );
    pending.responder.success("{}");
    task.await.unwrap().unwrap();
}

#[tokio::test]
async fn malformed_response_keeps_previous_snapshot() {
    let client = seeded(r#"{"uiEdit":true}"#).await;
    client.attach_gateway(echo("{not json"));

    let err = client.send(&Command::SetUiEdit { on: false }).await.unwrap_err();
    assert!(matches!(err, BridgeError::MalformedResponse(_)));

    assert_eq!(client.snapshot().unwrap().ui_edit(), Some(true));
    assert_eq!(client.store().generation(), 1);
}

#[tokio::test]
async fn transport_failure_keeps_previous_snapshot() {
    let client = seeded(r#"{"previewMode":true}"#).await;
    client.attach_gateway(Arc::new(HandlerGateway::new(|_: &str| {
        Err(GatewayFailure::new(400, "unknown command"))
    })));

    let err = client.send(&Command::UpdateApp).await.unwrap_err();
    assert_eq!(err, BridgeError::transport(400, "unknown command"));
    assert_eq!(client.snapshot().unwrap().preview_mode(), Some(true));
}

#[tokio::test]
async fn empty_response_leaves_state_alone() {
    let client = seeded(r#"{"uiEdit":true}"#).await;
    client.attach_gateway(echo(""));

    let result = client.send(&Command::OpenExternal { url: "https://example.com".into() }).await;
    assert_eq!(result.unwrap(), None);
    assert_eq!(client.snapshot().unwrap().ui_edit(), Some(true));
}

#[tokio::test]
async fn last_arrival_wins_between_overlapping_calls() {
    let (gateway, mut host) = ChannelGateway::new();
    let client = Arc::new(BridgeClient::new(Arc::new(gateway)));

    let call_a = {
        let client = Arc::clone(&client);
        tokio::spawn(async move { client.send(&Command::set_overlay("OverlayDDU", true)).await })
    };
    let query_a = host.next_query().await.unwrap();

    let call_b = {
        let client = Arc::clone(&client);
        tokio::spawn(async move { client.send(&Command::set_overlay("OverlayDDU", false)).await })
    };
    let query_b = host.next_query().await.unwrap();

    // B is fast, A is slow.
    query_b.responder.success(r#"{"overlays":{"OverlayDDU":false}}"#);
    call_b.await.unwrap().unwrap();
    assert_eq!(client.snapshot().unwrap().overlay_enabled("OverlayDDU"), Some(false));

    query_a.responder.success(r#"{"overlays":{"OverlayDDU":true}}"#);
    call_a.await.unwrap().unwrap();

    assert_eq!(client.snapshot().unwrap().overlay_enabled("OverlayDDU"), Some(true));
    assert_eq!(client.store().generation(), 2);
}

#[tokio::test]
async fn push_goes_through_same_path() {
    let client = seeded(r#"{"connectionStatus":"CONNECTED"}"#).await;

    client
        .apply_push(r#"{"connectionStatus":"DISCONNECTED"}"#)
        .unwrap();
    assert_eq!(
        client.snapshot().unwrap().connection_status(),
        ConnectionStatus::Disconnected
    );

    assert!(client.apply_push("garbage").is_err());
    assert_eq!(
        client.snapshot().unwrap().connection_status(),
        ConnectionStatus::Disconnected
    );

    client
        .apply_push_value(json!({ "connectionStatus": "DRIVING" }))
        .unwrap();
    assert_eq!(
        client.snapshot().unwrap().connection_status(),
        ConnectionStatus::Driving
    );
    assert!(client.apply_push_value(json!(42)).is_err());
    assert_eq!(client.store().generation(), 3);
}
