//! The bridge client: the one channel through which pages change backend
//! state and learn the result.

use std::sync::{Arc, RwLock};

use ifl03_common::BridgeError;
use tracing::{debug, warn};

use crate::codec::{decode_response, decode_value, encode_request};
use crate::command::Command;
use crate::gateway::BridgeGateway;
use crate::snapshot::StateSnapshot;
use crate::store::StateStore;

#[cfg(test)]
mod tests;

/// Sends commands through the host gateway and keeps the latest snapshot.
///
/// `send` takes `&self`, so several calls may be in flight at once. There
/// is no sequencing between them: each success replaces the snapshot when
/// it arrives, so the last response to arrive wins.
pub struct BridgeClient {
    gateway: RwLock<Option<Arc<dyn BridgeGateway>>>,
    store: StateStore,
}

impl BridgeClient {
    pub fn new(gateway: Arc<dyn BridgeGateway>) -> Self {
        Self {
            gateway: RwLock::new(Some(gateway)),
            store: StateStore::new(),
        }
    }

    /// A client with no host gateway; every `send` is rejected until one
    /// is attached.
    pub fn detached() -> Self {
        Self {
            gateway: RwLock::new(None),
            store: StateStore::new(),
        }
    }

    pub fn attach_gateway(&self, gateway: Arc<dyn BridgeGateway>) {
        if let Ok(mut slot) = self.gateway.write() {
            *slot = Some(gateway);
        }
    }

    pub fn detach_gateway(&self) {
        if let Ok(mut slot) = self.gateway.write() {
            *slot = None;
        }
    }

    pub fn is_available(&self) -> bool {
        self.current_gateway().is_some()
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn snapshot(&self) -> Option<Arc<StateSnapshot>> {
        self.store.current()
    }

    /// Send one command and apply its response.
    ///
    /// On success the returned snapshot has already replaced the stored
    /// one; `Ok(None)` means the host answered without a state body. On
    /// any error the stored snapshot is untouched. Never retries.
    pub async fn send(&self, command: &Command) -> Result<Option<Arc<StateSnapshot>>, BridgeError> {
        let Some(gateway) = self.current_gateway() else {
            warn!(cmd = command.name(), "bridge call rejected: gateway unavailable");
            return Err(BridgeError::BridgeUnavailable);
        };

        let request = encode_request(command);
        debug!(
            cmd = command.name(),
            mutating = command.is_mutating(),
            request_len = request.len(),
            "bridge call"
        );

        let response = gateway.query(request).await.map_err(|failure| {
            warn!(
                cmd = command.name(),
                code = failure.code,
                message = %failure.message,
                "bridge call failed"
            );
            BridgeError::from(failure)
        })?;

        self.apply_text(&response).inspect_err(|e| {
            warn!(
                cmd = command.name(),
                body_len = response.len(),
                error = %e,
                "bridge response rejected"
            );
        })
    }

    /// Apply a host-initiated push given as JSON text.
    pub fn apply_push(&self, text: &str) -> Result<Option<Arc<StateSnapshot>>, BridgeError> {
        self.apply_text(text).inspect_err(|e| {
            warn!(body_len = text.len(), error = %e, "state push rejected");
        })
    }

    /// Apply a host-initiated push given as an already-parsed value.
    pub fn apply_push_value(
        &self,
        value: serde_json::Value,
    ) -> Result<Option<Arc<StateSnapshot>>, BridgeError> {
        let decoded = decode_value(value).inspect_err(|e| {
            warn!(error = %e, "state push rejected");
        })?;
        Ok(decoded.map(|s| self.commit(s)))
    }

    fn apply_text(&self, text: &str) -> Result<Option<Arc<StateSnapshot>>, BridgeError> {
        let decoded = decode_response(text)?;
        Ok(decoded.map(|s| self.commit(s)))
    }

    fn commit(&self, snapshot: StateSnapshot) -> Arc<StateSnapshot> {
        let snapshot = self.store.replace(snapshot);
        debug!(
            generation = self.store.generation(),
            status = %snapshot.connection_status(),
            "state snapshot replaced"
        );
        snapshot
    }

    fn current_gateway(&self) -> Option<Arc<dyn BridgeGateway>> {
        self.gateway.read().ok().and_then(|g| g.clone())
    }
}
