//! Host gateway abstraction.
//!
//! The host exposes a single query entry point that takes request text and
//! later fires exactly one of two continuations: success with response
//! text, or failure with a code and message. [`BridgeGateway`] turns that
//! into an awaitable call.

use async_trait::async_trait;
use ifl03_common::BridgeError;
use tokio::sync::{mpsc, oneshot};

/// Code reported when the host drops a query without answering it.
pub const QUERY_DROPPED_CODE: i32 = -1;

/// Payload of the host's failure continuation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayFailure {
    pub code: i32,
    pub message: String,
}

impl GatewayFailure {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn dropped() -> Self {
        Self::new(QUERY_DROPPED_CODE, "query dropped by host")
    }
}

impl From<GatewayFailure> for BridgeError {
    fn from(f: GatewayFailure) -> Self {
        BridgeError::Transport {
            code: f.code,
            message: f.message,
        }
    }
}

#[async_trait]
pub trait BridgeGateway: Send + Sync {
    /// Submit request text; resolves once with the host's answer.
    async fn query(&self, request: String) -> Result<String, GatewayFailure>;
}

// =============================================================================
// CHANNEL GATEWAY
// =============================================================================

/// One-shot answer handle for a pending query.
///
/// Both continuations consume the responder, so a query can be answered
/// at most once. Dropping it unanswered fails the call.
#[derive(Debug)]
pub struct QueryResponder {
    tx: oneshot::Sender<Result<String, GatewayFailure>>,
}

impl QueryResponder {
    pub fn success(self, response: impl Into<String>) {
        let _ = self.tx.send(Ok(response.into()));
    }

    pub fn failure(self, code: i32, message: impl Into<String>) {
        let _ = self.tx.send(Err(GatewayFailure::new(code, message)));
    }
}

/// A query waiting for the host.
#[derive(Debug)]
pub struct PendingQuery {
    pub request: String,
    pub responder: QueryResponder,
}

/// Host side of a [`ChannelGateway`].
pub struct HostEndpoint {
    rx: mpsc::UnboundedReceiver<PendingQuery>,
}

impl HostEndpoint {
    /// Next query submitted by the client; `None` once every gateway
    /// handle is gone.
    pub async fn next_query(&mut self) -> Option<PendingQuery> {
        self.rx.recv().await
    }
}

/// Gateway that hands each query to a host task over a channel.
#[derive(Clone)]
pub struct ChannelGateway {
    tx: mpsc::UnboundedSender<PendingQuery>,
}

impl ChannelGateway {
    pub fn new() -> (Self, HostEndpoint) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, HostEndpoint { rx })
    }
}

#[async_trait]
impl BridgeGateway for ChannelGateway {
    async fn query(&self, request: String) -> Result<String, GatewayFailure> {
        let (tx, rx) = oneshot::channel();
        let pending = PendingQuery {
            request,
            responder: QueryResponder { tx },
        };
        if self.tx.send(pending).is_err() {
            return Err(GatewayFailure::new(QUERY_DROPPED_CODE, "host endpoint closed"));
        }
        rx.await.unwrap_or_else(|_| Err(GatewayFailure::dropped()))
    }
}

// =============================================================================
// HANDLER GATEWAY
// =============================================================================

/// Gateway backed by a synchronous host handler, answering in place.
pub struct HandlerGateway<F> {
    handler: F,
}

impl<F> HandlerGateway<F>
where
    F: Fn(&str) -> Result<String, GatewayFailure> + Send + Sync,
{
    pub fn new(handler: F) -> Self {
        Self { handler }
    }
}

#[async_trait]
impl<F> BridgeGateway for HandlerGateway<F>
where
    F: Fn(&str) -> Result<String, GatewayFailure> + Send + Sync,
{
    async fn query(&self, request: String) -> Result<String, GatewayFailure> {
        (self.handler)(&request)
    }
}
