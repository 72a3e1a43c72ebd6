//! Page-to-native bridge client for iFL03.
//!
//! Provides:
//! - Typed commands serialized to the host's `{ "cmd": ..., ... }` wire shape
//! - An awaitable gateway abstraction over the host's success/failure
//!   continuations, with channel and handler-backed adapters
//! - A single state store holding the latest whole-state snapshot
//! - `send` and push application with all-or-nothing snapshot replacement

pub mod client;
pub mod codec;
pub mod command;
pub mod gateway;
pub mod snapshot;
pub mod store;

pub use client::BridgeClient;
pub use command::Command;
pub use gateway::{
    BridgeGateway, ChannelGateway, GatewayFailure, HandlerGateway, HostEndpoint, PendingQuery,
    QueryResponder,
};
pub use snapshot::{GhostTelemetry, StateSnapshot};
pub use store::StateStore;
