use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failure of a single bridge call.
///
/// None of these are fatal: the caller logs them and the last good
/// snapshot stays authoritative.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BridgeError {
    /// No host gateway is attached; the call never left the client.
    #[error("bridge unavailable: no host gateway attached")]
    BridgeUnavailable,

    /// The gateway invoked its failure continuation.
    #[error("transport error {code}: {message}")]
    Transport { code: i32, message: String },

    /// The success text was not a JSON object.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl BridgeError {
    /// Shorthand used by gateway adapters.
    pub fn transport(code: i32, message: impl Into<String>) -> Self {
        Self::Transport {
            code,
            message: message.into(),
        }
    }
}

/// Best-effort remote metadata fetch failure. Always swallowed by callers.
#[derive(Debug, thiserror::Error)]
pub enum RemoteFetchError {
    #[error("remote fetch network error: {0}")]
    Network(String),

    #[error("remote fetch returned status {0}")]
    Status(u16),

    #[error("remote fetch parse error: {0}")]
    Parse(String),
}

#[derive(Debug, thiserror::Error)]
pub enum Ifl03Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error(transparent)]
    RemoteFetch(#[from] RemoteFetchError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}
