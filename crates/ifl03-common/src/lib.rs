pub mod errors;
pub mod notifications;
pub mod types;
pub mod version;

pub use errors::{BridgeError, ConfigError, Ifl03Error, RemoteFetchError};
pub use notifications::{StatusBanner, StatusLevel, StatusMessage};
pub use types::ConnectionStatus;

pub type Result<T> = std::result::Result<T, Ifl03Error>;
