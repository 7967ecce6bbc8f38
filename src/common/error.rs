//! Error types for miniring

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // === Routing Errors ===
    #[error("Hash ring is empty: no servers to route to")]
    EmptyRing,

    // === Topology Errors ===
    #[error("Unknown server: {0}")]
    UnknownServer(String),

    #[error("Invalid server id: {0}")]
    InvalidServerId(String),

    // === Config Errors ===
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    // === Generic ===
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Is this a retryable error?
    ///
    /// An empty ring can become routable once a server is added; everything
    /// else is a caller or configuration mistake.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::EmptyRing)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

impl From<anyhow::Error> for Error {
    fn from(e: anyhow::Error) -> Self {
        Error::Other(e.to_string())
    }
}
