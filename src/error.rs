//! Error types for labwire.

use thiserror::Error;

use crate::session::SessionState;

/// Main error type for all labwire operations.
#[derive(Debug, Error)]
pub enum LabwireError {
    /// I/O error during socket operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TCP connect failed (refused, unreachable, or timed out).
    #[error("failed to connect to {host}:{port}: {source}")]
    Connect {
        host: String,
        port: u16,
        #[source]
        source: std::io::Error,
    },

    /// Peer closed the connection while a response was expected.
    #[error("connection closed by peer")]
    ConnectionClosed,

    /// Operation called in the wrong session state.
    #[error("`{op}` is not valid in state {state:?}")]
    InvalidState {
        op: &'static str,
        state: SessionState,
    },

    /// An unterminated frame grew past the configured maximum.
    #[error("unterminated frame exceeds maximum of {max} bytes")]
    FrameTooLarge { max: usize },

    /// Invalid catalog contents (bad bounds, malformed patient id, ...).
    #[error("invalid catalog: {0}")]
    Catalog(String),

    /// Catalog file failed to parse.
    #[error("catalog parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type alias using LabwireError.
pub type Result<T> = std::result::Result<T, LabwireError>;
