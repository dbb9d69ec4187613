//! Error types for the bridge client.

use std::time::Duration;

/// Result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Error types that can occur while exchanging a command with the host.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// Could not open a connection to the host.
    #[error("Failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// A stage of the exchange did not complete in time.
    #[error("Timed out after {after:?} while {stage}")]
    Timeout { stage: &'static str, after: Duration },

    /// Socket read or write failed mid-exchange.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The response grew past the configured limit without a terminating newline.
    #[error("Response exceeded {limit} bytes without a terminating newline")]
    FrameTooLarge { limit: usize },

    /// The host closed the connection without sending anything.
    #[error("Connection closed before any response was received")]
    EmptyResponse,

    /// The response bytes were not valid UTF-8.
    #[error("Response is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// The response text was not valid JSON.
    #[error("Invalid JSON response: {0}")]
    Json(#[source] serde_json::Error),

    /// The request could not be serialized.
    #[error("Failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),

    /// The host processed the command and reported failure.
    #[error("Grasshopper reported an error: {message}")]
    Remote { message: String },

    /// The response did not have the shape the caller expected.
    #[error("Unexpected response payload: {0}")]
    UnexpectedPayload(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Coarse classification of a [`BridgeError`], for callers that branch on
/// failure category rather than the exact cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Connect, send or receive failed.
    Transport,
    /// Bytes arrived but could not be turned into the expected value.
    Decode,
    /// The host reported an application-level failure.
    Remote,
    /// Local misconfiguration.
    Config,
}

impl BridgeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Connect { .. }
            | Self::Timeout { .. }
            | Self::Io(_)
            | Self::FrameTooLarge { .. }
            | Self::EmptyResponse => ErrorKind::Transport,
            Self::Utf8(_) | Self::Json(_) | Self::Encode(_) | Self::UnexpectedPayload(_) => {
                ErrorKind::Decode
            }
            Self::Remote { .. } => ErrorKind::Remote,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// Whether the host was reached and answered.
    pub fn is_remote(&self) -> bool {
        self.kind() == ErrorKind::Remote
    }
}
