//! Error types for the session-oriented service surface.

use fingerbridge_hal::HalError;
use uuid::Uuid;

/// Result type alias for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Errors returned by the adapter and its sessions.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A session was requested while another one is still open.
    ///
    /// This is a contract violation by the caller, which must serialize
    /// session creation. It is never retried.
    #[error("Open session already exists: {session_id}")]
    SessionAlreadyOpen { session_id: Uuid },

    /// The client behind a callback is already gone.
    #[error("Client is dead: {message}")]
    DeadClient { message: String },

    /// Driver discovery failed.
    #[error(transparent)]
    Hal(#[from] HalError),

    /// Configuration could not be loaded or is invalid.
    #[error(transparent)]
    Config(#[from] fingerbridge_core::Error),
}

impl ServiceError {
    /// Create a new session already open error.
    pub fn session_already_open(session_id: Uuid) -> Self {
        Self::SessionAlreadyOpen { session_id }
    }

    /// Create a new dead client error.
    pub fn dead_client(message: impl Into<String>) -> Self {
        Self::DeadClient {
            message: message.into(),
        }
    }
}
