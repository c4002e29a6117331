//! Error types for legacy driver operations.
//!
//! This module defines the failures that can occur while resolving, opening,
//! and closing vendor fingerprint driver modules. Raw driver entry points
//! report [`HalError::Status`]; the loader rewraps those into the variants
//! that name the candidate class and the step that failed.

/// Result type alias for driver operations.
pub type Result<T> = std::result::Result<T, HalError>;

/// Errors that can occur during driver discovery and teardown.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HalError {
    /// The registry has no module for this driver class.
    #[error("HAL module not found: class {class_name}")]
    ModuleNotFound { class_name: String },

    /// The module resolved but does not export an open entry point.
    #[error("No valid open method: class {class_name}")]
    NoOpenEntry { class_name: String },

    /// The module's open entry point returned a nonzero status.
    #[error("Can't open fingerprint methods: class {class_name}, status {status}")]
    OpenFailed { class_name: String, status: i32 },

    /// The device opened but rejected the notification callback.
    #[error("Can't register fingerprint module callback: class {class_name}, status {status}")]
    NotifyRegistrationFailed { class_name: String, status: i32 },

    /// Every candidate class failed.
    #[error("Can't open any HAL module ({attempted} candidates tried)")]
    NoModuleAvailable { attempted: usize },

    /// The device's close entry point returned a nonzero status.
    #[error("Can't close fingerprint module, error: {status}")]
    CloseFailed { status: i32 },

    /// Raw nonzero status from a driver entry point.
    #[error("Driver returned status {0}")]
    Status(i32),

    /// Failure reported without a driver status, e.g. by a device
    /// implementation that lost its transport.
    #[error("{0}")]
    Other(String),
}

impl HalError {
    /// Create a new module not found error.
    pub fn module_not_found(class_name: impl Into<String>) -> Self {
        Self::ModuleNotFound {
            class_name: class_name.into(),
        }
    }

    /// Create a new missing open entry error.
    pub fn no_open_entry(class_name: impl Into<String>) -> Self {
        Self::NoOpenEntry {
            class_name: class_name.into(),
        }
    }

    /// Create a new open failed error.
    pub fn open_failed(class_name: impl Into<String>, status: i32) -> Self {
        Self::OpenFailed {
            class_name: class_name.into(),
            status,
        }
    }

    /// Create a new callback registration error.
    pub fn notify_registration_failed(class_name: impl Into<String>, status: i32) -> Self {
        Self::NotifyRegistrationFailed {
            class_name: class_name.into(),
            status,
        }
    }

    /// Create a new exhausted discovery error.
    pub fn no_module_available(attempted: usize) -> Self {
        Self::NoModuleAvailable { attempted }
    }

    /// Create a new close failed error.
    pub fn close_failed(status: i32) -> Self {
        Self::CloseFailed { status }
    }

    /// Create a generic error with custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }

    /// Driver status code carried by this error, if any.
    pub fn status(&self) -> Option<i32> {
        match self {
            Self::OpenFailed { status, .. }
            | Self::NotifyRegistrationFailed { status, .. }
            | Self::CloseFailed { status }
            | Self::Status(status) => Some(*status),
            _ => None,
        }
    }
}
