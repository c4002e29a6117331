//! Legacy driver trait definitions.
//!
//! These traits describe the contract of a vendor fingerprint driver as the
//! adapter sees it: a registry that resolves driver classes, a module that
//! exposes an open entry point, and the opened device with its single
//! notification callback.
//!
//! # Blocking, object-safe methods
//!
//! Unlike the async device traits of a peripheral manager, a legacy driver
//! is a synchronous ABI. Its entry points block until the vendor code returns
//! and its callback fires on a thread the driver owns. The traits here are
//! therefore plain `fn` methods, which keeps them object-safe: the loader
//! works with `Arc<dyn DriverModule>` and `Arc<dyn FingerprintDevice>`
//! regardless of which vendor answered.

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::types::FingerprintMsg;

/// Notification sink registered with an open device.
///
/// Invoked on the driver's own thread, concurrently with client calls.
/// Implementations must not block.
pub type NotifyFn = Arc<dyn Fn(&FingerprintMsg) + Send + Sync>;

/// Registry of installed vendor driver modules.
///
/// # Examples
///
/// ```
/// use fingerbridge_hal::mock::{MockDriver, MockRegistry};
/// use fingerbridge_hal::traits::DriverRegistry;
///
/// let registry = MockRegistry::new().with_driver(MockDriver::new("goodix"));
///
/// assert!(registry.resolve("goodix").is_ok());
/// assert!(registry.resolve("fpc").is_err());
/// ```
pub trait DriverRegistry: Send + Sync {
    /// Resolve the module registered for a driver class.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::ModuleNotFound`](crate::HalError::ModuleNotFound)
    /// if no module is installed for `class_name`.
    fn resolve(&self, class_name: &str) -> Result<Arc<dyn DriverModule>>;
}

/// A resolved vendor driver module.
pub trait DriverModule: Send + Sync {
    /// Driver class this module was registered under.
    fn class_name(&self) -> &str;

    /// Whether the module exports an open entry point.
    fn has_open_entry(&self) -> bool;

    /// Invoke the open entry point.
    ///
    /// Only meaningful when [`has_open_entry`](Self::has_open_entry) is true.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::Status`](crate::HalError::Status) with the
    /// driver's nonzero status if the device cannot be opened.
    fn open(&self) -> Result<Arc<dyn FingerprintDevice>>;
}

/// An opened vendor fingerprint device.
pub trait FingerprintDevice: Send + Sync + fmt::Debug {
    /// Register the notification callback.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::Status`](crate::HalError::Status) if the driver
    /// rejects the callback.
    fn set_notify(&self, notify: NotifyFn) -> Result<()>;

    /// Invoke the close entry point.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::Status`](crate::HalError::Status) with the
    /// driver's nonzero status, or [`HalError::Other`](crate::HalError::Other)
    /// if the device failed without producing one.
    fn close(&self) -> Result<()>;
}
