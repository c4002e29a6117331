//! Legacy fingerprint driver abstraction for the fingerbridge adapter.
//!
//! This crate models the synchronous, single-callback vendor driver interface
//! the adapter binds to, and provides the [`ModuleLoader`] that discovers one
//! working driver out of an ordered candidate list.
//!
//! # Driver Model
//!
//! A legacy driver is reached in three steps:
//!
//! 1. A [`DriverRegistry`] resolves a driver class name (e.g. `"goodix"`)
//!    to a [`DriverModule`].
//! 2. The module's open entry point yields a [`FingerprintDevice`].
//! 3. The device accepts exactly one notification callback ([`NotifyFn`]),
//!    through which every [`FingerprintMsg`] is delivered on a thread the
//!    driver owns.
//!
//! ```
//! use std::sync::Arc;
//! use fingerbridge_hal::{ModuleLoader, NotifyFn};
//! use fingerbridge_hal::mock::{MockDriver, MockRegistry};
//! use fingerbridge_hal::types::{AcquiredInfo, FingerprintMsg};
//!
//! let registry = Arc::new(MockRegistry::new().with_driver(MockDriver::new("fpc")));
//! let loader = ModuleLoader::new(registry.clone(), ["fpc"]);
//!
//! let notify: NotifyFn = Arc::new(|msg: &FingerprintMsg| println!("driver says {:?}", msg));
//! let handle = loader.discover(notify)?;
//!
//! // The driver thread delivers messages through the registered callback
//! let driver = registry.driver("fpc").unwrap();
//! driver.emit(&FingerprintMsg::Acquired(AcquiredInfo::Good));
//!
//! loader.close(handle);
//! # Ok::<(), fingerbridge_hal::HalError>(())
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T>`][error::Result] with a
//! [`HalError`] naming the driver class and the step that failed.
//!
//! # Mock Implementations
//!
//! The [`mock`] module provides a driver registry and drivers whose failure
//! modes can be configured, for development and testing without hardware.
//!
//! [`DriverRegistry`]: traits::DriverRegistry
//! [`DriverModule`]: traits::DriverModule
//! [`FingerprintDevice`]: traits::FingerprintDevice
//! [`FingerprintMsg`]: types::FingerprintMsg

pub mod device;
pub mod error;
pub mod loader;
pub mod mock;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use device::DeviceHandle;
pub use error::{HalError, Result};
pub use loader::ModuleLoader;
pub use traits::{DriverModule, DriverRegistry, FingerprintDevice, NotifyFn};
pub use types::{AcquiredInfo, DriverErrorCode, Finger, FingerprintMsg};
