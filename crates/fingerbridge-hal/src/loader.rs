//! Driver discovery and teardown.
//!
//! The [`ModuleLoader`] walks a fixed, ordered list of vendor driver classes
//! and binds to the first one that fully works: it resolves, exports an open
//! entry point, opens, and accepts the notification callback. Failures are
//! logged per candidate and never abort the walk; only exhausting the list
//! is reported to the caller.
//!
//! ```text
//! candidates: [fpc] ──x──► [goodix] ──x──► [syna] ──✓──► DeviceHandle(syna)
//!              │             │
//!              └─ error! ────┴─ error!   (one diagnostic per failed class)
//! ```
//!
//! Discovery is a priority fallback, not a retry loop: a class that failed
//! is never attempted again for the lifetime of the loader, even if the
//! condition that made it fail goes away later.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use fingerbridge_hal::loader::ModuleLoader;
//! use fingerbridge_hal::mock::{MockDriver, MockRegistry};
//! use fingerbridge_hal::traits::NotifyFn;
//! use fingerbridge_hal::types::FingerprintMsg;
//!
//! let registry = Arc::new(
//!     MockRegistry::new()
//!         .with_driver(MockDriver::new("fpc").fail_open(-19))
//!         .with_driver(MockDriver::new("goodix")),
//! );
//! let loader = ModuleLoader::new(registry, ["fpc", "goodix"]);
//!
//! let notify: NotifyFn = Arc::new(|_msg: &FingerprintMsg| {});
//! let handle = loader.discover(notify).unwrap();
//! assert_eq!(handle.class_name(), "goodix");
//!
//! loader.close(handle);
//! ```

use std::sync::Arc;

use fingerbridge_core::SensorConfig;
use tracing::{debug, error, info, warn};

use crate::device::DeviceHandle;
use crate::error::{HalError, Result};
use crate::traits::{DriverRegistry, NotifyFn};

/// Opens one vendor driver out of an ordered candidate list.
pub struct ModuleLoader {
    registry: Arc<dyn DriverRegistry>,
    candidates: Vec<String>,
}

impl ModuleLoader {
    /// Create a loader over `candidates`, tried in the given order.
    ///
    /// A class listed more than once keeps its first position only.
    pub fn new<I, S>(registry: Arc<dyn DriverRegistry>, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for class_name in candidates.into_iter().map(Into::into) {
            if unique.contains(&class_name) {
                warn!("Ignoring repeated candidate class {}", class_name);
                continue;
            }
            unique.push(class_name);
        }

        Self {
            registry,
            candidates: unique,
        }
    }

    /// Create a loader over the candidate list of a sensor configuration.
    pub fn from_config(registry: Arc<dyn DriverRegistry>, config: &SensorConfig) -> Self {
        Self::new(registry, config.candidate_modules.iter().cloned())
    }

    /// Candidate classes in discovery order.
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Bind to the first candidate that opens and accepts `notify`.
    ///
    /// Candidates are attempted strictly in order and each at most once.
    /// Every failed candidate produces one `error`-level diagnostic.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::NoModuleAvailable`] if every candidate failed.
    pub fn discover(&self, notify: NotifyFn) -> Result<DeviceHandle> {
        for class_name in &self.candidates {
            match self.open_hal(class_name, Arc::clone(&notify)) {
                Ok(handle) => {
                    info!("Opened fingerprint HAL, class {}", class_name);
                    return Ok(handle);
                }
                Err(e) => {
                    error!("Can't open HAL module, class {}: {}", class_name, e);
                }
            }
        }

        error!("Can't open any HAL module");
        Err(HalError::no_module_available(self.candidates.len()))
    }

    /// Resolve, open and register the callback for a single class.
    fn open_hal(&self, class_name: &str, notify: NotifyFn) -> Result<DeviceHandle> {
        debug!("Opening fingerprint hal library, class {}", class_name);

        let module = self.registry.resolve(class_name)?;

        if !module.has_open_entry() {
            return Err(HalError::no_open_entry(class_name));
        }

        let device = module.open().map_err(|e| match e {
            HalError::Status(status) => HalError::open_failed(class_name, status),
            other => other,
        })?;

        if let Err(e) = device.set_notify(notify) {
            // The device is unusable without a callback; release it before moving on
            if let Err(close_err) = device.close() {
                warn!(
                    "Can't close unusable fingerprint device, class {}: {}",
                    class_name, close_err
                );
            }
            return Err(match e {
                HalError::Status(status) => {
                    HalError::notify_registration_failed(class_name, status)
                }
                other => other,
            });
        }

        Ok(DeviceHandle::new(class_name, device))
    }

    /// Close a device opened by [`discover`](Self::discover).
    ///
    /// Best effort: a nonzero status from the driver is logged and otherwise
    /// ignored, and the handle is consumed either way.
    pub fn close(&self, handle: DeviceHandle) {
        debug!("Closing fingerprint HAL, class {}", handle.class_name());

        if handle.holders() > 1 {
            debug!(
                "{} session reference(s) still hold the device at close",
                handle.holders() - 1
            );
        }

        if let Err(e) = handle.close() {
            match e.status() {
                Some(status) => error!("{}", HalError::close_failed(status)),
                None => error!("Can't close fingerprint module: {}", e),
            }
        }
    }
}

impl std::fmt::Debug for ModuleLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleLoader")
            .field("candidates", &self.candidates)
            .finish_non_exhaustive()
    }
}
