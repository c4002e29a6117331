//! Handle to an opened driver.

use std::sync::Arc;

use crate::error::Result;
use crate::traits::FingerprintDevice;

/// Opened, callback-registered connection to a vendor driver.
///
/// Produced only by [`ModuleLoader::discover`](crate::loader::ModuleLoader::discover).
/// Cloning is cheap and shares the same device; sessions hold clones while
/// the adapter keeps the original. The close entry point is reachable only
/// through [`ModuleLoader::close`](crate::loader::ModuleLoader::close), which
/// consumes the handle, so holders of a clone can never close the device.
#[derive(Clone, Debug)]
pub struct DeviceHandle {
    class_name: Arc<str>,
    device: Arc<dyn FingerprintDevice>,
}

impl DeviceHandle {
    pub(crate) fn new(class_name: &str, device: Arc<dyn FingerprintDevice>) -> Self {
        Self {
            class_name: Arc::from(class_name),
            device,
        }
    }

    /// Driver class the handle is bound to.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Whether two handles refer to the same opened device.
    pub fn same_device(&self, other: &DeviceHandle) -> bool {
        Arc::ptr_eq(&self.device, &other.device)
    }

    /// Number of live handles sharing this device, including this one.
    pub fn holders(&self) -> usize {
        Arc::strong_count(&self.device)
    }

    pub(crate) fn close(&self) -> Result<()> {
        self.device.close()
    }
}
