//! Mock driver registry.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{HalError, Result};
use crate::mock::MockDriver;
use crate::traits::{DriverModule, DriverRegistry};

/// Registry of [`MockDriver`]s that records every lookup.
///
/// Classes that were never added resolve to
/// [`HalError::ModuleNotFound`], like an uninstalled vendor library.
///
/// # Examples
///
/// ```
/// use fingerbridge_hal::mock::{MockDriver, MockRegistry};
/// use fingerbridge_hal::traits::DriverRegistry;
///
/// let registry = MockRegistry::new()
///     .with_driver(MockDriver::new("fpc").fail_open(-1))
///     .with_driver(MockDriver::new("goodix"));
///
/// let _ = registry.resolve("syna");
/// let _ = registry.resolve("goodix");
/// assert_eq!(registry.resolve_log(), vec!["syna", "goodix"]);
/// ```
#[derive(Debug, Default)]
pub struct MockRegistry {
    drivers: Vec<MockDriver>,
    resolve_log: Mutex<Vec<String>>,
}

impl MockRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a driver.
    pub fn with_driver(mut self, driver: MockDriver) -> Self {
        self.drivers.push(driver);
        self
    }

    /// Install a healthy driver for each class name.
    pub fn with_healthy<I, S>(mut self, class_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.drivers
            .extend(class_names.into_iter().map(MockDriver::new));
        self
    }

    /// Shared handle to an installed driver.
    pub fn driver(&self, class_name: &str) -> Option<MockDriver> {
        self.drivers
            .iter()
            .find(|d| d.class_name() == class_name)
            .cloned()
    }

    /// Class names passed to [`resolve`](DriverRegistry::resolve), in call order.
    pub fn resolve_log(&self) -> Vec<String> {
        self.resolve_log.lock().clone()
    }
}

impl DriverRegistry for MockRegistry {
    fn resolve(&self, class_name: &str) -> Result<Arc<dyn DriverModule>> {
        self.resolve_log.lock().push(class_name.to_string());

        self.driver(class_name)
            .map(|driver| Arc::new(driver) as Arc<dyn DriverModule>)
            .ok_or_else(|| HalError::module_not_found(class_name))
    }
}
