//! Fingerprint adapter.
//!
//! The [`Fingerprint`] adapter owns the whole stack for one sensor: it opens
//! a vendor driver at construction, answers capability queries, hands out
//! sessions, and closes the driver when dropped.
//!
//! # Lifecycle
//!
//! ```text
//! build()
//!   ├─ validate config
//!   ├─ ModuleLoader::discover(router callback)   ─► DeviceHandle
//!   └─ under-display sensor? ─► UdfpsHandlerFactory::create + init
//!
//! create_session() ... (one open session at a time)
//!
//! drop()
//!   ├─ close the active session                  (router stops forwarding)
//!   ├─ UdfpsHandlerFactory::destroy
//!   └─ ModuleLoader::close                       (exactly once)
//! ```
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use fingerbridge_core::SensorConfig;
//! use fingerbridge_hal::mock::MockRegistry;
//! use fingerbridge_service::{Fingerprint, FingerprintHal};
//!
//! let registry = Arc::new(MockRegistry::new().with_healthy(["goodix"]));
//! let config = SensorConfig::default().with_candidates(["fpc", "goodix"]);
//!
//! let hal = Fingerprint::new(config, registry).unwrap();
//! assert_eq!(hal.device_class(), Some("goodix"));
//! assert_eq!(hal.get_sensor_props().len(), 1);
//! ```

use std::fmt;
use std::sync::Arc;

use fingerbridge_core::{SensorConfig, SensorId, SensorProps, UserId};
use fingerbridge_hal::{DeviceHandle, DriverRegistry, ModuleLoader};
use tracing::{debug, error, info};

use crate::callback::SessionCallback;
use crate::error::Result;
use crate::lockout::LockoutTracker;
use crate::manager::SessionManager;
use crate::props::SensorPropertyProvider;
use crate::router::{CallbackRouter, SessionSlot};
use crate::session::{Session, SessionContext};
use crate::udfps::{UdfpsHandler, UdfpsHandlerFactory};

/// Client-facing request surface.
pub trait FingerprintHal: Send + Sync {
    /// Describe the sensors behind this adapter. Never fails.
    fn get_sensor_props(&self) -> Vec<SensorProps>;

    /// Open a session for `user_id` on `sensor_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::SessionAlreadyOpen`](crate::ServiceError::SessionAlreadyOpen)
    /// if a session is still open.
    fn create_session(
        &self,
        sensor_id: SensorId,
        user_id: UserId,
        callback: Arc<dyn SessionCallback>,
    ) -> Result<Arc<Session>>;
}

struct UdfpsBinding {
    factory: Arc<dyn UdfpsHandlerFactory>,
    handler: Arc<dyn UdfpsHandler>,
}

/// Builder for [`Fingerprint`].
pub struct FingerprintBuilder {
    config: SensorConfig,
    registry: Arc<dyn DriverRegistry>,
    udfps_factory: Option<Arc<dyn UdfpsHandlerFactory>>,
    lockout: Option<Arc<LockoutTracker>>,
}

impl FingerprintBuilder {
    /// Vendor glue for under-display sensors.
    ///
    /// Ignored unless the configured sensor type is under-display.
    pub fn udfps_factory(mut self, factory: Arc<dyn UdfpsHandlerFactory>) -> Self {
        self.udfps_factory = Some(factory);
        self
    }

    /// Share an existing lockout tracker instead of creating one.
    pub fn lockout(mut self, lockout: Arc<LockoutTracker>) -> Self {
        self.lockout = Some(lockout);
        self
    }

    /// Open the driver and assemble the adapter.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Config`](crate::ServiceError::Config) if the
    /// configuration is invalid and [`ServiceError::Hal`](crate::ServiceError::Hal)
    /// if no candidate driver could be opened.
    pub fn build(self) -> Result<Fingerprint> {
        self.config.validate()?;

        let config = Arc::new(self.config);
        let slot = Arc::new(SessionSlot::new());
        let router = Arc::new(CallbackRouter::new(Arc::downgrade(&slot)));
        let loader = ModuleLoader::from_config(self.registry, &config);

        let device = loader.discover(router.notify_fn())?;

        let udfps = if config.sensor_type.is_under_display() {
            info!("{} fingerprint sensor detected", config.sensor_type);
            self.udfps_factory
                .and_then(|factory| Fingerprint::create_udfps(factory, &device))
        } else {
            if self.udfps_factory.is_some() {
                debug!(
                    "Ignoring UDFPS handler factory for {} sensor",
                    config.sensor_type
                );
            }
            None
        };

        let lockout = self.lockout.unwrap_or_default();
        let context = SessionContext::new(
            device.clone(),
            lockout,
            udfps.as_ref().map(|binding| Arc::clone(&binding.handler)),
        );

        Ok(Fingerprint {
            props: SensorPropertyProvider::new(Arc::clone(&config)),
            sessions: SessionManager::new(slot, context),
            config,
            loader,
            device: Some(device),
            router,
            udfps,
        })
    }
}

/// Adapter exposing one legacy fingerprint driver through sessions.
pub struct Fingerprint {
    config: Arc<SensorConfig>,
    loader: ModuleLoader,
    device: Option<DeviceHandle>,
    router: Arc<CallbackRouter>,
    sessions: SessionManager,
    props: SensorPropertyProvider,
    udfps: Option<UdfpsBinding>,
}

impl Fingerprint {
    pub fn builder(config: SensorConfig, registry: Arc<dyn DriverRegistry>) -> FingerprintBuilder {
        FingerprintBuilder {
            config,
            registry,
            udfps_factory: None,
            lockout: None,
        }
    }

    /// Build an adapter without an under-display handler.
    ///
    /// # Errors
    ///
    /// See [`FingerprintBuilder::build`].
    pub fn new(config: SensorConfig, registry: Arc<dyn DriverRegistry>) -> Result<Self> {
        Self::builder(config, registry).build()
    }

    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    /// Class of the bound vendor driver.
    pub fn device_class(&self) -> Option<&str> {
        self.device.as_ref().map(DeviceHandle::class_name)
    }

    /// The driver callback, for delivery statistics.
    pub fn router(&self) -> &CallbackRouter {
        &self.router
    }

    pub fn active_session(&self) -> Option<Arc<Session>> {
        self.sessions.active_session()
    }

    pub fn has_udfps_handler(&self) -> bool {
        self.udfps.is_some()
    }

    fn create_udfps(
        factory: Arc<dyn UdfpsHandlerFactory>,
        device: &DeviceHandle,
    ) -> Option<UdfpsBinding> {
        let Some(handler) = factory.create() else {
            error!("Can't create UdfpsHandler");
            return None;
        };

        handler.init(device);
        Some(UdfpsBinding { factory, handler })
    }
}

impl FingerprintHal for Fingerprint {
    fn get_sensor_props(&self) -> Vec<SensorProps> {
        self.props.sensor_props()
    }

    fn create_session(
        &self,
        sensor_id: SensorId,
        user_id: UserId,
        callback: Arc<dyn SessionCallback>,
    ) -> Result<Arc<Session>> {
        self.sessions.create_session(sensor_id, user_id, callback)
    }
}

impl Drop for Fingerprint {
    fn drop(&mut self) {
        debug!("Tearing down fingerprint adapter");

        self.sessions.close_active();

        if let Some(binding) = self.udfps.take() {
            binding.factory.destroy(binding.handler);
        }

        if let Some(device) = self.device.take() {
            self.loader.close(device);
        }
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fingerprint")
            .field("device", &self.device_class())
            .field("router", &self.router)
            .field("sessions", &self.sessions)
            .field("udfps", &self.udfps.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callback::SessionEvent;
    use crate::error::ServiceError;
    use crate::testing::RecordingCallback;
    use fingerbridge_core::FingerprintSensorType;
    use fingerbridge_hal::mock::{MockDriver, MockRegistry};
    use fingerbridge_hal::{AcquiredInfo, FingerprintMsg, HalError};
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing_test::traced_test;

    #[derive(Default)]
    struct RecordingUdfps {
        init_class: Mutex<Option<String>>,
        acquired: AtomicUsize,
        cancelled: AtomicUsize,
    }

    impl UdfpsHandler for RecordingUdfps {
        fn init(&self, device: &DeviceHandle) {
            *self.init_class.lock() = Some(device.class_name().to_string());
        }

        fn on_acquired(&self, _info: AcquiredInfo) {
            self.acquired.fetch_add(1, Ordering::SeqCst);
        }

        fn cancel(&self) {
            self.cancelled.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Factory that hands out one shared handler and records teardown.
    struct RecordingFactory {
        handler: Option<Arc<RecordingUdfps>>,
        destroyed: AtomicUsize,
        // Driver that reports a touch while the handler is being destroyed
        late_driver: Option<MockDriver>,
    }

    impl RecordingFactory {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                handler: Some(Arc::new(RecordingUdfps::default())),
                destroyed: AtomicUsize::new(0),
                late_driver: None,
            })
        }

        fn empty() -> Arc<Self> {
            Arc::new(Self {
                handler: None,
                destroyed: AtomicUsize::new(0),
                late_driver: None,
            })
        }

        fn emitting_on_destroy(driver: MockDriver) -> Arc<Self> {
            Arc::new(Self {
                handler: Some(Arc::new(RecordingUdfps::default())),
                destroyed: AtomicUsize::new(0),
                late_driver: Some(driver),
            })
        }
    }

    impl UdfpsHandlerFactory for RecordingFactory {
        fn create(&self) -> Option<Arc<dyn UdfpsHandler>> {
            self.handler
                .clone()
                .map(|handler| handler as Arc<dyn UdfpsHandler>)
        }

        fn destroy(&self, _handler: Arc<dyn UdfpsHandler>) {
            if let Some(driver) = &self.late_driver {
                driver.emit(&FingerprintMsg::Acquired(AcquiredInfo::Good));
            }
            self.destroyed.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn registry(names: &[&str]) -> Arc<MockRegistry> {
        Arc::new(MockRegistry::new().with_healthy(names.iter().copied()))
    }

    #[test]
    fn test_build_binds_first_working_driver() {
        let registry = Arc::new(
            MockRegistry::new()
                .with_driver(MockDriver::new("fpc").fail_open(-19))
                .with_healthy(["goodix"]),
        );
        let config = SensorConfig::default().with_candidates(["fpc", "goodix"]);

        let hal = Fingerprint::new(config, registry).unwrap();

        assert_eq!(hal.device_class(), Some("goodix"));
        assert!(!hal.has_udfps_handler());
    }

    #[test]
    fn test_build_fails_when_no_driver_opens() {
        let config = SensorConfig::default().with_candidates(["fpc", "goodix"]);

        let result = Fingerprint::new(config, registry(&[]));

        assert!(matches!(
            result,
            Err(ServiceError::Hal(HalError::NoModuleAvailable { attempted: 2 }))
        ));
    }

    #[test]
    fn test_build_rejects_invalid_config() {
        let config = SensorConfig::default().with_candidates(Vec::<String>::new());

        let result = Fingerprint::new(config, registry(&["fpc"]));

        assert!(matches!(result, Err(ServiceError::Config(_))));
    }

    #[test]
    fn test_drop_closes_device_once() {
        let registry = registry(&["fpc"]);
        let config = SensorConfig::default().with_candidates(["fpc"]);
        let hal = Fingerprint::new(config, registry.clone()).unwrap();
        let session = hal
            .create_session(0, 10, RecordingCallback::new())
            .unwrap();

        drop(hal);

        let driver = registry.driver("fpc").unwrap();
        assert_eq!(driver.close_calls(), 1);
        assert!(!driver.is_notify_registered());
        // Sessions outliving the adapter keep a handle but never close it
        drop(session);
        assert_eq!(driver.close_calls(), 1);
    }

    #[test]
    fn test_udfps_handler_lifecycle() {
        let registry = registry(&["fpc"]);
        let factory = RecordingFactory::new();
        let config = SensorConfig::under_display(540, 1636, 130).with_candidates(["fpc"]);

        let hal = Fingerprint::builder(config, registry.clone())
            .udfps_factory(factory.clone())
            .build()
            .unwrap();

        let handler = factory.handler.clone().unwrap();
        assert!(hal.has_udfps_handler());
        assert_eq!(handler.init_class.lock().as_deref(), Some("fpc"));

        hal.create_session(0, 10, RecordingCallback::new()).unwrap();
        registry
            .driver("fpc")
            .unwrap()
            .emit(&FingerprintMsg::Acquired(AcquiredInfo::Good));
        assert_eq!(handler.acquired.load(Ordering::SeqCst), 1);

        drop(hal);
        assert_eq!(factory.destroyed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_closes_session_before_destroying_udfps() {
        let registry = registry(&["fpc"]);
        let driver = registry.driver("fpc").unwrap();
        let factory = RecordingFactory::emitting_on_destroy(driver.clone());
        let config = SensorConfig::under_display(540, 1636, 130).with_candidates(["fpc"]);
        let hal = Fingerprint::builder(config, registry.clone())
            .udfps_factory(factory.clone())
            .build()
            .unwrap();
        let callback = RecordingCallback::new();
        let session = hal.create_session(0, 10, callback.clone()).unwrap();
        let handler = factory.handler.clone().unwrap();

        drop(hal);

        assert_eq!(factory.destroyed.load(Ordering::SeqCst), 1);
        assert!(session.is_closed());
        assert_eq!(handler.cancelled.load(Ordering::SeqCst), 1);
        assert_eq!(handler.acquired.load(Ordering::SeqCst), 0);
        assert_eq!(callback.events(), vec![SessionEvent::SessionClosed]);
        assert_eq!(driver.close_calls(), 1);
    }

    #[test]
    fn test_build_rejects_repeated_candidate() {
        let failing = MockDriver::new("fpc").fail_open(-19);
        let registry = Arc::new(
            MockRegistry::new()
                .with_driver(failing.clone())
                .with_healthy(["goodix"]),
        );
        let config = SensorConfig::default().with_candidates(["fpc", "fpc", "goodix"]);

        let result = Fingerprint::new(config, registry.clone());

        assert!(matches!(result, Err(ServiceError::Config(_))));
        assert_eq!(failing.open_calls(), 0);
        assert!(registry.resolve_log().is_empty());
    }

    #[test]
    fn test_udfps_factory_ignored_for_rear_sensor() {
        let factory = RecordingFactory::new();
        let mut config = SensorConfig::default().with_candidates(["fpc"]);
        config.sensor_type = FingerprintSensorType::Rear;

        let hal = Fingerprint::builder(config, registry(&["fpc"]))
            .udfps_factory(factory.clone())
            .build()
            .unwrap();

        assert!(!hal.has_udfps_handler());
        drop(hal);
        assert_eq!(factory.destroyed.load(Ordering::SeqCst), 0);
    }

    #[test]
    #[traced_test]
    fn test_udfps_factory_without_handler() {
        let config = SensorConfig::under_display(540, 1636, 130).with_candidates(["fpc"]);

        let hal = Fingerprint::builder(config, registry(&["fpc"]))
            .udfps_factory(RecordingFactory::empty())
            .build()
            .unwrap();

        assert!(!hal.has_udfps_handler());
        assert!(logs_contain("Can't create UdfpsHandler"));
    }

    #[test]
    fn test_shared_lockout_survives_sessions() {
        let lockout = Arc::new(LockoutTracker::new());
        let registry = registry(&["fpc"]);
        let config = SensorConfig::default().with_candidates(["fpc"]);
        let hal = Fingerprint::builder(config, registry.clone())
            .lockout(Arc::clone(&lockout))
            .build()
            .unwrap();
        let driver = registry.driver("fpc").unwrap();

        let first = hal
            .create_session(0, 10, RecordingCallback::new())
            .unwrap();
        driver.emit(&FingerprintMsg::Authenticated {
            finger: fingerbridge_hal::Finger::new(10, 0),
            hat: Vec::new(),
        });
        first.close();

        hal.create_session(0, 10, RecordingCallback::new())
            .unwrap();
        assert_eq!(lockout.failed_attempts(), 1);
    }
}
