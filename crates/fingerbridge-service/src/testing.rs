//! Shared fixtures for unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use fingerbridge_hal::mock::{MockDriver, MockRegistry};
use fingerbridge_hal::{DeviceHandle, FingerprintMsg, ModuleLoader, NotifyFn};
use parking_lot::Mutex;

use crate::callback::{DeathRecipient, SessionCallback, SessionEvent};
use crate::error::{Result, ServiceError};

/// Callback that records every event and lets the test kill the client.
#[derive(Default)]
pub(crate) struct RecordingCallback {
    events: Mutex<Vec<SessionEvent>>,
    recipient: Mutex<Option<DeathRecipient>>,
    dead: AtomicBool,
}

impl RecordingCallback {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A client that died before linking.
    pub(crate) fn dead() -> Arc<Self> {
        let callback = Self::default();
        callback.dead.store(true, Ordering::SeqCst);
        Arc::new(callback)
    }

    pub(crate) fn events(&self) -> Vec<SessionEvent> {
        self.events.lock().clone()
    }

    pub(crate) fn is_linked(&self) -> bool {
        self.recipient.lock().is_some()
    }

    /// Simulate the client process dying.
    pub(crate) fn kill(&self) {
        self.dead.store(true, Ordering::SeqCst);
        let recipient = self.recipient.lock().take();
        if let Some(recipient) = recipient {
            recipient();
        }
    }
}

impl SessionCallback for RecordingCallback {
    fn on_event(&self, event: SessionEvent) {
        self.events.lock().push(event);
    }

    fn link_to_death(&self, recipient: DeathRecipient) -> Result<()> {
        if self.dead.load(Ordering::SeqCst) {
            return Err(ServiceError::dead_client("client already dead"));
        }
        *self.recipient.lock() = Some(recipient);
        Ok(())
    }
}

/// Open a healthy mock driver and return it with its device handle.
pub(crate) fn open_mock_device() -> (MockDriver, DeviceHandle) {
    let registry = Arc::new(MockRegistry::new().with_healthy(["fpc"]));
    let loader = ModuleLoader::new(registry.clone(), ["fpc"]);
    let notify: NotifyFn = Arc::new(|_msg: &FingerprintMsg| {});
    let handle = loader.discover(notify).unwrap();
    (registry.driver("fpc").unwrap(), handle)
}
