//! Common test utilities for the service integration tests.
//!
//! Provides a recording client callback and adapter fixtures built on the
//! mock driver registry.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use fingerbridge_core::SensorConfig;
use fingerbridge_hal::mock::{MockDriver, MockRegistry};
use fingerbridge_service::{
    DeathRecipient, Fingerprint, Result, ServiceError, SessionCallback, SessionEvent,
};
use parking_lot::Mutex;

/// Client callback that records events and can simulate its own death.
#[derive(Default)]
pub struct TestClient {
    events: Mutex<Vec<SessionEvent>>,
    recipient: Mutex<Option<DeathRecipient>>,
    dead: AtomicBool,
}

impl TestClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<SessionEvent> {
        self.events.lock().clone()
    }

    /// Wait until at least `count` events arrived or `timeout` elapsed.
    pub fn wait_for_events(&self, count: usize, timeout: Duration) -> Vec<SessionEvent> {
        let deadline = Instant::now() + timeout;
        loop {
            let events = self.events();
            if events.len() >= count || Instant::now() >= deadline {
                return events;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    /// Simulate the client process dying.
    pub fn kill(&self) {
        self.dead.store(true, Ordering::SeqCst);
        let recipient = self.recipient.lock().take();
        if let Some(recipient) = recipient {
            recipient();
        }
    }
}

impl SessionCallback for TestClient {
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

/// Adapter bound to a single healthy mock driver named `fpc`.
pub fn adapter_with_driver() -> (Fingerprint, MockDriver) {
    let registry = Arc::new(MockRegistry::new().with_healthy(["fpc"]));
    let config = SensorConfig::default().with_candidates(["fpc"]);
    let hal = Fingerprint::new(config, registry.clone()).unwrap();
    let driver = registry.driver("fpc").unwrap();
    (hal, driver)
}
