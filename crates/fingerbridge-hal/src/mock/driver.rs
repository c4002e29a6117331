//! Mock vendor driver for testing and development.
//!
//! A [`MockDriver`] plays three roles at once: it is the registry entry
//! (implements [`DriverModule`]), it opens a [`MockDevice`], and it is the
//! control handle tests use to inject driver notifications and inspect how
//! the adapter used the device.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicUsize, Ordering};
use std::thread::JoinHandle;

use parking_lot::Mutex;

use crate::error::{HalError, Result};
use crate::traits::{DriverModule, FingerprintDevice, NotifyFn};
use crate::types::FingerprintMsg;

/// Mock vendor driver module.
///
/// Clones share state, so a test can keep one clone while the registry owns
/// another.
///
/// # Examples
///
/// ```
/// use fingerbridge_hal::mock::MockDriver;
/// use fingerbridge_hal::traits::DriverModule;
///
/// let driver = MockDriver::new("goodix").fail_open(-19);
///
/// assert!(driver.open().is_err());
/// assert_eq!(driver.open_calls(), 1);
/// ```
#[derive(Clone)]
pub struct MockDriver {
    state: Arc<DriverState>,
}

struct DriverState {
    class_name: String,
    has_open_entry: AtomicBool,
    open_status: AtomicI32,
    notify_status: AtomicI32,
    close_status: AtomicI32,
    open_calls: AtomicUsize,
    close_calls: AtomicUsize,
    notify: Mutex<Option<NotifyFn>>,
}

impl MockDriver {
    /// Create a driver that opens, registers and closes successfully.
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            state: Arc::new(DriverState {
                class_name: class_name.into(),
                has_open_entry: AtomicBool::new(true),
                open_status: AtomicI32::new(0),
                notify_status: AtomicI32::new(0),
                close_status: AtomicI32::new(0),
                open_calls: AtomicUsize::new(0),
                close_calls: AtomicUsize::new(0),
                notify: Mutex::new(None),
            }),
        }
    }

    /// Make the module export no open entry point.
    pub fn without_open_entry(self) -> Self {
        self.state.has_open_entry.store(false, Ordering::Release);
        self
    }

    /// Make the open entry point return `status`.
    pub fn fail_open(self, status: i32) -> Self {
        self.state.open_status.store(status, Ordering::Release);
        self
    }

    /// Make callback registration return `status`.
    pub fn fail_notify(self, status: i32) -> Self {
        self.state.notify_status.store(status, Ordering::Release);
        self
    }

    /// Make the close entry point return `status`.
    pub fn fail_close(self, status: i32) -> Self {
        self.state.close_status.store(status, Ordering::Release);
        self
    }

    /// Number of times the open entry point was invoked.
    pub fn open_calls(&self) -> usize {
        self.state.open_calls.load(Ordering::Acquire)
    }

    /// Number of times the close entry point was invoked.
    pub fn close_calls(&self) -> usize {
        self.state.close_calls.load(Ordering::Acquire)
    }

    /// Whether a notification callback is currently registered.
    pub fn is_notify_registered(&self) -> bool {
        self.state.notify.lock().is_some()
    }

    /// Deliver a message through the registered callback on the calling thread.
    ///
    /// Returns `false` if no callback is registered (never opened, or closed).
    pub fn emit(&self, msg: &FingerprintMsg) -> bool {
        // Clone out of the lock so the callback runs unlocked
        let notify = self.state.notify.lock().clone();
        match notify {
            Some(notify) => {
                notify(msg);
                true
            }
            None => false,
        }
    }

    /// Deliver messages from a separate thread, like a vendor driver does.
    ///
    /// The thread returns how many messages reached a registered callback.
    pub fn emit_from_thread(&self, messages: Vec<FingerprintMsg>) -> JoinHandle<usize> {
        let driver = self.clone();
        std::thread::spawn(move || messages.iter().filter(|msg| driver.emit(msg)).count())
    }
}

impl fmt::Debug for MockDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockDriver")
            .field("class_name", &self.state.class_name)
            .field("open_calls", &self.open_calls())
            .field("close_calls", &self.close_calls())
            .field("notify_registered", &self.is_notify_registered())
            .finish()
    }
}

impl DriverModule for MockDriver {
    fn class_name(&self) -> &str {
        &self.state.class_name
    }

    fn has_open_entry(&self) -> bool {
        self.state.has_open_entry.load(Ordering::Acquire)
    }

    fn open(&self) -> Result<Arc<dyn FingerprintDevice>> {
        self.state.open_calls.fetch_add(1, Ordering::AcqRel);

        match self.state.open_status.load(Ordering::Acquire) {
            0 => Ok(Arc::new(MockDevice {
                state: Arc::clone(&self.state),
            })),
            status => Err(HalError::Status(status)),
        }
    }
}

/// Device opened by a [`MockDriver`].
pub struct MockDevice {
    state: Arc<DriverState>,
}

impl fmt::Debug for MockDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockDevice")
            .field("class_name", &self.state.class_name)
            .finish()
    }
}

impl FingerprintDevice for MockDevice {
    fn set_notify(&self, notify: NotifyFn) -> Result<()> {
        match self.state.notify_status.load(Ordering::Acquire) {
            0 => {
                *self.state.notify.lock() = Some(notify);
                Ok(())
            }
            status => Err(HalError::Status(status)),
        }
    }

    fn close(&self) -> Result<()> {
        self.state.close_calls.fetch_add(1, Ordering::AcqRel);
        self.state.notify.lock().take();

        match self.state.close_status.load(Ordering::Acquire) {
            0 => Ok(()),
            status => Err(HalError::Status(status)),
        }
    }
}
