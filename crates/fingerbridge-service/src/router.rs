//! Driver callback routing.
//!
//! The vendor driver accepts exactly one notification callback for the
//! lifetime of the device, but sessions come and go. The [`CallbackRouter`]
//! is that one callback: it looks up the current session in the adapter's
//! [`SessionSlot`] and forwards each message to it, or drops the message if
//! no session is active.
//!
//! The router holds the slot weakly. Sessions hold the device, the device
//! holds the router, so a strong reference here would keep every session
//! alive forever.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use fingerbridge_hal::{FingerprintMsg, NotifyFn};
use parking_lot::{Mutex, MutexGuard};
use tracing::warn;

use crate::session::Session;

/// Holder of the adapter's current session.
#[derive(Default)]
pub struct SessionSlot {
    current: Mutex<Option<Arc<Session>>>,
}

impl SessionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracked session, open or not.
    pub fn current(&self) -> Option<Arc<Session>> {
        self.current.lock().clone()
    }

    /// Tracked session, if it is still open.
    pub fn active(&self) -> Option<Arc<Session>> {
        self.current().filter(|session| !session.is_closed())
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, Option<Arc<Session>>> {
        self.current.lock()
    }
}

impl fmt::Debug for SessionSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionSlot")
            .field("current", &*self.current.lock())
            .finish()
    }
}

/// The single callback registered with the driver.
pub struct CallbackRouter {
    slot: Weak<SessionSlot>,
    routed: AtomicU64,
    dropped: AtomicU64,
}

impl CallbackRouter {
    pub fn new(slot: Weak<SessionSlot>) -> Self {
        Self {
            slot,
            routed: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
        }
    }

    /// Forward `msg` to the active session, or drop it.
    ///
    /// Never buffers. The slot lock is released before the session runs.
    pub fn notify(&self, msg: &FingerprintMsg) {
        let Some(slot) = self.slot.upgrade() else {
            self.drop_orphan(msg, "adapter is gone");
            return;
        };

        let Some(session) = slot.active() else {
            self.drop_orphan(msg, "no open session");
            return;
        };

        self.routed.fetch_add(1, Ordering::Relaxed);
        session.notify(msg);
    }

    /// Wrap this router as a driver callback.
    pub fn notify_fn(self: &Arc<Self>) -> NotifyFn {
        let router = Arc::clone(self);
        Arc::new(move |msg: &FingerprintMsg| router.notify(msg))
    }

    /// Messages forwarded to a session so far.
    pub fn routed(&self) -> u64 {
        self.routed.load(Ordering::Relaxed)
    }

    /// Messages dropped because no session was active.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    fn drop_orphan(&self, msg: &FingerprintMsg, reason: &str) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
        warn!(
            "Receiving callbacks before a session is opened ({}), dropping {} message",
            reason,
            msg.kind()
        );
    }
}

impl fmt::Debug for CallbackRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackRouter")
            .field("routed", &self.routed())
            .field("dropped", &self.dropped())
            .finish_non_exhaustive()
    }
}
