//! Client session.
//!
//! A [`Session`] binds one client callback to the opened device for one
//! user. It translates raw driver messages into [`SessionEvent`]s and keeps
//! the shared lockout tracker up to date.
//!
//! ```text
//! driver thread ──► CallbackRouter ──► Session::notify ──► SessionCallback
//!                                          │
//!                                          ├─► LockoutTracker
//!                                          └─► UdfpsHandler (acquired only)
//!
//! client touch ──► Session::on_pointer_down/up ──► UdfpsHandler
//! ```
//!
//! Closing is cooperative: [`close`](Session::close) flips an atomic flag,
//! after which the router stops forwarding and the manager may open a new
//! session.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use fingerbridge_core::{SensorId, UserId};
use fingerbridge_hal::{DeviceHandle, Finger, FingerprintMsg};
use parking_lot::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::callback::{SessionCallback, SessionEvent};
use crate::error::Result;
use crate::lockout::{LockoutMode, LockoutTracker};
use crate::udfps::UdfpsHandler;

/// Adapter-wide resources every session is bound to.
#[derive(Clone)]
pub struct SessionContext {
    pub(crate) device: DeviceHandle,
    pub(crate) lockout: Arc<LockoutTracker>,
    pub(crate) udfps: Option<Arc<dyn UdfpsHandler>>,
}

impl SessionContext {
    pub fn new(
        device: DeviceHandle,
        lockout: Arc<LockoutTracker>,
        udfps: Option<Arc<dyn UdfpsHandler>>,
    ) -> Self {
        Self {
            device,
            lockout,
            udfps,
        }
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("device", &self.device.class_name())
            .field("udfps", &self.udfps.is_some())
            .finish_non_exhaustive()
    }
}

/// One client's view of the sensor.
pub struct Session {
    id: Uuid,
    sensor_id: SensorId,
    user_id: UserId,
    context: SessionContext,
    callback: Arc<dyn SessionCallback>,
    closed: AtomicBool,
    enumerated: Mutex<Vec<u32>>,
    removed: Mutex<Vec<u32>>,
}

impl Session {
    pub fn new(
        context: SessionContext,
        sensor_id: SensorId,
        user_id: UserId,
        callback: Arc<dyn SessionCallback>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            sensor_id,
            user_id,
            context,
            callback,
            closed: AtomicBool::new(false),
            enumerated: Mutex::new(Vec::new()),
            removed: Mutex::new(Vec::new()),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn sensor_id(&self) -> SensorId {
        self.sensor_id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Device this session is bound to.
    pub fn device(&self) -> &DeviceHandle {
        &self.context.device
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Close the session.
    ///
    /// Idempotent. Only the first call emits [`SessionEvent::SessionClosed`].
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }

        info!(
            "Session {} closed (sensor {}, user {})",
            self.id, self.sensor_id, self.user_id
        );
        if let Some(udfps) = &self.context.udfps {
            udfps.cancel();
        }
        self.enumerated.lock().clear();
        self.removed.lock().clear();
        self.callback.on_event(SessionEvent::SessionClosed);
    }

    /// Close the session when the client process dies.
    ///
    /// The death recipient holds only a weak reference, so a linked client
    /// does not keep the session alive.
    ///
    /// # Errors
    ///
    /// Returns whatever the callback reports, typically
    /// [`ServiceError::DeadClient`](crate::ServiceError::DeadClient).
    pub fn link_to_death(self: &Arc<Self>) -> Result<()> {
        let session = Arc::downgrade(self);
        self.callback.link_to_death(Box::new(move || {
            if let Some(session) = session.upgrade() {
                warn!("Client of session {} died", session.id());
                session.close();
            }
        }))
    }

    /// Forward a touch on the under-display sensor area.
    ///
    /// Ignored after close or when the adapter has no UDFPS handler.
    pub fn on_pointer_down(&self, x: u32, y: u32, minor: f32, major: f32) {
        if self.is_closed() {
            debug!("Session {} is closed, ignoring pointer down", self.id);
            return;
        }
        if let Some(udfps) = &self.context.udfps {
            udfps.on_finger_down(x, y, minor, major);
        }
    }

    pub fn on_pointer_up(&self) {
        if self.is_closed() {
            debug!("Session {} is closed, ignoring pointer up", self.id);
            return;
        }
        if let Some(udfps) = &self.context.udfps {
            udfps.on_finger_up();
        }
    }

    /// Handle one driver message.
    ///
    /// Runs on the driver's thread. Messages arriving after close are
    /// dropped.
    pub fn notify(&self, msg: &FingerprintMsg) {
        if self.is_closed() {
            debug!(
                "Session {} is closed, ignoring {} message",
                self.id,
                msg.kind()
            );
            return;
        }

        match msg {
            FingerprintMsg::Error(code) => {
                debug!("Session {} error {:?}", self.id, code);
                self.emit(SessionEvent::Error { code: *code });
            }
            FingerprintMsg::Acquired(info) => {
                if let Some(udfps) = &self.context.udfps {
                    udfps.on_acquired(*info);
                }
                self.emit(SessionEvent::Acquired { info: *info });
            }
            FingerprintMsg::TemplateEnrolling {
                finger,
                samples_remaining,
            } => {
                self.emit(SessionEvent::EnrollmentProgress {
                    enrollment_id: finger.fid,
                    remaining: *samples_remaining,
                });
            }
            FingerprintMsg::Authenticated { finger, hat } => {
                self.on_authenticated(finger, hat);
            }
            FingerprintMsg::TemplateEnumerating {
                finger,
                remaining_templates,
            } => {
                if let Some(ids) = collect_page(&self.enumerated, finger, *remaining_templates) {
                    self.emit(SessionEvent::EnrollmentsEnumerated {
                        enrollment_ids: ids,
                    });
                }
            }
            FingerprintMsg::TemplateRemoved {
                finger,
                remaining_templates,
            } => {
                if let Some(ids) = collect_page(&self.removed, finger, *remaining_templates) {
                    self.emit(SessionEvent::EnrollmentsRemoved {
                        enrollment_ids: ids,
                    });
                }
            }
            other => {
                warn!("Session {} got unsupported message {}", self.id, other.kind());
            }
        }
    }

    fn on_authenticated(&self, finger: &Finger, hat: &[u8]) {
        let lockout = &self.context.lockout;

        if finger.is_match() {
            let was_locked = lockout.mode() != LockoutMode::None;
            lockout.reset();
            self.emit(SessionEvent::AuthenticationSucceeded {
                enrollment_id: finger.fid,
                hat: hat.to_vec(),
            });
            if was_locked {
                self.emit(SessionEvent::LockoutCleared);
            }
            return;
        }

        lockout.add_failed_attempt();
        self.emit(SessionEvent::AuthenticationFailed);

        match lockout.mode() {
            LockoutMode::None => {}
            LockoutMode::Timed => {
                let duration_ms = lockout
                    .remaining_lockout()
                    .map(|remaining| remaining.num_milliseconds())
                    .unwrap_or_default();
                info!("Timed lockout for {} ms", duration_ms);
                self.emit(SessionEvent::LockoutTimed { duration_ms });
            }
            LockoutMode::Permanent => {
                info!("Permanent lockout");
                self.emit(SessionEvent::LockoutPermanent);
            }
        }
    }

    fn emit(&self, event: SessionEvent) {
        self.callback.on_event(event);
    }
}

/// Accumulate one page of a paged template listing.
///
/// Returns the complete list once the driver reports nothing remaining.
/// A zero finger id marks an empty listing and is not recorded.
fn collect_page(pending: &Mutex<Vec<u32>>, finger: &Finger, remaining: u32) -> Option<Vec<u32>> {
    let mut pending = pending.lock();
    if finger.fid != 0 {
        pending.push(finger.fid);
    }
    (remaining == 0).then(|| std::mem::take(&mut *pending))
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("sensor_id", &self.sensor_id)
            .field("user_id", &self.user_id)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}
