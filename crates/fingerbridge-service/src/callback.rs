//! Client-facing callback contract.
//!
//! A client hands the adapter a [`SessionCallback`] when it opens a session.
//! The session reports everything that happens on the sensor through
//! [`SessionCallback::on_event`], and registers a death recipient so it can
//! close itself if the client process disappears.

use fingerbridge_hal::{AcquiredInfo, DriverErrorCode};
use serde::Serialize;

use crate::error::Result;

/// Invoked once when the client behind a callback dies.
pub type DeathRecipient = Box<dyn FnOnce() + Send>;

/// Event delivered to the client of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
#[non_exhaustive]
pub enum SessionEvent {
    /// Sensor feedback while a finger is present.
    Acquired { info: AcquiredInfo },

    /// The current operation failed.
    Error { code: DriverErrorCode },

    /// One enrollment sample accepted.
    EnrollmentProgress { enrollment_id: u32, remaining: u32 },

    /// A finger matched an enrollment.
    AuthenticationSucceeded { enrollment_id: u32, hat: Vec<u8> },

    /// A finger was rejected.
    AuthenticationFailed,

    /// Too many failures; authentication is blocked for a while.
    LockoutTimed { duration_ms: i64 },

    /// Too many failures; authentication is blocked until reset.
    LockoutPermanent,

    /// A previous lockout no longer applies.
    LockoutCleared,

    /// Complete list of enrollments for the session's user.
    EnrollmentsEnumerated { enrollment_ids: Vec<u32> },

    /// Enrollments removed by the last removal request.
    EnrollmentsRemoved { enrollment_ids: Vec<u32> },

    /// The session is closed and will deliver nothing more.
    SessionClosed,
}

/// Callback interface implemented by session clients.
///
/// Events may be delivered from the driver's own thread. Implementations
/// must return quickly and must not call back into the adapter.
pub trait SessionCallback: Send + Sync {
    /// Deliver one event.
    fn on_event(&self, event: SessionEvent);

    /// Ask to be told when the client dies.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::DeadClient`](crate::ServiceError::DeadClient)
    /// if the client is already gone; the recipient is then dropped unused.
    fn link_to_death(&self, recipient: DeathRecipient) -> Result<()>;
}
