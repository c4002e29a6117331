//! Single-session lifecycle.
//!
//! At most one session is open per adapter. A new session may be created
//! once the previous one reports closed; its slot entry is simply replaced.

use std::sync::Arc;

use fingerbridge_core::{SensorId, UserId};
use tracing::{debug, error, info, warn};

use crate::callback::SessionCallback;
use crate::error::{Result, ServiceError};
use crate::router::SessionSlot;
use crate::session::{Session, SessionContext};

/// Creates sessions and tracks the current one.
#[derive(Debug)]
pub struct SessionManager {
    slot: Arc<SessionSlot>,
    context: SessionContext,
}

impl SessionManager {
    pub fn new(slot: Arc<SessionSlot>, context: SessionContext) -> Self {
        Self { slot, context }
    }

    /// Open a session for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::SessionAlreadyOpen`] if the tracked session
    /// is still open. The tracked session is left untouched.
    pub fn create_session(
        &self,
        sensor_id: SensorId,
        user_id: UserId,
        callback: Arc<dyn SessionCallback>,
    ) -> Result<Arc<Session>> {
        let session = {
            let mut current = self.slot.lock();

            if let Some(existing) = current.as_ref().filter(|s| !s.is_closed()) {
                error!("Open session already exists! session {}", existing.id());
                return Err(ServiceError::session_already_open(existing.id()));
            }

            let session = Arc::new(Session::new(
                self.context.clone(),
                sensor_id,
                user_id,
                callback,
            ));
            *current = Some(Arc::clone(&session));
            session
        };

        if let Err(e) = session.link_to_death() {
            warn!("Can't link to death for session {}: {}", session.id(), e);
        }

        info!(
            "Created session {} (sensor {}, user {})",
            session.id(),
            sensor_id,
            user_id
        );
        Ok(session)
    }

    /// Tracked session, if it is still open.
    pub fn active_session(&self) -> Option<Arc<Session>> {
        self.slot.active()
    }

    /// Untrack the current session and close it.
    ///
    /// Driver messages arriving afterwards find an empty slot and are
    /// dropped by the router.
    pub(crate) fn close_active(&self) {
        let session = self.slot.lock().take();
        if let Some(session) = session {
            debug!("Closing session {} on shutdown", session.id());
            session.close();
        }
    }
}
