//! Authentication lockout tracking.
//!
//! One [`LockoutTracker`] exists per adapter and is shared by every session
//! it opens, so failed attempts carry over when a client reconnects.
//!
//! Default policy: every [`MAX_FAILED_ATTEMPTS_BEFORE_TIMED_LOCKOUT`]
//! consecutive failures start a timed lockout of
//! [`TIMED_LOCKOUT_DURATION_MS`]; reaching
//! [`MAX_FAILED_ATTEMPTS_BEFORE_PERMANENT_LOCKOUT`] locks out until
//! [`reset`](LockoutTracker::reset).

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;
use serde::Serialize;

/// Consecutive failures that trigger each timed lockout.
pub const MAX_FAILED_ATTEMPTS_BEFORE_TIMED_LOCKOUT: u32 = 5;

/// Consecutive failures that trigger a permanent lockout.
pub const MAX_FAILED_ATTEMPTS_BEFORE_PERMANENT_LOCKOUT: u32 = 20;

/// Duration of a timed lockout.
pub const TIMED_LOCKOUT_DURATION_MS: i64 = 30_000;

type Clock = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Current lockout state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LockoutMode {
    None,
    Timed,
    Permanent,
}

#[derive(Debug, Default)]
struct LockoutState {
    failed_attempts: u32,
    locked_until: Option<DateTime<Utc>>,
}

/// Failed-attempt counter shared across the sessions of one adapter.
///
/// # Examples
///
/// ```
/// use fingerbridge_service::lockout::{LockoutMode, LockoutTracker};
///
/// let tracker = LockoutTracker::new();
/// for _ in 0..5 {
///     tracker.add_failed_attempt();
/// }
/// assert_eq!(tracker.mode(), LockoutMode::Timed);
///
/// tracker.reset();
/// assert_eq!(tracker.mode(), LockoutMode::None);
/// ```
pub struct LockoutTracker {
    state: Mutex<LockoutState>,
    clock: Clock,
}

impl LockoutTracker {
    /// Create a tracker using the system clock.
    pub fn new() -> Self {
        Self::with_clock(Utc::now)
    }

    /// Create a tracker with a custom time source.
    pub fn with_clock(clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        Self {
            state: Mutex::new(LockoutState::default()),
            clock: Box::new(clock),
        }
    }

    /// Record a rejected authentication.
    pub fn add_failed_attempt(&self) {
        let now = (self.clock)();
        let mut state = self.state.lock();

        state.failed_attempts = state.failed_attempts.saturating_add(1);
        if state.failed_attempts < MAX_FAILED_ATTEMPTS_BEFORE_PERMANENT_LOCKOUT
            && state.failed_attempts % MAX_FAILED_ATTEMPTS_BEFORE_TIMED_LOCKOUT == 0
        {
            state.locked_until = Some(now + TimeDelta::milliseconds(TIMED_LOCKOUT_DURATION_MS));
        }
    }

    /// Forget all failures, e.g. after a successful authentication.
    pub fn reset(&self) {
        *self.state.lock() = LockoutState::default();
    }

    /// Consecutive failures since the last reset.
    pub fn failed_attempts(&self) -> u32 {
        self.state.lock().failed_attempts
    }

    /// Current lockout mode.
    pub fn mode(&self) -> LockoutMode {
        let now = (self.clock)();
        let state = self.state.lock();

        if state.failed_attempts >= MAX_FAILED_ATTEMPTS_BEFORE_PERMANENT_LOCKOUT {
            LockoutMode::Permanent
        } else if state.locked_until.is_some_and(|until| now < until) {
            LockoutMode::Timed
        } else {
            LockoutMode::None
        }
    }

    /// Time left in a timed lockout, if one is active.
    pub fn remaining_lockout(&self) -> Option<TimeDelta> {
        let now = (self.clock)();
        let state = self.state.lock();

        if state.failed_attempts >= MAX_FAILED_ATTEMPTS_BEFORE_PERMANENT_LOCKOUT {
            return None;
        }
        state
            .locked_until
            .map(|until| until - now)
            .filter(|remaining| *remaining > TimeDelta::zero())
    }
}

impl Default for LockoutTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LockoutTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockoutTracker")
            .field("state", &*self.state.lock())
            .finish_non_exhaustive()
    }
}
