//! Session-oriented fingerprint service on top of a legacy driver.
//!
//! This crate adapts a single-callback vendor driver (see
//! [`fingerbridge_hal`]) to a service where clients open one session at a
//! time and receive typed [`SessionEvent`]s.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────── Fingerprint ────────────────────────┐
//! │  SensorPropertyProvider   SessionManager ──► SessionSlot     │
//! │                                                  ▲ (weak)    │
//! │  ModuleLoader ─► DeviceHandle ─► driver ─► CallbackRouter    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use fingerbridge_core::SensorConfig;
//! use fingerbridge_hal::mock::MockRegistry;
//! use fingerbridge_service::{
//!     DeathRecipient, Fingerprint, FingerprintHal, Result, SessionCallback, SessionEvent,
//! };
//!
//! struct Client;
//!
//! impl SessionCallback for Client {
//!     fn on_event(&self, event: SessionEvent) {
//!         println!("{:?}", event);
//!     }
//!
//!     fn link_to_death(&self, _recipient: DeathRecipient) -> Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! let registry = Arc::new(MockRegistry::new().with_healthy(["fpc"]));
//! let hal = Fingerprint::new(SensorConfig::default(), registry).unwrap();
//!
//! let session = hal.create_session(0, 10, Arc::new(Client)).unwrap();
//! assert!(hal.create_session(0, 11, Arc::new(Client)).is_err());
//!
//! session.close();
//! assert!(hal.create_session(0, 12, Arc::new(Client)).is_ok());
//! ```

pub mod adapter;
pub mod callback;
pub mod error;
pub mod lockout;
pub mod manager;
pub mod props;
pub mod router;
pub mod session;
pub mod udfps;

#[cfg(test)]
mod testing;

pub use adapter::{Fingerprint, FingerprintBuilder, FingerprintHal};
pub use callback::{DeathRecipient, SessionCallback, SessionEvent};
pub use error::{Result, ServiceError};
pub use lockout::{LockoutMode, LockoutTracker};
pub use manager::SessionManager;
pub use props::SensorPropertyProvider;
pub use router::{CallbackRouter, SessionSlot};
pub use session::{Session, SessionContext};
pub use udfps::{UdfpsHandler, UdfpsHandlerFactory};
