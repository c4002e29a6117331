//! Under-display sensor (UDFPS) handler contract.
//!
//! Devices with an under-display sensor usually need vendor glue that talks
//! to the display: dimming layers, illumination, touch routing. That glue is
//! provided by a [`UdfpsHandlerFactory`] at adapter construction and lives
//! exactly as long as the adapter.

use std::sync::Arc;

use fingerbridge_hal::{AcquiredInfo, DeviceHandle};

/// Vendor hooks for an under-display sensor.
pub trait UdfpsHandler: Send + Sync {
    /// Bind to the opened device. Called once, right after discovery.
    fn init(&self, device: &DeviceHandle);

    /// Acquisition feedback from the active session.
    fn on_acquired(&self, _info: AcquiredInfo) {}

    /// Touch landed on the sensor area, in display coordinates.
    fn on_finger_down(&self, _x: u32, _y: u32, _minor: f32, _major: f32) {}

    fn on_finger_up(&self) {}

    /// The session the touch belonged to went away.
    fn cancel(&self) {}
}

/// Creates and destroys [`UdfpsHandler`]s.
pub trait UdfpsHandlerFactory: Send + Sync {
    /// Create a handler, or `None` if this device has no vendor glue.
    fn create(&self) -> Option<Arc<dyn UdfpsHandler>>;

    /// Release a handler created by [`create`](Self::create).
    fn destroy(&self, handler: Arc<dyn UdfpsHandler>);
}
