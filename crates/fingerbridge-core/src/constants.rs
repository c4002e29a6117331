//! Build-time constants for the fingerprint adapter.
//!
//! This module centralizes the values that describe the sensor to clients and
//! the vendor driver modules the loader is allowed to bind to. They form the
//! defaults of [`SensorConfig`](crate::config::SensorConfig); a deployment
//! configuration file may override any of them at startup.
//!
//! # Usage
//!
//! ```
//! use fingerbridge_core::constants::*;
//!
//! // Driver discovery order
//! assert_eq!(CANDIDATE_MODULES.first(), Some(&"fpc"));
//!
//! // Sensor identity
//! assert_eq!(SENSOR_ID, 0);
//! assert_eq!(MAX_ENROLLMENTS_PER_USER, 7);
//! ```

// ============================================================================
// Driver Discovery
// ============================================================================

/// Vendor driver classes, in the order the loader tries them.
///
/// The first class that resolves, opens, and accepts the notification
/// callback wins. Classes are never retried after a failure.
///
/// # Examples
///
/// ```
/// use fingerbridge_core::constants::CANDIDATE_MODULES;
///
/// let goodix = CANDIDATE_MODULES.iter().position(|c| *c == "goodix").unwrap();
/// let silead = CANDIDATE_MODULES.iter().position(|c| *c == "silead").unwrap();
/// assert!(goodix < silead);
/// ```
pub const CANDIDATE_MODULES: &[&str] = &[
    "fpc",
    "fpc_fod",
    "goodix",
    "goodix_fod",
    "goodix_fod6",
    "silead",
    "syna",
];

// ============================================================================
// Sensor Identity
// ============================================================================

/// Identifier of the single sensor exposed by an adapter.
pub const SENSOR_ID: i32 = 0;

/// Maximum number of enrolled fingers per user.
pub const MAX_ENROLLMENTS_PER_USER: i32 = 7;

/// Whether the sensor reports navigation gestures.
pub const SUPPORTS_NAVIGATION_GESTURES: bool = false;

// ============================================================================
// Component Information
// ============================================================================

/// Component id of the physical sensor.
pub const HW_COMPONENT_ID: &str = "fingerprintSensor";

/// Hardware version string of the physical sensor.
pub const HW_VERSION: &str = "vendor/model/revision";

/// Firmware version of the physical sensor.
pub const FW_VERSION: &str = "1.01";

/// Serial number of the physical sensor.
pub const SERIAL_NUMBER: &str = "00000001";

/// Component id of the matching algorithm.
pub const SW_COMPONENT_ID: &str = "matchingAlgorithm";

/// Software version of the matching algorithm.
pub const SW_VERSION: &str = "vendor/version/revision";

// ============================================================================
// Sensor Location
// ============================================================================

/// Coordinate value meaning "not configured".
///
/// Any negative coordinate disables the location entry of the descriptor.
pub const LOCATION_UNSET: i32 = -1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_modules_are_unique() {
        let mut sorted = CANDIDATE_MODULES.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), CANDIDATE_MODULES.len());
    }

    #[test]
    fn test_candidate_modules_order() {
        assert_eq!(
            CANDIDATE_MODULES,
            &["fpc", "fpc_fod", "goodix", "goodix_fod", "goodix_fod6", "silead", "syna"]
        );
    }

    #[test]
    fn test_location_unset_is_negative() {
        assert!(LOCATION_UNSET < 0);
    }
}
