//! Sensor capability descriptor types.
//!
//! These mirror the records a fingerprint service reports to its clients:
//! the common biometric properties, component information, sensor type and
//! location, and the fixed capability flags.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sensor identifier as used on the request surface.
pub type SensorId = i32;

/// Android-style user identifier.
pub type UserId = i32;

/// Strength class of a biometric sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorStrength {
    Convenience,
    Weak,
    Strong,
}

/// Physical kind of fingerprint sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FingerprintSensorType {
    #[default]
    Unknown,
    Rear,
    UnderDisplayUltrasonic,
    UnderDisplayOptical,
    PowerButton,
    HomeButton,
}

impl FingerprintSensorType {
    /// Whether the sensor sits under the display and needs an overlay handler.
    pub fn is_under_display(&self) -> bool {
        matches!(
            self,
            Self::UnderDisplayOptical | Self::UnderDisplayUltrasonic
        )
    }
}

impl fmt::Display for FingerprintSensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unknown => "UNKNOWN",
            Self::Rear => "REAR",
            Self::UnderDisplayUltrasonic => "UNDER_DISPLAY_ULTRASONIC",
            Self::UnderDisplayOptical => "UNDER_DISPLAY_OPTICAL",
            Self::PowerButton => "POWER_BUTTON",
            Self::HomeButton => "HOME_BUTTON",
        };
        f.write_str(name)
    }
}

/// Version information about one hardware or software component.
///
/// Fields that do not apply to a component are left empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentInfo {
    pub component_id: String,
    pub hardware_version: String,
    pub firmware_version: String,
    pub serial_number: String,
    pub software_version: String,
}

/// Properties shared by every biometric modality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonProps {
    pub sensor_id: SensorId,
    pub sensor_strength: SensorStrength,
    pub max_enrollments_per_user: i32,
    pub component_info: Vec<ComponentInfo>,
}

/// Location of an under-display sensor, in display pixels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorLocation {
    pub sensor_location_x: i32,
    pub sensor_location_y: i32,
    pub sensor_radius: i32,
}

impl fmt::Display for SensorLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SensorLocation{{x: {}, y: {}, radius: {}}}",
            self.sensor_location_x, self.sensor_location_y, self.sensor_radius
        )
    }
}

/// Complete capability descriptor of one fingerprint sensor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorProps {
    pub common_props: CommonProps,
    pub sensor_type: FingerprintSensorType,
    /// Empty when the sensor has no valid on-screen location.
    pub sensor_locations: Vec<SensorLocation>,
    pub supports_navigation_gestures: bool,
    pub supports_detect_interaction: bool,
    pub hal_handles_display_touches: bool,
    pub hal_controls_illumination: bool,
}

impl SensorProps {
    /// First configured location, if any.
    pub fn location(&self) -> Option<&SensorLocation> {
        self.sensor_locations.first()
    }
}
