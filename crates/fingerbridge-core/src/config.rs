//! Sensor configuration.
//!
//! [`SensorConfig`] is resolved once at startup, either from the compiled-in
//! defaults in [`constants`](crate::constants) or from a TOML deployment file.
//! Every field is optional in the file; missing fields keep their defaults.
//!
//! ```
//! use fingerbridge_core::{FingerprintSensorType, SensorConfig};
//!
//! let config = SensorConfig::from_toml_str(r#"
//!     sensor_type = "under_display_optical"
//!
//!     [location]
//!     x = 540
//!     y = 1636
//!     radius = 130
//! "#).unwrap();
//!
//! assert_eq!(config.sensor_type, FingerprintSensorType::UnderDisplayOptical);
//! assert!(config.location.resolve().is_some());
//! assert_eq!(config.max_enrollments_per_user, 7);
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::{
    CANDIDATE_MODULES, FW_VERSION, HW_COMPONENT_ID, HW_VERSION, LOCATION_UNSET,
    MAX_ENROLLMENTS_PER_USER, SENSOR_ID, SERIAL_NUMBER, SUPPORTS_NAVIGATION_GESTURES,
    SW_COMPONENT_ID, SW_VERSION,
};
use crate::error::{Error, Result};
use crate::types::{ComponentInfo, FingerprintSensorType, SensorLocation, SensorStrength};

/// On-screen location triple as configured.
///
/// Negative values mean "not set". The location is only reported when all
/// three values are non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub x: i32,
    pub y: i32,
    pub radius: i32,
}

impl LocationConfig {
    /// A location with every coordinate unset.
    pub const UNSET: Self = Self {
        x: LOCATION_UNSET,
        y: LOCATION_UNSET,
        radius: LOCATION_UNSET,
    };

    pub fn new(x: i32, y: i32, radius: i32) -> Self {
        Self { x, y, radius }
    }

    /// Convert to a descriptor location if all coordinates are non-negative.
    ///
    /// # Examples
    ///
    /// ```
    /// use fingerbridge_core::LocationConfig;
    ///
    /// assert!(LocationConfig::new(540, 1636, 130).resolve().is_some());
    /// assert!(LocationConfig::new(540, -1, 130).resolve().is_none());
    /// ```
    pub fn resolve(&self) -> Option<SensorLocation> {
        (self.x >= 0 && self.y >= 0 && self.radius >= 0).then(|| SensorLocation {
            sensor_location_x: self.x,
            sensor_location_y: self.y,
            sensor_radius: self.radius,
        })
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self::UNSET
    }
}

/// Identity strings of the hardware and software components.
///
/// A table given in the file only overrides the fields it names; the rest
/// keep the built-in record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentConfig {
    #[serde(
        default = "ComponentConfig::default_hardware",
        deserialize_with = "hardware_overrides"
    )]
    pub hardware: ComponentInfo,
    #[serde(
        default = "ComponentConfig::default_software",
        deserialize_with = "software_overrides"
    )]
    pub software: ComponentInfo,
}

impl ComponentConfig {
    /// Both records in reporting order (hardware first).
    pub fn to_vec(&self) -> Vec<ComponentInfo> {
        vec![self.hardware.clone(), self.software.clone()]
    }

    /// Built-in record of the physical sensor.
    pub fn default_hardware() -> ComponentInfo {
        ComponentInfo {
            component_id: HW_COMPONENT_ID.to_string(),
            hardware_version: HW_VERSION.to_string(),
            firmware_version: FW_VERSION.to_string(),
            serial_number: SERIAL_NUMBER.to_string(),
            software_version: String::new(),
        }
    }

    /// Built-in record of the matching algorithm.
    pub fn default_software() -> ComponentInfo {
        ComponentInfo {
            component_id: SW_COMPONENT_ID.to_string(),
            hardware_version: String::new(),
            firmware_version: String::new(),
            serial_number: String::new(),
            software_version: SW_VERSION.to_string(),
        }
    }
}

impl Default for ComponentConfig {
    fn default() -> Self {
        Self {
            hardware: Self::default_hardware(),
            software: Self::default_software(),
        }
    }
}

/// Fields of a component table present in the file.
#[derive(Debug, Default, Deserialize)]
struct ComponentOverrides {
    component_id: Option<String>,
    hardware_version: Option<String>,
    firmware_version: Option<String>,
    serial_number: Option<String>,
    software_version: Option<String>,
}

impl ComponentOverrides {
    fn apply(self, mut base: ComponentInfo) -> ComponentInfo {
        if let Some(value) = self.component_id {
            base.component_id = value;
        }
        if let Some(value) = self.hardware_version {
            base.hardware_version = value;
        }
        if let Some(value) = self.firmware_version {
            base.firmware_version = value;
        }
        if let Some(value) = self.serial_number {
            base.serial_number = value;
        }
        if let Some(value) = self.software_version {
            base.software_version = value;
        }
        base
    }
}

fn hardware_overrides<'de, D>(deserializer: D) -> std::result::Result<ComponentInfo, D::Error>
where
    D: Deserializer<'de>,
{
    ComponentOverrides::deserialize(deserializer)
        .map(|overrides| overrides.apply(ComponentConfig::default_hardware()))
}

fn software_overrides<'de, D>(deserializer: D) -> std::result::Result<ComponentInfo, D::Error>
where
    D: Deserializer<'de>,
{
    ComponentOverrides::deserialize(deserializer)
        .map(|overrides| overrides.apply(ComponentConfig::default_software()))
}

/// Static description of the sensor and its driver candidates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    pub sensor_id: i32,
    pub sensor_strength: SensorStrength,
    pub sensor_type: FingerprintSensorType,
    pub max_enrollments_per_user: i32,
    pub supports_navigation_gestures: bool,
    pub supports_detect_interaction: bool,
    pub hal_handles_display_touches: bool,
    pub hal_controls_illumination: bool,
    pub location: LocationConfig,
    pub components: ComponentConfig,
    /// Driver classes in discovery order.
    pub candidate_modules: Vec<String>,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            sensor_id: SENSOR_ID,
            sensor_strength: SensorStrength::Strong,
            sensor_type: FingerprintSensorType::Unknown,
            max_enrollments_per_user: MAX_ENROLLMENTS_PER_USER,
            supports_navigation_gestures: SUPPORTS_NAVIGATION_GESTURES,
            supports_detect_interaction: false,
            hal_handles_display_touches: false,
            hal_controls_illumination: false,
            location: LocationConfig::UNSET,
            components: ComponentConfig::default(),
            candidate_modules: CANDIDATE_MODULES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl SensorConfig {
    /// Configuration for an under-display optical sensor at the given location.
    ///
    /// # Examples
    ///
    /// ```
    /// use fingerbridge_core::SensorConfig;
    ///
    /// let config = SensorConfig::under_display(540, 1636, 130);
    /// assert!(config.sensor_type.is_under_display());
    /// ```
    pub fn under_display(x: i32, y: i32, radius: i32) -> Self {
        Self {
            sensor_type: FingerprintSensorType::UnderDisplayOptical,
            location: LocationConfig::new(x, y, radius),
            ..Self::default()
        }
    }

    /// Replace the driver candidate list.
    pub fn with_candidates<I, S>(mut self, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.candidate_modules = candidates.into_iter().map(Into::into).collect();
        self
    }

    /// Parse and validate a TOML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid TOML, has fields of the
    /// wrong type, or fails [`validate`](Self::validate).
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or
    /// [`from_toml_str`](Self::from_toml_str) fails.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Check the values a well-formed document can still get wrong.
    ///
    /// # Errors
    ///
    /// Returns an error if the candidate list is empty, holds an empty name
    /// or names a class twice, or if the sensor id or enrollment limit is
    /// out of range.
    pub fn validate(&self) -> Result<()> {
        if self.candidate_modules.is_empty() {
            return Err(Error::invalid_config(
                "candidate_modules",
                "at least one driver class is required",
            ));
        }
        if self.candidate_modules.iter().any(|c| c.trim().is_empty()) {
            return Err(Error::invalid_config(
                "candidate_modules",
                "driver class names must not be empty",
            ));
        }
        let mut seen = HashSet::new();
        if let Some(duplicate) = self
            .candidate_modules
            .iter()
            .find(|c| !seen.insert(c.as_str()))
        {
            return Err(Error::invalid_config(
                "candidate_modules",
                format!("driver class {} is listed more than once", duplicate),
            ));
        }
        if self.sensor_id < 0 {
            return Err(Error::invalid_config(
                "sensor_id",
                format!("must be non-negative, got {}", self.sensor_id),
            ));
        }
        if self.max_enrollments_per_user <= 0 {
            return Err(Error::invalid_config(
                "max_enrollments_per_user",
                format!("must be positive, got {}", self.max_enrollments_per_user),
            ));
        }
        Ok(())
    }
}
