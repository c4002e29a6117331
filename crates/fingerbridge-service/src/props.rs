//! Sensor capability reporting.

use std::sync::Arc;

use fingerbridge_core::{CommonProps, LocationConfig, SensorConfig, SensorLocation, SensorProps};
use tracing::{error, info};

/// Builds the capability descriptor from configuration.
#[derive(Debug, Clone)]
pub struct SensorPropertyProvider {
    config: Arc<SensorConfig>,
}

impl SensorPropertyProvider {
    pub fn new(config: Arc<SensorConfig>) -> Self {
        Self { config }
    }

    /// Describe every sensor behind this adapter. Always exactly one.
    pub fn sensor_props(&self) -> Vec<SensorProps> {
        let config = &self.config;
        let location = self.sensor_location();

        info!(
            "Sensor type: {}, location: {}",
            config.sensor_type,
            location
                .as_ref()
                .map_or_else(|| "none".to_string(), ToString::to_string)
        );

        vec![SensorProps {
            common_props: CommonProps {
                sensor_id: config.sensor_id,
                sensor_strength: config.sensor_strength,
                max_enrollments_per_user: config.max_enrollments_per_user,
                component_info: config.components.to_vec(),
            },
            sensor_type: config.sensor_type,
            sensor_locations: location.into_iter().collect(),
            supports_navigation_gestures: config.supports_navigation_gestures,
            supports_detect_interaction: config.supports_detect_interaction,
            hal_handles_display_touches: config.hal_handles_display_touches,
            hal_controls_illumination: config.hal_controls_illumination,
        }]
    }

    /// On-screen location, only meaningful for under-display sensors.
    fn sensor_location(&self) -> Option<SensorLocation> {
        let location = if self.config.sensor_type.is_under_display() {
            self.config.location
        } else {
            LocationConfig::UNSET
        };

        let resolved = location.resolve();
        if resolved.is_none() {
            error!(
                "Failed to get sensor location: x {}, y {}, radius {}",
                location.x, location.y, location.radius
            );
        }
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fingerbridge_core::FingerprintSensorType;
    use fingerbridge_core::constants::{HW_COMPONENT_ID, SW_COMPONENT_ID};
    use rstest::rstest;
    use tracing_test::traced_test;

    fn provider(config: SensorConfig) -> SensorPropertyProvider {
        SensorPropertyProvider::new(Arc::new(config))
    }

    #[test]
    fn test_default_config_descriptor() {
        let props = provider(SensorConfig::default()).sensor_props();

        assert_eq!(props.len(), 1);
        let sensor = &props[0];
        assert_eq!(sensor.sensor_type, FingerprintSensorType::Unknown);
        assert!(sensor.sensor_locations.is_empty());
        assert!(!sensor.supports_navigation_gestures);
        assert!(!sensor.supports_detect_interaction);
        assert!(!sensor.hal_handles_display_touches);
        assert!(!sensor.hal_controls_illumination);

        let components = &sensor.common_props.component_info;
        assert_eq!(components.len(), 2);
        assert_eq!(components[0].component_id, HW_COMPONENT_ID);
        assert_eq!(components[1].component_id, SW_COMPONENT_ID);
    }

    #[test]
    fn test_under_display_location() {
        let props = provider(SensorConfig::under_display(540, 1636, 130)).sensor_props();

        assert_eq!(props.len(), 1);
        assert_eq!(
            props[0].location(),
            Some(&SensorLocation {
                sensor_location_x: 540,
                sensor_location_y: 1636,
                sensor_radius: 130,
            })
        );
        assert_eq!(
            props[0].sensor_type,
            FingerprintSensorType::UnderDisplayOptical
        );
    }

    #[rstest]
    #[case(-1, 1636, 130)]
    #[case(540, -1, 130)]
    #[case(540, 1636, -1)]
    fn test_invalid_location_is_omitted(#[case] x: i32, #[case] y: i32, #[case] radius: i32) {
        let props = provider(SensorConfig::under_display(x, y, radius)).sensor_props();

        assert_eq!(props.len(), 1);
        assert!(props[0].location().is_none());
    }

    #[test]
    #[traced_test]
    fn test_invalid_location_is_logged() {
        provider(SensorConfig::under_display(540, -1, 130)).sensor_props();

        assert!(logs_contain("Failed to get sensor location: x 540, y -1, radius 130"));
    }

    #[test]
    fn test_location_ignored_for_rear_sensor() {
        let mut config = SensorConfig::under_display(540, 1636, 130);
        config.sensor_type = FingerprintSensorType::Rear;

        let props = provider(config).sensor_props();
        assert!(props[0].location().is_none());
    }

    #[test]
    #[traced_test]
    fn test_sensor_type_is_logged() {
        provider(SensorConfig::under_display(1, 2, 3)).sensor_props();

        assert!(logs_contain("Sensor type: UNDER_DISPLAY_OPTICAL"));
        assert!(logs_contain("SensorLocation{x: 1, y: 2, radius: 3}"));
    }
}
