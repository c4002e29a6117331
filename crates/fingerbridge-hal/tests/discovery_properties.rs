//! Property-based tests for driver discovery order.
//!
//! These tests generate random candidate lists with random failure modes and
//! verify that the loader walks them strictly in order, stops at the first
//! working driver, and never touches a candidate twice.

use std::sync::Arc;

use fingerbridge_hal::mock::{MockDriver, MockRegistry};
use fingerbridge_hal::{FingerprintMsg, HalError, ModuleLoader, NotifyFn};
use proptest::prelude::*;

/// How a generated candidate behaves when the loader reaches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Behavior {
    Works,
    Missing,
    NoOpenEntry,
    OpenFails,
    NotifyFails,
}

/// Strategy for generating a single candidate behavior.
fn behavior() -> impl Strategy<Value = Behavior> {
    prop_oneof![
        Just(Behavior::Works),
        Just(Behavior::Missing),
        Just(Behavior::NoOpenEntry),
        Just(Behavior::OpenFails),
        Just(Behavior::NotifyFails),
    ]
}

/// Build a registry with one driver per behavior, named `c0`, `c1`, ...
fn registry_for(behaviors: &[Behavior]) -> (Arc<MockRegistry>, Vec<String>) {
    let names: Vec<String> = (0..behaviors.len()).map(|i| format!("c{}", i)).collect();

    let registry = behaviors
        .iter()
        .zip(&names)
        .fold(MockRegistry::new(), |registry, (behavior, name)| {
            match behavior {
                Behavior::Works => registry.with_driver(MockDriver::new(name.as_str())),
                Behavior::Missing => registry,
                Behavior::NoOpenEntry => {
                    registry.with_driver(MockDriver::new(name.as_str()).without_open_entry())
                }
                Behavior::OpenFails => {
                    registry.with_driver(MockDriver::new(name.as_str()).fail_open(-19))
                }
                Behavior::NotifyFails => {
                    registry.with_driver(MockDriver::new(name.as_str()).fail_notify(-22))
                }
            }
        });

    (Arc::new(registry), names)
}

fn noop_notify() -> NotifyFn {
    Arc::new(|_msg: &FingerprintMsg| {})
}

proptest! {
    /// Property: success at index i implies 0..i were attempted, in order, and failed.
    #[test]
    fn prop_discovery_is_ordered_priority_fallback(
        behaviors in prop::collection::vec(behavior(), 0..10)
    ) {
        let (registry, names) = registry_for(&behaviors);
        let loader = ModuleLoader::new(registry.clone(), names.clone());

        let result = loader.discover(noop_notify());
        let first_working = behaviors.iter().position(|b| *b == Behavior::Works);

        match first_working {
            Some(index) => {
                let handle = result.unwrap();
                prop_assert_eq!(handle.class_name(), names[index].as_str());
                prop_assert_eq!(registry.resolve_log(), names[..=index].to_vec());
            }
            None => {
                prop_assert_eq!(result.unwrap_err(), HalError::no_module_available(names.len()));
                prop_assert_eq!(registry.resolve_log(), names.clone());
            }
        }
    }

    /// Property: every installed driver is opened at most once per discovery.
    #[test]
    fn prop_candidates_opened_at_most_once(
        behaviors in prop::collection::vec(behavior(), 1..10)
    ) {
        let (registry, names) = registry_for(&behaviors);
        let loader = ModuleLoader::new(registry.clone(), names.clone());

        let _ = loader.discover(noop_notify());

        for name in &names {
            if let Some(driver) = registry.driver(name) {
                prop_assert!(driver.open_calls() <= 1);
            }
        }
    }

    /// Property: only the bound driver keeps a registered callback.
    #[test]
    fn prop_only_bound_driver_is_notified(
        behaviors in prop::collection::vec(behavior(), 1..10)
    ) {
        let (registry, names) = registry_for(&behaviors);
        let loader = ModuleLoader::new(registry.clone(), names.clone());

        let bound = loader.discover(noop_notify()).ok().map(|h| h.class_name().to_string());

        for name in &names {
            if let Some(driver) = registry.driver(name) {
                let expected = bound.as_deref() == Some(name.as_str());
                prop_assert_eq!(driver.is_notify_registered(), expected);
            }
        }
    }
}
