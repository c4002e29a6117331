//! Mock driver implementations for testing and development.
//!
//! This module provides a simulated driver registry and vendor drivers that
//! can be controlled programmatically without requiring physical hardware.

pub mod driver;
pub mod registry;

// Re-export commonly used types
pub use driver::{MockDevice, MockDriver};
pub use registry::MockRegistry;
