//! Step sensor adapters.

pub mod manual;

pub use manual::ManualStepSensor;
