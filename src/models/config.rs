//! XML vocabulary for the simulator platform being targeted.
//!
//! The diff engine itself is platform-agnostic; which element/attribute holds
//! the swarm population, the arena shape, or a noise level is domain data fed
//! in from the main configuration, not logic. The `Default` impl carries the
//! ARGoS-shaped vocabulary.

use serde::{Deserialize, Serialize};

/// One element attribute in the experiment template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XmlTarget {
    pub path: String,
    pub attr: String,
}

impl XmlTarget {
    pub fn new(path: impl Into<String>, attr: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            attr: attr.into(),
        }
    }
}

/// An attribute carrying a noise model parameter, with the range it may be
/// swept over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseTarget {
    pub target: XmlTarget,
    pub min: f64,
    pub max: f64,
}

impl NoiseTarget {
    pub fn new(target: XmlTarget, min: f64, max: f64) -> Self {
        Self { target, min, max }
    }
}

/// Where batch criteria write their variations in the experiment template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Attribute holding the number of spawned robots.
    pub population: XmlTarget,
    /// Attribute holding the arena dimensions.
    pub arena_shape: XmlTarget,
    /// Sensor noise model parameters.
    pub sensor_noise: Vec<NoiseTarget>,
    /// Actuator noise model parameters.
    pub actuator_noise: Vec<NoiseTarget>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            population: XmlTarget::new(".//arena/distribute/entity", "quantity"),
            arena_shape: XmlTarget::new(".//arena", "size"),
            sensor_noise: vec![NoiseTarget::new(
                XmlTarget::new(".//sensors/proximity", "noise_level"),
                0.0,
                0.1,
            )],
            actuator_noise: vec![NoiseTarget::new(
                XmlTarget::new(".//actuators/differential_steering", "noise_factor"),
                0.0,
                0.1,
            )],
        }
    }
}
