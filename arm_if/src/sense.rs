//! # Sensing Types

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ctrl::ArmState;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// IDs of all sensors available on the manipulator
#[derive(Serialize, Deserialize, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Copy, Clone)]
pub enum SensId {
    /// Proximity sensor looking along the gripper axis
    Distance,

    /// Position sensor on the first wrist joint
    WristPosition,
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A snapshot of the manipulator's perception at a single control cycle.
///
/// Immutable once constructed. A reading of `None` means the corresponding
/// sensor device is unavailable.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PerceptionSnapshot {
    /// The controller's operating state at the time of the snapshot
    pub state: ArmState,

    /// Current value of each sensor
    pub readings: SensorReadings,
}

// ------------------------------------------------------------------------------------------------
// TYPES
// ------------------------------------------------------------------------------------------------

/// Current value of each sensor, `None` where the device is unavailable.
///
/// A `BTreeMap` so that iteration order is stable, which keeps anything
/// derived from a snapshot (cache keys, logs) deterministic.
pub type SensorReadings = BTreeMap<SensId, Option<f64>>;

// -----------------------------------------------------------------------------------------------
// IMPLS
// -----------------------------------------------------------------------------------------------

impl PerceptionSnapshot {
    /// Construct a snapshot from the current state and readings.
    pub fn new(state: ArmState, readings: SensorReadings) -> Self {
        Self { state, readings }
    }

    /// Get a single reading, flattening "sensor not tracked" and "device
    /// unavailable" into `None`.
    pub fn reading(&self, id: SensId) -> Option<f64> {
        self.readings.get(&id).copied().flatten()
    }
}
