//! Actuator binding interface
//!
//! The controller is agnostic of what actually moves the motors; anything
//! implementing [`ActuatorBinding`] (the in-process simulator, or a real
//! robot bridge) can host it. Commands for unavailable devices are logged and
//! skipped by the implementation, never surfaced as errors, so the control
//! loop keeps running with whatever hardware is present.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::collections::HashMap;

// Internal
use arm_if::mech::{ActId, ArmDems, GripperDem};
use arm_if::sense::SensorReadings;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// Binding to the manipulator's motors and sensors.
pub trait ActuatorBinding {
    /// Read the current sensor values. Unavailable devices read `None`.
    fn read_sensors(&self) -> SensorReadings;

    /// Command joint position targets. Targets for unavailable devices are
    /// logged and skipped.
    fn set_joint_targets(&mut self, pos_rad: &HashMap<ActId, f64>);

    /// Command the gripper as a whole.
    fn set_gripper(&mut self, dem: GripperDem);

    /// Apply a full demand set from the controller.
    fn apply(&mut self, dems: &ArmDems) {
        if !dems.pos_rad.is_empty() {
            self.set_joint_targets(&dems.pos_rad);
        }

        if let Some(gripper) = dems.gripper {
            self.set_gripper(gripper);
        }
    }
}
