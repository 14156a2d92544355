//! # Mechanisms Equipment Types

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// The rotational arm joints, in the order used by parameter file position arrays.
pub const ARM_JOINT_IDS: [ActId; 4] = [
    ActId::ShoulderLift,
    ActId::Elbow,
    ActId::Wrist1,
    ActId::Wrist2,
];

/// The gripper finger joints.
pub const GRIPPER_IDS: [ActId; 3] = [ActId::Finger1, ActId::Finger2, ActId::FingerMiddle];

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// IDs of all actuators available on the manipulator
#[derive(Serialize, Deserialize, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Copy, Clone)]
pub enum ActId {
    ShoulderLift,
    Elbow,
    Wrist1,
    Wrist2,
    Finger1,
    Finger2,
    FingerMiddle,
}

/// A demand for the gripper as a whole.
///
/// The binding translates this into per-finger positions, so the controller
/// doesn't need to know the finger geometry.
#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Copy, Clone)]
pub enum GripperDem {
    Open,
    Closed,
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Demands sent from the action controller to the actuator binding
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ArmDems {
    /// The demanded position of each commanded arm joint in radians. Joints
    /// not present in the map are left at their previous demand.
    pub pos_rad: HashMap<ActId, f64>,

    /// The demanded gripper state, or `None` for no gripper command this
    /// cycle.
    pub gripper: Option<GripperDem>,
}

// -----------------------------------------------------------------------------------------------
// IMPLS
// -----------------------------------------------------------------------------------------------

impl ActId {
    /// The device name of this actuator on the simulator/robot side.
    pub fn device_name(&self) -> &'static str {
        match self {
            ActId::ShoulderLift => "shoulder_lift_joint",
            ActId::Elbow => "elbow_joint",
            ActId::Wrist1 => "wrist_1_joint",
            ActId::Wrist2 => "wrist_2_joint",
            ActId::Finger1 => "finger_1_joint_1",
            ActId::Finger2 => "finger_2_joint_1",
            ActId::FingerMiddle => "finger_middle_joint_1",
        }
    }
}

impl ArmDems {
    /// True if this demand set commands nothing.
    pub fn is_empty(&self) -> bool {
        self.pos_rad.is_empty() && self.gripper.is_none()
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_dems_serde() {
        let mut dems = ArmDems::default();
        assert!(dems.is_empty());

        dems.pos_rad.insert(ActId::ShoulderLift, -1.88);
        dems.gripper = Some(GripperDem::Closed);

        let json = serde_json::to_string(&dems).unwrap();
        let back: ArmDems = serde_json::from_str(&json).unwrap();

        assert_eq!(back.pos_rad[&ActId::ShoulderLift], -1.88);
        assert_eq!(back.gripper, Some(GripperDem::Closed));
    }
}
