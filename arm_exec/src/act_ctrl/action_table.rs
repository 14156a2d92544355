//! Action table
//!
//! Pure, total mapping from an action label onto the state transition and
//! actuator targets it implies. Consulted by the controller's dispatch step;
//! has no side effects of its own.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::collections::HashMap;

// Internal
use super::Params;
use arm_if::ctrl::{ActionLabel, ArmState};
use arm_if::mech::{ActId, GripperDem, ARM_JOINT_IDS};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// What dispatching a single action entails.
#[derive(Debug, Clone)]
pub struct ActionSpec {
    /// The operating state the controller enters on dispatch
    pub next_state: ArmState,

    /// Joint position targets to command, if the action moves the arm
    pub joint_targets: Option<HashMap<ActId, f64>>,

    /// Gripper demand to command, if the action actuates the gripper
    pub gripper: Option<GripperDem>,

    /// Cycles the action is given to physically complete
    pub settle_ticks: u32,
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Resolve an action label into its dispatch spec.
///
/// Total over the closed label set; durations and joint configurations come
/// from the parameter file.
pub fn spec_for(action: ActionLabel, params: &Params) -> ActionSpec {
    match action {
        ActionLabel::Wait => ActionSpec {
            next_state: ArmState::Waiting,
            joint_targets: None,
            gripper: None,
            settle_ticks: 0,
        },
        ActionLabel::Grasp => ActionSpec {
            next_state: ArmState::Grasping,
            joint_targets: None,
            gripper: Some(GripperDem::Closed),
            settle_ticks: params.grasp_settle_ticks,
        },
        ActionLabel::Rotate => ActionSpec {
            next_state: ArmState::Rotating,
            joint_targets: Some(joint_map(&params.rotate_target_pos_rad)),
            gripper: None,
            settle_ticks: params.rotate_settle_ticks,
        },
        ActionLabel::Release => ActionSpec {
            next_state: ArmState::Releasing,
            joint_targets: None,
            gripper: Some(GripperDem::Open),
            settle_ticks: params.release_settle_ticks,
        },
        ActionLabel::RotateBack => ActionSpec {
            next_state: ArmState::RotatingBack,
            joint_targets: Some(joint_map(&params.initial_pos_rad)),
            gripper: None,
            settle_ticks: params.rotate_back_settle_ticks,
        },
    }
}

/// Build a joint target map from a position array in [`ARM_JOINT_IDS`] order.
pub fn joint_map(pos_rad: &[f64; super::NUM_ARM_JOINTS]) -> HashMap<ActId, f64> {
    ARM_JOINT_IDS
        .iter()
        .zip(pos_rad.iter())
        .map(|(id, pos)| (*id, *pos))
        .collect()
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn params() -> Params {
        Params {
            grasp_settle_ticks: 8,
            release_settle_ticks: 8,
            rotate_settle_ticks: 64,
            rotate_back_settle_ticks: 64,
            rotate_target_pos_rad: [-1.88, -2.14, -2.38, -1.51],
            initial_pos_rad: [0.0; 4],
            ..Default::default()
        }
    }

    #[test]
    fn test_wait_is_inert() {
        let spec = spec_for(ActionLabel::Wait, &params());
        assert_eq!(spec.next_state, ArmState::Waiting);
        assert!(spec.joint_targets.is_none());
        assert!(spec.gripper.is_none());
        assert_eq!(spec.settle_ticks, 0);
    }

    #[test]
    fn test_gripper_actions() {
        let p = params();

        let grasp = spec_for(ActionLabel::Grasp, &p);
        assert_eq!(grasp.next_state, ArmState::Grasping);
        assert_eq!(grasp.gripper, Some(GripperDem::Closed));
        assert!(grasp.joint_targets.is_none());
        assert_eq!(grasp.settle_ticks, 8);

        let release = spec_for(ActionLabel::Release, &p);
        assert_eq!(release.next_state, ArmState::Releasing);
        assert_eq!(release.gripper, Some(GripperDem::Open));
        assert_eq!(release.settle_ticks, 8);
    }

    #[test]
    fn test_rotation_targets() {
        let p = params();

        let rotate = spec_for(ActionLabel::Rotate, &p);
        let targets = rotate.joint_targets.unwrap();
        assert_eq!(targets[&ActId::ShoulderLift], -1.88);
        assert_eq!(targets[&ActId::Wrist2], -1.51);
        assert_eq!(rotate.settle_ticks, 64);

        let back = spec_for(ActionLabel::RotateBack, &p);
        let targets = back.joint_targets.unwrap();
        assert!(targets.values().all(|p| *p == 0.0));
        assert_eq!(back.next_state, ArmState::RotatingBack);
    }
}
