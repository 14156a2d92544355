//! Simulated actuator binding
//!
//! In-process stand-in for the robot/simulator bridge. Joints move toward
//! their demanded positions rate-limited by the configured speed, the wrist
//! position sensor reads back the first wrist joint, and the distance sensor
//! is driven externally (from the scenario trace). Devices can be configured
//! absent to exercise the missing-device handling.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::warn;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

// Internal
use crate::mech::ActuatorBinding;
use arm_if::mech::{ActId, GripperDem, ARM_JOINT_IDS, GRIPPER_IDS};
use arm_if::sense::{SensId, SensorReadings};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Device name of the proximity sensor.
pub const DISTANCE_SENSOR_NAME: &str = "distance sensor";

/// Device name of the wrist position sensor.
pub const WRIST_POS_SENSOR_NAME: &str = "wrist_1_joint_sensor";

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the simulated actuators.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SimParams {
    /// Speed at which joints track their targets.
    ///
    /// Units: radians/second
    pub joint_speed_rads: f64,

    /// Finger position commanded for a closed gripper.
    ///
    /// Units: radians
    pub gripper_closed_pos_rad: f64,

    /// Finger position commanded for an open gripper.
    ///
    /// Units: radians
    pub gripper_open_pos_rad: f64,

    /// Device names to treat as absent, to exercise missing-device handling.
    #[serde(default)]
    pub missing_devices: Vec<String>,
}

/// The simulated actuator set.
pub struct SimActuators {
    params: SimParams,

    /// Current position of every joint
    pos_rad: HashMap<ActId, f64>,

    /// Demanded position of every joint
    target_rad: HashMap<ActId, f64>,

    /// Motor devices configured absent
    missing_motors: HashSet<ActId>,

    /// Externally driven distance sensor value
    distance: Option<f64>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SimActuators {
    pub fn new(params: SimParams) -> Self {
        let pos_rad: HashMap<ActId, f64> = ARM_JOINT_IDS
            .iter()
            .chain(GRIPPER_IDS.iter())
            .map(|id| (*id, 0.0))
            .collect();

        let mut missing_motors = HashSet::new();
        for name in &params.missing_devices {
            let motor = ARM_JOINT_IDS
                .iter()
                .chain(GRIPPER_IDS.iter())
                .find(|id| id.device_name() == name);

            match motor {
                Some(id) => {
                    missing_motors.insert(*id);
                }
                None if name == DISTANCE_SENSOR_NAME || name == WRIST_POS_SENSOR_NAME => (),
                None => warn!("Unknown device name in sim params: {:?}", name),
            }
        }

        Self {
            params,
            target_rad: pos_rad.clone(),
            pos_rad,
            missing_motors,
            distance: None,
        }
    }

    /// Set the distance sensor value for this cycle (`None` = no echo).
    pub fn set_distance(&mut self, distance: Option<f64>) {
        self.distance = distance;
    }

    /// Advance the simulation by one cycle of `dt` seconds.
    pub fn step(&mut self, dt: f64) {
        let max_delta = self.params.joint_speed_rads * dt;

        for (id, pos) in self.pos_rad.iter_mut() {
            let target = self.target_rad[id];
            *pos += (target - *pos).clamp(-max_delta, max_delta);
        }
    }

    /// The current position of a joint, for inspection.
    pub fn joint_pos_rad(&self, id: ActId) -> f64 {
        self.pos_rad[&id]
    }

    fn sensor_missing(&self, name: &str) -> bool {
        self.params.missing_devices.iter().any(|n| n == name)
    }
}

impl ActuatorBinding for SimActuators {
    fn read_sensors(&self) -> SensorReadings {
        let mut readings = SensorReadings::new();

        readings.insert(
            SensId::Distance,
            if self.sensor_missing(DISTANCE_SENSOR_NAME) {
                None
            } else {
                self.distance
            },
        );

        readings.insert(
            SensId::WristPosition,
            if self.sensor_missing(WRIST_POS_SENSOR_NAME) {
                None
            } else {
                Some(self.pos_rad[&ActId::Wrist1])
            },
        );

        readings
    }

    fn set_joint_targets(&mut self, pos_rad: &HashMap<ActId, f64>) {
        for (id, pos) in pos_rad {
            if self.missing_motors.contains(id) {
                warn!(
                    "Device {:?} unavailable, joint command skipped",
                    id.device_name()
                );
                continue;
            }

            self.target_rad.insert(*id, *pos);
        }
    }

    fn set_gripper(&mut self, dem: GripperDem) {
        let target = match dem {
            GripperDem::Closed => self.params.gripper_closed_pos_rad,
            GripperDem::Open => self.params.gripper_open_pos_rad,
        };

        for id in GRIPPER_IDS.iter() {
            if self.missing_motors.contains(id) {
                warn!(
                    "Device {:?} unavailable, gripper command skipped",
                    id.device_name()
                );
                continue;
            }

            self.target_rad.insert(*id, target);
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
