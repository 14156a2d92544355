//! # Manipulator library.
//!
//! This library allows other crates in the workspace (and the benches) to
//! access items defined inside the manipulator executable crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Action control module - resolves and times the manipulator's actions
pub mod act_ctrl;

/// Global data store for the executable
pub mod data_store;

/// Actuator binding interface - motors and sensors seen from the controller
pub mod mech;

/// Policy oracle clients - external decision sources
pub mod oracle;

/// Simulated actuator binding - in-process stand-in for the robot bridge
pub mod sim;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Target period of one cycle.
pub const CYCLE_PERIOD_S: f64 = 0.032;
