//! # Claw Arm Interface Library
//!
//! Types shared between the manipulator executable and its collaborators (the
//! actuator binding and the policy oracle).

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Control vocabulary - operating states and action labels
pub mod ctrl;

/// Mechanisms - actuator IDs and demands
pub mod mech;

/// Sensing - sensor IDs, readings, and the perception snapshot
pub mod sense;
