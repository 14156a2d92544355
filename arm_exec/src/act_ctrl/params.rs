//! Parameters structure for ActCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use super::NUM_ARM_JOINTS;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for Action control.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct Params {
    // ---- SETTLE DURATIONS ----
    /// Number of cycles a grasp is given to physically complete.
    ///
    /// Units: cycles
    pub grasp_settle_ticks: u32,

    /// Number of cycles a release is given to physically complete.
    ///
    /// Units: cycles
    pub release_settle_ticks: u32,

    /// Number of cycles a rotation to target is given to physically complete.
    ///
    /// Units: cycles
    pub rotate_settle_ticks: u32,

    /// Number of cycles a rotation back to initial is given to physically
    /// complete.
    ///
    /// Units: cycles
    pub rotate_back_settle_ticks: u32,

    // ---- DECISION RESOLUTION ----
    /// Proximity reading below which the fast path fires while waiting.
    ///
    /// Units: sensor counts
    pub distance_threshold: f64,

    /// Lifetime of a decision cache entry.
    ///
    /// Units: seconds
    pub cache_ttl_s: f64,

    /// Number of decimal places sensor readings are rounded to when forming
    /// cache keys.
    pub quantize_dp: u32,

    /// Maximum time the policy oracle is given to answer.
    ///
    /// Units: seconds
    pub oracle_timeout_s: f64,

    // ---- JOINT CONFIGURATIONS ----
    /// Joint positions for the rotated (handover) configuration, in
    /// [`arm_if::mech::ARM_JOINT_IDS`] order.
    ///
    /// Units: radians
    pub rotate_target_pos_rad: [f64; NUM_ARM_JOINTS],

    /// Joint positions for the initial configuration, in
    /// [`arm_if::mech::ARM_JOINT_IDS`] order.
    ///
    /// Units: radians
    pub initial_pos_rad: [f64; NUM_ARM_JOINTS],
}
