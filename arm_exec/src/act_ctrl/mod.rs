//! Action control module
//!
//! Drives the manipulator through its fixed action repertoire. Each cycle the
//! controller either counts down the settle timer of the action in flight, or
//! resolves a new action (local fast path, then decision cache, then policy
//! oracle) and dispatches it through the action table.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod action_table;
mod decision_cache;
mod params;
mod settle;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use action_table::*;
pub use decision_cache::*;
pub use params::*;
pub use settle::*;
pub use state::*;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// The number of rotational joints on the arm.
pub const NUM_ARM_JOINTS: usize = 4;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during ActCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum ActCtrlError {
    #[error("ActCtrl has not been initialised")]
    NotInitialised,
}
