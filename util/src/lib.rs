//! Utility library for the claw manipulator software

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod host;
#[macro_use]
pub mod logger;
pub mod module;
pub mod params;
pub mod scenario;
pub mod session;
pub mod time;
