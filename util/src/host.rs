//! Host platform utility functions

use std::path::PathBuf;

/// Get the root directory of the claw software tree.
///
/// The root is given by the `CLAW_SW_ROOT` environment variable, which must
/// point at the directory containing `params` and `sessions`.
pub fn get_claw_sw_root() -> Result<PathBuf, std::env::VarError> {
    std::env::var("CLAW_SW_ROOT").map(PathBuf::from)
}
