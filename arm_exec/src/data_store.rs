//! # Data Store

use crate::act_ctrl;
use arm_if::mech::ArmDems;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
#[derive(Default)]
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u128,

    /// True if this cycle falls on a 1Hz boundary
    pub is_1_hz_cycle: bool,

    /// Simulation elapsed time. One cycle == one settle-timer decrement;
    /// wall-clock time plays no part in the control logic.
    pub sim_time_s: f64,

    // ActCtrl
    pub act_ctrl: act_ctrl::ActCtrl,
    pub act_ctrl_input: act_ctrl::InputData,
    pub act_ctrl_output: ArmDems,
    pub act_ctrl_status_rpt: act_ctrl::StatusReport,

    // Monitoring Counters
    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    /// Perform actions required at the start of a cycle.
    ///
    /// Clears those items that need clearing at the start of a cycle, updates
    /// the simulation time, and sets the 1Hz cycle flag.
    pub fn cycle_start(&mut self, cycle_period_s: f64) {
        let cycle_frequency_hz = 1.0 / cycle_period_s;
        self.is_1_hz_cycle = self.num_cycles % (cycle_frequency_hz as u128) == 0;

        self.act_ctrl_input = act_ctrl::InputData::default();
        self.act_ctrl_output = ArmDems::default();
        self.act_ctrl_status_rpt = act_ctrl::StatusReport::default();

        self.sim_time_s = self.num_cycles as f64 * cycle_period_s;
    }
}
