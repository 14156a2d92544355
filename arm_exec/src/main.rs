//! Main manipulator-side executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise all modules
//!     - Main loop:
//!         - Scenario input (scripted oracle answers, distance trace)
//!         - Actuator sensing
//!         - Action control processing
//!         - Actuator demand application
//!
//! # Modules
//!
//! All modules (e.g. `act_ctrl`) shall meet the following requirements:
//!     1. Provide a public struct implementing the `util::module::State` trait.

// ---------------------------------------------------------------------------
// USE MODULES FROM LIBRARY
// ---------------------------------------------------------------------------

use arm_lib::{
    act_ctrl, data_store::DataStore, mech::ActuatorBinding, oracle::ScriptedOracle,
    sim::SimActuators, CYCLE_PERIOD_S,
};

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{debug, info, warn};
use std::env;
use std::thread;
use std::time::{Duration, Instant};

// Internal
use util::{
    logger::{logger_init, LevelFilter},
    module::State,
    scenario::Scenario,
    session::Session,
};

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("arm_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Trace, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Claw Manipulator Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD SCENARIO ----

    // Collect all arguments
    let args: Vec<String> = env::args().collect();

    debug!("CLI arguments: {:?}", args);

    if args.len() != 2 {
        return Err(eyre!(
            "Expected the scenario path as the single argument, found {} arguments",
            args.len() - 1
        ));
    }

    info!("Loading scenario from \"{}\"", &args[1]);

    let scenario = Scenario::load(&args[1]).wrap_err("Failed to load scenario")?;

    info!(
        "Loaded scenario lasts {:.02} s and scripts {} oracle answers\n",
        scenario.duration_s,
        scenario.get_num_oracle_steps()
    );

    // ---- LOAD PARAMETERS ----

    let sim_params: arm_lib::sim::SimParams =
        util::params::load("sim.toml").wrap_err("Could not load sim params")?;

    info!("Exec parameters loaded");

    // ---- INITIALISE DATASTORE ----

    info!("Initialising modules...");

    let mut ds = DataStore::default();

    // ---- INITIALISE MODULES ----

    ds.act_ctrl
        .init(
            act_ctrl::InitData {
                params_file: "act_ctrl.toml",
                oracle: Box::new(ScriptedOracle::from_scenario(&scenario)),
            },
            &session,
        )
        .wrap_err("Failed to initialise ActCtrl")?;
    info!("ActCtrl init complete");

    let mut sim = SimActuators::new(sim_params);
    info!("SimActuators init complete");

    info!("Module initialisation complete\n");

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    loop {
        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // Clear items that need wiping at the start of the cycle
        ds.cycle_start(CYCLE_PERIOD_S);

        // Exit once the scenario's duration has elapsed
        if scenario.is_finished(ds.sim_time_s) {
            info!("End of scenario reached, stopping");
            break;
        }

        // ---- DATA INPUT ----

        sim.set_distance(scenario.distance_at(ds.sim_time_s));
        sim.step(CYCLE_PERIOD_S);

        ds.act_ctrl_input = act_ctrl::InputData {
            readings: sim.read_sensors(),
        };

        // ---- CONTROL ALGORITHM PROCESSING ----

        // ActCtrl processing
        match ds.act_ctrl.proc(&ds.act_ctrl_input) {
            Ok((o, r)) => {
                ds.act_ctrl_output = o;
                ds.act_ctrl_status_rpt = r;
            }
            Err(e) => {
                // ActCtrl recovers decision trouble internally, an error here
                // means misconfiguration, so warn and continue
                warn!("Error during ActCtrl processing: {}", e)
            }
        };

        // Send demands to the actuators
        sim.apply(&ds.act_ctrl_output);

        // ---- TELEMETRY ----

        if ds.is_1_hz_cycle {
            session.save(
                format!("reports/act_ctrl_{:06}.json", ds.num_cycles),
                ds.act_ctrl_status_rpt,
            );
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match Duration::from_secs_f64(CYCLE_PERIOD_S).checked_sub(cycle_dur) {
            Some(d) => {
                ds.num_consec_cycle_overruns = 0;
                thread::sleep(d);
            }
            None => {
                warn!(
                    "Cycle overran by {:.06} s",
                    cycle_dur.as_secs_f64() - CYCLE_PERIOD_S
                );
                ds.num_consec_cycle_overruns += 1;
            }
        }

        // Increment cycle counter
        ds.num_cycles += 1;
    }

    // ---- SHUTDOWN ----

    // Bring the arm to a known rest before exiting
    sim.apply(&ds.act_ctrl.shutdown_dems());

    info!("End of execution");

    session.exit();

    Ok(())
}
