//! # Scenario file support
//!
//! A scenario drives a full `arm_exec` run without any external services: it
//! provides the sequence of answers the scripted policy oracle will give and
//! a piecewise-constant trace for the distance sensor.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A single scripted oracle answer.
///
/// Answers are consumed in order, one per oracle consultation. The raw label
/// string is deliberately unvalidated so that the controller's handling of
/// unrecognised labels can be exercised from a scenario.
#[derive(Debug, Clone, Deserialize)]
pub struct OracleStep {
    /// The label string the oracle will answer with
    pub action: String,

    /// If true this consultation fails (simulated timeout) instead of
    /// answering
    #[serde(default)]
    pub fail: bool,
}

/// A breakpoint in the distance sensor trace.
///
/// The sensor reads the value of the latest breakpoint whose time has passed.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DistancePoint {
    /// Time at which this value takes effect
    pub time_s: f64,

    /// The sensor value from this time onwards
    pub value: f64,
}

/// A loaded scenario.
#[derive(Debug, Deserialize)]
pub struct Scenario {
    /// Total duration of the run
    pub duration_s: f64,

    /// Scripted oracle answers, in consultation order
    #[serde(default)]
    pub oracle: Vec<OracleStep>,

    /// Distance sensor trace
    #[serde(default)]
    pub distance: Vec<DistancePoint>,

    #[serde(skip)]
    _scenario_path: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Could not find the scenario at {0}")]
    ScenarioNotFound(String),

    #[error("Could not load the scenario: {0}")]
    ScenarioLoadError(std::io::Error),

    #[error("Could not parse the scenario: {0}")]
    ScenarioParseError(toml::de::Error),

    #[error("The scenario has a non-positive duration ({0} s)")]
    InvalidDuration(f64),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Scenario {
    /// Load a scenario from the given path.
    pub fn load<P: AsRef<Path>>(scenario_path: P) -> Result<Self, ScenarioError> {
        let path = scenario_path.as_ref();

        if !path.is_file() {
            return Err(ScenarioError::ScenarioNotFound(
                path.to_string_lossy().into_owned(),
            ));
        }

        let scenario_str = fs::read_to_string(path).map_err(ScenarioError::ScenarioLoadError)?;

        let mut scenario: Scenario =
            toml::from_str(&scenario_str).map_err(ScenarioError::ScenarioParseError)?;

        if scenario.duration_s <= 0.0 {
            return Err(ScenarioError::InvalidDuration(scenario.duration_s));
        }

        scenario._scenario_path = Some(path.to_path_buf());

        Ok(scenario)
    }

    /// Get the distance sensor value in effect at the given elapsed time, or
    /// `None` if the trace hasn't started yet (or the scenario has no trace).
    ///
    /// Breakpoints need not be listed in time order; the latest one whose
    /// time has passed is in effect.
    pub fn distance_at(&self, elapsed_s: f64) -> Option<f64> {
        self.distance
            .iter()
            .filter(|p| p.time_s <= elapsed_s)
            .max_by(|a, b| {
                a.time_s
                    .partial_cmp(&b.time_s)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|p| p.value)
    }

    /// True once the scenario's duration has elapsed.
    pub fn is_finished(&self, elapsed_s: f64) -> bool {
        elapsed_s >= self.duration_s
    }

    /// Number of scripted oracle answers in this scenario.
    pub fn get_num_oracle_steps(&self) -> usize {
        self.oracle.len()
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
