//! Policy oracle client
//!
//! The oracle is the external decision source (in the full system an LLM
//! service) mapping perception onto an action label. The controller treats
//! any failure, including timeout, as "decide WAIT locally", so implementors
//! are free to fail rather than block past the given deadline.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;
use std::collections::VecDeque;
use std::time::Duration;
use thiserror::Error;

// Internal
use arm_if::sense::PerceptionSnapshot;
use util::scenario::{OracleStep, Scenario};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors raised by a policy oracle client.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("No response from the policy oracle within {0:?}")]
    Timeout(Duration),

    #[error("The scripted oracle has no answers left")]
    ScriptExhausted,
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A source of action decisions.
pub trait PolicyOracle {
    /// Decide the next action for the given perception snapshot.
    ///
    /// Must return within `timeout`; the raw label string is returned so the
    /// caller can apply its own lenient parsing.
    fn decide(
        &mut self,
        snapshot: &PerceptionSnapshot,
        timeout: Duration,
    ) -> Result<String, OracleError>;
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An oracle answering from a scenario's scripted sequence.
///
/// Each consultation consumes one step. Steps marked `fail` simulate a
/// timeout instead of answering.
pub struct ScriptedOracle {
    steps: VecDeque<OracleStep>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ScriptedOracle {
    /// Build an oracle from the scenario's oracle steps.
    pub fn from_scenario(scenario: &Scenario) -> Self {
        Self {
            steps: scenario.oracle.iter().cloned().collect(),
        }
    }
}

impl PolicyOracle for ScriptedOracle {
    fn decide(
        &mut self,
        snapshot: &PerceptionSnapshot,
        timeout: Duration,
    ) -> Result<String, OracleError> {
        debug!(
            "Oracle consulted in state {:?} ({} scripted answers left)",
            snapshot.state,
            self.steps.len()
        );

        match self.steps.pop_front() {
            Some(step) if step.fail => Err(OracleError::Timeout(timeout)),
            Some(step) => Ok(step.action),
            None => Err(OracleError::ScriptExhausted),
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use arm_if::ctrl::ArmState;
    use std::collections::BTreeMap;

    fn snapshot() -> PerceptionSnapshot {
        PerceptionSnapshot::new(ArmState::Waiting, BTreeMap::new())
    }

    #[test]
    fn test_scripted_sequence() {
        let scenario: Scenario = toml::from_str(
            r#"
            duration_s = 1.0

            [[oracle]]
            action = "ROTATE"

            [[oracle]]
            action = "RELEASE"
            fail = true
            "#,
        )
        .unwrap();

        let mut oracle = ScriptedOracle::from_scenario(&scenario);
        let timeout = Duration::from_secs(2);

        assert_eq!(oracle.decide(&snapshot(), timeout).unwrap(), "ROTATE");

        match oracle.decide(&snapshot(), timeout) {
            Err(OracleError::Timeout(_)) => (),
            other => panic!("expected timeout, got {:?}", other),
        }

        match oracle.decide(&snapshot(), timeout) {
            Err(OracleError::ScriptExhausted) => (),
            other => panic!("expected exhaustion, got {:?}", other),
        }
    }
}
