//! Implementations for the ActCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

// Internal
use super::{spec_for, ActCtrlError, CacheKey, DecisionCache, Params, SettleTimer};
use crate::oracle::PolicyOracle;
use arm_if::{
    ctrl::{ActionLabel, ArmState},
    mech::ArmDems,
    sense::{PerceptionSnapshot, SensId, SensorReadings},
};
use util::{module::State, params, session::Session};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Action control module state
#[derive(Default)]
pub struct ActCtrl {
    pub(crate) params: Params,

    pub(crate) report: StatusReport,

    /// Current operating state, mutated only by `dispatch`.
    pub(crate) state: ArmState,

    /// Gate on new decisions while an action is in flight.
    pub(crate) settle: SettleTimer,

    pub(crate) cache: Option<DecisionCache>,

    pub(crate) oracle: Option<Box<dyn PolicyOracle>>,

    /// Number of cycles processed so far.
    pub(crate) num_ticks: u64,

    initialised: bool,
}

/// Initialisation data for ActCtrl.
pub struct InitData {
    /// Path to the parameter file, relative to the params directory
    pub params_file: &'static str,

    /// The policy oracle this controller consults
    pub oracle: Box<dyn PolicyOracle>,
}

/// Input data to Action Control.
#[derive(Default, Clone)]
pub struct InputData {
    /// Sensor values read from the actuator binding this cycle.
    pub readings: SensorReadings,
}

/// Status report for ActCtrl processing.
#[derive(Clone, Copy, Default, Serialize, Deserialize, Debug)]
pub struct StatusReport {
    /// The cycle this report describes
    pub cycle: u64,

    /// Operating state at the end of the cycle
    pub state: ArmState,

    /// Settle timer value at the end of the cycle
    pub settle_ticks_remaining: u32,

    /// True if the grasp fast path fired this cycle
    pub fast_path: bool,

    /// True if the decision was served from the cache
    pub cache_hit: bool,

    /// True if the policy oracle was consulted
    pub oracle_called: bool,

    /// True if the oracle consultation failed and WAIT was substituted
    pub oracle_failed: bool,

    /// The action dispatched this cycle, if any
    pub dispatched: Option<ActionLabel>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for ActCtrl {
    type InitData = InitData;
    type InitError = params::LoadError;

    type InputData = InputData;
    type OutputData = ArmDems;
    type StatusReport = StatusReport;
    type ProcError = ActCtrlError;

    /// Initialise the ActCtrl module.
    fn init(
        &mut self,
        init_data: Self::InitData,
        _session: &Session,
    ) -> Result<(), Self::InitError> {
        self.params = params::load(init_data.params_file)?;

        self.cache = Some(DecisionCache::new(Duration::from_secs_f64(
            self.params.cache_ttl_s,
        )));
        self.oracle = Some(init_data.oracle);

        self.state = ArmState::Waiting;
        self.initialised = true;

        Ok(())
    }

    /// Perform cyclic processing of Action Control.
    ///
    /// If an action is in flight the settle timer counts down and nothing
    /// else happens. Otherwise a new action is resolved and dispatched, which
    /// may update the operating state, command actuators, and re-arm the
    /// timer.
    ///
    /// Never fails once initialised: oracle trouble degrades to WAIT so the
    /// host loop keeps running.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        if !self.initialised {
            return Err(ActCtrlError::NotInitialised);
        }

        // Clear the status report
        self.report = StatusReport::default();
        self.num_ticks += 1;
        self.report.cycle = self.num_ticks;

        let mut output = ArmDems::default();

        if !self.settle.is_settled() {
            // An action is in flight, count down and hold all demands
            self.settle.tick();
        } else {
            let snapshot = PerceptionSnapshot::new(self.state, input_data.readings.clone());

            let action = self.resolve_action(&snapshot);
            self.dispatch(action, &mut output);
        }

        self.report.state = self.state;
        self.report.settle_ticks_remaining = self.settle.remaining();

        Ok((output, self.report))
    }
}

impl ActCtrl {
    /// The controller's current operating state.
    pub fn state(&self) -> ArmState {
        self.state
    }

    /// Demands which bring the arm to a known rest: gripper open, joints at
    /// the initial configuration. Commanded by the host on shutdown.
    pub fn shutdown_dems(&self) -> ArmDems {
        ArmDems {
            pos_rad: super::joint_map(&self.params.initial_pos_rad),
            gripper: Some(arm_if::mech::GripperDem::Open),
        }
    }

    /// Resolve which action to take for the given snapshot.
    ///
    /// Order: local fast path, then decision cache, then policy oracle. Any
    /// oracle failure resolves to WAIT without populating the cache.
    fn resolve_action(&mut self, snapshot: &PerceptionSnapshot) -> ActionLabel {
        // The grasp trigger is latency critical and must not depend on the
        // oracle, so it is checked before any external consultation
        if self.state == ArmState::Waiting {
            if let Some(distance) = snapshot.reading(SensId::Distance) {
                if distance < self.params.distance_threshold {
                    info!(
                        "Fast path: distance {:.1} below threshold {:.1}, grasping",
                        distance, self.params.distance_threshold
                    );
                    self.report.fast_path = true;
                    return ActionLabel::Grasp;
                }
            }
        }

        let key = CacheKey::from_snapshot(snapshot, self.params.quantize_dp);
        let now = Instant::now();

        if let Some(cache) = self.cache.as_mut() {
            if let Some(action) = cache.get(&key, now) {
                debug!("Decision cache hit: {:?}", action);
                self.report.cache_hit = true;
                return action;
            }
        }

        let timeout = Duration::from_secs_f64(self.params.oracle_timeout_s);

        let response = match self.oracle.as_mut() {
            Some(oracle) => {
                self.report.oracle_called = true;
                oracle.decide(snapshot, timeout)
            }
            None => {
                warn!("No policy oracle configured, defaulting to WAIT");
                self.report.oracle_failed = true;
                return ActionLabel::Wait;
            }
        };

        match response {
            Ok(raw) => {
                // Anything outside the closed label set collapses to WAIT;
                // the collapsed label is what gets cached
                let action = match ActionLabel::from_oracle(&raw) {
                    Some(action) => action,
                    None => {
                        warn!("Unrecognised oracle action {:?}, defaulting to WAIT", raw);
                        ActionLabel::Wait
                    }
                };

                if let Some(cache) = self.cache.as_mut() {
                    cache.put(key, action, now);
                }

                action
            }
            Err(e) => {
                // Failures are never cached
                warn!("Policy oracle failure: {}, defaulting to WAIT", e);
                self.report.oracle_failed = true;
                ActionLabel::Wait
            }
        }
    }

    /// Apply the action table entry for the resolved action: update the
    /// operating state, fill in actuator demands, and arm the settle timer.
    fn dispatch(&mut self, action: ActionLabel, output: &mut ArmDems) {
        let spec = spec_for(action, &self.params);

        if spec.next_state != self.state {
            info!(
                "Executing {:?}: {:?} -> {:?} ({} settle ticks)",
                action, self.state, spec.next_state, spec.settle_ticks
            );
        }

        self.state = spec.next_state;

        if let Some(targets) = spec.joint_targets {
            output.pos_rad = targets;
        }
        output.gripper = spec.gripper;

        self.settle.arm(spec.settle_ticks);
        self.report.dispatched = Some(action);
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::oracle::OracleError;
    use arm_if::mech::{ActId, GripperDem};
    use std::cell::Cell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    /// Oracle returning canned responses, counting consultations.
    struct StubOracle {
        responses: VecDeque<Result<String, OracleError>>,
        calls: Rc<Cell<usize>>,
    }

    impl PolicyOracle for StubOracle {
        fn decide(
            &mut self,
            _snapshot: &PerceptionSnapshot,
            _timeout: Duration,
        ) -> Result<String, OracleError> {
            self.calls.set(self.calls.get() + 1);
            self.responses
                .pop_front()
                .unwrap_or(Err(OracleError::ScriptExhausted))
        }
    }

    fn test_params() -> Params {
        Params {
            grasp_settle_ticks: 8,
            release_settle_ticks: 8,
            rotate_settle_ticks: 64,
            rotate_back_settle_ticks: 64,
            distance_threshold: 500.0,
            cache_ttl_s: 300.0,
            quantize_dp: 2,
            oracle_timeout_s: 2.0,
            rotate_target_pos_rad: [-1.88, -2.14, -2.38, -1.51],
            initial_pos_rad: [0.0; 4],
        }
    }

    /// Build an initialised controller around a stub oracle.
    fn ctrl_with(responses: Vec<Result<String, OracleError>>) -> (ActCtrl, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let params = test_params();

        let ctrl = ActCtrl {
            cache: Some(DecisionCache::new(Duration::from_secs_f64(
                params.cache_ttl_s,
            ))),
            oracle: Some(Box::new(StubOracle {
                responses: responses.into(),
                calls: calls.clone(),
            })),
            params,
            initialised: true,
            ..Default::default()
        };

        (ctrl, calls)
    }

    fn input(distance: Option<f64>, position: Option<f64>) -> InputData {
        let mut readings = SensorReadings::new();
        readings.insert(SensId::Distance, distance);
        readings.insert(SensId::WristPosition, position);
        InputData { readings }
    }

    #[test]
    fn test_fast_path_grasp() {
        let (mut ctrl, calls) = ctrl_with(vec![Ok("ROTATE".into())]);

        let (output, report) = ctrl.proc(&input(Some(450.0), Some(0.0))).unwrap();

        assert_eq!(ctrl.state(), ArmState::Grasping);
        assert_eq!(output.gripper, Some(GripperDem::Closed));
        assert!(output.pos_rad.is_empty());
        assert_eq!(report.settle_ticks_remaining, 8);
        assert!(report.fast_path);
        assert_eq!(report.dispatched, Some(ActionLabel::Grasp));

        // Neither cache nor oracle were consulted
        assert_eq!(calls.get(), 0);
        assert!(ctrl.cache.as_ref().unwrap().is_empty());
    }

    #[test]
    fn test_fast_path_needs_reading() {
        // An absent distance reading must not fire the fast path
        let (mut ctrl, calls) = ctrl_with(vec![Ok("WAIT".into())]);

        let (_, report) = ctrl.proc(&input(None, Some(0.0))).unwrap();

        assert_eq!(ctrl.state(), ArmState::Waiting);
        assert!(!report.fast_path);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_settle_gates_decisions() {
        let (mut ctrl, calls) = ctrl_with(vec![Ok("RELEASE".into())]);
        ctrl.state = ArmState::Grasping;
        ctrl.settle.arm(3);

        let (output, report) = ctrl.proc(&input(Some(450.0), Some(0.0))).unwrap();

        // Timer counts down, nothing else happens, even with the fast path
        // trigger present
        assert_eq!(report.settle_ticks_remaining, 2);
        assert_eq!(ctrl.state(), ArmState::Grasping);
        assert!(output.is_empty());
        assert!(report.dispatched.is_none());
        assert_eq!(calls.get(), 0);

        // Timer is strictly decreasing down to zero, state pinned throughout
        let (_, report) = ctrl.proc(&input(Some(450.0), Some(0.0))).unwrap();
        assert_eq!(report.settle_ticks_remaining, 1);
        let (_, report) = ctrl.proc(&input(Some(450.0), Some(0.0))).unwrap();
        assert_eq!(report.settle_ticks_remaining, 0);
        assert_eq!(ctrl.state(), ArmState::Grasping);
        assert_eq!(calls.get(), 0);

        // Now settled, the next cycle decides again
        let (_, report) = ctrl.proc(&input(Some(900.0), Some(0.0))).unwrap();
        assert_eq!(calls.get(), 1);
        assert_eq!(report.dispatched, Some(ActionLabel::Release));
        assert_eq!(ctrl.state(), ArmState::Releasing);
    }

    #[test]
    fn test_oracle_rotate() {
        let (mut ctrl, calls) = ctrl_with(vec![Ok("ROTATE".into())]);

        let (output, report) = ctrl.proc(&input(Some(900.0), Some(0.0))).unwrap();

        assert_eq!(calls.get(), 1);
        assert_eq!(ctrl.state(), ArmState::Rotating);
        assert_eq!(report.settle_ticks_remaining, 64);
        assert_eq!(output.pos_rad[&ActId::ShoulderLift], -1.88);
        assert_eq!(output.pos_rad[&ActId::Wrist2], -1.51);
        assert_eq!(output.gripper, None);
    }

    #[test]
    fn test_cache_idempotence() {
        let (mut ctrl, calls) = ctrl_with(vec![Ok("WAIT".into()), Ok("ROTATE".into())]);

        // Two cycles with readings equal after quantization: the second must
        // be served from cache without reaching the oracle
        ctrl.proc(&input(Some(900.001), Some(0.1204))).unwrap();
        let (_, report) = ctrl.proc(&input(Some(899.996), Some(0.1199))).unwrap();

        assert_eq!(calls.get(), 1);
        assert!(report.cache_hit);
        assert_eq!(report.dispatched, Some(ActionLabel::Wait));

        // A reading change above the quantization step is a genuine miss
        ctrl.proc(&input(Some(900.02), Some(0.1199))).unwrap();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_unrecognised_label_degrades_to_wait() {
        let (mut ctrl, _) = ctrl_with(vec![Ok("MAKE ME A SANDWICH".into())]);
        ctrl.state = ArmState::Rotating;

        let (output, report) = ctrl.proc(&input(Some(900.0), Some(0.0))).unwrap();

        assert_eq!(ctrl.state(), ArmState::Waiting);
        assert!(output.is_empty());
        assert_eq!(report.dispatched, Some(ActionLabel::Wait));
        assert_eq!(report.settle_ticks_remaining, 0);
        assert!(!report.oracle_failed);
    }

    #[test]
    fn test_oracle_failure_not_cached() {
        let (mut ctrl, calls) = ctrl_with(vec![
            Err(OracleError::Timeout(Duration::from_secs(2))),
            Ok("ROTATE".into()),
        ]);

        // First cycle: failure, degrade to WAIT
        let (output, report) = ctrl.proc(&input(Some(900.0), Some(0.0))).unwrap();
        assert_eq!(ctrl.state(), ArmState::Waiting);
        assert!(output.is_empty());
        assert!(report.oracle_failed);
        assert_eq!(report.dispatched, Some(ActionLabel::Wait));
        assert!(ctrl.cache.as_ref().unwrap().is_empty());

        // Second cycle, identical perception: the failure was not cached so
        // the oracle is consulted again
        let (_, report) = ctrl.proc(&input(Some(900.0), Some(0.0))).unwrap();
        assert_eq!(calls.get(), 2);
        assert!(!report.cache_hit);
        assert_eq!(report.dispatched, Some(ActionLabel::Rotate));
    }

    #[test]
    fn test_rotate_back_to_initial() {
        let (mut ctrl, _) = ctrl_with(vec![Ok("ROTATE_BACK".into())]);
        ctrl.state = ArmState::Releasing;

        let (output, report) = ctrl.proc(&input(Some(900.0), Some(-2.38))).unwrap();

        assert_eq!(ctrl.state(), ArmState::RotatingBack);
        assert_eq!(report.settle_ticks_remaining, 64);
        assert!(output.pos_rad.values().all(|p| *p == 0.0));
        assert_eq!(output.pos_rad.len(), 4);
    }

    #[test]
    fn test_not_initialised() {
        let mut ctrl = ActCtrl::default();
        assert!(matches!(
            ctrl.proc(&InputData::default()),
            Err(ActCtrlError::NotInitialised)
        ));
    }
}
