//! Walk driver: runs one walk, either live against the traversal engine or
//! offline from a walk file, dispatching every step to the attached model.
//!
//! ```text
//! Idle -> Restarting -> (Querying <-> Dispatching) -> Terminated
//! Idle -> OfflineReplay <-> Dispatching -> Terminated
//! any running state -> Aborted (engine, lookup or artifact error)
//! ```
//!
//! A driver runs once. Its model handle is dropped when the run ends.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::dispatch::dispatch;
use crate::engine::TraversalSession;
use crate::error::{WalkError, WalkResult};
use crate::model::ActionProvider;
use crate::outcome::Outcome;
use crate::recorder::WalkRecorder;
use crate::replay::WalkLog;
use crate::report::{StopReason, WalkMode, WalkReport};

/// Observer of walk progress. All hooks default to no-ops.
pub trait WalkListener {
    /// Called before a step is dispatched; `index` is 1-based.
    fn on_step(&mut self, _index: usize, _step: &str) {}

    fn on_outcome(&mut self, _step: &str, _outcome: &Outcome) {}

    fn on_terminated(&mut self, _reason: &StopReason) {}

    fn on_walk_saved(&mut self, _path: &Path) {}
}

/// Listener that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopListener;

impl WalkListener for NoopListener {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Restarting,
    Querying,
    Dispatching,
    OfflineReplay,
    Terminated(StopReason),
    Aborted,
}

impl fmt::Display for DriverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Restarting => f.write_str("restarting"),
            Self::Querying => f.write_str("querying"),
            Self::Dispatching => f.write_str("dispatching"),
            Self::OfflineReplay => f.write_str("offline replay"),
            Self::Terminated(reason) => write!(f, "terminated ({reason})"),
            Self::Aborted => f.write_str("aborted"),
        }
    }
}

pub struct WalkDriver {
    model: Option<Box<dyn ActionProvider>>,
    save_dir: Option<PathBuf>,
    recorder: WalkRecorder,
    state: DriverState,
    step_count: usize,
}

impl Default for WalkDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for WalkDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalkDriver")
            .field("model", &self.model.as_ref().map(|m| m.model_name()))
            .field("save_dir", &self.save_dir)
            .field("state", &self.state)
            .field("step_count", &self.step_count)
            .finish()
    }
}

impl WalkDriver {
    pub fn new() -> Self {
        Self {
            model: None,
            save_dir: None,
            recorder: WalkRecorder::new(),
            state: DriverState::Idle,
            step_count: 0,
        }
    }

    /// Attach the model whose actions are dispatched for each step.
    pub fn with_model(mut self, model: Box<dyn ActionProvider>) -> Self {
        self.model = Some(model);
        self
    }

    /// Record live walks and save them under `dir` when the walk ends.
    pub fn with_recording(mut self, dir: impl Into<PathBuf>) -> Self {
        self.save_dir = Some(dir.into());
        self
    }

    pub fn state(&self) -> &DriverState {
        &self.state
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    /// Steps recorded so far (live mode with recording only).
    pub fn walk(&self) -> &[String] {
        self.recorder.steps()
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Drive a live session until coverage is complete, the engine runs out of
    /// steps, or an error ends the walk. With recording enabled the walk is
    /// saved on every exit after a successful restart.
    pub async fn run_live<S>(
        &mut self,
        session: &S,
        listener: &mut dyn WalkListener,
    ) -> WalkResult<WalkReport>
    where
        S: TraversalSession + ?Sized,
    {
        self.ensure_idle()?;
        let started = Instant::now();
        info!(
            model = self.model.as_ref().map(|m| m.model_name()),
            recording = self.save_dir.is_some(),
            "live walk started"
        );

        self.transition(DriverState::Restarting);
        if let Err(e) = session.restart().await {
            return self.finish(WalkMode::Live, Err(e), None, started, listener);
        }

        let result = self.live_loop(session, listener).await;
        let (result, walk_file) = self.save_walk(result, listener);
        self.finish(WalkMode::Live, result, walk_file, started, listener)
    }

    /// Replay a walk file step by step. The engine is never contacted and
    /// nothing is recorded.
    pub fn run_replay(
        &mut self,
        log: &WalkLog,
        listener: &mut dyn WalkListener,
    ) -> WalkResult<WalkReport> {
        self.ensure_idle()?;
        let started = Instant::now();
        info!(
            source = ?log.source(),
            steps = log.len(),
            model = self.model.as_ref().map(|m| m.model_name()),
            "replay started"
        );

        self.transition(DriverState::OfflineReplay);
        let result = self.replay_loop(log, listener);
        self.finish(WalkMode::Replay, result, None, started, listener)
    }

    async fn live_loop<S>(
        &mut self,
        session: &S,
        listener: &mut dyn WalkListener,
    ) -> WalkResult<StopReason>
    where
        S: TraversalSession + ?Sized,
    {
        loop {
            self.transition(DriverState::Querying);

            if session.coverage().await? >= 100 {
                return Ok(StopReason::CoverageComplete);
            }
            if !session.has_next().await? {
                return Ok(StopReason::NoMoreSteps);
            }
            let step = session.next_step().await?;

            self.step_count += 1;
            listener.on_step(self.step_count, &step);
            if self.save_dir.is_some() {
                self.recorder.record(step.clone());
            }

            self.dispatch_step(&step, listener)?;
        }
    }

    fn replay_loop(
        &mut self,
        log: &WalkLog,
        listener: &mut dyn WalkListener,
    ) -> WalkResult<StopReason> {
        for step in log.steps() {
            self.step_count += 1;
            listener.on_step(self.step_count, step);
            self.dispatch_step(step, listener)?;
            self.transition(DriverState::OfflineReplay);
        }
        Ok(StopReason::LogExhausted)
    }

    /// Without a model, steps are only echoed.
    fn dispatch_step(&mut self, step: &str, listener: &mut dyn WalkListener) -> WalkResult<()> {
        let Some(model) = self.model.as_deref_mut() else {
            return Ok(());
        };
        advance(&mut self.state, DriverState::Dispatching);
        let outcome = dispatch(model, step)?;
        listener.on_outcome(step, &outcome);

        match outcome {
            Outcome::Failure(message) => Err(WalkError::ActionFailed {
                step: step.to_string(),
                message,
            }),
            Outcome::Success(_) | Outcome::Pending(_) => Ok(()),
        }
    }

    fn save_walk(
        &self,
        result: WalkResult<StopReason>,
        listener: &mut dyn WalkListener,
    ) -> (WalkResult<StopReason>, Option<PathBuf>) {
        let Some(dir) = self.save_dir.as_deref() else {
            return (result, None);
        };

        match self.recorder.persist(dir) {
            Ok(path) => {
                listener.on_walk_saved(&path);
                (result, Some(path))
            }
            Err(persist_err) => match result {
                Ok(_) => (Err(persist_err), None),
                Err(err) => {
                    warn!(error = %persist_err, "failed to save partial walk");
                    (Err(err), None)
                }
            },
        }
    }

    fn finish(
        &mut self,
        mode: WalkMode,
        result: WalkResult<StopReason>,
        walk_file: Option<PathBuf>,
        started: Instant,
        listener: &mut dyn WalkListener,
    ) -> WalkResult<WalkReport> {
        // The model's session state ends with the run.
        self.model = None;

        match result {
            Ok(reason) => {
                info!(steps = self.step_count, reason = %reason, "walk terminated");
                listener.on_terminated(&reason);
                self.transition(DriverState::Terminated(reason.clone()));
                Ok(WalkReport {
                    mode,
                    termination: reason,
                    step_count: self.step_count,
                    elapsed_ms: started.elapsed().as_millis() as u64,
                    walk_file,
                })
            }
            Err(err) => {
                if let WalkError::ActionFailed { step, message } = &err {
                    let reason = StopReason::ActionFailed {
                        step: step.clone(),
                        message: message.clone(),
                    };
                    listener.on_terminated(&reason);
                    self.transition(DriverState::Terminated(reason));
                } else {
                    self.transition(DriverState::Aborted);
                }
                info!(steps = self.step_count, error = %err, "walk aborted");
                Err(err)
            }
        }
    }

    fn ensure_idle(&self) -> WalkResult<()> {
        if self.state == DriverState::Idle {
            Ok(())
        } else {
            Err(WalkError::InvalidState {
                state: self.state.to_string(),
            })
        }
    }

    fn transition(&mut self, next: DriverState) {
        advance(&mut self.state, next);
    }
}

fn advance(state: &mut DriverState, next: DriverState) {
    if *state != next {
        debug!(from = %state, to = %next, "driver state");
        *state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ActionTable;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// In-process engine serving a fixed step list.
    struct FakeEngine {
        steps: Mutex<VecDeque<String>>,
        coverage_after: Option<usize>,
        served: Mutex<usize>,
        calls: Mutex<Vec<&'static str>>,
        restart_fails: bool,
        next_step_fails_at: Option<usize>,
    }

    impl FakeEngine {
        fn new(steps: &[&str]) -> Self {
            Self {
                steps: Mutex::new(steps.iter().map(|s| s.to_string()).collect()),
                coverage_after: None,
                served: Mutex::new(0),
                calls: Mutex::new(Vec::new()),
                restart_fails: false,
                next_step_fails_at: None,
            }
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }

        fn log(&self, call: &'static str) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl TraversalSession for FakeEngine {
        async fn restart(&self) -> WalkResult<()> {
            self.log("restart");
            if self.restart_fails {
                return Err(WalkError::protocol(
                    crate::engine::Endpoint::Restart,
                    "did not return a result of \"ok\"",
                ));
            }
            Ok(())
        }

        async fn coverage(&self) -> WalkResult<u8> {
            self.log("coverage");
            let served = *self.served.lock().unwrap();
            Ok(match self.coverage_after {
                Some(n) if served >= n => 100,
                _ => 50,
            })
        }

        async fn has_next(&self) -> WalkResult<bool> {
            self.log("has_next");
            Ok(!self.steps.lock().unwrap().is_empty())
        }

        async fn next_step(&self) -> WalkResult<String> {
            self.log("next_step");
            let served = {
                let mut served = self.served.lock().unwrap();
                *served += 1;
                *served
            };
            if self.next_step_fails_at == Some(served) {
                return Err(WalkError::protocol(crate::engine::Endpoint::GetNext, "HTTP 500"));
            }
            Ok(self.steps.lock().unwrap().pop_front().unwrap())
        }
    }

    #[derive(Default)]
    struct Collect {
        steps: Vec<String>,
        outcomes: Vec<Outcome>,
        terminated: Option<StopReason>,
        saved: Option<PathBuf>,
    }

    impl WalkListener for Collect {
        fn on_step(&mut self, index: usize, step: &str) {
            assert_eq!(index, self.steps.len() + 1);
            self.steps.push(step.to_string());
        }

        fn on_outcome(&mut self, _step: &str, outcome: &Outcome) {
            self.outcomes.push(outcome.clone());
        }

        fn on_terminated(&mut self, reason: &StopReason) {
            self.terminated = Some(reason.clone());
        }

        fn on_walk_saved(&mut self, path: &Path) {
            self.saved = Some(path.to_path_buf());
        }
    }

    fn always_ok(steps: &[&str]) -> Box<dyn ActionProvider> {
        let mut table = ActionTable::new("always_ok", ());
        for step in steps {
            table = table.with_action(*step, |_: &mut ()| "SUCCESS".to_string());
        }
        Box::new(table)
    }

    #[tokio::test]
    async fn test_no_more_steps() {
        let engine = FakeEngine::new(&["e_main", "v_wikipedia_main"]);
        let mut driver = WalkDriver::new().with_model(always_ok(&["e_main", "v_wikipedia_main"]));
        let mut seen = Collect::default();

        let report = driver.run_live(&engine, &mut seen).await.unwrap();

        assert_eq!(report.termination, StopReason::NoMoreSteps);
        assert_eq!(report.step_count, 2);
        assert_eq!(seen.steps, ["e_main", "v_wikipedia_main"]);
        assert_eq!(seen.outcomes.len(), 2);
        assert_eq!(driver.state(), &DriverState::Terminated(StopReason::NoMoreSteps));
        assert!(!driver.has_model());
    }

    #[tokio::test]
    async fn test_coverage_complete_skips_next_step() {
        let mut engine = FakeEngine::new(&["e_main", "v_wikipedia_main", "e_about"]);
        engine.coverage_after = Some(1);
        let mut driver = WalkDriver::new();

        let report = driver.run_live(&engine, &mut NoopListener).await.unwrap();

        assert_eq!(report.termination, StopReason::CoverageComplete);
        assert_eq!(report.step_count, 1);
        assert_eq!(
            engine.calls(),
            ["restart", "coverage", "has_next", "next_step", "coverage"]
        );
    }

    #[tokio::test]
    async fn test_unknown_action_halts_queries() {
        let engine = FakeEngine::new(&["e_main", "e_unknown", "v_about"]);
        let mut driver = WalkDriver::new().with_model(always_ok(&["e_main", "v_about"]));

        let err = driver.run_live(&engine, &mut NoopListener).await.unwrap_err();

        assert!(matches!(err, WalkError::UnknownAction { ref step, .. } if step == "e_unknown"));
        assert_eq!(engine.calls().iter().filter(|c| **c == "next_step").count(), 2);
        assert_eq!(engine.calls().last(), Some(&"next_step"));
        assert_eq!(driver.state(), &DriverState::Aborted);
    }

    #[tokio::test]
    async fn test_action_failure_terminates_and_saves_partial_walk() {
        let dir = tempfile::tempdir().unwrap();
        let engine = FakeEngine::new(&["e_main", "v_wikipedia_main", "e_about", "v_about"]);
        let model = ActionTable::new("third_fails", 0u32).with_action("e_main", |_: &mut u32| {
            "SUCCESS".to_string()
        });
        let model = ["v_wikipedia_main", "e_about", "v_about"]
            .into_iter()
            .fold(model, |m, step| {
                m.with_action(step, |n: &mut u32| {
                    *n += 1;
                    if *n == 2 {
                        "FAILURE: wrong page".to_string()
                    } else {
                        "SUCCESS".to_string()
                    }
                })
            });
        let mut driver = WalkDriver::new()
            .with_model(Box::new(model))
            .with_recording(dir.path());
        let mut seen = Collect::default();

        let err = driver.run_live(&engine, &mut seen).await.unwrap_err();

        match err {
            WalkError::ActionFailed { step, message } => {
                assert_eq!(step, "e_about");
                assert_eq!(message, "FAILURE: wrong page");
            }
            other => panic!("expected ActionFailed, got {other:?}"),
        }
        assert_eq!(seen.steps, ["e_main", "v_wikipedia_main", "e_about"]);
        assert!(matches!(seen.terminated, Some(StopReason::ActionFailed { .. })));
        let saved = seen.saved.expect("partial walk saved");
        assert_eq!(
            std::fs::read_to_string(saved).unwrap(),
            "e_main\nv_wikipedia_main\ne_about\n"
        );
    }

    #[tokio::test]
    async fn test_restart_failure_aborts_without_saving() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = FakeEngine::new(&["e_main"]);
        engine.restart_fails = true;
        let mut driver = WalkDriver::new().with_recording(dir.path());
        let mut seen = Collect::default();

        let err = driver.run_live(&engine, &mut seen).await.unwrap_err();

        assert!(matches!(err, WalkError::EngineProtocol { .. }));
        assert_eq!(engine.calls(), ["restart"]);
        assert!(seen.saved.is_none());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_engine_error_mid_walk_saves_partial_walk() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = FakeEngine::new(&["v_start", "e_main", "v_wikipedia_main"]);
        engine.next_step_fails_at = Some(3);
        let mut driver = WalkDriver::new().with_recording(dir.path());
        let mut seen = Collect::default();

        let err = driver.run_live(&engine, &mut seen).await.unwrap_err();

        assert!(matches!(
            err,
            WalkError::EngineProtocol {
                endpoint: crate::engine::Endpoint::GetNext,
                ..
            }
        ));
        assert_eq!(driver.state(), &DriverState::Aborted);
        let saved = seen.saved.expect("partial walk saved");
        assert_eq!(std::fs::read_to_string(saved).unwrap(), "v_start\ne_main\n");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_save_failure_after_clean_walk_is_returned() {
        let dir = tempfile::tempdir().unwrap();
        let engine = FakeEngine::new(&["v_start"]);
        let mut driver = WalkDriver::new().with_recording(dir.path().join("missing"));
        let mut seen = Collect::default();

        let err = driver.run_live(&engine, &mut seen).await.unwrap_err();

        assert!(matches!(err, WalkError::WalkLog { .. }));
        assert_eq!(driver.state(), &DriverState::Aborted);
        assert!(seen.saved.is_none());
        assert!(seen.terminated.is_none());
    }

    #[tokio::test]
    async fn test_walk_file_collision_after_clean_walk_is_returned() {
        let dir = tempfile::tempdir().unwrap();
        let now = chrono::Utc::now().timestamp();
        let mut taken = WalkRecorder::new();
        taken.record("v_start");
        for ts in now..now + 10 {
            taken.persist_at(dir.path(), ts).unwrap();
        }
        let engine = FakeEngine::new(&["e_main"]);
        let mut driver = WalkDriver::new().with_recording(dir.path());

        let err = driver.run_live(&engine, &mut NoopListener).await.unwrap_err();

        let WalkError::ArtifactExists { path } = &err else {
            panic!("expected ArtifactExists, got {err:?}");
        };
        assert_eq!(std::fs::read_to_string(path).unwrap(), "v_start\n");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 10);
    }

    #[tokio::test]
    async fn test_save_failure_after_abort_keeps_original_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = FakeEngine::new(&["v_start", "e_main"]);
        engine.next_step_fails_at = Some(2);
        let mut driver = WalkDriver::new().with_recording(dir.path().join("missing"));
        let mut seen = Collect::default();

        let err = driver.run_live(&engine, &mut seen).await.unwrap_err();

        assert!(matches!(
            err,
            WalkError::EngineProtocol {
                endpoint: crate::engine::Endpoint::GetNext,
                ..
            }
        ));
        assert!(seen.saved.is_none());
        assert_eq!(driver.state(), &DriverState::Aborted);
    }

    #[tokio::test]
    async fn test_without_model_steps_are_only_echoed() {
        let engine = FakeEngine::new(&["anything", "goes"]);
        let mut driver = WalkDriver::new();
        let mut seen = Collect::default();

        let report = driver.run_live(&engine, &mut seen).await.unwrap();

        assert_eq!(report.step_count, 2);
        assert_eq!(seen.steps, ["anything", "goes"]);
        assert!(seen.outcomes.is_empty());
    }

    #[tokio::test]
    async fn test_driver_runs_once() {
        let engine = FakeEngine::new(&[]);
        let mut driver = WalkDriver::new();
        driver.run_live(&engine, &mut NoopListener).await.unwrap();

        let err = driver.run_live(&engine, &mut NoopListener).await.unwrap_err();
        assert!(matches!(err, WalkError::InvalidState { .. }));
    }

    #[test]
    fn test_replay_dispatches_in_file_order() {
        let log = WalkLog::parse("e_main\nv_wikipedia_main\n");
        let mut driver = WalkDriver::new().with_model(always_ok(&["e_main", "v_wikipedia_main"]));
        let mut seen = Collect::default();

        let report = driver.run_replay(&log, &mut seen).unwrap();

        assert_eq!(report.mode, WalkMode::Replay);
        assert_eq!(report.termination, StopReason::LogExhausted);
        assert_eq!(seen.steps, ["e_main", "v_wikipedia_main"]);
        assert!(driver.walk().is_empty());
    }

    #[test]
    fn test_replay_stops_at_first_failure() {
        let log = WalkLog::parse("ok\nbad\nok\n");
        let model = ActionTable::new("m", ())
            .with_action("ok", |_: &mut ()| "SUCCESS".to_string())
            .with_action("bad", |_: &mut ()| "FAILURE: nope".to_string());
        let mut driver = WalkDriver::new().with_model(Box::new(model));
        let mut seen = Collect::default();

        let err = driver.run_replay(&log, &mut seen).unwrap_err();

        assert!(matches!(err, WalkError::ActionFailed { ref step, .. } if step == "bad"));
        assert_eq!(seen.steps, ["ok", "bad"]);
        assert_eq!(driver.step_count(), 2);
    }
}
