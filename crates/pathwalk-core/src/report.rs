//! Walk results.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// Where steps came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WalkMode {
    Live,
    Replay,
}

/// Why a walk stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum StopReason {
    /// Engine reported 100% edge coverage.
    CoverageComplete,
    /// Engine has no next element.
    NoMoreSteps,
    /// Every line of the walk file was replayed.
    LogExhausted,
    /// An action reported failure; the run ends in error.
    ActionFailed { step: String, message: String },
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CoverageComplete => f.write_str("edge coverage complete"),
            Self::NoMoreSteps => f.write_str("no more steps"),
            Self::LogExhausted => f.write_str("walk file exhausted"),
            Self::ActionFailed { step, message } => write!(f, "step {step} failed: {message}"),
        }
    }
}

/// Summary of a walk that reached a terminal state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalkReport {
    pub mode: WalkMode,
    pub termination: StopReason,
    /// Steps requested (live) or read (replay).
    pub step_count: usize,
    pub elapsed_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub walk_file: Option<PathBuf>,
}
