//! Error types for the walk driver.

use std::path::PathBuf;

use crate::engine::Endpoint;

/// Walk errors. Every variant aborts the current run; none are retried.
#[derive(Debug, thiserror::Error)]
pub enum WalkError {
    /// Engine answered with something other than a well-formed `"result":"ok"` reply.
    #[error("engine protocol error at {endpoint}: {message}")]
    EngineProtocol { endpoint: Endpoint, message: String },

    /// Engine did not accept the uploaded model definition.
    #[error("failed to load model {source_name} into the engine: {message}")]
    ModelLoad {
        source_name: String,
        message: String,
    },

    /// A local model handle could not be built.
    #[error("cannot resolve model {name}: {message}")]
    ModelResolve { name: String, message: String },

    /// Step name has no matching action on the model.
    #[error("action {step} not defined in model {model}")]
    UnknownAction { step: String, model: String },

    /// Dispatched action reported neither SUCCESS nor PENDING.
    #[error("step {step} failed: {message}")]
    ActionFailed { step: String, message: String },

    /// Walk file name collision; the existing file is left untouched.
    #[error("walk file {} already exists", path.display())]
    ArtifactExists { path: PathBuf },

    /// Walk file could not be read or written.
    #[error("walk file {}: {message}", path.display())]
    WalkLog { path: PathBuf, message: String },

    /// Driver was asked to run outside of its idle state.
    #[error("walk driver cannot start from state {state}")]
    InvalidState { state: String },
}

impl WalkError {
    /// Exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            // Test failures
            Self::ActionFailed { .. } => 1,
            Self::UnknownAction { .. } => 1,

            // Local configuration
            Self::ModelResolve { .. } => 2,
            Self::InvalidState { .. } => 2,

            // Engine side
            Self::EngineProtocol { .. } => 3,
            Self::ModelLoad { .. } => 3,

            // Artifacts
            Self::ArtifactExists { .. } => 4,
            Self::WalkLog { .. } => 4,
        }
    }

    pub(crate) fn protocol(endpoint: Endpoint, message: impl Into<String>) -> Self {
        Self::EngineProtocol {
            endpoint,
            message: message.into(),
        }
    }

    pub(crate) fn walk_log(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        Self::WalkLog {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

/// Result type for walk operations.
pub type WalkResult<T> = Result<T, WalkError>;
