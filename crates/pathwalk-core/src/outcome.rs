//! Classification of action messages.
//!
//! Models answer with free text. The contract is a substring match:
//! `SUCCESS` wins over `PENDING`, anything else is a failure.

const SUCCESS_MARKER: &str = "SUCCESS";
const PENDING_MARKER: &str = "PENDING";

/// Outcome of one dispatched action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(String),
    Pending(String),
    Failure(String),
}

impl Outcome {
    pub fn classify(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.contains(SUCCESS_MARKER) {
            Self::Success(message)
        } else if message.contains(PENDING_MARKER) {
            Self::Pending(message)
        } else {
            Self::Failure(message)
        }
    }

    /// Success and Pending both let the walk go on.
    pub fn is_continue(&self) -> bool {
        !matches!(self, Self::Failure(_))
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Success(m) | Self::Pending(m) | Self::Failure(m) => m,
        }
    }
}
