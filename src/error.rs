//! Error taxonomy surfaced at the orchestrator boundary.
//!
//! Plumbing code propagates `anyhow::Error`; everything that reaches the user
//! is folded into one [`AnalysisError`] so a single message slot can show it.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Local, user-correctable; no request was sent.
    Validation,
    /// The request failed or came back with a non-success status.
    Transport,
    /// Another request from the same orchestrator is still in flight.
    Busy,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("Please enter some text")]
    EmptyInput,

    #[error("MLM model requires [MASK] token in the text")]
    MissingMask,

    /// Network failure and HTTP error status both land here; the cause is
    /// kept for logs but not shown.
    #[error("Analysis failed")]
    Transport { cause: String },

    #[error("An analysis is already in progress")]
    Busy,
}

impl AnalysisError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalysisError::EmptyInput | AnalysisError::MissingMask => ErrorKind::Validation,
            AnalysisError::Transport { .. } => ErrorKind::Transport,
            AnalysisError::Busy => ErrorKind::Busy,
        }
    }

    pub fn transport(cause: &anyhow::Error) -> Self {
        AnalysisError::Transport {
            cause: format!("{:#}", cause),
        }
    }

    /// Underlying failure for logs; never shown in the message slot.
    pub fn cause(&self) -> Option<&str> {
        match self {
            AnalysisError::Transport { cause } => Some(cause),
            _ => None,
        }
    }
}
