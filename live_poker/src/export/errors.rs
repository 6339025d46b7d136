//! Export and persistence error types.

use thiserror::Error;

/// Errors raised while exporting or saving a hand. The hand itself is never
/// touched when one of these is returned, so the save can be retried.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Request never completed (connection refused, timeout, ...)
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Credentials missing or expired
    #[error("unauthorized, log in again")]
    Unauthorized,

    /// Server answered with a non-success status
    #[error("save rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("no hand to export")]
    NoHand,

    #[error("hand was already exported")]
    AlreadyExported,
}

impl ExportError {
    /// Get an operator-facing message that doesn't leak transport details
    pub fn client_message(&self) -> String {
        match self {
            // Don't expose URLs or socket errors
            ExportError::Transport(err) if err.is_timeout() => "Save timed out".to_string(),
            ExportError::Transport(_) => "Could not reach the hand server".to_string(),
            // Response bodies can carry server internals
            ExportError::Rejected { status, .. } => format!("Save rejected ({status})"),
            ExportError::Serialization(_) => "Could not encode hand".to_string(),
            _ => self.to_string(),
        }
    }

    /// Whether retrying the same save could succeed without operator action.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            ExportError::Transport(_) => true,
            ExportError::Rejected { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;
