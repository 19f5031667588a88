use std::path::PathBuf;

use thiserror::Error;

/// Every fallible operation in the crate reports one of these.
#[derive(Error, Debug)]
pub enum EvalError {
    /// File missing, unreadable, or not valid JPEG data.
    #[error("failed to decode image '{}': {reason}", .path.display())]
    Decode { path: PathBuf, reason: String },

    /// `y_true` / `y_pred_probs` / class-count disagreement, or ragged input.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("column '{0}' not found in table")]
    MissingColumn(String),

    /// Row numbers are 1-based data rows (the header is not counted).
    #[error("row {row}: label '{value}' is not a non-negative integer")]
    InvalidLabel { row: usize, value: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// All decode workers exited before the requested batch was complete.
    #[error("decode workers disconnected before batch {0} was assembled")]
    WorkerDisconnected(usize),
}

impl EvalError {
    pub(crate) fn decode(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        EvalError::Decode { path: path.into(), reason: reason.to_string() }
    }
}
