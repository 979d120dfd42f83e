//! Error types for the editor

use prose_model::DocumentError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// The edit does not apply to the current state (logged, never committed)
    #[error("Invalid precondition: {0}")]
    InvalidPrecondition(String),

    /// No behavior handles this case (logged, never committed)
    #[error("Unhandled: {0}")]
    Unhandled(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl EditorError {
    /// Whether this error means "do nothing" rather than a failed edit
    pub fn is_no_op(&self) -> bool {
        matches!(
            self,
            EditorError::InvalidPrecondition(_) | EditorError::Unhandled(_)
        )
    }
}
