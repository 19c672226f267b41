//! Error types for Ember

use thiserror::Error;

/// The main error type for Ember operations
#[derive(Debug, Error)]
pub enum EmberError {
    #[error("Field not found: {0}")]
    FieldNotFound(String),

    #[error("Field {parent} of kind {kind} cannot have children")]
    NotComposite { parent: String, kind: &'static str },

    #[error("Type mismatch on {field}: field holds {expected} bytes, value has {got}")]
    FieldTypeMismatch {
        field: String,
        expected: usize,
        got: usize,
    },

    #[error("Duplicate field name: {0}")]
    DuplicateField(String),

    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    #[error("Render error: {0}")]
    RenderError(String),
}

/// Result type alias for Ember operations
pub type Result<T> = std::result::Result<T, EmberError>;
