//! Error types for Vigil

use thiserror::Error;

/// Errors that can occur while capturing, scoring, or persisting a submission
#[derive(Debug, Error)]
pub enum VigilError {
    /// A submission field failed validation. Carries the first failing
    /// field so the API can answer with `{message, field}`.
    #[error("invalid field `{field}`: {message}")]
    Validation { field: String, message: String },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Server answered outside the documented 201/400 surface.
    #[error("server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    /// Submit was triggered while a submission is already in flight.
    #[error("submission already in flight")]
    SubmitInFlight,

    /// Submit was triggered after the session already completed.
    #[error("session already submitted")]
    AlreadySubmitted,

    /// Answer is empty or whitespace-only; rejected before any network call.
    #[error("answer must not be empty")]
    EmptyAnswer,
}

impl VigilError {
    /// Build a validation error for a named field.
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        VigilError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}
