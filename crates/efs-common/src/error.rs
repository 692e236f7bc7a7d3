//! Errors raised by resource lookups against the filing backend and session store.

use thiserror::Error;

/// Failure of a single collaborator lookup.
///
/// The authorization evaluator never propagates these; it treats any of them
/// as "resource absent". They exist so collaborators can log and so the
/// boundary can decide to surface a hard error if it wants to.
#[derive(Error, Debug)]
pub enum LookupError {
    /// The backend answered, but has no such resource
    #[error("Not found: {0}")]
    NotFound(String),

    /// Transport failure or unexpected backend status
    #[error("Backend error: {0}")]
    Backend(String),

    /// The backend or session store returned a payload we could not decode
    #[error("Decode error: {0}")]
    Decode(String),

    /// Session store unavailable or session unreadable
    #[error("Session error: {0}")]
    Session(String),
}

impl LookupError {
    /// Short code used in log fields
    pub fn error_code(&self) -> &'static str {
        match self {
            LookupError::NotFound(_) => "NOT_FOUND",
            LookupError::Backend(_) => "BACKEND_ERROR",
            LookupError::Decode(_) => "DECODE_ERROR",
            LookupError::Session(_) => "SESSION_ERROR",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, LookupError::NotFound(_))
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(err: serde_json::Error) -> Self {
        LookupError::Decode(err.to_string())
    }
}

/// Result type alias using LookupError
pub type LookupResult<T> = Result<T, LookupError>;
