use thiserror::Error;

/// Failure taxonomy for the editing session.
///
/// `Validation` never reaches the network; `Network` leaves local state
/// untouched so the edit can be retried; `NotFound` is a soft failure for
/// deletion targets that are already gone.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("a submit is already in progress")]
    SubmitInProgress,
}

impl SessionError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<reqwest::Error> for SessionError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}
