use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("admin backend unavailable: {0}")]
    Unavailable(String),

    #[error("invalid admin credentials: {0}")]
    InvalidCredentials(String),

    #[error("{op} failed: {message}")]
    Query { op: &'static str, message: String },

    #[error("{op} timed out after {timeout_ms} ms")]
    Timeout { op: &'static str, timeout_ms: u64 },

    #[error("session is closed")]
    Closed,
}

impl SessionError {
    pub fn query(op: &'static str, message: impl Into<String>) -> Self {
        SessionError::Query {
            op,
            message: message.into(),
        }
    }

    /// Errors that mean a session could not be established at all.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SessionError::Unavailable(_) | SessionError::InvalidCredentials(_)
        )
    }
}

pub type SessionResult<T> = Result<T, SessionError>;
