use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("unknown log format '{0}' (expected text, json or journald)")]
    InvalidFormat(String),

    #[error("unknown log timezone '{0}' (expected utc or local)")]
    InvalidTimeZone(String),

    #[error("invalid log filter {0}")]
    InvalidLevel(String),

    #[error("journald logging is only available on Linux")]
    JournaldNotSupported,

    #[error("cannot connect to journald: {0}")]
    JournaldInitFailed(String),

    #[error("a diagnostic logger is already installed")]
    AlreadyInitialized,
}

pub type LoggerResult<T> = Result<T, LoggerError>;
