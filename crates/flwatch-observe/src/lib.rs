//! Diagnostic logging for the watcher.
//!
//! Everything emitted through `tracing` goes to standard error. Standard output
//! is reserved for the NDJSON record stream.
mod choice;
mod clock;
mod config;
mod error;
mod filter;
mod install;

pub use choice::{LoggerFormat, LoggerTimeZone};
pub use clock::{init_local_offset, local_offset};
pub use config::LoggerConfig;
pub use error::{LoggerError, LoggerResult};
pub use filter::LoggerLevel;

/// Installs the process-wide subscriber described by `cfg`.
///
/// Fails with [`LoggerError::AlreadyInitialized`] on a second call. With
/// [`LoggerTimeZone::Local`], call [`init_local_offset`] first.
///
/// ```rust
/// use flwatch_observe::{LoggerConfig, init_logger};
///
/// init_logger(&LoggerConfig::default()).expect("first install");
/// tracing::warn!("visible on stderr");
/// ```
pub fn init_logger(cfg: &LoggerConfig) -> LoggerResult<()> {
    install::install(cfg)
}
