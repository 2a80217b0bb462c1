use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::error::{LoggerError, LoggerResult};

const QUIET: &str = "warn";
const VERBOSE: &str = "debug";

/// `EnvFilter` directives such as `warn` or `flwatch_core=debug,warn`,
/// checked when constructed and kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LoggerLevel(String);

impl LoggerLevel {
    /// ```
    /// use flwatch_observe::LoggerLevel;
    ///
    /// let lvl = LoggerLevel::new("flwatch_bridge=trace,warn").unwrap();
    /// assert_eq!(lvl.as_str(), "flwatch_bridge=trace,warn");
    /// ```
    pub fn new(directives: impl Into<String>) -> LoggerResult<Self> {
        let directives = directives.into();
        match EnvFilter::try_new(&directives) {
            Ok(_) => Ok(Self(directives)),
            Err(e) => Err(LoggerError::InvalidLevel(format!("'{directives}': {e}"))),
        }
    }

    /// Filter used when debugging is requested without explicit directives.
    pub fn verbose() -> Self {
        Self(VERBOSE.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.0).unwrap_or_else(|_| EnvFilter::new(QUIET))
    }
}

impl Default for LoggerLevel {
    fn default() -> Self {
        Self(QUIET.to_string())
    }
}

impl std::str::FromStr for LoggerLevel {
    type Err = LoggerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for LoggerLevel {
    type Error = LoggerError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<LoggerLevel> for String {
    fn from(level: LoggerLevel) -> Self {
        level.0
    }
}
