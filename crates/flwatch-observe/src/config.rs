use std::io::IsTerminal;

use serde::{Deserialize, Serialize};

use crate::{
    choice::{LoggerFormat, LoggerTimeZone},
    filter::LoggerLevel,
};

/// Diagnostic logger settings. Missing fields take their defaults when
/// deserialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub format: LoggerFormat,
    pub level: LoggerLevel,
    pub tz: LoggerTimeZone,
    /// Prefix text events with their module path.
    pub with_targets: bool,
    /// Colour text events; only honoured when standard error is a terminal.
    pub use_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::Text,
            level: LoggerLevel::default(),
            tz: LoggerTimeZone::Utc,
            with_targets: false,
            use_color: true,
        }
    }
}

impl LoggerConfig {
    pub(crate) fn should_use_color(&self) -> bool {
        self.use_color && std::io::stderr().is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_the_default() {
        let cfg: LoggerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.format, LoggerFormat::Text);
        assert_eq!(cfg.tz, LoggerTimeZone::Utc);
        assert_eq!(cfg.level, LoggerLevel::default());
        assert!(!cfg.with_targets);
        assert!(cfg.use_color);
    }

    #[test]
    fn explicit_fields_override_defaults() {
        let json = r#"{"format": "json", "level": "flwatch_core=debug,warn", "tz": "local"}"#;
        let cfg: LoggerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.format, LoggerFormat::Json);
        assert_eq!(cfg.level.as_str(), "flwatch_core=debug,warn");
        assert_eq!(cfg.tz, LoggerTimeZone::Local);
    }

    #[test]
    fn bad_level_fails_deserialization() {
        assert!(serde_json::from_str::<LoggerConfig>(r#"{"level": "x=nope"}"#).is_err());
    }
}
