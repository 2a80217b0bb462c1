//! Closed sets of logger options spelled as lowercase words on the command
//! line and in serialized configuration.
use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::LoggerError;

/// Where diagnostic events go. `Text` and `Json` write to standard error;
/// `Journald` hands events to systemd-journald and is Linux only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
#[non_exhaustive]
pub enum LoggerFormat {
    #[default]
    Text,
    Json,
    Journald,
}

/// Zone used for diagnostic timestamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum LoggerTimeZone {
    #[default]
    Utc,
    Local,
}

/// Accepted spellings; the first entry for a variant is its canonical name.
const FORMATS: &[(&str, LoggerFormat)] = &[
    ("text", LoggerFormat::Text),
    ("plain", LoggerFormat::Text),
    ("json", LoggerFormat::Json),
    ("journald", LoggerFormat::Journald),
    ("journal", LoggerFormat::Journald),
];

const ZONES: &[(&str, LoggerTimeZone)] = &[
    ("utc", LoggerTimeZone::Utc),
    ("local", LoggerTimeZone::Local),
];

fn lookup<T: Copy>(table: &[(&'static str, T)], raw: &str) -> Option<T> {
    let key = raw.trim().to_ascii_lowercase();
    table.iter().find(|(name, _)| *name == key).map(|(_, v)| *v)
}

fn canonical<T: Copy + PartialEq>(table: &[(&'static str, T)], value: T) -> &'static str {
    table
        .iter()
        .find(|(_, v)| *v == value)
        .map_or("", |(name, _)| *name)
}

impl LoggerFormat {
    pub fn name(self) -> &'static str {
        canonical(FORMATS, self)
    }
}

impl LoggerTimeZone {
    pub fn name(self) -> &'static str {
        canonical(ZONES, self)
    }
}

impl FromStr for LoggerFormat {
    type Err = LoggerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match lookup(FORMATS, s) {
            Some(LoggerFormat::Journald) if !cfg!(target_os = "linux") => {
                Err(LoggerError::JournaldNotSupported)
            }
            Some(format) => Ok(format),
            None => Err(LoggerError::InvalidFormat(s.to_string())),
        }
    }
}

impl FromStr for LoggerTimeZone {
    type Err = LoggerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup(ZONES, s).ok_or_else(|| LoggerError::InvalidTimeZone(s.to_string()))
    }
}

macro_rules! spelled_as_name {
    ($($ty:ty),+) => {$(
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl From<$ty> for &'static str {
            fn from(value: $ty) -> Self {
                value.name()
            }
        }

        impl TryFrom<String> for $ty {
            type Error = LoggerError;
            fn try_from(s: String) -> Result<Self, Self::Error> {
                s.parse()
            }
        }
    )+};
}

spelled_as_name!(LoggerFormat, LoggerTimeZone);
