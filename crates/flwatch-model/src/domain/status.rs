use std::fmt;

use serde::{Serialize, Serializer};

/// Status label carried by every record.
///
/// The watcher's own labels are fixed words; anything else is the raw status
/// string reported by the controller for the active job and is kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum WatchStatus {
    /// No running job was found.
    Idle,
    /// The job listing could not be read.
    #[default]
    Unknown,
    /// The controller is shutting down gracefully.
    Draining,
    /// The controller cannot be reached and is not draining.
    AdminUnreachable,
    /// Status reported by the controller for the active job.
    Job(String),
}

impl WatchStatus {
    pub fn as_str(&self) -> &str {
        match self {
            WatchStatus::Idle => "IDLE",
            WatchStatus::Unknown => "UNKNOWN",
            WatchStatus::Draining => "DRAINING",
            WatchStatus::AdminUnreachable => "ADMIN_UNREACHABLE",
            WatchStatus::Job(s) => s,
        }
    }
}

impl fmt::Display for WatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for WatchStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::WatchStatus;

    #[test]
    fn labels_serialize_as_fixed_words() {
        let cases = [
            (WatchStatus::Idle, "IDLE"),
            (WatchStatus::Unknown, "UNKNOWN"),
            (WatchStatus::Draining, "DRAINING"),
            (WatchStatus::AdminUnreachable, "ADMIN_UNREACHABLE"),
        ];
        for (status, label) in cases {
            assert_eq!(status.to_string(), label);
            assert_eq!(serde_json::to_value(&status).unwrap(), label);
        }
    }

    #[test]
    fn controller_status_is_kept_verbatim() {
        let status = WatchStatus::Job("RUNNING:abc".into());
        assert_eq!(serde_json::to_string(&status).unwrap(), r#""RUNNING:abc""#);
    }

    #[test]
    fn unknown_until_told_otherwise() {
        assert_eq!(WatchStatus::default(), WatchStatus::Unknown);
    }
}
