use serde::{Deserialize, Serialize};

/// Connected client with its last check-in time when the controller reports one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientEntry {
    pub id: String,
    pub last_connect_time: Option<String>,
}

impl ClientEntry {
    pub fn new(id: impl Into<String>, last_connect_time: Option<String>) -> Self {
        Self {
            id: id.into(),
            last_connect_time,
        }
    }

    /// Entry with no known connect time.
    pub fn bare(id: impl Into<String>) -> Self {
        Self::new(id, None)
    }
}
