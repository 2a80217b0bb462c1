//! Records emitted on the NDJSON stream.
//!
//! A record is a fixed header (`t`, `ts`, `startup_dir`, `username`, debug
//! system-info fields) followed by one of two bodies: the partial snapshot a
//! successful poll produced, or the synthetic "controller down" body written
//! when the admin endpoint could not be reached.
mod fingerprint;
pub use fingerprint::KitFingerprint;

use std::{collections::BTreeMap, path::PathBuf};

use serde::Serialize;
use serde_json::Value;

use crate::{ClientEntry, DeployStatus, WatchStatus};

/// Every key a record can carry on its own. Requested field paths are
/// published next to these and may not reuse them.
pub const RECORD_KEYS: [&str; 13] = [
    "t",
    "ts",
    "startup_dir",
    "username",
    "system_info",
    "system_info_error",
    "job_id",
    "status",
    "round",
    "deploy_status",
    "connected_clients",
    "connected_clients_detailed",
    "job_clients",
];

/// Partial record produced by one poll of a reachable controller.
///
/// Optional fields are omitted from the output when unknown.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JobSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    pub status: WatchStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deploy_status: Option<DeployStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connected_clients: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connected_clients_detailed: Option<Vec<ClientEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_clients: Option<Value>,
    /// Values of the requested dotted field paths, keyed by the path itself.
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl JobSnapshot {
    /// Snapshot for a controller that answered but has no running job.
    pub fn idle() -> Self {
        Self {
            status: WatchStatus::Idle,
            deploy_status: Some(DeployStatus::server_ok()),
            ..Default::default()
        }
    }

    /// Snapshot used when the job listing could not be read at all.
    pub fn unknown() -> Self {
        Self {
            status: WatchStatus::Unknown,
            deploy_status: Some(DeployStatus::server_ok()),
            ..Default::default()
        }
    }
}

/// Body written when the controller is unreachable.
///
/// `job_id` and `round` are always present and always `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DownSnapshot {
    pub job_id: Option<String>,
    pub status: WatchStatus,
    pub round: Option<i64>,
    pub deploy_status: DeployStatus,
    pub connected_clients: Vec<String>,
}

impl DownSnapshot {
    pub fn new(status: WatchStatus, last_clients: Vec<String>) -> Self {
        Self {
            job_id: None,
            status,
            round: None,
            deploy_status: DeployStatus::server_down(),
            connected_clients: last_clients,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RecordBody {
    Reachable(JobSnapshot),
    Unreachable(DownSnapshot),
}

/// One line of the output stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollRecord {
    /// Unix time in seconds.
    pub t: f64,
    /// UTC `YYYY-MM-DDTHH:MM:SSZ`.
    pub ts: String,
    pub startup_dir: PathBuf,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_info: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_info_error: Option<String>,
    #[serde(flatten)]
    pub body: RecordBody,
}

impl PollRecord {
    pub fn status(&self) -> &WatchStatus {
        match &self.body {
            RecordBody::Reachable(s) => &s.status,
            RecordBody::Unreachable(s) => &s.status,
        }
    }

    pub fn round(&self) -> Option<i64> {
        match &self.body {
            RecordBody::Reachable(s) => s.round,
            RecordBody::Unreachable(_) => None,
        }
    }

    pub fn deploy_status(&self) -> Option<&DeployStatus> {
        match &self.body {
            RecordBody::Reachable(s) => s.deploy_status.as_ref(),
            RecordBody::Unreachable(s) => Some(&s.deploy_status),
        }
    }

    /// Client ids carried by the record; empty when none were requested.
    pub fn connected_clients(&self) -> &[String] {
        match &self.body {
            RecordBody::Reachable(s) => s.connected_clients.as_deref().unwrap_or_default(),
            RecordBody::Unreachable(s) => &s.connected_clients,
        }
    }
}
