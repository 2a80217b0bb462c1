use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use flwatch_model::DeployStatus;

use crate::extract::{Strategy, first_success, first_truthy, is_truthy, scalar_text};

/// Status prefixes (case-insensitive) that mark a job as running.
pub const RUNNING_PREFIXES: [&str; 5] = ["RUNNING", "STARTED", "EXECUTING", "IN_PROGRESS", "PENDING"];

const JOB_ID_KEYS: [&str; 3] = ["job_id", "id", "jobId"];
const STATUS_KEYS: [&str; 3] = ["status", "state", "job_status"];

const ROUND_KEYS: [&str; 5] = [
    "round",
    "current_round",
    "FL_round",
    "server_round",
    "num_rounds_completed",
];
const ROUND_SECTIONS: [&str; 6] = [
    "training",
    "runtime",
    "progress",
    "stats",
    "controller",
    "aggregator",
];
const SECTION_ROUND_KEYS: [&str; 5] = ["current_round", "round", "server_round", "epoch", "iter"];

const DEPLOY_DETAIL_KEY: &str = "job_deploy_detail";
const DRAIN_FIELDS: [&str; 4] = ["status", "job_status", "server_status", "overall_status"];

static DRAIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bdrain(ing|ed)?\b").expect("drain pattern is valid"));

const ROUND_STRATEGIES: [Strategy<Value, i64>; 2] = [
    Strategy {
        name: "top_level_round",
        run: top_level_round,
    },
    Strategy {
        name: "section_round",
        run: section_round,
    },
];

/// The job selected as the one to report on.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveJob {
    pub id: String,
    pub status: String,
    pub round: Option<i64>,
    pub meta: Value,
}

impl ActiveJob {
    /// Builds the active job from its metadata, if the metadata says it is running.
    pub fn from_meta(id: String, meta: Value) -> Option<Self> {
        let status = job_status(&meta).filter(|s| is_running_status(s))?;
        Some(Self {
            round: round(&meta),
            id,
            status,
            meta,
        })
    }
}

/// Identifier of a job listing entry.
pub fn job_id(job: &Value) -> Option<String> {
    first_truthy(job.as_object()?, &JOB_ID_KEYS).map(scalar_text)
}

/// Status string of a job's metadata.
pub fn job_status(meta: &Value) -> Option<String> {
    first_truthy(meta.as_object()?, &STATUS_KEYS).map(scalar_text)
}

pub fn is_running_status(status: &str) -> bool {
    let upper = status.to_ascii_uppercase();
    RUNNING_PREFIXES.iter().any(|p| upper.starts_with(p))
}

/// Round number: top-level keys first, then one level into known sections.
pub fn round(meta: &Value) -> Option<i64> {
    first_success(&ROUND_STRATEGIES, meta)
}

/// Top-level keys count only when they hold an integer.
fn top_level_round(meta: &Value) -> Option<i64> {
    let map = meta.as_object()?;
    ROUND_KEYS.iter().find_map(|k| map.get(*k)?.as_i64())
}

/// The first non-null candidate inside a section decides; it yields a round
/// only if it reads as an integer.
fn section_round(meta: &Value) -> Option<i64> {
    let map = meta.as_object()?;
    let candidate = ROUND_SECTIONS
        .iter()
        .filter_map(|s| map.get(*s)?.as_object())
        .find_map(|section| {
            SECTION_ROUND_KEYS
                .iter()
                .filter_map(|k| section.get(*k))
                .find(|v| !v.is_null())
        })?;
    integer_of(candidate)
}

fn integer_of(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Deploy map from `job_deploy_detail` (or from a bare list of entries).
///
/// Returns `None` when no well-formed `"name: status"` entry exists.
pub fn deploy_status(meta_or_list: &Value) -> Option<DeployStatus> {
    let entries = match meta_or_list {
        Value::Object(map) => map.get(DEPLOY_DETAIL_KEY)?.as_array()?,
        Value::Array(list) => list,
        _ => return None,
    };
    let ds = DeployStatus::from_entries(entries.iter().filter_map(Value::as_str));
    (!ds.is_empty()).then_some(ds)
}

/// Whether any status-like field of the metadata mentions draining.
pub fn looks_draining(meta: &Value) -> bool {
    let Some(map) = meta.as_object() else {
        return false;
    };
    let text = DRAIN_FIELDS
        .iter()
        .filter_map(|k| map.get(*k))
        .filter(|v| is_truthy(v))
        .map(scalar_text)
        .collect::<Vec<_>>()
        .join(" ");
    DRAIN_RE.is_match(&text)
}
