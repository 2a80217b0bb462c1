//! Best-effort extraction over controller payloads.
//!
//! Payload shapes differ between controller versions, so each value is read
//! by a short list of named [`Strategy`]s tried in priority order. The first
//! strategy that produces something wins; the rest are not consulted.
mod clients;
pub use clients::{client_entries, client_ids};

mod job;
pub use job::{
    ActiveJob, deploy_status, is_running_status, job_id, job_status, looks_draining, round,
};

use serde_json::{Map, Value};
use tracing::trace;

/// A named extraction attempt.
pub struct Strategy<I: ?Sized, O> {
    pub name: &'static str,
    pub run: fn(&I) -> Option<O>,
}

/// Runs `strategies` in order and returns the first result.
pub fn first_success<I: ?Sized, O>(strategies: &[Strategy<I, O>], input: &I) -> Option<O> {
    strategies.iter().find_map(|s| {
        let out = (s.run)(input)?;
        trace!(strategy = s.name, "extraction strategy matched");
        Some(out)
    })
}

/// First key of `keys` whose value is present and truthy.
pub(crate) fn first_truthy<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| map.get(*k))
        .find(|v| is_truthy(v))
}

/// Loose truthiness: null, `false`, zero, and empty strings/containers are falsy.
pub(crate) fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Display form of a scalar: strings as-is, everything else as JSON.
pub(crate) fn scalar_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
