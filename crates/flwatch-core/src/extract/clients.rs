use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use flwatch_model::{ClientEntry, SystemInfo};

use crate::extract::{Strategy, first_success, first_truthy, scalar_text};

const CLIENT_INFO_KEY: &str = "client_info";
const CLIENT_LIST_KEYS: [&str; 3] = ["clients", "client_list", "all"];
const CLIENT_ID_KEYS: [&str; 3] = ["id", "name", "client_id"];

static CLIENT_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[0-9a-f]{24,}\b").expect("client id pattern is valid"));

static CLIENT_CONNECT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9a-f]{24,})\s*\(last_connect_time:\s*([^)]+)\)")
        .expect("client connect pattern is valid")
});

const CLIENT_ID_STRATEGIES: [Strategy<SystemInfo, Vec<String>>; 2] = [
    Strategy {
        name: "structured_clients",
        run: structured_ids,
    },
    Strategy {
        name: "textual_clients",
        run: textual_ids,
    },
];

/// Connected client identifiers; empty when nothing could be found.
pub fn client_ids(si: &SystemInfo) -> Vec<String> {
    first_success(&CLIENT_ID_STRATEGIES, si).unwrap_or_default()
}

/// Clients with their last connect time, read from the textual form.
///
/// Falls back to [`client_ids`] with unknown times when the text carries no
/// `(last_connect_time: …)` annotations.
pub fn client_entries(si: &SystemInfo) -> Vec<ClientEntry> {
    let text = si.to_text();
    let detailed: Vec<ClientEntry> = CLIENT_CONNECT_RE
        .captures_iter(&text)
        .map(|c| ClientEntry::new(&c[1], Some(c[2].trim().to_string())))
        .collect();
    if !detailed.is_empty() {
        return detailed;
    }
    client_ids(si).into_iter().map(ClientEntry::bare).collect()
}

fn structured_ids(si: &SystemInfo) -> Option<Vec<String>> {
    let info = si.as_map()?.get(CLIENT_INFO_KEY)?.as_object()?;
    let ids: Vec<String> = match first_truthy(info, &CLIENT_LIST_KEYS)? {
        Value::Array(list) => list
            .iter()
            .filter_map(|c| match c {
                Value::Object(obj) => first_truthy(obj, &CLIENT_ID_KEYS).map(scalar_text),
                other => Some(scalar_text(other)),
            })
            .collect(),
        Value::Object(map) => map.keys().cloned().collect(),
        _ => return None,
    };
    (!ids.is_empty()).then_some(ids)
}

fn textual_ids(si: &SystemInfo) -> Option<Vec<String>> {
    let text = si.to_text();
    let ids: Vec<String> = CLIENT_ID_RE
        .find_iter(&text)
        .map(|m| m.as_str().to_string())
        .collect();
    (!ids.is_empty()).then_some(ids)
}
