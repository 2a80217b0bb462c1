use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Component name the watcher reports its own view of the server under.
pub const SERVER_COMPONENT: &str = "server";
pub const SERVER_OK: &str = "OK";
pub const SERVER_DOWN: &str = "DOWN";

/// Per-component deploy state (`server`, client site names, ...).
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeployStatus(pub BTreeMap<String, String>);

impl DeployStatus {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// `{server: OK}`.
    pub fn server_ok() -> Self {
        Self::single(SERVER_COMPONENT, SERVER_OK)
    }

    /// `{server: DOWN}`.
    pub fn server_down() -> Self {
        Self::single(SERVER_COMPONENT, SERVER_DOWN)
    }

    pub fn single(name: impl Into<String>, status: impl Into<String>) -> Self {
        let mut out = Self::new();
        out.insert(name, status);
        out
    }

    pub fn insert(&mut self, name: impl Into<String>, status: impl Into<String>) {
        self.0.insert(name.into(), status.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn server(&self) -> Option<&str> {
        self.get(SERVER_COMPONENT)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Parses one `"name: status"` entry, splitting on the first colon.
    pub fn parse_entry(entry: &str) -> ModelResult<(String, String)> {
        let (name, status) = entry
            .split_once(':')
            .ok_or_else(|| ModelError::InvalidDeployEntry(entry.to_string()))?;
        Ok((name.trim().to_string(), status.trim().to_string()))
    }

    /// Builds a map from `"name: status"` entries; malformed entries are skipped.
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a str>) -> Self {
        let mut out = Self::new();
        for (name, status) in entries
            .into_iter()
            .filter_map(|e| Self::parse_entry(e).ok())
        {
            out.0.insert(name, status);
        }
        out
    }
}
