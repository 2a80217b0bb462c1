use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::{ModelError, ModelResult},
    record::RECORD_KEYS,
};

/// Dotted path into job metadata, e.g. `training.lr`.
///
/// The path string is also the key the resolved value is published under, so
/// it may not be one of [`RECORD_KEYS`]: `status` would otherwise shadow the
/// record's own status, `DRAINING` included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldPath(String);

impl FieldPath {
    pub fn new(path: impl Into<String>) -> ModelResult<Self> {
        let path = path.into();
        if path.is_empty() || path.split('.').any(str::is_empty) {
            return Err(ModelError::InvalidFieldPath(path));
        }
        if RECORD_KEYS.contains(&path.as_str()) {
            return Err(ModelError::ReservedFieldPath(path));
        }
        Ok(Self(path))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// Walks `root` segment by segment through objects.
    ///
    /// A missing key or a non-object along the way yields `Value::Null`.
    pub fn resolve(&self, root: &Value) -> Value {
        let mut cur = root;
        for part in self.segments() {
            match cur.as_object().and_then(|m| m.get(part)) {
                Some(next) => cur = next,
                None => return Value::Null,
            }
        }
        cur.clone()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for FieldPath {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        Self::new(s.trim())
    }
}

impl TryFrom<String> for FieldPath {
    type Error = ModelError;
    fn try_from(s: String) -> ModelResult<Self> {
        Self::new(s)
    }
}

impl From<FieldPath> for String {
    fn from(p: FieldPath) -> Self {
        p.0
    }
}
