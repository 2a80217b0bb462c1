use serde::Serialize;
use serde_json::{Map, Value};

/// System information as returned by the admin backend.
///
/// The backend does not guarantee a structured answer: some controller
/// versions only hand back an opaque text dump. Both shapes are kept so the
/// extraction strategies can try structured access first and fall back to text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SystemInfo {
    Structured(Value),
    Text(String),
}

impl SystemInfo {
    /// Interprets raw backend output: JSON when it parses, text otherwise.
    pub fn from_output(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw.trim()) {
            Ok(Value::String(s)) => SystemInfo::Text(s),
            Ok(v) => SystemInfo::Structured(v),
            Err(_) => SystemInfo::Text(raw.to_string()),
        }
    }

    /// Mapping view, when the payload is a JSON object.
    pub fn as_map(&self) -> Option<&Map<String, Value>> {
        match self {
            SystemInfo::Structured(v) => v.as_object(),
            SystemInfo::Text(_) => None,
        }
    }

    /// String view used by the textual extraction strategies.
    pub fn to_text(&self) -> String {
        match self {
            SystemInfo::Structured(v) => v.to_string(),
            SystemInfo::Text(s) => s.clone(),
        }
    }

    /// Value copied into debug records.
    pub fn to_value(&self) -> Value {
        match self {
            SystemInfo::Structured(v) => v.clone(),
            SystemInfo::Text(s) => Value::String(s.clone()),
        }
    }
}
