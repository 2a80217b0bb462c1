use std::{fs, path::Path};

use serde_json::{Map, Value};
use tracing::debug;

use crate::session::{SessionError, SessionResult};

/// Admin client configuration inside a startup kit.
pub const FED_ADMIN_FILE: &str = "fed_admin.json";
/// Signature over [`FED_ADMIN_FILE`].
pub const FED_ADMIN_SIG_FILE: &str = "fed_admin.json.sig";

/// Reads and checks the admin configuration of a startup kit.
///
/// The file must exist and hold a JSON object; anything else means the kit
/// cannot authenticate and is reported as invalid credentials.
pub fn load_admin_config(startup_dir: &Path) -> SessionResult<Map<String, Value>> {
    let path = startup_dir.join(FED_ADMIN_FILE);
    let raw = fs::read_to_string(&path).map_err(|e| {
        SessionError::InvalidCredentials(format!("cannot read {}: {e}", path.display()))
    })?;

    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(map)) => {
            debug!(path = %path.display(), keys = map.len(), "admin config loaded");
            Ok(map)
        }
        Ok(_) => Err(SessionError::InvalidCredentials(format!(
            "{} is not a JSON object",
            path.display()
        ))),
        Err(e) => Err(SessionError::InvalidCredentials(format!(
            "{} is not valid JSON: {e}",
            path.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_object_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(FED_ADMIN_FILE), r#"{"admin": {"host": "h"}}"#).unwrap();
        let map = load_admin_config(dir.path()).unwrap();
        assert!(map.contains_key("admin"));
    }

    #[test]
    fn missing_or_malformed_config_is_invalid_credentials() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_admin_config(dir.path()),
            Err(SessionError::InvalidCredentials(_))
        ));

        fs::write(dir.path().join(FED_ADMIN_FILE), "[1, 2]").unwrap();
        assert!(matches!(
            load_admin_config(dir.path()),
            Err(SessionError::InvalidCredentials(_))
        ));

        fs::write(dir.path().join(FED_ADMIN_FILE), "{not json").unwrap();
        let err = load_admin_config(dir.path()).unwrap_err();
        assert!(err.is_configuration());
    }
}
