use std::{fmt, path::PathBuf};

use crate::workspace::admin_workspace_from_startup;

/// Username used when neither a flag nor the environment names one.
pub const DEFAULT_USERNAME: &str = "admin@admin.com";

/// Everything a backend needs to open a session for one admin kit.
#[derive(Clone)]
pub struct SessionTarget {
    pub startup_dir: PathBuf,
    /// Parent of `startup_dir` when it ends in `startup`, else `startup_dir`.
    pub workspace: PathBuf,
    pub username: String,
    pub password: Option<String>,
}

impl SessionTarget {
    pub fn new(startup_dir: impl Into<PathBuf>, username: impl Into<String>) -> Self {
        let startup_dir = startup_dir.into();
        Self {
            workspace: admin_workspace_from_startup(&startup_dir),
            startup_dir,
            username: username.into(),
            password: None,
        }
    }

    pub fn with_password(mut self, password: Option<String>) -> Self {
        self.password = password;
        self
    }
}

impl fmt::Debug for SessionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionTarget")
            .field("startup_dir", &self.startup_dir)
            .field("workspace", &self.workspace)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
