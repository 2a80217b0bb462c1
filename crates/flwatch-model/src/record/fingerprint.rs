use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Identity of the admin startup kit being watched.
///
/// Hashes are hex SHA-256 digests; `None` means the file was absent or
/// unreadable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KitFingerprint {
    pub startup_dir: PathBuf,
    pub workspace: PathBuf,
    pub fed_admin_sha256: Option<String>,
    pub sig_sha256: Option<String>,
    /// Up to twelve non-hidden entries of the startup directory, sorted.
    pub files: Vec<String>,
}
