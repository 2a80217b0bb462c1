//! Locating the admin startup kit on disk.

use std::path::{Path, PathBuf};

/// Last path segment of an admin startup directory.
pub const STARTUP_SEGMENT: &str = "startup";

/// Workspace that owns a startup directory.
///
/// `…/admin/startup` → `…/admin`; any other directory is its own workspace.
pub fn admin_workspace_from_startup(startup_dir: &Path) -> PathBuf {
    if startup_dir.file_name().is_some_and(|n| n == STARTUP_SEGMENT) {
        if let Some(parent) = startup_dir.parent() {
            return parent.to_path_buf();
        }
    }
    startup_dir.to_path_buf()
}

/// Whether `dir` looks like an admin startup folder (its name is `startup`).
pub fn looks_like_startup_dir(dir: &Path) -> bool {
    std::path::absolute(dir)
        .unwrap_or_else(|_| dir.to_path_buf())
        .file_name()
        .is_some_and(|n| n == STARTUP_SEGMENT)
}

/// `<root>/runs/<consortium>/<run>/runKits/centralNode/admin/startup`,
/// returned only when that directory exists.
pub fn derive_startup_from_triple(root: &Path, consortium: &str, run: &str) -> Option<PathBuf> {
    let candidate = root
        .join("runs")
        .join(consortium)
        .join(run)
        .join("runKits")
        .join("centralNode")
        .join("admin")
        .join(STARTUP_SEGMENT);
    candidate.is_dir().then_some(candidate)
}
