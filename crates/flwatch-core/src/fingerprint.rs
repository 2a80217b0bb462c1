//! Startup kit fingerprint, printed once so an operator can tell which
//! deployment a watcher is attached to without exposing the credentials.

use std::{
    fs::{self, File},
    io::{self, Read},
    path::{Path, PathBuf},
};

use sha2::{Digest, Sha256};
use tracing::debug;

use flwatch_model::KitFingerprint;

use crate::{
    session::{FED_ADMIN_FILE, FED_ADMIN_SIG_FILE},
    workspace::admin_workspace_from_startup,
};

/// Directory entries listed in the fingerprint.
pub const MAX_LISTED_FILES: usize = 12;

const HASH_CHUNK: usize = 1 << 16;

/// Computes the fingerprint of `startup_dir`. Never fails: unreadable pieces
/// come back as `None` or an empty listing.
pub fn kit_fingerprint(startup_dir: &Path) -> KitFingerprint {
    let workspace = admin_workspace_from_startup(startup_dir);
    KitFingerprint {
        startup_dir: absolute(startup_dir),
        workspace: absolute(&workspace),
        fed_admin_sha256: sha256_of(&startup_dir.join(FED_ADMIN_FILE)),
        sig_sha256: sha256_of(&startup_dir.join(FED_ADMIN_SIG_FILE)),
        files: list_sample(startup_dir),
    }
}

/// Hex SHA-256 of a file, streamed in 64 KiB chunks.
pub fn sha256_of(path: &Path) -> Option<String> {
    match hash_file(path) {
        Ok(digest) => Some(digest),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "file not hashed");
            None
        }
    }
}

fn hash_file(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; HASH_CHUNK];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

fn list_sample(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(Result::ok)
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| !name.starts_with('.'))
        .collect();
    names.sort();
    names.truncate(MAX_LISTED_FILES);
    names
}

pub(crate) fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
