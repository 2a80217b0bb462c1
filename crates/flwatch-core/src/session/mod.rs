//! Boundary to the remote admin controller.
//!
//! The watcher never speaks the controller protocol itself. It talks to an
//! [`AdminSession`], whose answers are treated as loosely shaped: job entries
//! and metadata are arbitrary JSON, and system information may be a plain text
//! dump (see [`flwatch_model::SystemInfo`]).
mod credentials;
pub use credentials::{FED_ADMIN_FILE, FED_ADMIN_SIG_FILE, load_admin_config};

mod error;
pub use error::{SessionError, SessionResult};

mod target;
pub use target::{DEFAULT_USERNAME, SessionTarget};

#[cfg(test)]
pub(crate) mod scripted;

use async_trait::async_trait;
use serde_json::Value;

use flwatch_model::SystemInfo;

/// Authenticated control channel to the controller.
///
/// Calls are issued one at a time from the watch loop; implementations bound
/// each call with their own timeout.
#[async_trait]
pub trait AdminSession: Send + Sync {
    /// Detailed job listing, in the order the controller returns it.
    async fn list_jobs(&self) -> SessionResult<Vec<Value>>;

    /// Metadata of one job.
    async fn get_job_meta(&self, job_id: &str) -> SessionResult<Value>;

    /// Server and client information.
    async fn get_system_info(&self) -> SessionResult<SystemInfo>;

    /// Releases the session. Called once, on every exit path of the loop.
    async fn close(&self) -> SessionResult<()>;
}
