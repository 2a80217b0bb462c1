//! One best-effort read of the controller state.

use serde_json::json;
use tracing::{debug, warn};

use flwatch_model::{FieldPath, JobSnapshot, SystemInfo, WatchStatus};

use crate::{
    extract::{self, ActiveJob},
    session::{AdminSession, SessionResult},
};

const JOB_CLIENTS_KEY: &str = "job_clients";

/// What a poll collects beyond the job status.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PollOptions {
    /// Fetch system info and report connected clients.
    pub show_clients: bool,
    /// Dotted paths copied from the active job's metadata.
    pub fields: Vec<FieldPath>,
}

/// Polls jobs (and clients, when requested) into a partial record.
///
/// Never fails: an unreadable job listing becomes `UNKNOWN`, a failing
/// per-job metadata read is skipped over, and a failing client read leaves
/// the client lists empty.
pub async fn poll_once(session: &dyn AdminSession, opts: &PollOptions) -> JobSnapshot {
    let active = match find_active_job(session).await {
        Ok(active) => active,
        Err(e) => {
            warn!(error = %e, "job listing unavailable");
            return with_clients(JobSnapshot::unknown(), None, session, opts).await;
        }
    };

    let snap = match &active {
        Some(job) => JobSnapshot {
            job_id: Some(job.id.clone()),
            status: WatchStatus::Job(job.status.clone()),
            round: job.round,
            deploy_status: extract::deploy_status(&job.meta),
            ..Default::default()
        },
        None => JobSnapshot::idle(),
    };
    let mut snap = with_clients(snap, active.as_ref(), session, opts).await;

    if let Some(job) = &active {
        for path in &opts.fields {
            snap.fields
                .insert(path.as_str().to_string(), path.resolve(&job.meta));
        }
        if extract::looks_draining(&job.meta) {
            debug!(job_id = %job.id, "job metadata reports draining");
            snap.status = WatchStatus::Draining;
        }
    }
    snap
}

/// First job, in listing order, whose metadata reports a running status.
///
/// Metadata reads stop at the first running job; later jobs cannot change
/// the outcome.
async fn find_active_job(session: &dyn AdminSession) -> SessionResult<Option<ActiveJob>> {
    let jobs = session.list_jobs().await?;
    for job in &jobs {
        let Some(id) = extract::job_id(job) else {
            continue;
        };
        let meta = match session.get_job_meta(&id).await {
            Ok(meta) => meta,
            Err(e) => {
                warn!(job_id = %id, error = %e, "job metadata unavailable");
                json!({ "error": e.to_string() })
            }
        };
        if let Some(active) = ActiveJob::from_meta(id, meta) {
            return Ok(Some(active));
        }
    }
    Ok(None)
}

async fn with_clients(
    mut snap: JobSnapshot,
    active: Option<&ActiveJob>,
    session: &dyn AdminSession,
    opts: &PollOptions,
) -> JobSnapshot {
    if !opts.show_clients {
        return snap;
    }
    let si = match session.get_system_info().await {
        Ok(si) => si,
        Err(e) => {
            warn!(error = %e, "client listing unavailable");
            SystemInfo::Text(String::new())
        }
    };
    snap.connected_clients = Some(extract::client_ids(&si));
    snap.connected_clients_detailed = Some(extract::client_entries(&si));
    snap.job_clients = active
        .and_then(|job| job.meta.get(JOB_CLIENTS_KEY))
        .filter(|v| extract::is_truthy(v))
        .cloned();
    snap
}
