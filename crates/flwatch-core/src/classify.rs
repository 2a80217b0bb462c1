//! Telling a draining controller apart from a dead one.
//!
//! The controller goes quiet both when it shuts down gracefully at the end of
//! a run and when it crashes. The first case is recognised from what the last
//! successful poll saw: a running job with connected clients, recently.

use std::{sync::LazyLock, time::Duration};

use regex::Regex;
use tokio::time::Instant;

use flwatch_model::{PollRecord, WatchStatus};

/// Consecutive unreachable polls after which the watcher gives up.
pub const UNREACHABLE_THRESHOLD: u32 = 3;

/// How long after the last successful poll a silent controller may still be
/// draining.
pub const DEFAULT_DRAIN_WINDOW: Duration = Duration::from_secs(180);

static UNREACHABLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(Failed to communicate with Admin Server|ConnectionRefusedError|connection refused|ECONNREFUSED|timed out|Connection reset)",
    )
    .expect("unreachable pattern is valid")
});

/// Whether an error message means the controller could not be reached.
pub fn is_network_failure(message: &str) -> bool {
    UNREACHABLE_RE.is_match(message)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnreachableKind {
    Draining,
    Hard,
}

/// Outcome of classifying one unreachable tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub kind: UnreachableKind,
    /// Time since the last successful poll; zero if there never was one.
    pub elapsed: Duration,
    pub last_job_status: Option<String>,
    pub last_clients: Vec<String>,
    /// Unreachable ticks in a row, this one included.
    pub consecutive: u32,
}

impl Verdict {
    pub fn status(&self) -> WatchStatus {
        match self.kind {
            UnreachableKind::Draining => WatchStatus::Draining,
            UnreachableKind::Hard => WatchStatus::AdminUnreachable,
        }
    }

    pub fn threshold_reached(&self) -> bool {
        self.consecutive >= UNREACHABLE_THRESHOLD
    }
}

/// What the loop remembers between ticks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WatchState {
    pub last_ok: Option<Instant>,
    /// Uppercased status of the last successful poll.
    pub last_job_status: Option<String>,
    pub last_clients: Vec<String>,
    pub consecutive_unreachable: u32,
}

impl WatchState {
    /// Folds in a successful poll.
    pub fn on_reachable(self, now: Instant, record: &PollRecord) -> Self {
        let status = record.status().as_str().to_ascii_uppercase();
        Self {
            last_ok: Some(now),
            last_job_status: if status.is_empty() {
                self.last_job_status
            } else {
                Some(status)
            },
            last_clients: record.connected_clients().to_vec(),
            consecutive_unreachable: 0,
        }
    }

    /// Folds in an unreachable poll and classifies it.
    pub fn on_unreachable(mut self, now: Instant, drain_window: Duration) -> (Self, Verdict) {
        let elapsed = self
            .last_ok
            .map(|t| now.saturating_duration_since(t))
            .unwrap_or_default();
        let within_window = self.last_ok.is_some() && elapsed <= drain_window;
        let was_running = self
            .last_job_status
            .as_deref()
            .is_some_and(|s| s.starts_with("RUNNING"));
        let kind = if within_window && was_running && !self.last_clients.is_empty() {
            UnreachableKind::Draining
        } else {
            UnreachableKind::Hard
        };

        self.consecutive_unreachable += 1;
        let verdict = Verdict {
            kind,
            elapsed,
            last_job_status: self.last_job_status.clone(),
            last_clients: self.last_clients.clone(),
            consecutive: self.consecutive_unreachable,
        };
        (self, verdict)
    }
}
