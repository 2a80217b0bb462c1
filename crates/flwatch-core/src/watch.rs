//! The poll loop.
//!
//! Each tick reads system info first. A failure that looks like a network
//! problem sends the tick through the classifier and writes a synthetic
//! "controller down" record; anything else falls through to [`poll_once`].
//! Ticks never overlap: the next one starts only after the previous one has
//! been written and the poll interval has elapsed.

use std::{
    io::Write,
    path::PathBuf,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use time::UtcOffset;
use tokio::time::{Instant, sleep};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use flwatch_model::{DownSnapshot, PollRecord, RecordBody};

use crate::{
    classify::{DEFAULT_DRAIN_WINDOW, Verdict, WatchState, is_network_failure},
    error::CoreResult,
    poll::{PollOptions, poll_once},
    render,
    session::AdminSession,
};

/// Shortest pause between two ticks.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(500);
/// Shortest pause after a tick that failed.
pub const MIN_ERROR_BACKOFF: Duration = Duration::from_secs(1);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
pub const DEFAULT_UNREACHABLE_EXIT: i32 = 124;

#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Absolute startup directory, echoed in every record.
    pub startup_dir: PathBuf,
    pub username: String,
    pub poll_interval: Duration,
    /// Print a summary line after each record.
    pub pretty: bool,
    /// Copy system info (or its error) into each record.
    pub debug: bool,
    pub drain_window: Duration,
    pub unreachable_exit_code: i32,
    pub poll: PollOptions,
    /// Offset used for the summary line clock.
    pub local_offset: UtcOffset,
}

impl WatchConfig {
    pub fn new(startup_dir: PathBuf, username: String) -> Self {
        Self {
            startup_dir,
            username,
            poll_interval: DEFAULT_POLL_INTERVAL,
            pretty: false,
            debug: false,
            drain_window: DEFAULT_DRAIN_WINDOW,
            unreachable_exit_code: DEFAULT_UNREACHABLE_EXIT,
            poll: PollOptions::default(),
            local_offset: UtcOffset::UTC,
        }
    }
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchExit {
    Interrupted,
    /// The controller stayed unreachable for too many ticks in a row.
    Unreachable { code: i32, consecutive: u32 },
}

enum Step {
    Sleep(Duration),
    Exit(WatchExit),
}

/// Polls until cancelled or until the controller is declared unreachable.
///
/// Records go to `out`. The session is closed on every exit path.
pub async fn watch<W: Write>(
    session: &dyn AdminSession,
    cfg: &WatchConfig,
    out: &mut W,
    cancel: CancellationToken,
) -> WatchExit {
    info!(
        startup_dir = %cfg.startup_dir.display(),
        poll_ms = cfg.poll_interval.as_millis() as u64,
        "watch loop started"
    );
    let mut state = WatchState::default();

    let exit = loop {
        let (next, result) = tokio::select! {
            biased;
            _ = cancel.cancelled() => break WatchExit::Interrupted,
            r = tick(session, cfg, out, std::mem::take(&mut state)) => r,
        };
        state = next;

        let pause = match result {
            Ok(Step::Exit(exit)) => break exit,
            Ok(Step::Sleep(pause)) => pause,
            Err(e) => {
                error!(error = %e, "poll tick failed");
                cfg.poll_interval.max(MIN_ERROR_BACKOFF)
            }
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => break WatchExit::Interrupted,
            _ = sleep(pause) => {}
        }
    };

    if let Err(e) = session.close().await {
        debug!(error = %e, "session close failed");
    }
    info!(?exit, "watch loop stopped");
    exit
}

async fn tick<W: Write>(
    session: &dyn AdminSession,
    cfg: &WatchConfig,
    out: &mut W,
    state: WatchState,
) -> (WatchState, CoreResult<Step>) {
    let now = Instant::now();
    let t = unix_now();
    let pause = cfg.poll_interval.max(MIN_POLL_INTERVAL);

    let mut system_info = None;
    let mut system_info_error = None;
    let mut unreachable = false;
    match session.get_system_info().await {
        Ok(si) => {
            if cfg.debug {
                system_info = Some(si.to_value());
            }
        }
        Err(e) => {
            let message = e.to_string();
            unreachable = is_network_failure(&message);
            if !unreachable {
                warn!(error = %message, "system info unavailable");
            }
            if cfg.debug {
                system_info_error = Some(message);
            }
        }
    }

    let header = |body| PollRecord {
        t,
        ts: render::iso_utc(t),
        startup_dir: cfg.startup_dir.clone(),
        username: cfg.username.clone(),
        system_info,
        system_info_error,
        body,
    };

    if unreachable {
        let (state, verdict) = state.on_unreachable(now, cfg.drain_window);
        let body = DownSnapshot::new(verdict.status(), verdict.last_clients.clone());
        let record = header(RecordBody::Unreachable(body));
        warn!(
            status = %verdict.status(),
            consecutive = verdict.consecutive,
            "admin endpoint unreachable"
        );
        let result = emit(out, cfg, &record, Some(&verdict)).map(|()| {
            if verdict.threshold_reached() {
                eprintln!(
                    "[fatal] Admin unreachable ({} consecutive polls). Exiting {}.",
                    verdict.consecutive, cfg.unreachable_exit_code
                );
                Step::Exit(WatchExit::Unreachable {
                    code: cfg.unreachable_exit_code,
                    consecutive: verdict.consecutive,
                })
            } else {
                Step::Sleep(pause)
            }
        });
        return (state, result);
    }

    let snap = poll_once(session, &cfg.poll).await;
    let record = header(RecordBody::Reachable(snap));
    let state = state.on_reachable(now, &record);
    debug!(status = %record.status(), round = ?record.round(), "poll completed");
    let result = emit(out, cfg, &record, None).map(|()| Step::Sleep(pause));
    (state, result)
}

fn emit<W: Write>(
    out: &mut W,
    cfg: &WatchConfig,
    record: &PollRecord,
    verdict: Option<&Verdict>,
) -> CoreResult<()> {
    render::write_record(out, record)?;
    if cfg.pretty {
        let line = render::summary_line(record, verdict, cfg.local_offset);
        render::write_summary(out, &line)?;
    }
    Ok(())
}

fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_default()
}
