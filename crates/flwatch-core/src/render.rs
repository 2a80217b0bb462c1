//! Output stream: one JSON line per tick, plus an optional summary line.

use std::io::Write;

use time::{OffsetDateTime, UtcOffset, macros::format_description};

use flwatch_model::PollRecord;

use crate::{
    classify::{UnreachableKind, Verdict},
    error::CoreResult,
};

const UNKNOWN: &str = "unknown";
const SHORT_ID_CHARS: usize = 4;

/// Writes `record` as a single JSON line and flushes.
pub fn write_record(out: &mut impl Write, record: &PollRecord) -> CoreResult<()> {
    serde_json::to_writer(&mut *out, record)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

/// Writes one human-readable line and flushes.
pub fn write_summary(out: &mut impl Write, line: &str) -> CoreResult<()> {
    writeln!(out, "{line}")?;
    out.flush()?;
    Ok(())
}

/// `YYYY-MM-DDTHH:MM:SSZ` for a unix time in seconds.
pub fn iso_utc(t: f64) -> String {
    datetime(t, UtcOffset::UTC)
        .and_then(|dt| {
            dt.format(format_description!(
                "[year]-[month]-[day]T[hour]:[minute]:[second]Z"
            ))
            .ok()
        })
        .unwrap_or_default()
}

/// Summary line for a record; `verdict` is set for unreachable ticks.
pub fn summary_line(record: &PollRecord, verdict: Option<&Verdict>, offset: UtcOffset) -> String {
    let clock = datetime(record.t, offset)
        .and_then(|dt| dt.format(format_description!("[hour]:[minute]:[second]")).ok())
        .unwrap_or_else(|| "--:--:--".to_string());

    match verdict {
        Some(v) => {
            let clients = clients_segment(&v.last_clients);
            let secs = v.elapsed.as_secs();
            match v.kind {
                UnreachableKind::Draining => format!(
                    "[{clock}] DRAINING (~{secs}s) | server: DOWN | last job: {} | {clients}",
                    v.last_job_status.as_deref().unwrap_or(UNKNOWN),
                ),
                UnreachableKind::Hard => format!(
                    "[{clock}] ADMIN_UNREACHABLE (~{secs}s) | server: DOWN | {clients}"
                ),
            }
        }
        None => {
            let status = non_empty(record.status().as_str());
            let server = non_empty(
                record
                    .deploy_status()
                    .and_then(|d| d.server())
                    .unwrap_or_default(),
            );
            let clients = clients_segment(record.connected_clients());
            match record.round() {
                Some(round) => {
                    format!("[{clock}] {status} | server: {server} | round: {round} | {clients}")
                }
                None => format!("[{clock}] {status} | server: {server} | {clients}"),
            }
        }
    }
}

fn clients_segment(ids: &[String]) -> String {
    let short: Vec<&str> = ids.iter().map(|id| short_id(id)).collect();
    format!("clients: {} ({})", ids.len(), short.join(", "))
}

/// Last four characters of an id.
fn short_id(id: &str) -> &str {
    let start = id
        .char_indices()
        .rev()
        .nth(SHORT_ID_CHARS - 1)
        .map_or(0, |(i, _)| i);
    &id[start..]
}

fn non_empty(s: &str) -> &str {
    if s.is_empty() { UNKNOWN } else { s }
}

fn datetime(t: f64, offset: UtcOffset) -> Option<OffsetDateTime> {
    let nanos = (t * 1e9) as i128;
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .ok()
        .map(|dt| dt.to_offset(offset))
}

#[cfg(test)]
mod tests {
    use std::{path::PathBuf, time::Duration};

    use super::*;
    use flwatch_model::{DeployStatus, DownSnapshot, JobSnapshot, RecordBody, WatchStatus};

    // 2023-11-14T22:13:20Z
    const T: f64 = 1_700_000_000.25;

    fn record(body: RecordBody) -> PollRecord {
        PollRecord {
            t: T,
            ts: iso_utc(T),
            startup_dir: PathBuf::from("/kit/startup"),
            username: "admin@admin.com".into(),
            system_info: None,
            system_info_error: None,
            body,
        }
    }

    fn clients() -> Vec<String> {
        vec!["65a1f0c2e4b7d9a8c3f1e2d4".into(), "site-9ab1".into(), "x".into()]
    }

    fn verdict(kind: UnreachableKind) -> Verdict {
        Verdict {
            kind,
            elapsed: Duration::from_millis(42_900),
            last_job_status: Some("RUNNING".into()),
            last_clients: clients(),
            consecutive: 1,
        }
    }

    #[test]
    fn iso_timestamp_is_utc_seconds() {
        assert_eq!(iso_utc(T), "2023-11-14T22:13:20Z");
    }

    #[test]
    fn record_is_one_flushed_json_line() {
        let mut out = Vec::new();
        write_record(&mut out, &record(RecordBody::Reachable(JobSnapshot::idle()))).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with('\n'));
        assert_eq!(text.lines().count(), 1);
        let v: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v["status"], "IDLE");
        assert_eq!(v["ts"], "2023-11-14T22:13:20Z");
    }

    #[test]
    fn reachable_summary_with_round() {
        let rec = record(RecordBody::Reachable(JobSnapshot {
            status: WatchStatus::Job("RUNNING".into()),
            round: Some(3),
            deploy_status: Some(DeployStatus::server_ok()),
            connected_clients: Some(clients()),
            ..Default::default()
        }));
        assert_eq!(
            summary_line(&rec, None, UtcOffset::UTC),
            "[22:13:20] RUNNING | server: OK | round: 3 | clients: 3 (e2d4, 9ab1, x)"
        );
    }

    #[test]
    fn reachable_summary_without_round_or_server() {
        let rec = record(RecordBody::Reachable(JobSnapshot {
            status: WatchStatus::Job("STARTED".into()),
            ..Default::default()
        }));
        assert_eq!(
            summary_line(&rec, None, UtcOffset::UTC),
            "[22:13:20] STARTED | server: unknown | clients: 0 ()"
        );
    }

    #[test]
    fn unreachable_summaries() {
        let rec = record(RecordBody::Unreachable(DownSnapshot::new(
            WatchStatus::Draining,
            clients(),
        )));
        assert_eq!(
            summary_line(&rec, Some(&verdict(UnreachableKind::Draining)), UtcOffset::UTC),
            "[22:13:20] DRAINING (~42s) | server: DOWN | last job: RUNNING | clients: 3 (e2d4, 9ab1, x)"
        );
        assert_eq!(
            summary_line(&rec, Some(&verdict(UnreachableKind::Hard)), UtcOffset::UTC),
            "[22:13:20] ADMIN_UNREACHABLE (~42s) | server: DOWN | clients: 3 (e2d4, 9ab1, x)"
        );
    }

    #[test]
    fn clock_uses_the_given_offset() {
        let rec = record(RecordBody::Reachable(JobSnapshot::idle()));
        let offset = UtcOffset::from_hms(2, 0, 0).unwrap();
        assert!(summary_line(&rec, None, offset).starts_with("[00:13:20] IDLE | server: OK"));
    }

    #[test]
    fn short_ids_are_char_safe() {
        assert_eq!(short_id("abcdef"), "cdef");
        assert_eq!(short_id("ab"), "ab");
        assert_eq!(short_id("xxé€ab"), "é€ab");
    }
}
