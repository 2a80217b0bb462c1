use std::{fmt, sync::OnceLock};

use time::{OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339};
use tracing_subscriber::fmt::{format::Writer, time::FormatTime};

use crate::choice::LoggerTimeZone;

static LOCAL_OFFSET: OnceLock<UtcOffset> = OnceLock::new();

fn detect() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

/// Detects the local UTC offset once and caches it for the process.
///
/// Most Unix platforms refuse detection once a second thread exists, so call
/// this from `main` before the runtime is built. Falls back to UTC.
pub fn init_local_offset() {
    LOCAL_OFFSET.get_or_init(detect);
}

/// Cached local offset, used for log timestamps and pretty summary clocks.
pub fn local_offset() -> UtcOffset {
    *LOCAL_OFFSET.get_or_init(detect)
}

impl LoggerTimeZone {
    pub fn offset(self) -> UtcOffset {
        match self {
            LoggerTimeZone::Utc => UtcOffset::UTC,
            LoggerTimeZone::Local => local_offset(),
        }
    }
}

/// Event timer writing RFC 3339 timestamps in the configured zone.
#[derive(Debug, Clone, Copy)]
pub(crate) struct StampTimer(pub(crate) LoggerTimeZone);

impl FormatTime for StampTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        let now = OffsetDateTime::now_utc().to_offset(self.0.offset());
        match now.format(&Rfc3339) {
            Ok(ts) => write!(w, "{ts} "),
            Err(_) => w.write_str("<bad-clock> "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cached_offset_is_plausible() {
        init_local_offset();
        assert!(local_offset().whole_hours().abs() <= 14);
        assert_eq!(local_offset(), LoggerTimeZone::Local.offset());
    }

    #[test]
    fn utc_stamps_end_in_zulu() {
        let mut buf = String::new();
        StampTimer(LoggerTimeZone::Utc)
            .format_time(&mut Writer::new(&mut buf))
            .unwrap();
        assert!(buf.ends_with("Z "), "unexpected stamp {buf:?}");
        assert!(OffsetDateTime::parse(buf.trim_end(), &Rfc3339).is_ok());
    }
}
