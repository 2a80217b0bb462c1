use std::{fmt, time::Duration};

use tracing::trace;

use flwatch_core::session::{SessionError, SessionResult};

/// Bridge program looked up on `PATH` when none is configured.
pub const DEFAULT_BRIDGE_PROGRAM: &str = "nvflare-admin-bridge";
/// Upper bound on a single bridge invocation.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(15);

pub const ENV_ADMIN_USER: &str = "FLWATCH_ADMIN_USER";
pub const ENV_ADMIN_WORKSPACE: &str = "FLWATCH_ADMIN_WORKSPACE";
pub const ENV_ADMIN_STARTUP: &str = "FLWATCH_ADMIN_STARTUP";
pub const ENV_ADMIN_PASSWORD: &str = "FLWATCH_ADMIN_PASSWORD";

/// How to invoke the bridge program.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Program name or path.
    pub program: String,
    /// Leading arguments placed before the operation name.
    pub args: Vec<String>,
    /// Per-call timeout.
    pub timeout: Duration,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_BRIDGE_PROGRAM.to_string(),
            args: Vec::new(),
            timeout: DEFAULT_CALL_TIMEOUT,
        }
    }
}

impl BridgeConfig {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Rules:
    /// - `program` is not empty or whitespace-only;
    /// - `timeout` is not zero.
    pub fn validate(&self) -> SessionResult<()> {
        if self.program.trim().is_empty() {
            return Err(SessionError::Unavailable("bridge program is empty".into()));
        }
        if self.timeout.is_zero() {
            return Err(SessionError::Unavailable("bridge timeout cannot be zero".into()));
        }
        Ok(())
    }

    pub fn trace_state(&self) {
        trace!(
            program = %self.program,
            args = ?self.args,
            timeout_ms = self.timeout.as_millis() as u64,
            "bridge config resolved"
        );
    }
}

impl fmt::Display for BridgeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BridgeConfig(program='{}', args={}, timeout={:?})",
            self.program,
            self.args.len(),
            self.timeout,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_stock_bridge() {
        let cfg = BridgeConfig::default();
        assert_eq!(cfg.program, DEFAULT_BRIDGE_PROGRAM);
        assert_eq!(cfg.timeout, Duration::from_secs(15));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn empty_program_or_zero_timeout_is_rejected() {
        let err = BridgeConfig::new("  ", vec![]).validate().unwrap_err();
        assert!(err.is_configuration());

        let err = BridgeConfig::default()
            .with_timeout(Duration::ZERO)
            .validate()
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn display_is_compact() {
        let cfg = BridgeConfig::new("bridge", vec!["-v".into()]);
        assert_eq!(cfg.to_string(), "BridgeConfig(program='bridge', args=1, timeout=15s)");
    }
}
