use std::{
    io,
    process::Stdio,
    sync::atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use serde_json::Value;
use tokio::{process::Command, time::timeout};
use tracing::{debug, info, trace};

use flwatch_core::session::{
    AdminSession, SessionError, SessionResult, SessionTarget, load_admin_config,
};
use flwatch_model::SystemInfo;

use crate::{
    config::{
        BridgeConfig, ENV_ADMIN_PASSWORD, ENV_ADMIN_STARTUP, ENV_ADMIN_USER, ENV_ADMIN_WORKSPACE,
    },
    op::BridgeOp,
};

/// Session whose operations are answered by the bridge program.
#[derive(Debug)]
pub struct BridgeSession {
    config: BridgeConfig,
    target: SessionTarget,
    closed: AtomicBool,
}

/// Opens a session for `target`.
///
/// Fails when the kit has no usable `fed_admin.json`, when the bridge cannot
/// be started, or when its `check` operation does not succeed. All of these
/// are configuration errors (see [`SessionError::is_configuration`]).
pub async fn connect(config: BridgeConfig, target: SessionTarget) -> SessionResult<BridgeSession> {
    config.validate()?;
    config.trace_state();
    load_admin_config(&target.startup_dir)?;

    let session = BridgeSession {
        config,
        target,
        closed: AtomicBool::new(false),
    };
    session.call(BridgeOp::Check).await.map_err(|e| {
        if e.is_configuration() {
            e
        } else {
            SessionError::Unavailable(e.to_string())
        }
    })?;

    info!(
        program = %session.config.program,
        user = %session.target.username,
        startup_dir = %session.target.startup_dir.display(),
        "admin session established"
    );
    Ok(session)
}

impl BridgeSession {
    fn command(&self, op: &BridgeOp) -> Command {
        let mut cmd = Command::new(&self.config.program);
        cmd.args(&self.config.args).args(op.argv());
        cmd.env(ENV_ADMIN_USER, &self.target.username)
            .env(ENV_ADMIN_WORKSPACE, &self.target.workspace)
            .env(ENV_ADMIN_STARTUP, &self.target.startup_dir);
        if let Some(password) = &self.target.password {
            cmd.env(ENV_ADMIN_PASSWORD, password);
        }
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);
        cmd
    }

    /// Runs one operation and returns its standard output.
    async fn call(&self, op: BridgeOp) -> SessionResult<String> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(SessionError::Closed);
        }
        let name = op.name();
        trace!(op = name, argv = ?op.argv(), "invoking bridge");

        let child = self
            .command(&op)
            .spawn()
            .map_err(|e| spawn_error(&self.config.program, name, e))?;

        let output = match timeout(self.config.timeout, child.wait_with_output()).await {
            Ok(res) => res.map_err(|e| SessionError::query(name, format!("wait failed: {e}")))?,
            Err(_) => {
                debug!(op = name, "bridge call timed out; child killed");
                return Err(SessionError::Timeout {
                    op: name,
                    timeout_ms: self.config.timeout.as_millis() as u64,
                });
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            let message = if !stderr.is_empty() {
                stderr.to_string()
            } else if let Some(code) = output.status.code() {
                format!("bridge exited with non-zero code: {code}")
            } else {
                "bridge terminated by signal".to_string()
            };
            return Err(SessionError::query(name, message));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn call_json(&self, op: BridgeOp) -> SessionResult<Value> {
        let name = op.name();
        let raw = self.call(op).await?;
        serde_json::from_str(raw.trim())
            .map_err(|e| SessionError::query(name, format!("invalid JSON from bridge: {e}")))
    }
}

fn spawn_error(program: &str, op: &'static str, e: io::Error) -> SessionError {
    match e.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
            SessionError::Unavailable(format!("cannot start '{program}': {e}"))
        }
        _ => SessionError::query(op, format!("spawn failed: {e}")),
    }
}

#[async_trait]
impl AdminSession for BridgeSession {
    async fn list_jobs(&self) -> SessionResult<Vec<Value>> {
        let op = BridgeOp::ListJobs;
        let name = op.name();
        let raw = self.call(op).await?;
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        match serde_json::from_str(raw.trim()) {
            Ok(Value::Array(jobs)) => Ok(jobs),
            Ok(_) => Err(SessionError::query(name, "bridge did not return a JSON array")),
            Err(e) => Err(SessionError::query(name, format!("invalid JSON from bridge: {e}"))),
        }
    }

    async fn get_job_meta(&self, job_id: &str) -> SessionResult<Value> {
        self.call_json(BridgeOp::JobMeta(job_id.to_string())).await
    }

    async fn get_system_info(&self) -> SessionResult<SystemInfo> {
        let raw = self.call(BridgeOp::SystemInfo).await?;
        Ok(SystemInfo::from_output(&raw))
    }

    async fn close(&self) -> SessionResult<()> {
        let result = self.call(BridgeOp::Close).await.map(|_| ());
        self.closed.store(true, Ordering::SeqCst);
        result
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::{
        fs,
        path::{Path, PathBuf},
        time::Duration,
    };

    use super::*;
    use flwatch_core::session::FED_ADMIN_FILE;

    const SCRIPT: &str = r#"
case "$1" in
  check) exit 0 ;;
  list-jobs) echo '[{"job_id": "j1"}, {"job_id": "j2"}]' ;;
  job-meta) printf '{"status": "RUNNING", "id": "%s", "user": "%s"}' "$2" "$FLWATCH_ADMIN_USER" ;;
  system-info) echo 'clients: 65a1f0c2e4b7d9a8c3f1e2d4' ;;
  env) printf '%s|%s|%s' "$FLWATCH_ADMIN_WORKSPACE" "$FLWATCH_ADMIN_STARTUP" "$FLWATCH_ADMIN_PASSWORD" ;;
  refuse) echo 'Failed to communicate with Admin Server: connection refused' >&2; exit 1 ;;
  close) exit 0 ;;
  *) exit 3 ;;
esac
"#;

    fn sh(script: &str) -> BridgeConfig {
        BridgeConfig::new("sh", vec!["-c".into(), script.into(), "bridge".into()])
    }

    fn kit() -> (tempfile::TempDir, PathBuf) {
        let root = tempfile::tempdir().unwrap();
        let startup = root.path().join("admin").join("startup");
        fs::create_dir_all(&startup).unwrap();
        fs::write(startup.join(FED_ADMIN_FILE), r#"{"admin": {}}"#).unwrap();
        (root, startup)
    }

    fn target(startup: &Path) -> SessionTarget {
        SessionTarget::new(startup, "ops@example.org")
    }

    #[tokio::test]
    async fn answers_every_operation() {
        let (_root, startup) = kit();
        let session = connect(sh(SCRIPT), target(&startup)).await.unwrap();

        let jobs = session.list_jobs().await.unwrap();
        assert_eq!(jobs.len(), 2);

        let meta = session.get_job_meta("j2").await.unwrap();
        assert_eq!(meta["id"], "j2");
        assert_eq!(meta["user"], "ops@example.org");

        let si = session.get_system_info().await.unwrap();
        assert_eq!(si, SystemInfo::Text("clients: 65a1f0c2e4b7d9a8c3f1e2d4\n".into()));

        session.close().await.unwrap();
        assert!(matches!(session.list_jobs().await, Err(SessionError::Closed)));
    }

    fn with_leading(arg: &str, target: SessionTarget) -> BridgeSession {
        let mut config = sh(SCRIPT);
        config.args.push(arg.into());
        BridgeSession {
            config,
            target,
            closed: AtomicBool::new(false),
        }
    }

    #[tokio::test]
    async fn kit_location_and_password_travel_in_the_environment() {
        let (root, startup) = kit();
        let session = with_leading("env", target(&startup).with_password(Some("s3cret".into())));

        let raw = session.call(BridgeOp::Check).await.unwrap();
        let parts: Vec<&str> = raw.split('|').collect();
        assert_eq!(PathBuf::from(parts[0]), root.path().join("admin"));
        assert_eq!(PathBuf::from(parts[1]), startup);
        assert_eq!(parts[2], "s3cret");
    }

    #[tokio::test]
    async fn missing_admin_config_is_invalid_credentials() {
        let root = tempfile::tempdir().unwrap();
        let err = connect(sh(SCRIPT), target(root.path()))
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::InvalidCredentials(_)));
    }

    #[tokio::test]
    async fn missing_program_is_unavailable() {
        let (_root, startup) = kit();
        let cfg = BridgeConfig::new("/definitely/not/a/bridge", vec![]);
        let err = connect(cfg, target(&startup)).await.unwrap_err();
        assert!(matches!(err, SessionError::Unavailable(_)));
    }

    #[tokio::test]
    async fn failing_check_is_unavailable() {
        let (_root, startup) = kit();
        let err = connect(sh("echo 'bad kit' >&2; exit 2"), target(&startup))
            .await
            .unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("bad kit"));
    }

    #[tokio::test]
    async fn stderr_becomes_the_error_message() {
        let (_root, startup) = kit();
        let session = with_leading("refuse", target(&startup));
        let err = session.get_system_info().await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "get_system_info failed: Failed to communicate with Admin Server: connection refused"
        );
    }

    #[tokio::test]
    async fn slow_bridge_times_out() {
        let (_root, startup) = kit();
        let session = BridgeSession {
            config: sh("sleep 5").with_timeout(Duration::from_millis(100)),
            target: target(&startup),
            closed: AtomicBool::new(false),
        };
        let err = session.get_system_info().await.unwrap_err();
        assert!(matches!(err, SessionError::Timeout { op: "get_system_info", timeout_ms: 100 }));
        assert!(err.to_string().contains("timed out"));
    }

    #[tokio::test]
    async fn non_array_job_listing_is_a_query_error() {
        let (_root, startup) = kit();
        let session = BridgeSession {
            config: sh(r#"echo '{"jobs": []}'"#),
            target: target(&startup),
            closed: AtomicBool::new(false),
        };
        let err = session.list_jobs().await.unwrap_err();
        assert!(matches!(err, SessionError::Query { op: "list_jobs", .. }));
    }
}
