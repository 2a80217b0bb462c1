/// One bridge invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum BridgeOp {
    Check,
    ListJobs,
    JobMeta(String),
    SystemInfo,
    Close,
}

impl BridgeOp {
    /// Operation name used in session errors.
    pub(crate) fn name(&self) -> &'static str {
        match self {
            BridgeOp::Check => "check",
            BridgeOp::ListJobs => "list_jobs",
            BridgeOp::JobMeta(_) => "get_job_meta",
            BridgeOp::SystemInfo => "get_system_info",
            BridgeOp::Close => "close",
        }
    }

    /// Trailing command-line arguments.
    pub(crate) fn argv(&self) -> Vec<&str> {
        match self {
            BridgeOp::Check => vec!["check"],
            BridgeOp::ListJobs => vec!["list-jobs"],
            BridgeOp::JobMeta(id) => vec!["job-meta", id],
            BridgeOp::SystemInfo => vec!["system-info"],
            BridgeOp::Close => vec!["close"],
        }
    }
}
