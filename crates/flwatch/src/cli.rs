use std::path::PathBuf;

use clap::Parser;

use flwatch_bridge::DEFAULT_BRIDGE_PROGRAM;
use flwatch_model::FieldPath;
use flwatch_observe::{LoggerFormat, LoggerLevel, LoggerTimeZone};

/// Flags that take a value; when the value is missing the flag is dropped
/// before parsing instead of failing the whole command line.
pub const VALUE_FLAGS: [&str; 13] = [
    "--startup",
    "--root",
    "--consortium",
    "--run",
    "--force-host",
    "--force-admin-port",
    "--preflight-interval",
    "--poll",
    "--drain-window",
    "--unreach-exit",
    "--admin-log-tail",
    "--admin-username",
    "--admin-password",
];

/// Session-only federated learning admin watcher.
///
/// Writes one JSON record per poll to standard output.
#[derive(Parser, Debug)]
#[command(name = "flwatch", version, about, long_about = None)]
pub struct Cli {
    /// Path to .../admin/startup (preferred).
    #[arg(long, help_heading = "Session selection")]
    pub startup: Option<PathBuf>,

    /// Root folder that contains `runs/`.
    #[arg(long, help_heading = "Session selection")]
    pub root: Option<PathBuf>,

    /// Consortium id (with --root/--run).
    #[arg(long, help_heading = "Session selection")]
    pub consortium: Option<String>,

    /// Run id (with --root/--consortium).
    #[arg(long, help_heading = "Session selection")]
    pub run: Option<String>,

    /// Seconds between polls.
    #[arg(long, default_value_t = 2.0, help_heading = "Output")]
    pub poll: f64,

    /// Also print a human-readable line per poll.
    #[arg(long, help_heading = "Output")]
    pub pretty: bool,

    /// Include client ids in records.
    #[arg(long, help_heading = "Output")]
    pub show_clients: bool,

    /// Include raw system info in records and raise the log level.
    #[arg(long, help_heading = "Output")]
    pub debug: bool,

    /// Extra dotted fields copied from job metadata into records.
    #[arg(long, num_args = 0.., value_name = "PATH", help_heading = "Output")]
    pub fields: Vec<FieldPath>,

    /// Seconds after the last good poll during which silence is labeled DRAINING.
    #[arg(long, default_value_t = 180.0, help_heading = "Output")]
    pub drain_window: f64,

    /// Exit code used after consecutive unreachable polls.
    #[arg(long, value_name = "CODE")]
    pub unreach_exit: Option<i32>,

    /// Admin username (falls back to NVF_ADMIN_USER, then NVFLARE_ADMIN_USER).
    #[arg(long)]
    pub admin_username: Option<String>,

    /// Admin password (falls back to NVF_ADMIN_PWD, then NVFLARE_ADMIN_PWD).
    #[arg(long)]
    pub admin_password: Option<String>,

    /// Admin bridge program.
    #[arg(long, env = "FLWATCH_BRIDGE", default_value = DEFAULT_BRIDGE_PROGRAM, help_heading = "Admin bridge")]
    pub bridge: String,

    /// Argument passed to the bridge before the operation (repeatable).
    #[arg(long = "bridge-arg", value_name = "ARG", allow_hyphen_values = true, help_heading = "Admin bridge")]
    pub bridge_args: Vec<String>,

    /// Diagnostic filter expression, e.g. `warn` or `flwatch_core=debug,warn`.
    #[arg(long, value_name = "FILTER", help_heading = "Logging")]
    pub log_level: Option<LoggerLevel>,

    /// Diagnostic log format: text, json or journald.
    #[arg(long, default_value = "text", help_heading = "Logging")]
    pub log_format: LoggerFormat,

    /// Timezone for diagnostic timestamps: utc or local.
    #[arg(long, default_value = "utc", help_heading = "Logging")]
    pub log_tz: LoggerTimeZone,

    #[command(flatten)]
    pub legacy: LegacyArgs,
}

/// Flags older launchers still pass. Accepted and ignored.
#[derive(clap::Args, Debug, Default)]
#[allow(dead_code)]
pub struct LegacyArgs {
    #[arg(long, hide = true)]
    pub drain_window_legacy: Option<f64>,
    #[arg(long, hide = true)]
    pub resilient: bool,
    #[arg(long, hide = true)]
    pub use_internal_admin: bool,
    #[arg(long, hide = true)]
    pub force_host: Option<String>,
    #[arg(long, hide = true)]
    pub force_admin_port: Option<i64>,
    #[arg(long, hide = true)]
    pub monitor_latest: bool,
    #[arg(long, hide = true)]
    pub net_preflight: bool,
    #[arg(long, hide = true)]
    pub preflight_interval: Option<f64>,
    #[arg(long, hide = true)]
    pub preflight_once: bool,
    #[arg(long, hide = true)]
    pub admin_log_tail: Option<i64>,
    #[arg(long, hide = true)]
    pub insecure: bool,
}

/// Drops value flags that are followed by another flag or by nothing.
///
/// `args` excludes the program name.
pub fn sanitize_argv(args: Vec<String>) -> Vec<String> {
    let mut out = Vec::with_capacity(args.len());
    let mut iter = args.into_iter().peekable();
    while let Some(arg) = iter.next() {
        if !VALUE_FLAGS.contains(&arg.as_str()) {
            out.push(arg);
            continue;
        }
        match iter.next_if(|next| !next.starts_with('-')) {
            Some(value) => {
                out.push(arg);
                out.push(value);
            }
            None => eprintln!("[warn] Dropping orphan flag '{arg}' with no value"),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|a| a.to_string()).collect()
    }

    fn parse(args: &[&str]) -> Cli {
        let mut full = vec!["flwatch".to_string()];
        full.extend(sanitize_argv(argv(args)));
        Cli::try_parse_from(full).unwrap()
    }

    #[test]
    fn orphan_value_flags_are_dropped() {
        assert_eq!(
            sanitize_argv(argv(&["--startup", "--pretty", "--poll"])),
            ["--pretty"]
        );
        assert_eq!(
            sanitize_argv(argv(&["--root", "/r", "--run", "--consortium", "c"])),
            ["--root", "/r", "--consortium", "c"]
        );
    }

    #[test]
    fn other_tokens_pass_through() {
        let args = argv(&["--show-clients", "--fields", "a.b", "c", "--poll=3"]);
        assert_eq!(sanitize_argv(args.clone()), args);
    }

    #[test]
    fn defaults() {
        let cli = parse(&["--startup", "/kit/startup"]);
        assert_eq!(cli.poll, 2.0);
        assert_eq!(cli.drain_window, 180.0);
        assert_eq!(cli.unreach_exit, None);
        assert!(!cli.pretty && !cli.show_clients && !cli.debug);
        assert!(cli.fields.is_empty());
        assert!(cli.log_level.is_none());
        assert_eq!(cli.log_format, LoggerFormat::Text);
    }

    #[test]
    fn fields_take_several_values_and_repeat() {
        let cli = parse(&["--fields", "training.lr", "stats.loss", "--pretty", "--fields", "x"]);
        let fields: Vec<&str> = cli.fields.iter().map(FieldPath::as_str).collect();
        assert_eq!(fields, ["training.lr", "stats.loss", "x"]);
        assert!(cli.pretty);
    }

    #[test]
    fn malformed_field_path_is_rejected() {
        assert!(Cli::try_parse_from(["flwatch", "--fields", "a..b"]).is_err());
    }

    #[test]
    fn field_named_like_a_record_key_is_rejected() {
        for key in ["status", "round"] {
            let err = Cli::try_parse_from(["flwatch", "--fields", key]).unwrap_err();
            assert!(err.to_string().contains("record key"), "{err}");
        }
        assert!(Cli::try_parse_from(["flwatch", "--fields", "status.detail"]).is_ok());
    }

    #[test]
    fn legacy_flags_are_accepted() {
        let cli = parse(&[
            "--startup",
            "/kit/startup",
            "--resilient",
            "--use-internal-admin",
            "--force-host",
            "server.example",
            "--force-admin-port",
            "8003",
            "--monitor-latest",
            "--net-preflight",
            "--preflight-interval",
            "5",
            "--preflight-once",
            "--admin-log-tail",
            "200",
            "--insecure",
            "--drain-window-legacy",
            "60",
        ]);
        assert_eq!(cli.startup.as_deref(), Some(std::path::Path::new("/kit/startup")));
    }

    #[test]
    fn orphan_legacy_flag_does_not_break_parsing() {
        let cli = parse(&["--force-host", "--pretty", "--unreach-exit", "9"]);
        assert!(cli.pretty);
        assert_eq!(cli.unreach_exit, Some(9));
    }

    #[test]
    fn bridge_arguments_may_look_like_flags() {
        let cli = parse(&["--bridge", "py-bridge", "--bridge-arg", "-u", "--bridge-arg", "/opt/bridge.py"]);
        assert_eq!(cli.bridge, "py-bridge");
        assert_eq!(cli.bridge_args, ["-u", "/opt/bridge.py"]);
    }

    #[test]
    fn logging_flags_are_validated() {
        let cli = parse(&["--log-level", "flwatch_core=debug,warn", "--log-format", "json"]);
        assert_eq!(cli.log_level.map(|l| l.as_str().to_string()).as_deref(), Some("flwatch_core=debug,warn"));
        assert_eq!(cli.log_format, LoggerFormat::Json);
        assert!(Cli::try_parse_from(["flwatch", "--log-format", "xml"]).is_err());
    }
}
