use std::{path::PathBuf, time::Duration};

use thiserror::Error;
use time::UtcOffset;

use flwatch_bridge::BridgeConfig;
use flwatch_core::{
    poll::PollOptions,
    session::{DEFAULT_USERNAME, SessionTarget},
    watch::{DEFAULT_UNREACHABLE_EXIT, WatchConfig},
    workspace::derive_startup_from_triple,
};
use flwatch_observe::{LoggerConfig, LoggerLevel};

use crate::cli::Cli;

/// Environment consulted, in order, when no username flag is given.
pub const USERNAME_ENV: [&str; 2] = ["NVF_ADMIN_USER", "NVFLARE_ADMIN_USER"];
/// Environment consulted, in order, when no password flag is given.
pub const PASSWORD_ENV: [&str; 2] = ["NVF_ADMIN_PWD", "NVFLARE_ADMIN_PWD"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "provide --startup OR the triple --root/--consortium/--run that resolves to .../admin/startup"
    )]
    MissingSelection,

    #[error("startup directory '{0}' does not exist")]
    StartupNotFound(PathBuf),

    #[error("--{flag} must be a finite number of seconds, got {value}")]
    InvalidSeconds { flag: &'static str, value: f64 },
}

/// Everything the process needs, resolved from flags, environment and defaults.
#[derive(Debug)]
pub struct Settings {
    /// Startup directory as given on the command line.
    pub startup_dir: PathBuf,
    pub target: SessionTarget,
    pub watch: WatchConfig,
    pub bridge: BridgeConfig,
    pub logger: LoggerConfig,
}

impl Settings {
    /// Resolves `cli`; `env` looks up environment variables.
    pub fn resolve(
        cli: &Cli,
        env: impl Fn(&str) -> Option<String>,
        local_offset: UtcOffset,
    ) -> Result<Self, ConfigError> {
        let startup_dir = resolve_startup(cli)?;
        let username = first_set(cli.admin_username.as_deref(), &USERNAME_ENV, &env)
            .unwrap_or_else(|| DEFAULT_USERNAME.to_string());
        let password = first_set(cli.admin_password.as_deref(), &PASSWORD_ENV, &env);

        let absolute = std::path::absolute(&startup_dir).unwrap_or_else(|_| startup_dir.clone());
        let target = SessionTarget::new(absolute.clone(), username.clone()).with_password(password);

        let watch = WatchConfig {
            poll_interval: seconds("poll", cli.poll)?,
            pretty: cli.pretty,
            debug: cli.debug,
            drain_window: seconds("drain-window", cli.drain_window)?,
            unreachable_exit_code: cli.unreach_exit.unwrap_or(DEFAULT_UNREACHABLE_EXIT),
            poll: PollOptions {
                show_clients: cli.show_clients,
                fields: cli.fields.clone(),
            },
            local_offset,
            ..WatchConfig::new(absolute, username)
        };

        let level = match (&cli.log_level, cli.debug) {
            (Some(level), _) => level.clone(),
            (None, true) => LoggerLevel::verbose(),
            (None, false) => LoggerLevel::default(),
        };
        let logger = LoggerConfig {
            format: cli.log_format,
            level,
            tz: cli.log_tz,
            ..Default::default()
        };

        Ok(Self {
            startup_dir,
            target,
            watch,
            bridge: BridgeConfig::new(cli.bridge.clone(), cli.bridge_args.clone()),
            logger,
        })
    }
}

/// `--startup` wins; otherwise the `--root/--consortium/--run` triple.
fn resolve_startup(cli: &Cli) -> Result<PathBuf, ConfigError> {
    let startup = match (&cli.startup, &cli.root, &cli.consortium, &cli.run) {
        (Some(startup), ..) => startup.clone(),
        (None, Some(root), Some(consortium), Some(run)) => {
            derive_startup_from_triple(root, consortium, run).ok_or(ConfigError::MissingSelection)?
        }
        _ => return Err(ConfigError::MissingSelection),
    };
    if !startup.is_dir() {
        return Err(ConfigError::StartupNotFound(startup));
    }
    Ok(startup)
}

/// Explicit non-empty value, else the first non-empty variable of `keys`.
fn first_set(
    explicit: Option<&str>,
    keys: &[&str],
    env: &impl Fn(&str) -> Option<String>,
) -> Option<String> {
    explicit
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .or_else(|| keys.iter().find_map(|k| env(k).filter(|v| !v.is_empty())))
}

/// Negative values clamp to zero; the loop applies its own minimum.
/// `NaN` and infinities are rejected.
fn seconds(flag: &'static str, value: f64) -> Result<Duration, ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::InvalidSeconds { flag, value });
    }
    Duration::try_from_secs_f64(value.max(0.0))
        .map_err(|_| ConfigError::InvalidSeconds { flag, value })
}
