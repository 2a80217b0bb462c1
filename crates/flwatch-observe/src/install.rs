use tracing_subscriber::{
    Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::{
    choice::LoggerFormat,
    clock::StampTimer,
    config::LoggerConfig,
    error::{LoggerError, LoggerResult},
};

#[cfg(target_os = "linux")]
const SYSLOG_IDENTIFIER: &str = "flwatch";

type OutputLayer = Box<dyn Layer<Registry> + Send + Sync>;

pub(crate) fn install(cfg: &LoggerConfig) -> LoggerResult<()> {
    tracing_subscriber::registry()
        .with(output_layer(cfg)?)
        .with(cfg.level.env_filter())
        .try_init()
        .map_err(|_| LoggerError::AlreadyInitialized)
}

fn output_layer(cfg: &LoggerConfig) -> LoggerResult<OutputLayer> {
    let timer = StampTimer(cfg.tz);
    let layer = match cfg.format {
        LoggerFormat::Text => fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(cfg.should_use_color())
            .with_target(cfg.with_targets)
            .with_timer(timer)
            .boxed(),
        LoggerFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .with_target(cfg.with_targets)
            .with_timer(timer)
            .boxed(),
        LoggerFormat::Journald => journald_layer()?,
    };
    Ok(layer)
}

#[cfg(target_os = "linux")]
fn journald_layer() -> LoggerResult<OutputLayer> {
    let layer = tracing_journald::layer()
        .map_err(|e| LoggerError::JournaldInitFailed(e.to_string()))?
        .with_syslog_identifier(SYSLOG_IDENTIFIER.to_string());
    Ok(layer.boxed())
}

#[cfg(not(target_os = "linux"))]
fn journald_layer() -> LoggerResult<OutputLayer> {
    Err(LoggerError::JournaldNotSupported)
}
