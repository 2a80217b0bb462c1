mod cli;
mod config;

use std::io::{self, Write};

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use flwatch_bridge::connect;
use flwatch_core::{
    fingerprint::kit_fingerprint,
    watch::{WatchExit, watch},
    workspace::looks_like_startup_dir,
};
use flwatch_observe::{init_local_offset, init_logger, local_offset};

use crate::{
    cli::{Cli, sanitize_argv},
    config::Settings,
};

/// Invalid or missing session selection.
const EXIT_USAGE: i32 = 2;
/// The admin session could not be established (sysexits `EX_CONFIG`).
const EXIT_CONFIG: i32 = 78;
/// Stopped by Ctrl-C.
const EXIT_INTERRUPTED: i32 = 128 + libc::SIGINT;

fn main() {
    let code = match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("[fatal] {e:#}");
            1
        }
    };
    std::process::exit(code);
}

fn run() -> anyhow::Result<i32> {
    let mut args = std::env::args();
    let program = args.next().unwrap_or_else(|| "flwatch".to_string());
    let cli = Cli::parse_from(std::iter::once(program).chain(sanitize_argv(args.collect())));

    // Must run while the process is still single-threaded.
    init_local_offset();

    let settings = match Settings::resolve(&cli, |k| std::env::var(k).ok(), local_offset()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("ERROR: {e}");
            return Ok(EXIT_USAGE);
        }
    };
    init_logger(&settings.logger)?;

    if !looks_like_startup_dir(&settings.startup_dir) {
        eprintln!(
            "NOTE: '{}' does not look like an admin/startup folder; using it as the workspace.",
            settings.startup_dir.display()
        );
    }

    let mut stdout = io::stdout().lock();
    writeln!(
        stdout,
        "[watcher:BOOT] startup_dir='{}' user={}",
        settings.startup_dir.display(),
        settings.target.username
    )?;
    let fingerprint = kit_fingerprint(&settings.startup_dir);
    writeln!(stdout, "[fingerprint] {}", serde_json::to_string(&fingerprint)?)?;
    stdout.flush()?;
    drop(stdout);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(serve(settings)))
}

async fn serve(settings: Settings) -> i32 {
    let cancel = CancellationToken::new();
    let trip = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => trip.cancel(),
            Err(e) => warn!(error = %e, "cannot listen for Ctrl-C"),
        }
    });

    let session = tokio::select! {
        biased;
        _ = cancel.cancelled() => return interrupted(),
        res = connect(settings.bridge, settings.target) => match res {
            Ok(session) => session,
            Err(e) => {
                eprintln!("[fatal] {e}");
                return EXIT_CONFIG;
            }
        },
    };

    let mut stdout = io::stdout().lock();
    match watch(&session, &settings.watch, &mut stdout, cancel).await {
        WatchExit::Interrupted => interrupted(),
        WatchExit::Unreachable { code, consecutive } => {
            info!(code, consecutive, "exiting: admin unreachable");
            code
        }
    }
}

fn interrupted() -> i32 {
    eprintln!("\nInterrupted. Exiting...");
    EXIT_INTERRUPTED
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_shell_conventions() {
        assert_eq!(EXIT_USAGE, 2);
        assert_eq!(EXIT_CONFIG, 78);
        assert_eq!(EXIT_INTERRUPTED, 130);
    }
}
