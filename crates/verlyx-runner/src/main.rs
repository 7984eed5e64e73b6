//! Verlyx Hub - desktop runner entry point
//!
//! Loads the runner configuration, sets up logging, and hands control to the
//! platform's native window layer until the main window closes.

mod native;

use anyhow::Context;
use std::process::ExitCode;
use tracing::{error, info};
use verlyx_core::{init_logging, EntrypointArgs, LogConfig, RunnerConfig};

fn main() -> ExitCode {
    match run() {
        Ok(code) => ExitCode::from(exit_status(code)),
        Err(e) => {
            error!(error = %format!("{e:#}"), "Verlyx Hub failed to start");
            eprintln!("verlyx_hub: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<i32> {
    let loaded = RunnerConfig::load_or_default();

    // Log with defaults if the configuration itself is broken, so the
    // failure below is still reported through tracing.
    let log_config = match &loaded {
        Ok(config) => config.logging.to_log_config()?,
        Err(_) => LogConfig::default(),
    };
    init_logging(&log_config).context("failed to initialize logging")?;
    install_panic_hook();

    let config = loaded.context("failed to load configuration")?;
    print_startup_banner();

    let args = EntrypointArgs::from_env();
    info!(args = args.len(), "Entrypoint arguments collected");

    let code = native::run_native(&config, args)?;

    info!(code, "Verlyx Hub shutdown complete");
    Ok(code)
}

/// Map the event loop's exit code onto a process exit status; codes outside
/// `0..=255` become 1.
fn exit_status(code: i32) -> u8 {
    u8::try_from(code).unwrap_or(1)
}

/// Install panic hook for structured crash logging.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()));
        let message = panic_info
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| panic_info.payload().downcast_ref::<String>().map(String::as_str));

        error!(
            location = location.as_deref(),
            message = message,
            "PANIC - Verlyx Hub crashed"
        );

        default_hook(panic_info);
    }));
}

/// Print startup banner with build info.
fn print_startup_banner() {
    info!("=== Verlyx Hub ===");
    info!(version = env!("CARGO_PKG_VERSION"), "Startup");
    info!(
        target_os = std::env::consts::OS,
        target_arch = std::env::consts::ARCH,
        "Platform"
    );
}
