//! `gpbuttond`: GPIO buttons as a virtual keyboard.

mod args;
mod logging;

use anyhow::{Context, Result, bail};
use args::Args;
use clap::Parser;
use gpbuttond_core::{Settings, VERSION};
use gpbuttond_engine::{ButtonDaemon, DaemonHandle};
use gpbuttond_hardware::gpio::GpioChip;
use gpbuttond_hardware::uinput::UinputKeyboard;
use tokio::signal::unix::{SignalKind, signal};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let print_config = args.print_config;
    let settings = args.into_settings()?;

    if print_config {
        println!("{}", serde_json::to_string_pretty(&settings)?);
        return Ok(());
    }

    logging::init();
    info!("gpbuttond v{VERSION} - {}", env!("CARGO_PKG_REPOSITORY"));
    info!("Licensed under the GNU GPL version 3 (only), WITHOUT ANY WARRANTY");

    run(settings).await
}

async fn run(settings: Settings) -> Result<()> {
    let keyboard = UinputKeyboard::create(&settings.device_name, settings.bindings.keycodes())
        .context("failed to create virtual keyboard")?;

    let mut chip = GpioChip::open(&settings.chip)
        .with_context(|| format!("failed to open {}", settings.chip.display()))?;
    info!("Using GPIO chip {}", chip.info());

    let mut daemon = ButtonDaemon::new(settings.timers, keyboard);
    for binding in &settings.bindings {
        let source = chip
            .request_line(binding.line, settings.timers.debounce, settings.active_level)
            .with_context(|| format!("failed to request GPIO line {}", binding.line))?;
        daemon.register_line(*binding, source)?;
        info!("Mapped {binding}");
    }

    info!(
        "Timers: debounce {}ms, repeat {}ms, long press {}ms",
        settings.timers.debounce.as_millis(),
        settings.timers.repeat.as_millis(),
        settings.timers.long_press.as_millis()
    );

    let mut handle = daemon.start()?;
    let info = handle
        .keyboard()
        .get_info()
        .await
        .context("failed to query virtual keyboard")?;
    info!("Typing through {info}");

    let result = wait_for_shutdown(&mut handle).await;
    handle.shutdown().await;
    result
}

/// Block until SIGINT/SIGTERM, or until no line is left to monitor.
async fn wait_for_shutdown(handle: &mut DaemonHandle) -> Result<()> {
    let mut terminate =
        signal(SignalKind::terminate()).context("failed to install SIGTERM handler")?;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received SIGINT, shutting down");
                return Ok(());
            }
            _ = terminate.recv() => {
                info!("Received SIGTERM, shutting down");
                return Ok(());
            }
            exit = handle.next_exit() => match exit {
                Some(exit) => match exit.line() {
                    Some(line) => warn!(
                        "Stopped monitoring line {line}, {} line(s) left",
                        handle.running()
                    ),
                    None => warn!("A line dispatcher stopped, {} line(s) left", handle.running()),
                },
                None => bail!("every monitored line has failed"),
            },
        }
    }
}
