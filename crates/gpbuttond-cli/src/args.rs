//! Command-line and environment configuration.
//!
//! Every option can also be set through a `GPBD_*` environment variable, so
//! the daemon can be configured entirely from a service unit.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use clap::builder::BoolishValueParser;
use gpbuttond_core::constants::{
    DEFAULT_CHIP, DEFAULT_DEBOUNCE_MS, DEFAULT_DEVICE_NAME, DEFAULT_LONG_PRESS_MS,
    DEFAULT_REPEAT_MS, ENV_ACTIVE_HIGH, ENV_CHIP, ENV_DEBOUNCE, ENV_DEVICE_NAME, ENV_LONG,
    ENV_MAP, ENV_REPEAT,
};
use gpbuttond_core::{ActiveLevel, BindingTable, Error, Settings, TimerConfig};
use std::path::PathBuf;

const MAPPING_HELP: &str = "\
MAPPING
  Each entry binds a GPIO line to a decimal keycode, with an optional second
  keycode typed instead when the button is held past the long press time:

    <line>:<keycode>[:<long press keycode>],<line>:<keycode>,...

  Example:
    GPBD_MAP=19:103:1,6:108,26:105,5:28

  Buttons without a long press keycode repeat while held. Keycodes can be
  looked up with `showkey` on a raw TTY.

LINE NUMBERING
  Lines are numbered as reported by the GPIO chip (usually the SoC numbering),
  not by the physical pin layout of the board.

LINE PULL DIRECTION
  Lines are assumed to be pulled up, with buttons connecting them to ground.
  On a Raspberry Pi, lines 5 and 6 can be pulled up from config.txt with:
    gpio=5,6=pu
  Use --active-high for buttons wired to the supply rail instead.";

/// Turn GPIO button presses into keystrokes.
#[derive(Parser, Debug)]
#[command(name = "gpbuttond", version, about, after_help = MAPPING_HELP)]
pub struct Args {
    /// Line to keycode mapping
    #[arg(short, long, env = ENV_MAP, value_name = "MAPPING")]
    pub map: Option<String>,

    /// Debounce window in milliseconds (0 disables debouncing)
    #[arg(long, env = ENV_DEBOUNCE, value_name = "MS", default_value_t = DEFAULT_DEBOUNCE_MS)]
    pub debounce: u64,

    /// Interval between repeated keystrokes while a button is held
    #[arg(long, env = ENV_REPEAT, value_name = "MS", default_value_t = DEFAULT_REPEAT_MS)]
    pub repeat: u64,

    /// Hold time before the long press keycode fires
    #[arg(long, env = ENV_LONG, value_name = "MS", default_value_t = DEFAULT_LONG_PRESS_MS)]
    pub long: u64,

    /// GPIO character device
    #[arg(long, env = ENV_CHIP, value_name = "PATH", default_value = DEFAULT_CHIP)]
    pub chip: PathBuf,

    /// Name of the virtual keyboard
    #[arg(long, env = ENV_DEVICE_NAME, value_name = "NAME", default_value = DEFAULT_DEVICE_NAME)]
    pub device_name: String,

    /// Treat a high line level as pressed
    #[arg(
        long,
        env = ENV_ACTIVE_HIGH,
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    pub active_high: bool,

    /// Print the resolved configuration as JSON and exit
    #[arg(long)]
    pub print_config: bool,
}

impl Args {
    /// Validate the arguments and build the daemon settings.
    ///
    /// # Errors
    ///
    /// Fails if the mapping is missing or malformed, a timer is zero where
    /// that is not allowed, or the device name is blank.
    pub fn into_settings(self) -> Result<Settings> {
        let mapping = self
            .map
            .ok_or_else(|| Error::MissingConfig(ENV_MAP.to_string()))
            .context("no line mapping provided (see --help)")?;

        let bindings: BindingTable = mapping
            .parse()
            .with_context(|| format!("invalid line mapping '{mapping}'"))?;

        let timers = TimerConfig::from_millis(self.debounce, self.repeat, self.long)
            .context("invalid timer configuration")?;

        let active_level = if self.active_high {
            ActiveLevel::High
        } else {
            ActiveLevel::Low
        };

        let settings = Settings::new(bindings)
            .with_timers(timers)
            .with_chip(self.chip)
            .with_device_name(self.device_name)
            .with_active_level(active_level);
        settings.validate()?;

        Ok(settings)
    }
}
