//! Process-wide configuration.
//!
//! [`TimerConfig`] and [`Settings`] are built once at startup and never
//! mutated afterwards; workers receive them by reference (or behind an
//! `Arc`) instead of reading global state.
//!
//! # Examples
//!
//! ```
//! use gpbuttond_core::{BindingTable, Settings, TimerConfig};
//! use std::time::Duration;
//!
//! let bindings: BindingTable = "19:103:1,6:108".parse().unwrap();
//! let timers = TimerConfig::from_millis(20, 150, 500).unwrap();
//!
//! let settings = Settings::new(bindings).with_timers(timers);
//! assert_eq!(settings.timers.repeat, Duration::from_millis(150));
//! assert_eq!(settings.chip.to_str(), Some("/dev/gpiochip0"));
//! ```

use crate::{
    ActiveLevel, BindingTable, Result,
    constants::{
        DEFAULT_CHIP, DEFAULT_DEBOUNCE_MS, DEFAULT_DEVICE_NAME, DEFAULT_LONG_PRESS_MS,
        DEFAULT_REPEAT_MS,
    },
    error::Error,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Timing parameters shared by every line.
///
/// Serialized as whole milliseconds (`debounce_ms`, `repeat_ms`,
/// `long_press_ms`). Deserializing goes through the same checks as
/// [`TimerConfig::from_millis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TimerMillis", into = "TimerMillis")]
pub struct TimerConfig {
    /// Quiet period required before an edge is trusted. Zero disables debouncing.
    pub debounce: Duration,

    /// Interval between repeated keystrokes while a button without a long
    /// keycode is held.
    pub repeat: Duration,

    /// Hold time after which the long keycode fires.
    pub long_press: Duration,
}

impl TimerConfig {
    /// Build a timer configuration from millisecond values.
    ///
    /// # Errors
    /// Returns `Error::InvalidDuration` if the repeat interval or the long
    /// press threshold is zero.
    pub fn from_millis(debounce_ms: u64, repeat_ms: u64, long_press_ms: u64) -> Result<Self> {
        let timers = Self {
            debounce: Duration::from_millis(debounce_ms),
            repeat: Duration::from_millis(repeat_ms),
            long_press: Duration::from_millis(long_press_ms),
        };
        timers.validate()?;
        Ok(timers)
    }

    /// Check that no timer that drives a wait loop is zero.
    ///
    /// # Errors
    /// Returns `Error::InvalidDuration` naming the first zero timer.
    pub fn validate(&self) -> Result<()> {
        for (name, duration) in [("repeat", self.repeat), ("long press", self.long_press)] {
            if duration.is_zero() {
                return Err(Error::InvalidDuration {
                    name: name.to_string(),
                    reason: "must be greater than 0ms".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Wire form of [`TimerConfig`].
#[derive(Serialize, Deserialize)]
struct TimerMillis {
    debounce_ms: u64,
    repeat_ms: u64,
    long_press_ms: u64,
}

impl TryFrom<TimerMillis> for TimerConfig {
    type Error = Error;

    fn try_from(raw: TimerMillis) -> Result<Self> {
        TimerConfig::from_millis(raw.debounce_ms, raw.repeat_ms, raw.long_press_ms)
    }
}

impl From<TimerConfig> for TimerMillis {
    fn from(timers: TimerConfig) -> Self {
        let millis = |duration: Duration| u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        Self {
            debounce_ms: millis(timers.debounce),
            repeat_ms: millis(timers.repeat),
            long_press_ms: millis(timers.long_press),
        }
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            repeat: Duration::from_millis(DEFAULT_REPEAT_MS),
            long_press: Duration::from_millis(DEFAULT_LONG_PRESS_MS),
        }
    }
}

/// Fully resolved daemon configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Line to keycode bindings.
    pub bindings: BindingTable,

    /// Debounce, repeat and long press timings.
    pub timers: TimerConfig,

    /// GPIO character device holding every monitored line.
    pub chip: PathBuf,

    /// Name given to the virtual keyboard.
    pub device_name: String,

    /// Line level that means "pressed".
    pub active_level: ActiveLevel,
}

impl Settings {
    /// Create settings with default timers and devices.
    #[must_use]
    pub fn new(bindings: BindingTable) -> Self {
        Self {
            bindings,
            timers: TimerConfig::default(),
            chip: PathBuf::from(DEFAULT_CHIP),
            device_name: DEFAULT_DEVICE_NAME.to_string(),
            active_level: ActiveLevel::default(),
        }
    }

    /// Set the timer configuration.
    #[must_use]
    pub fn with_timers(mut self, timers: TimerConfig) -> Self {
        self.timers = timers;
        self
    }

    /// Set the GPIO chip path.
    #[must_use]
    pub fn with_chip(mut self, chip: impl Into<PathBuf>) -> Self {
        self.chip = chip.into();
        self
    }

    /// Set the virtual keyboard name.
    #[must_use]
    pub fn with_device_name(mut self, name: impl Into<String>) -> Self {
        self.device_name = name.into();
        self
    }

    /// Set the active line level.
    #[must_use]
    pub fn with_active_level(mut self, level: ActiveLevel) -> Self {
        self.active_level = level;
        self
    }

    /// Check cross-field constraints that individual types cannot enforce.
    ///
    /// # Errors
    /// Returns `Error::InvalidDuration` if a timer is zero and
    /// `Error::Config` if the device name is blank.
    pub fn validate(&self) -> Result<()> {
        self.timers.validate()?;
        if self.device_name.trim().is_empty() {
            return Err(Error::Config("device name must not be empty".to_string()));
        }
        Ok(())
    }
}
