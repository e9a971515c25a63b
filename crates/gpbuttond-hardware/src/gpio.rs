//! GPIO character device edge source.
//!
//! Lines are requested through the Linux GPIO chardev ABI (`/dev/gpiochipN`)
//! for both edges and read asynchronously. The v1 ABI offers neither bias
//! nor hardware debounce, so lines are expected to be pulled up (or down for
//! active-high wiring) by the board configuration, and every line is wrapped
//! in a software [`Debouncer`].
//!
//! # Examples
//!
//! ```no_run
//! use gpbuttond_core::{ActiveLevel, LineId};
//! use gpbuttond_hardware::gpio::GpioChip;
//! use gpbuttond_hardware::traits::EdgeSource;
//! use std::time::Duration;
//!
//! # async fn example() -> gpbuttond_hardware::Result<()> {
//! let mut chip = GpioChip::open("/dev/gpiochip0")?;
//! let mut line = chip.request_line(LineId::new(19), Duration::from_millis(20), ActiveLevel::Low)?;
//!
//! let event = line.next_edge().await?;
//! println!("line 19 went {}", event.edge);
//! # Ok(())
//! # }
//! ```

use crate::{
    HardwareError, Result,
    debounce::{Debouncer, RawLine},
    traits::EdgeSource,
    types::{DeviceInfo, Edge, EdgeEvent},
};
use futures::StreamExt;
use gpbuttond_core::{ActiveLevel, LineId, constants::CONSUMER_LABEL};
use gpio_cdev::{AsyncLineEventHandle, Chip, EventRequestFlags, LineRequestFlags};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// An opened GPIO chip.
pub struct GpioChip {
    chip: Chip,
    path: PathBuf,
}

impl std::fmt::Debug for GpioChip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GpioChip")
            .field("path", &self.path)
            .field("name", &self.chip.name())
            .field("lines", &self.chip.num_lines())
            .finish()
    }
}

impl GpioChip {
    /// Open a GPIO character device.
    ///
    /// # Errors
    ///
    /// Returns an error if the device does not exist or cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let chip = Chip::new(&path).map_err(|e| {
            HardwareError::initialization_failed(format!("{}: {e}", path.display()))
        })?;

        debug!(
            "Opened GPIO chip {} ({}, {} lines)",
            chip.name(),
            chip.label(),
            chip.num_lines()
        );

        Ok(Self { chip, path })
    }

    /// Describe the chip.
    pub fn info(&self) -> DeviceInfo {
        DeviceInfo::new(self.chip.name(), self.chip.label())
            .with_path(self.path.display().to_string())
    }

    /// Request `line` for edge events and wrap it in a debouncer.
    ///
    /// # Errors
    ///
    /// Returns an error if the line does not exist on this chip, is already
    /// in use, or cannot be registered with the async runtime.
    pub fn request_line(
        &mut self,
        line: LineId,
        debounce: Duration,
        active_level: ActiveLevel,
    ) -> Result<GpioEdgeSource> {
        if line.offset() >= self.chip.num_lines() {
            return Err(HardwareError::configuration(format!(
                "line {line} does not exist on {} ({} lines)",
                self.path.display(),
                self.chip.num_lines()
            )));
        }

        let handle = self
            .chip
            .get_line(line.offset())?
            .events(
                LineRequestFlags::INPUT,
                EventRequestFlags::BOTH_EDGES,
                CONSUMER_LABEL,
            )
            .map_err(|e| HardwareError::initialization_failed(format!("line {line}: {e}")))?;

        let initial = Edge::from_pressed(active_level.is_pressed(handle.get_value()?));
        let events = AsyncLineEventHandle::new(handle)?;

        debug!("Requested GPIO line {line}, initially {initial}");

        Ok(GpioEdgeSource {
            raw: GpioRawLine {
                events,
                line,
                active_level,
            },
            debouncer: Debouncer::new(debounce, initial),
        })
    }
}

/// Raw, undebounced view of a requested line.
struct GpioRawLine {
    events: AsyncLineEventHandle,
    line: LineId,
    active_level: ActiveLevel,
}

impl RawLine for GpioRawLine {
    async fn wait_transition(&mut self) -> Result<()> {
        match self.events.next().await {
            Some(Ok(_event)) => Ok(()),
            Some(Err(e)) => Err(HardwareError::edge_read(self.line, e.to_string())),
            None => Err(HardwareError::disconnected(format!("GPIO line {}", self.line))),
        }
    }

    fn is_pressed(&self) -> Result<bool> {
        let value = self
            .events
            .as_ref()
            .get_value()
            .map_err(|e| HardwareError::edge_read(self.line, e.to_string()))?;
        Ok(self.active_level.is_pressed(value))
    }
}

/// Debounced edge source backed by a GPIO line.
pub struct GpioEdgeSource {
    raw: GpioRawLine,
    debouncer: Debouncer,
}

impl std::fmt::Debug for GpioEdgeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GpioEdgeSource")
            .field("line", &self.raw.line)
            .field("active_level", &self.raw.active_level)
            .field("debouncer", &self.debouncer)
            .finish()
    }
}

impl EdgeSource for GpioEdgeSource {
    async fn next_edge(&mut self) -> Result<EdgeEvent> {
        let edge = self.debouncer.next_edge(&mut self.raw).await?;
        Ok(EdgeEvent::now(self.raw.line, edge))
    }

    fn line(&self) -> LineId {
        self.raw.line
    }
}
