//! Software debouncing for raw GPIO lines.
//!
//! Mechanical switches bounce for a few milliseconds around every press and
//! release. [`Debouncer`] turns a noisy line into clean edges: after any raw
//! transition it waits until the line has been quiet for the whole window,
//! samples the level once, and reports an edge only if the level differs from
//! the last one it reported. Glitches shorter than the window therefore
//! produce nothing, and a bounce burst produces exactly one edge.
//!
//! ```text
//! raw:      ‾‾‾|_|‾|___________________|‾|_|‾‾‾‾‾‾‾‾‾‾
//!              <-- window -->          <-- window -->
//! reported:                 Down                     Up
//! ```

#![allow(async_fn_in_trait)]

use crate::{Result, types::Edge};
use std::time::Duration;
use tracing::trace;

/// Undebounced access to a single input line.
pub trait RawLine: Send {
    /// Wait until the line changes level (or may have changed).
    ///
    /// Must be cancel safe: the debouncer drops this future when the quiet
    /// window expires.
    async fn wait_transition(&mut self) -> Result<()>;

    /// Sample whether the button is currently held down.
    fn is_pressed(&self) -> Result<bool>;
}

/// Settle-then-sample debouncer.
#[derive(Debug, Clone)]
pub struct Debouncer {
    /// Quiet time required before the level is trusted.
    window: Duration,

    /// Last edge handed out (or the initial level).
    reported: Edge,
}

impl Debouncer {
    /// Create a debouncer for a line whose current state is `initial`.
    ///
    /// Seeding with the real starting level avoids reporting a spurious
    /// `Up` for a button that was never pressed.
    pub fn new(window: Duration, initial: Edge) -> Self {
        Self {
            window,
            reported: initial,
        }
    }

    /// Debounce window.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Last reported edge.
    pub fn reported(&self) -> Edge {
        self.reported
    }

    /// Wait for the next stable edge on `raw`.
    ///
    /// # Errors
    ///
    /// Propagates any error from the raw line.
    pub async fn next_edge<R: RawLine>(&mut self, raw: &mut R) -> Result<Edge> {
        loop {
            raw.wait_transition().await?;
            self.settle(raw).await?;

            let edge = Edge::from_pressed(raw.is_pressed()?);
            if edge != self.reported {
                self.reported = edge;
                return Ok(edge);
            }

            trace!("Discarded glitch shorter than {}ms", self.window.as_millis());
        }
    }

    /// Wait until no transition has happened for a full window.
    async fn settle<R: RawLine>(&self, raw: &mut R) -> Result<()> {
        if self.window.is_zero() {
            return Ok(());
        }

        loop {
            match tokio::time::timeout(self.window, raw.wait_transition()).await {
                // Another bounce: restart the window.
                Ok(result) => result?,
                Err(_elapsed) => return Ok(()),
            }
        }
    }
}
