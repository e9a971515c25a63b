//! Per-line edge dispatch.
//!
//! A [`LineDispatcher`] owns the state of one button:
//!
//! ```text
//!            Down (spawn worker)
//!   ┌──────┐ ─────────────────► ┌──────┐
//!   │ Idle │                    │ Held │ ── Down: ignored
//!   └──────┘ ◄───────────────── └──────┘
//!    Up: no-op  Up (cancel worker)
//! ```

use crate::error::{EngineError, Result};
use crate::keyboard::SharedKeyboard;
use crate::session::PressSession;
use gpbuttond_core::{LineBinding, LineId, TimerConfig};
use gpbuttond_hardware::{Edge, EdgeSource};
use tracing::{debug, warn};

/// What an edge did to the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Idle to held; a worker was started.
    Pressed,
    /// Held to idle; the worker was cancelled.
    Released,
    /// Down while already held; ignored.
    DuplicateDown,
    /// Up while idle; ignored.
    IdleRelease,
}

#[derive(Debug, Default)]
enum LineState {
    #[default]
    Idle,
    Held(PressSession),
}

/// State machine for a single bound line.
#[derive(Debug)]
pub struct LineDispatcher {
    binding: LineBinding,
    timers: TimerConfig,
    keyboard: SharedKeyboard,
    state: LineState,
}

impl LineDispatcher {
    pub fn new(binding: LineBinding, timers: TimerConfig, keyboard: SharedKeyboard) -> Self {
        Self {
            binding,
            timers,
            keyboard,
            state: LineState::Idle,
        }
    }

    pub fn binding(&self) -> &LineBinding {
        &self.binding
    }

    pub fn line(&self) -> LineId {
        self.binding.line
    }

    /// Whether a press session is live.
    pub fn is_held(&self) -> bool {
        matches!(self.state, LineState::Held(_))
    }

    /// Apply one debounced edge.
    ///
    /// Must be called from within a Tokio runtime, since a press spawns the
    /// worker.
    pub fn handle_edge(&mut self, edge: Edge) -> Transition {
        let line = self.binding.line;

        match (edge, std::mem::take(&mut self.state)) {
            (Edge::Down, LineState::Held(session)) if !session.is_finished() => {
                warn!("Line {line}: button-down while already held, ignoring");
                self.state = LineState::Held(session);
                Transition::DuplicateDown
            }
            (Edge::Down, previous) => {
                if let LineState::Held(_) = previous {
                    warn!("Line {line}: previous worker stopped while held, starting a new press");
                }
                self.state = LineState::Held(PressSession::start(
                    self.binding,
                    self.timers,
                    self.keyboard.clone(),
                ));
                debug!("Line {line} pressed");
                Transition::Pressed
            }
            (Edge::Up, LineState::Held(session)) => {
                // Outcome is logged by the worker itself.
                drop(session.release());
                debug!("Line {line} released");
                Transition::Released
            }
            (Edge::Up, LineState::Idle) => Transition::IdleRelease,
        }
    }

    /// Feed every edge from `source` through [`handle_edge`](Self::handle_edge).
    ///
    /// Returns only when the source fails. Any live press is abandoned at
    /// that point without typing anything further.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::LineFailed`] with the source error.
    pub async fn run<S: EdgeSource>(mut self, mut source: S) -> Result<()> {
        let line = self.binding.line;
        debug!("Dispatching line {line} ({})", self.binding);

        loop {
            let event = source
                .next_edge()
                .await
                .map_err(|e| EngineError::line_failed(line, e))?;

            if event.line != line {
                warn!("Line {line}: dropped edge reported for line {}", event.line);
                continue;
            }

            self.handle_edge(event.edge);
        }
    }
}
