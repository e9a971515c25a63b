//! Line supervisor.
//!
//! [`ButtonDaemon`] collects one edge source per bound line and, once
//! started, runs a [`LineDispatcher`] for each in its own task. All
//! dispatchers share a single [`SharedKeyboard`].
//!
//! ```text
//! ┌──────────┐   ┌────────────┐   spawn   ┌────────┐
//! │ line 19  │──►│ dispatcher │──────────►│ worker │──┐
//! └──────────┘   └────────────┘           └────────┘  │   ┌──────────┐
//!                                                     ├──►│ keyboard │
//! ┌──────────┐   ┌────────────┐   spawn   ┌────────┐  │   └──────────┘
//! │ line 6   │──►│ dispatcher │──────────►│ worker │──┘
//! └──────────┘   └────────────┘           └────────┘
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use gpbuttond_core::{BindingTable, TimerConfig};
//! use gpbuttond_engine::daemon::ButtonDaemon;
//! use gpbuttond_hardware::mock::{MockEdgeSource, MockKeyboard};
//!
//! #[tokio::main]
//! async fn main() -> gpbuttond_engine::Result<()> {
//!     let bindings: BindingTable = "19:103:1,6:108".parse().unwrap();
//!     let (keyboard, _typed) = MockKeyboard::new();
//!     let mut daemon = ButtonDaemon::new(TimerConfig::default(), keyboard);
//!
//!     for binding in &bindings {
//!         let (source, _edges) = MockEdgeSource::new(binding.line);
//!         daemon.register_line(*binding, source)?;
//!     }
//!
//!     let handle = daemon.start()?;
//!     handle.shutdown().await;
//!     Ok(())
//! }
//! ```

use crate::dispatcher::LineDispatcher;
use crate::error::{EngineError, Result};
use crate::keyboard::SharedKeyboard;
use gpbuttond_core::{LineBinding, LineId, TimerConfig};
use gpbuttond_hardware::{AnyEdgeSource, AnyKeyboard, EdgeSource};
use std::collections::{BTreeMap, HashMap};
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info, warn};

/// How a dispatcher task ended.
#[derive(Debug)]
pub enum LineExit {
    /// The dispatcher returned (its source failed).
    Failed(EngineError),
    /// The dispatcher panicked.
    Panicked { line: Option<LineId> },
}

impl LineExit {
    pub fn line(&self) -> Option<LineId> {
        match self {
            Self::Failed(EngineError::LineFailed { line, .. }) => Some(*line),
            Self::Failed(_) => None,
            Self::Panicked { line } => *line,
        }
    }
}

/// Task termination classification for shutdown handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TaskTermination {
    /// Task completed successfully.
    Success,
    /// Task returned an error.
    Error,
    /// Task was cancelled (expected during shutdown).
    Cancelled,
    /// Task panicked.
    Panic,
}

/// Handle to the running dispatchers.
pub struct DaemonHandle {
    tasks: JoinSet<Result<()>>,
    lines: HashMap<tokio::task::Id, LineId>,
    keyboard: SharedKeyboard,
}

impl DaemonHandle {
    /// Number of dispatchers still running.
    pub fn running(&self) -> usize {
        self.tasks.len()
    }

    /// Keyboard shared by the dispatchers.
    pub fn keyboard(&self) -> &SharedKeyboard {
        &self.keyboard
    }

    /// Wait for the next dispatcher to stop on its own.
    ///
    /// Returns `None` once no dispatcher is left.
    pub async fn next_exit(&mut self) -> Option<LineExit> {
        loop {
            let result = self.tasks.join_next_with_id().await?;
            match result {
                Ok((id, Ok(()))) => {
                    // Dispatchers only return on error.
                    self.lines.remove(&id);
                }
                Ok((id, Err(e))) => {
                    self.lines.remove(&id);
                    error!("{e}");
                    return Some(LineExit::Failed(e));
                }
                Err(e) if e.is_cancelled() => {
                    self.lines.remove(&e.id());
                }
                Err(e) => {
                    let line = self.lines.remove(&e.id());
                    match line {
                        Some(line) => error!("Dispatcher for line {line} panicked: {e}"),
                        None => error!("Dispatcher panicked: {e}"),
                    }
                    return Some(LineExit::Panicked { line });
                }
            }
        }
    }

    /// Stop every dispatcher.
    ///
    /// Live presses are abandoned: their workers stop without typing
    /// anything further.
    pub async fn shutdown(mut self) {
        self.tasks.abort_all();

        let mut error_count = 0;
        let mut panic_count = 0;

        while let Some(result) = self.tasks.join_next().await {
            match Self::classify_task_result(result) {
                TaskTermination::Success | TaskTermination::Cancelled => {}
                TaskTermination::Error => error_count += 1,
                TaskTermination::Panic => panic_count += 1,
            }
        }

        if error_count + panic_count > 0 {
            warn!(
                "Dispatchers stopped with {error_count} error(s) and {panic_count} panic(s)"
            );
        }
        info!("All line dispatchers stopped");
    }

    fn classify_task_result(
        result: std::result::Result<Result<()>, JoinError>,
    ) -> TaskTermination {
        match result {
            Ok(Ok(())) => TaskTermination::Success,
            Ok(Err(_)) => TaskTermination::Error,
            Err(e) if e.is_cancelled() => TaskTermination::Cancelled,
            Err(_) => TaskTermination::Panic,
        }
    }
}

/// Registers lines and starts one dispatcher per line.
///
/// # Lifecycle
///
/// 1. Create with the timer configuration and the keyboard
/// 2. Register one edge source per binding with [`register_line`](Self::register_line)
/// 3. Call [`start`](Self::start) to spawn the dispatchers
/// 4. Wait on the returned [`DaemonHandle`] and shut it down when done
pub struct ButtonDaemon {
    timers: TimerConfig,
    keyboard: SharedKeyboard,
    lines: BTreeMap<LineId, (LineBinding, AnyEdgeSource)>,
}

impl ButtonDaemon {
    pub fn new(timers: TimerConfig, keyboard: impl Into<AnyKeyboard>) -> Self {
        Self {
            timers,
            keyboard: SharedKeyboard::new(keyboard),
            lines: BTreeMap::new(),
        }
    }

    /// Attach the edge source for `binding`.
    ///
    /// # Errors
    ///
    /// Fails if the line is already registered or `source` monitors a
    /// different line.
    pub fn register_line(
        &mut self,
        binding: LineBinding,
        source: impl Into<AnyEdgeSource>,
    ) -> Result<()> {
        let source = source.into();
        if source.line() != binding.line {
            return Err(EngineError::LineMismatch {
                expected: binding.line,
                actual: source.line(),
            });
        }
        if self.lines.contains_key(&binding.line) {
            return Err(EngineError::DuplicateLine(binding.line));
        }

        debug!("Registered line {binding}");
        self.lines.insert(binding.line, (binding, source));
        Ok(())
    }

    /// Lines registered so far, in ascending order.
    pub fn lines(&self) -> impl Iterator<Item = LineId> + '_ {
        self.lines.keys().copied()
    }

    /// Spawn a dispatcher for every registered line.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NoLines`] if nothing was registered.
    pub fn start(self) -> Result<DaemonHandle> {
        if self.lines.is_empty() {
            return Err(EngineError::NoLines);
        }

        let mut tasks = JoinSet::new();
        let mut lines = HashMap::new();

        for (line, (binding, source)) in self.lines {
            let dispatcher = LineDispatcher::new(binding, self.timers, self.keyboard.clone());
            let abort = tasks.spawn(dispatcher.run(source));
            lines.insert(abort.id(), line);
        }

        info!("Monitoring {} line(s)", tasks.len());

        Ok(DaemonHandle {
            tasks,
            lines,
            keyboard: self.keyboard,
        })
    }
}
