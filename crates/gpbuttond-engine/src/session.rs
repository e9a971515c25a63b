//! Per-press sessions and their cancellation signal.
//!
//! Every button-down allocates a fresh [`oneshot`] channel. The dispatcher
//! keeps the sending half inside the [`PressSession`], the worker gets the
//! receiving half as a [`CancelSignal`]. Nothing else can reach either end,
//! so releasing one line can never stop the worker of another.

use crate::keyboard::SharedKeyboard;
use crate::worker::{self, PressOutcome};
use gpbuttond_core::{LineBinding, LineId, TimerConfig};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::debug;

/// Why a worker was told to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cancellation {
    /// The button came back up.
    Released,
    /// The session was dropped without a release (shutdown).
    Abandoned,
}

/// Receiving half of a session's cancellation channel.
#[derive(Debug)]
pub struct CancelSignal {
    rx: oneshot::Receiver<()>,
    resolved: Option<Cancellation>,
}

impl CancelSignal {
    /// Create a connected trigger/signal pair.
    pub fn pair() -> (oneshot::Sender<()>, Self) {
        let (tx, rx) = oneshot::channel();
        (tx, Self { rx, resolved: None })
    }

    /// Wait until the session is cancelled.
    ///
    /// Cancel safe, and returns immediately with the same answer once
    /// resolved.
    pub async fn cancelled(&mut self) -> Cancellation {
        if let Some(cancellation) = self.resolved {
            return cancellation;
        }

        let cancellation = match (&mut self.rx).await {
            Ok(()) => Cancellation::Released,
            Err(_) => Cancellation::Abandoned,
        };
        self.resolved = Some(cancellation);
        cancellation
    }
}

/// One physical press, from button-down until its worker stops.
#[derive(Debug)]
pub struct PressSession {
    line: LineId,
    cancel: oneshot::Sender<()>,
    worker: JoinHandle<PressOutcome>,
}

impl PressSession {
    /// Spawn the worker for `binding` and return the session owning it.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(binding: LineBinding, timers: TimerConfig, keyboard: SharedKeyboard) -> Self {
        let (cancel, signal) = CancelSignal::pair();
        let line = binding.line;

        let worker = tokio::spawn(async move {
            let outcome = worker::run(binding, timers, keyboard, signal).await;
            debug!("Line {line} press ended: {outcome}");
            outcome
        });

        Self {
            line,
            cancel,
            worker,
        }
    }

    pub fn line(&self) -> LineId {
        self.line
    }

    /// Whether the worker has already stopped on its own.
    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    /// Tell the worker the button was released.
    ///
    /// Does not wait for the worker; the returned handle can be awaited for
    /// its outcome.
    pub fn release(self) -> JoinHandle<PressOutcome> {
        // A worker that already stopped has dropped its receiver.
        let _ = self.cancel.send(());
        self.worker
    }

    #[cfg(test)]
    pub(crate) fn abort_worker(&self) {
        self.worker.abort();
    }
}
