//! Press workers.
//!
//! A worker owns keystroke emission for one press. Which worker runs depends
//! on the binding:
//!
//! - no long keycode: [`run_repeat`] types the primary key immediately and
//!   then once per repeat interval until release
//! - long keycode: [`run_long_press`] races the long-press threshold against
//!   release and types exactly one key
//!
//! ```text
//! repeat:      down ─●────●────●──── up        (● = primary)
//! tap:         down ────────── up●             (before threshold)
//! long press:  down ──────────◆───── up        (◆ = long, at threshold)
//! ```
//!
//! Emitter failures are logged and otherwise ignored; the next tick or the
//! next press tries again.

use crate::keyboard::SharedKeyboard;
use crate::session::{CancelSignal, Cancellation};
use gpbuttond_core::{KeyCode, LineBinding, LineId, TimerConfig};
use std::fmt;
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval, sleep};
use tracing::{debug, warn};

/// How a press ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    /// Repeat worker released after typing `count` keystrokes.
    Repeated { count: u32 },
    /// Released before the threshold; primary typed once.
    Tapped,
    /// Threshold reached; long key typed once.
    LongFired,
    /// Session dropped before a release was seen.
    Abandoned,
}

impl fmt::Display for PressOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Repeated { count } => write!(f, "repeated {count}x"),
            Self::Tapped => write!(f, "tap"),
            Self::LongFired => write!(f, "long press"),
            Self::Abandoned => write!(f, "abandoned"),
        }
    }
}

/// Run the worker matching `binding`.
pub async fn run(
    binding: LineBinding,
    timers: TimerConfig,
    keyboard: SharedKeyboard,
    cancel: CancelSignal,
) -> PressOutcome {
    match binding.long {
        None => run_repeat(binding.line, binding.primary, timers.repeat, keyboard, cancel).await,
        Some(long) => {
            run_long_press(
                binding.line,
                binding.primary,
                long,
                timers.long_press,
                keyboard,
                cancel,
            )
            .await
        }
    }
}

/// Type `key` now and every `every` until cancelled.
///
/// Cancellation is checked before each keystroke, so nothing is typed once
/// the release has been delivered.
pub async fn run_repeat(
    line: LineId,
    key: KeyCode,
    every: Duration,
    keyboard: SharedKeyboard,
    mut cancel: CancelSignal,
) -> PressOutcome {
    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut count = 0;

    loop {
        tokio::select! {
            biased;

            cancellation = cancel.cancelled() => {
                return match cancellation {
                    Cancellation::Released => PressOutcome::Repeated { count },
                    Cancellation::Abandoned => PressOutcome::Abandoned,
                };
            }
            _ = ticker.tick() => {
                if emit(&keyboard, line, key).await {
                    count += 1;
                }
            }
        }
    }
}

/// Type `primary` on a release before `threshold`, or `long` as soon as the
/// threshold elapses.
///
/// After the long key has been typed the worker only waits for the release;
/// the primary key never follows it.
pub async fn run_long_press(
    line: LineId,
    primary: KeyCode,
    long: KeyCode,
    threshold: Duration,
    keyboard: SharedKeyboard,
    mut cancel: CancelSignal,
) -> PressOutcome {
    tokio::select! {
        biased;

        cancellation = cancel.cancelled() => {
            return match cancellation {
                Cancellation::Released => {
                    emit(&keyboard, line, primary).await;
                    PressOutcome::Tapped
                }
                Cancellation::Abandoned => PressOutcome::Abandoned,
            };
        }
        () = sleep(threshold) => {}
    }

    debug!("Line {line} held for {}ms", threshold.as_millis());
    // Counts as fired even if the device rejected it.
    emit(&keyboard, line, long).await;

    cancel.cancelled().await;
    PressOutcome::LongFired
}

async fn emit(keyboard: &SharedKeyboard, line: LineId, key: KeyCode) -> bool {
    match keyboard.emit(key).await {
        Ok(()) => true,
        Err(e) => {
            warn!("Line {line}: failed to emit keycode {key}: {e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpbuttond_hardware::mock::{MockKeyboard, MockKeyboardHandle};
    use tokio::time::Instant;

    const LINE: LineId = LineId::new(19);

    fn key(code: u16) -> KeyCode {
        KeyCode::new(code).unwrap()
    }

    fn keyboard() -> (SharedKeyboard, MockKeyboardHandle) {
        let (mock, handle) = MockKeyboard::new();
        (SharedKeyboard::new(mock), handle)
    }

    fn offsets_ms(handle: &MockKeyboardHandle, start: Instant) -> Vec<u128> {
        handle
            .keystrokes()
            .iter()
            .map(|stroke| stroke.at.duration_since(start).as_millis())
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeat_emits_immediately_then_every_interval() {
        let (keyboard, handle) = keyboard();
        let (tx, signal) = CancelSignal::pair();
        let start = Instant::now();

        let worker = tokio::spawn(run_repeat(
            LINE,
            key(108),
            Duration::from_millis(150),
            keyboard,
            signal,
        ));

        sleep(Duration::from_millis(400)).await;
        tx.send(()).unwrap();

        assert_eq!(worker.await.unwrap(), PressOutcome::Repeated { count: 3 });
        assert_eq!(offsets_ms(&handle, start), vec![0, 150, 300]);

        sleep(Duration::from_secs(1)).await;
        assert_eq!(handle.count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeat_survives_emitter_failure() {
        let (keyboard, handle) = keyboard();
        let (tx, signal) = CancelSignal::pair();
        handle.fail_next(1);

        let worker = tokio::spawn(run_repeat(
            LINE,
            key(108),
            Duration::from_millis(100),
            keyboard,
            signal,
        ));

        sleep(Duration::from_millis(250)).await;
        tx.send(()).unwrap();

        // First tick failed, the next two went through.
        assert_eq!(worker.await.unwrap(), PressOutcome::Repeated { count: 2 });
        assert_eq!(handle.count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeat_abandoned() {
        let (keyboard, handle) = keyboard();
        let (tx, signal) = CancelSignal::pair();

        let worker = tokio::spawn(run_repeat(
            LINE,
            key(108),
            Duration::from_millis(150),
            keyboard,
            signal,
        ));

        sleep(Duration::from_millis(50)).await;
        drop(tx);

        assert_eq!(worker.await.unwrap(), PressOutcome::Abandoned);
        assert_eq!(handle.count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_long_press_tap() {
        let (keyboard, handle) = keyboard();
        let (tx, signal) = CancelSignal::pair();
        let start = Instant::now();

        let worker = tokio::spawn(run_long_press(
            LINE,
            key(103),
            key(1),
            Duration::from_millis(500),
            keyboard,
            signal,
        ));

        sleep(Duration::from_millis(200)).await;
        assert_eq!(handle.count(), 0);
        tx.send(()).unwrap();

        assert_eq!(worker.await.unwrap(), PressOutcome::Tapped);
        assert_eq!(handle.keys(), vec![key(103)]);
        assert_eq!(offsets_ms(&handle, start), vec![200]);

        // The threshold passing later must not fire anything.
        sleep(Duration::from_secs(1)).await;
        assert_eq!(handle.count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_long_press_fires_at_threshold() {
        let (keyboard, handle) = keyboard();
        let (tx, signal) = CancelSignal::pair();
        let start = Instant::now();

        let worker = tokio::spawn(run_long_press(
            LINE,
            key(103),
            key(1),
            Duration::from_millis(500),
            keyboard,
            signal,
        ));

        sleep(Duration::from_millis(700)).await;
        assert_eq!(handle.keys(), vec![key(1)]);
        assert_eq!(offsets_ms(&handle, start), vec![500]);

        tx.send(()).unwrap();
        assert_eq!(worker.await.unwrap(), PressOutcome::LongFired);
        assert_eq!(handle.keys(), vec![key(1)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_long_press_failed_long_key_suppresses_primary() {
        let (keyboard, handle) = keyboard();
        let (tx, signal) = CancelSignal::pair();
        handle.fail_next(1);

        let worker = tokio::spawn(run_long_press(
            LINE,
            key(103),
            key(1),
            Duration::from_millis(500),
            keyboard,
            signal,
        ));

        sleep(Duration::from_millis(600)).await;
        tx.send(()).unwrap();

        assert_eq!(worker.await.unwrap(), PressOutcome::LongFired);
        assert_eq!(handle.count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_long_press_abandoned_before_threshold() {
        let (keyboard, handle) = keyboard();
        let (tx, signal) = CancelSignal::pair();

        let worker = tokio::spawn(run_long_press(
            LINE,
            key(103),
            key(1),
            Duration::from_millis(500),
            keyboard,
            signal,
        ));

        sleep(Duration::from_millis(100)).await;
        drop(tx);

        assert_eq!(worker.await.unwrap(), PressOutcome::Abandoned);
        assert_eq!(handle.count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_picks_worker_from_binding() {
        let (keyboard, handle) = keyboard();
        let (tx, signal) = CancelSignal::pair();
        let binding = LineBinding::new(LINE, key(103)).with_long(key(1));

        let worker = tokio::spawn(run(binding, TimerConfig::default(), keyboard, signal));
        sleep(Duration::from_millis(50)).await;
        tx.send(()).unwrap();

        assert_eq!(worker.await.unwrap(), PressOutcome::Tapped);
        assert_eq!(handle.keys(), vec![key(103)]);
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(PressOutcome::Repeated { count: 3 }.to_string(), "repeated 3x");
        assert_eq!(PressOutcome::Tapped.to_string(), "tap");
        assert_eq!(PressOutcome::LongFired.to_string(), "long press");
        assert_eq!(PressOutcome::Abandoned.to_string(), "abandoned");
    }
}
