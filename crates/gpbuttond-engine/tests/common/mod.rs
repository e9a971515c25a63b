//! Shared rig for engine integration tests.
//!
//! Builds a daemon over mock lines and a mock keyboard, and measures
//! keystroke times relative to the moment the rig was started. Tests run on
//! paused Tokio time, so the offsets are exact.

use gpbuttond_core::{BindingTable, KeyCode, LineId, TimerConfig};
use gpbuttond_engine::{ButtonDaemon, DaemonHandle};
use gpbuttond_hardware::mock::{MockEdgeHandle, MockEdgeSource, MockKeyboard, MockKeyboardHandle};
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::time::{Instant, sleep_until};

pub struct Rig {
    pub daemon: DaemonHandle,
    pub typed: MockKeyboardHandle,
    lines: BTreeMap<LineId, MockEdgeHandle>,
    start: Instant,
}

impl Rig {
    /// Start a daemon for `mapping` with the default timers.
    pub fn start(mapping: &str) -> Self {
        Self::with_timers(mapping, TimerConfig::default())
    }

    pub fn with_timers(mapping: &str, timers: TimerConfig) -> Self {
        let bindings: BindingTable = mapping.parse().unwrap();
        let (keyboard, typed) = MockKeyboard::new();
        let mut daemon = ButtonDaemon::new(timers, keyboard);
        let mut lines = BTreeMap::new();

        for binding in &bindings {
            let (source, edges) = MockEdgeSource::new(binding.line);
            daemon.register_line(*binding, source).unwrap();
            lines.insert(binding.line, edges);
        }

        Self {
            daemon: daemon.start().unwrap(),
            typed,
            lines,
            start: Instant::now(),
        }
    }

    /// Sleep until `ms` after the rig started.
    pub async fn at(&self, ms: u64) {
        sleep_until(self.start + Duration::from_millis(ms)).await;
    }

    pub async fn press(&self, line: u32) {
        self.edges(line).press().await.unwrap();
    }

    pub async fn release(&self, line: u32) {
        self.edges(line).release().await.unwrap();
    }

    fn edges(&self, line: u32) -> &MockEdgeHandle {
        &self.lines[&LineId::new(line)]
    }

    /// Offsets (ms) at which `code` was typed.
    pub fn typed_at(&self, code: u16) -> Vec<u128> {
        self.typed
            .keystrokes_of(key(code))
            .iter()
            .map(|stroke| stroke.at.duration_since(self.start).as_millis())
            .collect()
    }
}

pub fn key(code: u16) -> KeyCode {
    KeyCode::new(code).unwrap()
}
