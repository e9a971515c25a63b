//! Common types shared across hardware device implementations.

use gpbuttond_core::LineId;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::time::Instant;

/// Direction of a debounced button transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    /// Button pressed.
    Down,
    /// Button released.
    Up,
}

impl Edge {
    /// Edge corresponding to a "pressed" flag.
    #[must_use]
    pub fn from_pressed(pressed: bool) -> Self {
        if pressed { Edge::Down } else { Edge::Up }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Down => write!(f, "down"),
            Self::Up => write!(f, "up"),
        }
    }
}

/// A debounced transition observed on one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeEvent {
    /// Line the transition happened on.
    pub line: LineId,

    /// Transition direction.
    pub edge: Edge,

    /// When the transition was accepted.
    pub at: Instant,
}

impl EdgeEvent {
    /// Create an edge event stamped with the current time.
    #[must_use]
    pub fn now(line: LineId, edge: Edge) -> Self {
        Self {
            line,
            edge,
            at: Instant::now(),
        }
    }
}

/// Generic device information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Device name (e.g., "gpbuttondvirtualkbd", "gpiochip0").
    pub name: String,

    /// Device model or backend identifier.
    pub model: String,

    /// Optional device node path.
    pub path: Option<String>,
}

impl DeviceInfo {
    /// Create a new DeviceInfo with required fields.
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            path: None,
        }
    }

    /// Set the device node path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{} ({}, {})", self.name, self.model, path),
            None => write!(f, "{} ({})", self.name, self.model),
        }
    }
}
