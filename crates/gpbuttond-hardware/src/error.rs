//! Error types for hardware operations.
//!
//! This module defines error types specific to the two device boundaries of
//! the daemon: the GPIO edge source and the virtual keyboard.

use gpbuttond_core::{KeyCode, LineId};

/// Result type alias for hardware operations.
pub type Result<T> = std::result::Result<T, HardwareError>;

/// Errors that can occur during hardware device operations.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// Device is not connected or has been disconnected.
    #[error("Device disconnected: {device}")]
    Disconnected { device: String },

    /// Device initialization failed.
    #[error("Initialization failed: {message}")]
    InitializationFailed { message: String },

    /// Reading an edge from a GPIO line failed.
    #[error("Edge read error on line {line}: {message}")]
    EdgeReadError { line: LineId, message: String },

    /// The virtual keyboard rejected a keystroke.
    #[error("Failed to emit keycode {key}: {message}")]
    EmitFailed { key: KeyCode, message: String },

    /// Device configuration error.
    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with custom message.
    #[error("{0}")]
    Other(String),
}

impl HardwareError {
    /// Create a new disconnected error.
    pub fn disconnected(device: impl Into<String>) -> Self {
        Self::Disconnected {
            device: device.into(),
        }
    }

    /// Create a new initialization failed error.
    pub fn initialization_failed(message: impl Into<String>) -> Self {
        Self::InitializationFailed {
            message: message.into(),
        }
    }

    /// Create a new edge read error.
    pub fn edge_read(line: LineId, message: impl Into<String>) -> Self {
        Self::EdgeReadError {
            line,
            message: message.into(),
        }
    }

    /// Create a new emit failure.
    pub fn emit_failed(key: KeyCode, message: impl Into<String>) -> Self {
        Self::EmitFailed {
            key,
            message: message.into(),
        }
    }

    /// Create a new configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    /// Create a generic error with custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

#[cfg(feature = "hardware-gpio")]
impl From<gpio_cdev::Error> for HardwareError {
    fn from(err: gpio_cdev::Error) -> Self {
        Self::Other(format!("GPIO: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disconnected_error() {
        let error = HardwareError::disconnected("line 19");
        assert!(matches!(error, HardwareError::Disconnected { .. }));
        assert_eq!(error.to_string(), "Device disconnected: line 19");
    }

    #[test]
    fn test_edge_read_error() {
        let error = HardwareError::edge_read(LineId::new(6), "EBUSY");
        assert_eq!(error.to_string(), "Edge read error on line 6: EBUSY");
    }

    #[test]
    fn test_emit_failed_error() {
        let key = KeyCode::new(103).unwrap();
        let error = HardwareError::emit_failed(key, "device gone");
        assert!(matches!(error, HardwareError::EmitFailed { key: k, .. } if k == key));
        assert_eq!(error.to_string(), "Failed to emit keycode 103: device gone");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "/dev/uinput");
        let error: HardwareError = io.into();
        assert!(matches!(error, HardwareError::Io(_)));
        assert!(error.to_string().starts_with("I/O error:"));
    }

    #[test]
    fn test_error_display() {
        let errors = vec![
            HardwareError::initialization_failed("no chip"),
            HardwareError::configuration("bad line"),
            HardwareError::other("something"),
        ];

        for error in errors {
            let _ = format!("{}", error);
            let _ = format!("{:?}", error);
        }
    }
}
