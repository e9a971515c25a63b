use thiserror::Error;

use crate::types::LineId;

#[derive(Error, Debug)]
pub enum Error {
    // Binding table errors
    #[error("Invalid line binding: {0}")]
    InvalidBinding(String),

    #[error("Invalid keycode: {0}")]
    InvalidKeyCode(String),

    #[error("Invalid line number: {0}")]
    InvalidLine(String),

    #[error("Line {0} is bound more than once")]
    DuplicateLine(LineId),

    #[error("No line bindings configured")]
    EmptyBindingTable,

    // Timer errors
    #[error("Invalid {name} duration: {reason}")]
    InvalidDuration { name: String, reason: String },

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing configuration key: {0}")]
    MissingConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
