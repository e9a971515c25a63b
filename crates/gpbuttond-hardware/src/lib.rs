//! Device layer for gpbuttond.
//!
//! The press engine talks to exactly two kinds of hardware: button lines that
//! produce edges, and a virtual keyboard that types keys. This crate defines
//! those boundaries as traits and ships implementations for each.
//!
//! # Device Traits
//!
//! [`EdgeSource`] yields debounced [`Edge`]s for one line:
//!
//! ```no_run
//! use gpbuttond_hardware::traits::EdgeSource;
//! use gpbuttond_hardware::types::Edge;
//! use gpbuttond_hardware::Result;
//!
//! async fn wait_for_press<S: EdgeSource>(source: &mut S) -> Result<()> {
//!     while source.next_edge().await?.edge != Edge::Down {}
//!     Ok(())
//! }
//! ```
//!
//! [`KeyboardDevice`] presses and releases a single key.
//!
//! # Backends
//!
//! | Backend | Feature | Module |
//! |---------|---------|--------|
//! | Mock lines and keyboard | always | [`mock`] |
//! | GPIO character device | `hardware-gpio` | `gpio` |
//! | uinput virtual keyboard | `hardware-uinput` | `uinput` |
//!
//! The [`devices`] module wraps them in enums so callers can hold one
//! concrete type regardless of the backend picked at runtime.
//!
//! # Error Handling
//!
//! All operations return [`Result<T>`][error::Result] carrying a
//! [`HardwareError`].
//!
//! [`EdgeSource`]: traits::EdgeSource
//! [`KeyboardDevice`]: traits::KeyboardDevice
//! [`Edge`]: types::Edge

pub mod debounce;
pub mod devices;
pub mod error;
pub mod mock;
pub mod traits;
pub mod types;

#[cfg(feature = "hardware-gpio")]
pub mod gpio;

#[cfg(feature = "hardware-uinput")]
pub mod uinput;

// Re-export commonly used types for convenience
pub use devices::{AnyEdgeSource, AnyKeyboard};
pub use error::{HardwareError, Result};
pub use traits::{EdgeSource, KeyboardDevice};
pub use types::{DeviceInfo, Edge, EdgeEvent};
