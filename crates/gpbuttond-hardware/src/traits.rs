//! Hardware device trait definitions.
//!
//! These traits are the contract between the press engine and the two
//! external collaborators it depends on: something that produces debounced
//! button edges, and something that can type a key.
//!
//! All traits use native `async fn` methods (Rust 1.90 + Edition 2024 RPITIT),
//! eliminating the need for the `async_trait` macro.

#![allow(async_fn_in_trait)]

use crate::error::Result;
use crate::types::{DeviceInfo, EdgeEvent};
use gpbuttond_core::{KeyCode, LineId};

/// Source of debounced button transitions for a single line.
///
/// Implementations must deliver edges in chronological order. Debouncing
/// happens before an edge leaves the source, so consumers can treat every
/// event as a real press or release.
///
/// # Object Safety and Dynamic Dispatch
///
/// **NOTE**: This trait is NOT object-safe because `async fn` methods return
/// `impl Future`. Use generics, or the enum wrapper from the
/// [`devices`](crate::devices) module:
///
/// ```no_run
/// use gpbuttond_core::LineId;
/// use gpbuttond_hardware::devices::AnyEdgeSource;
/// use gpbuttond_hardware::mock::MockEdgeSource;
/// use gpbuttond_hardware::traits::EdgeSource;
///
/// # async fn example() -> gpbuttond_hardware::Result<()> {
/// let (source, _handle) = MockEdgeSource::new(LineId::new(19));
/// let mut any_source = AnyEdgeSource::Mock(source);
///
/// let event = any_source.next_edge().await?;
/// println!("line {} went {}", event.line, event.edge);
/// # Ok(())
/// # }
/// ```
pub trait EdgeSource: Send {
    /// Wait for the next debounced edge.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The line has been released or the source closed
    /// - Reading the underlying device fails
    async fn next_edge(&mut self) -> Result<EdgeEvent>;

    /// Line this source monitors.
    fn line(&self) -> LineId;
}

/// Virtual keyboard able to type a single key.
///
/// Implementations are not required to be safe for overlapping calls;
/// callers serialize access (see `SharedKeyboard` in the engine crate).
///
/// # Examples
///
/// ```no_run
/// use gpbuttond_core::KeyCode;
/// use gpbuttond_hardware::traits::KeyboardDevice;
/// use gpbuttond_hardware::error::Result;
///
/// async fn type_enter<K: KeyboardDevice>(keyboard: &mut K) -> Result<()> {
///     keyboard.emit(KeyCode::new(28).unwrap()).await
/// }
/// ```
pub trait KeyboardDevice: Send {
    /// Press and release `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the device rejects either half of the keystroke.
    async fn emit(&mut self, key: KeyCode) -> Result<()>;

    /// Get device information.
    ///
    /// # Errors
    ///
    /// Returns an error if the device cannot be queried.
    async fn get_info(&self) -> Result<DeviceInfo>;
}
