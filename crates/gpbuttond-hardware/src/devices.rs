//! Enum wrappers for hardware device dispatch.
//!
//! Native `async fn` in traits are not object-safe, so `Box<dyn EdgeSource>`
//! is not an option. The enums in this module give the engine one concrete
//! type per device family while still letting the binary pick between mock
//! and real backends at runtime. Real backends only exist when their cargo
//! feature is enabled.
//!
//! # Examples
//!
//! ```
//! use gpbuttond_core::LineId;
//! use gpbuttond_hardware::devices::AnyEdgeSource;
//! use gpbuttond_hardware::mock::MockEdgeSource;
//!
//! let (source, _handle) = MockEdgeSource::new(LineId::new(19));
//! let any_source = AnyEdgeSource::Mock(source);
//! ```

use crate::mock::{MockEdgeSource, MockKeyboard};
use crate::traits::{EdgeSource, KeyboardDevice};
use crate::types::{DeviceInfo, EdgeEvent};
use crate::Result;
use gpbuttond_core::{KeyCode, LineId};

#[cfg(feature = "hardware-gpio")]
use crate::gpio::GpioEdgeSource;
#[cfg(feature = "hardware-uinput")]
use crate::uinput::UinputKeyboard;

/// Any supported edge source.
///
/// # Examples
///
/// ```
/// use gpbuttond_core::LineId;
/// use gpbuttond_hardware::devices::AnyEdgeSource;
/// use gpbuttond_hardware::mock::MockEdgeSource;
/// use gpbuttond_hardware::traits::EdgeSource;
/// use gpbuttond_hardware::types::Edge;
///
/// #[tokio::main]
/// async fn main() -> gpbuttond_hardware::Result<()> {
///     let (source, handle) = MockEdgeSource::new(LineId::new(13));
///     let mut any_source = AnyEdgeSource::from(source);
///
///     handle.press().await?;
///     assert_eq!(any_source.next_edge().await?.edge, Edge::Down);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyEdgeSource {
    /// Mock line for development and testing.
    Mock(MockEdgeSource),
    /// GPIO character device line.
    #[cfg(feature = "hardware-gpio")]
    Gpio(GpioEdgeSource),
}

impl EdgeSource for AnyEdgeSource {
    async fn next_edge(&mut self) -> Result<EdgeEvent> {
        match self {
            Self::Mock(source) => source.next_edge().await,
            #[cfg(feature = "hardware-gpio")]
            Self::Gpio(source) => source.next_edge().await,
        }
    }

    fn line(&self) -> LineId {
        match self {
            Self::Mock(source) => source.line(),
            #[cfg(feature = "hardware-gpio")]
            Self::Gpio(source) => source.line(),
        }
    }
}

impl From<MockEdgeSource> for AnyEdgeSource {
    fn from(source: MockEdgeSource) -> Self {
        Self::Mock(source)
    }
}

#[cfg(feature = "hardware-gpio")]
impl From<GpioEdgeSource> for AnyEdgeSource {
    fn from(source: GpioEdgeSource) -> Self {
        Self::Gpio(source)
    }
}

/// Any supported virtual keyboard.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyKeyboard {
    /// Recording keyboard for development and testing.
    Mock(MockKeyboard),
    /// Kernel virtual keyboard.
    #[cfg(feature = "hardware-uinput")]
    Uinput(UinputKeyboard),
}

impl KeyboardDevice for AnyKeyboard {
    async fn emit(&mut self, key: KeyCode) -> Result<()> {
        match self {
            Self::Mock(keyboard) => keyboard.emit(key).await,
            #[cfg(feature = "hardware-uinput")]
            Self::Uinput(keyboard) => keyboard.emit(key).await,
        }
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        match self {
            Self::Mock(keyboard) => keyboard.get_info().await,
            #[cfg(feature = "hardware-uinput")]
            Self::Uinput(keyboard) => keyboard.get_info().await,
        }
    }
}

impl From<MockKeyboard> for AnyKeyboard {
    fn from(keyboard: MockKeyboard) -> Self {
        Self::Mock(keyboard)
    }
}

#[cfg(feature = "hardware-uinput")]
impl From<UinputKeyboard> for AnyKeyboard {
    fn from(keyboard: UinputKeyboard) -> Self {
        Self::Uinput(keyboard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Edge;

    #[tokio::test]
    async fn test_any_edge_source_mock() {
        let (source, handle) = MockEdgeSource::new(LineId::new(5));
        let mut any_source = AnyEdgeSource::Mock(source);

        assert_eq!(any_source.line(), LineId::new(5));

        handle.release().await.unwrap();
        let event = any_source.next_edge().await.unwrap();
        assert_eq!(event.edge, Edge::Up);
        assert_eq!(event.line, LineId::new(5));
    }

    #[tokio::test]
    async fn test_any_keyboard_mock() {
        let (keyboard, handle) = MockKeyboard::new();
        let mut any_keyboard = AnyKeyboard::from(keyboard);

        let info = any_keyboard.get_info().await.unwrap();
        assert_eq!(info.name, "Mock Keyboard");

        let key = KeyCode::new(108).unwrap();
        any_keyboard.emit(key).await.unwrap();
        assert_eq!(handle.keys(), vec![key]);
    }
}
