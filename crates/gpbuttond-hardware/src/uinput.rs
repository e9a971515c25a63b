//! Virtual keyboard backed by Linux uinput.
//!
//! The device advertises exactly the keycodes it was created with and is
//! removed by the kernel as soon as the [`UinputKeyboard`] is dropped, so
//! every exit path (including unwinding) tears it down.
//!
//! Creating the device generally requires root or write access to
//! `/dev/uinput`.

use crate::{HardwareError, Result, traits::KeyboardDevice, types::DeviceInfo};
use evdev::uinput::{VirtualDevice, VirtualDeviceBuilder};
use evdev::{AttributeSet, EventType, InputEvent};
use gpbuttond_core::KeyCode;
use tracing::{debug, info};

const UINPUT_PATH: &str = "/dev/uinput";

/// Key value written for a press.
const KEY_PRESSED: i32 = 1;

/// Key value written for a release.
const KEY_RELEASED: i32 = 0;

/// Virtual keyboard created through `/dev/uinput`.
pub struct UinputKeyboard {
    device: VirtualDevice,
    name: String,
}

impl std::fmt::Debug for UinputKeyboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UinputKeyboard")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl UinputKeyboard {
    /// Create a virtual keyboard named `name` able to type `keys`.
    ///
    /// # Errors
    ///
    /// Returns an error if `keys` is empty or uinput refuses the device.
    pub fn create(name: &str, keys: impl IntoIterator<Item = KeyCode>) -> Result<Self> {
        let mut supported = AttributeSet::<evdev::KeyCode>::new();
        let mut count = 0usize;
        for key in keys {
            supported.insert(evdev::KeyCode::new(key.as_u16()));
            count += 1;
        }

        if count == 0 {
            return Err(HardwareError::configuration(
                "virtual keyboard needs at least one keycode",
            ));
        }

        let device = VirtualDeviceBuilder::new()
            .and_then(|builder| builder.name(name).with_keys(&supported))
            .and_then(|builder| builder.build())
            .map_err(|e| {
                HardwareError::initialization_failed(format!("{UINPUT_PATH}: {e}"))
            })?;

        info!("Created virtual keyboard '{name}' with {count} keycodes");

        Ok(Self {
            device,
            name: name.to_string(),
        })
    }

    fn write(&mut self, key: KeyCode, value: i32) -> Result<()> {
        let event = InputEvent::new(EventType::KEY.0, key.as_u16(), value);
        self.device
            .emit(&[event])
            .map_err(|e| HardwareError::emit_failed(key, e.to_string()))
    }
}

impl KeyboardDevice for UinputKeyboard {
    async fn emit(&mut self, key: KeyCode) -> Result<()> {
        self.write(key, KEY_PRESSED)?;
        self.write(key, KEY_RELEASED)
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        Ok(DeviceInfo::new(self.name.clone(), "uinput").with_path(UINPUT_PATH))
    }
}

impl Drop for UinputKeyboard {
    fn drop(&mut self) {
        debug!("Removing virtual keyboard '{}'", self.name);
    }
}
