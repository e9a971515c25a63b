//! Serialized access to the virtual keyboard.

use gpbuttond_core::KeyCode;
use gpbuttond_hardware::{AnyKeyboard, DeviceInfo, KeyboardDevice, Result};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Virtual keyboard shared by every worker.
///
/// Each call to [`emit`](Self::emit) holds the lock for exactly one
/// press+release, so keystrokes from different lines never interleave.
/// Cloning is cheap and every clone talks to the same device.
#[derive(Debug, Clone)]
pub struct SharedKeyboard {
    device: Arc<Mutex<AnyKeyboard>>,
}

impl SharedKeyboard {
    pub fn new(keyboard: impl Into<AnyKeyboard>) -> Self {
        Self {
            device: Arc::new(Mutex::new(keyboard.into())),
        }
    }

    /// Type `key` once.
    ///
    /// The lock is released when this returns, whether the device accepted
    /// the keystroke or not.
    ///
    /// # Errors
    ///
    /// Returns the device error unchanged.
    pub async fn emit(&self, key: KeyCode) -> Result<()> {
        let mut device = self.device.lock().await;
        device.emit(key).await
    }

    /// Describe the underlying device.
    pub async fn get_info(&self) -> crate::Result<DeviceInfo> {
        let info = self.device.lock().await.get_info().await?;
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpbuttond_hardware::mock::MockKeyboard;

    fn key(code: u16) -> KeyCode {
        KeyCode::new(code).unwrap()
    }

    #[tokio::test]
    async fn test_concurrent_emissions_do_not_interleave() {
        let (mock, handle) = MockKeyboard::new();
        let keyboard = SharedKeyboard::new(mock);

        let mut tasks = Vec::new();
        for code in [103, 108, 1, 28] {
            let keyboard = keyboard.clone();
            tasks.push(tokio::spawn(async move {
                for _ in 0..5 {
                    keyboard.emit(key(code)).await.unwrap();
                }
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(handle.count(), 20);
        assert!(handle.is_serialized());
    }

    #[tokio::test]
    async fn test_failed_emission_releases_lock() {
        let (mock, handle) = MockKeyboard::new();
        let keyboard = SharedKeyboard::new(mock);
        handle.fail_next(1);

        assert!(keyboard.emit(key(103)).await.is_err());
        keyboard.emit(key(103)).await.unwrap();

        assert_eq!(handle.keys(), vec![key(103)]);
    }

    #[tokio::test]
    async fn test_get_info() {
        let (mock, _handle) = MockKeyboard::with_name("gpbuttondvirtualkbd".to_string());
        let keyboard = SharedKeyboard::new(mock);

        let info = keyboard.get_info().await.unwrap();
        assert_eq!(info.name, "gpbuttondvirtualkbd");
    }
}
