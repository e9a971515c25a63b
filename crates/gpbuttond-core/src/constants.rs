//! Constants shared by every gpbuttond crate.
//!
//! Groups the configuration surface (environment variable names, defaults)
//! and the limits used when validating a binding table.
//!
//! # Mapping Format
//!
//! Line bindings are written as comma separated entries:
//!
//! ```text
//! <line>:<primary keycode>[:<long press keycode>],<line>:<primary keycode>,...
//! ```
//!
//! ```
//! use gpbuttond_core::constants::{ENTRY_DELIMITER, FIELD_DELIMITER};
//!
//! let mapping = "19:103:1,6:108";
//! let entries: Vec<&str> = mapping.split(ENTRY_DELIMITER).collect();
//! assert_eq!(entries, vec!["19:103:1", "6:108"]);
//!
//! let fields: Vec<&str> = entries[0].split(FIELD_DELIMITER).collect();
//! assert_eq!(fields, vec!["19", "103", "1"]);
//! ```

// ============================================================================
// Mapping Syntax
// ============================================================================

/// Separates line bindings in a mapping string.
pub const ENTRY_DELIMITER: char = ',';

/// Separates the fields of a single line binding.
pub const FIELD_DELIMITER: char = ':';

/// Long press keycode value meaning "no long press keycode".
pub const NO_LONG_KEYCODE: u16 = 0;

// ============================================================================
// Keycode Limits
// ============================================================================

/// Smallest usable keycode (`KEY_ESC`). Zero is `KEY_RESERVED`.
pub const MIN_KEYCODE: u16 = 1;

/// Largest keycode accepted by the Linux input subsystem (`KEY_MAX`).
pub const MAX_KEYCODE: u16 = 0x2ff;

// ============================================================================
// Timer Defaults (milliseconds)
// ============================================================================

/// Default debounce window applied to every monitored line.
pub const DEFAULT_DEBOUNCE_MS: u64 = 20;

/// Default interval between repeated keystrokes while a button is held.
pub const DEFAULT_REPEAT_MS: u64 = 150;

/// Default hold time before the long press keycode fires.
pub const DEFAULT_LONG_PRESS_MS: u64 = 500;

// ============================================================================
// Device Defaults
// ============================================================================

/// GPIO character device used when none is configured.
pub const DEFAULT_CHIP: &str = "/dev/gpiochip0";

/// Name of the virtual keyboard created through uinput.
pub const DEFAULT_DEVICE_NAME: &str = "gpbuttondvirtualkbd";

/// Consumer label attached to every requested GPIO line.
pub const CONSUMER_LABEL: &str = "gpbuttond";

// ============================================================================
// Environment Variables
// ============================================================================

/// Line to keycode mapping.
pub const ENV_MAP: &str = "GPBD_MAP";

/// Debounce window in milliseconds.
pub const ENV_DEBOUNCE: &str = "GPBD_DEBOUNCE";

/// Repeat interval in milliseconds.
pub const ENV_REPEAT: &str = "GPBD_REPEAT";

/// Long press threshold in milliseconds.
pub const ENV_LONG: &str = "GPBD_LONG";

/// GPIO character device path.
pub const ENV_CHIP: &str = "GPBD_CHIP";

/// Virtual keyboard name.
pub const ENV_DEVICE_NAME: &str = "GPBD_DEVICE_NAME";

/// Treat a high line level as "pressed".
pub const ENV_ACTIVE_HIGH: &str = "GPBD_ACTIVE_HIGH";
