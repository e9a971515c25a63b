use crate::{
    Result,
    constants::{ENTRY_DELIMITER, FIELD_DELIMITER, MAX_KEYCODE, MIN_KEYCODE, NO_LONG_KEYCODE},
    error::Error,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

/// GPIO line offset within a chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(u32);

impl LineId {
    /// Create a line ID from a chip-relative offset.
    #[must_use]
    pub const fn new(offset: u32) -> Self {
        LineId(offset)
    }

    /// Get the raw line offset.
    #[must_use]
    pub fn offset(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for LineId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let offset: u32 = s
            .trim()
            .parse()
            .map_err(|_| Error::InvalidLine(s.to_string()))?;
        Ok(LineId(offset))
    }
}

/// Linux input keycode (as reported by `showkey` in a raw TTY).
///
/// Only the range is validated; the meaning of a code is left to the
/// input subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct KeyCode(u16);

impl KeyCode {
    /// Create a keycode with range validation.
    ///
    /// # Errors
    /// Returns `Error::InvalidKeyCode` if the code is outside `1..=0x2ff`.
    pub fn new(code: u16) -> Result<Self> {
        if !(MIN_KEYCODE..=MAX_KEYCODE).contains(&code) {
            return Err(Error::InvalidKeyCode(format!(
                "Keycode must be {MIN_KEYCODE}-{MAX_KEYCODE}, got {code}"
            )));
        }
        Ok(KeyCode(code))
    }

    /// Get the raw keycode.
    #[must_use]
    pub fn as_u16(&self) -> u16 {
        self.0
    }
}

impl TryFrom<u16> for KeyCode {
    type Error = Error;

    fn try_from(code: u16) -> Result<Self> {
        KeyCode::new(code)
    }
}

impl From<KeyCode> for u16 {
    fn from(key: KeyCode) -> u16 {
        key.0
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for KeyCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let code: u16 = s
            .trim()
            .parse()
            .map_err(|_| Error::InvalidKeyCode(format!("'{s}' is not a number")))?;
        KeyCode::new(code)
    }
}

/// Line level that counts as "button pressed".
///
/// Buttons wired to ground on a pulled-up line are active low, which is
/// the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActiveLevel {
    /// Pressed when the line reads 0.
    #[default]
    Low,
    /// Pressed when the line reads 1.
    High,
}

impl ActiveLevel {
    /// Whether a raw line value means the button is held down.
    #[must_use]
    pub fn is_pressed(self, value: u8) -> bool {
        match self {
            ActiveLevel::Low => value == 0,
            ActiveLevel::High => value != 0,
        }
    }
}

/// Association of one line with the keycodes it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineBinding {
    /// Monitored line.
    pub line: LineId,
    /// Keycode emitted on a tap (and repeated while held when there is no long keycode).
    pub primary: KeyCode,
    /// Keycode emitted once the long press threshold elapses.
    pub long: Option<KeyCode>,
}

impl LineBinding {
    /// Create a binding without a long press keycode.
    #[must_use]
    pub fn new(line: LineId, primary: KeyCode) -> Self {
        Self {
            line,
            primary,
            long: None,
        }
    }

    /// Set the long press keycode.
    #[must_use]
    pub fn with_long(mut self, long: KeyCode) -> Self {
        self.long = Some(long);
        self
    }

    /// Whether presses on this line are disambiguated into tap and long press.
    #[must_use]
    pub fn has_long_press(&self) -> bool {
        self.long.is_some()
    }
}

impl fmt::Display for LineBinding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.long {
            Some(long) => write!(f, "{}:{}:{}", self.line, self.primary, long),
            None => write!(f, "{}:{}", self.line, self.primary),
        }
    }
}

impl std::str::FromStr for LineBinding {
    type Err = Error;

    /// Parse `<line>:<primary>[:<long>]`. A long keycode of `0` means none.
    fn from_str(s: &str) -> Result<Self> {
        let fields: Vec<&str> = s.split(FIELD_DELIMITER).map(str::trim).collect();

        let (line, primary, long) = match fields.as_slice() {
            [line, primary] => (line, primary, None),
            [line, primary, long] => (line, primary, Some(long)),
            _ => {
                return Err(Error::InvalidBinding(format!(
                    "'{s}' must be <line>:<keycode>[:<long keycode>]"
                )));
            }
        };

        let mut binding = LineBinding::new(line.parse()?, primary.parse()?);

        if let Some(long) = long {
            let code: u16 = long
                .parse()
                .map_err(|_| Error::InvalidKeyCode(format!("'{long}' is not a number")))?;
            if code != NO_LONG_KEYCODE {
                binding = binding.with_long(KeyCode::new(code)?);
            }
        }

        Ok(binding)
    }
}

/// Validated set of line bindings, at most one per line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LineBinding>", into = "Vec<LineBinding>")]
pub struct BindingTable(Vec<LineBinding>);

impl BindingTable {
    /// Create a binding table.
    ///
    /// # Errors
    /// Returns `Error::EmptyBindingTable` if no bindings are given and
    /// `Error::DuplicateLine` if a line appears more than once.
    pub fn new(bindings: Vec<LineBinding>) -> Result<Self> {
        if bindings.is_empty() {
            return Err(Error::EmptyBindingTable);
        }

        let mut seen = HashSet::with_capacity(bindings.len());
        for binding in &bindings {
            if !seen.insert(binding.line) {
                return Err(Error::DuplicateLine(binding.line));
            }
        }

        Ok(BindingTable(bindings))
    }

    /// Look up the binding for a line.
    #[must_use]
    pub fn get(&self, line: LineId) -> Option<&LineBinding> {
        self.0.iter().find(|binding| binding.line == line)
    }

    /// Iterate over bindings in configuration order.
    pub fn iter(&self) -> std::slice::Iter<'_, LineBinding> {
        self.0.iter()
    }

    /// Number of monitored lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a constructed table; present for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every keycode the table can emit, primary and long, deduplicated.
    #[must_use]
    pub fn keycodes(&self) -> BTreeSet<KeyCode> {
        self.0
            .iter()
            .flat_map(|binding| std::iter::once(binding.primary).chain(binding.long))
            .collect()
    }
}

impl TryFrom<Vec<LineBinding>> for BindingTable {
    type Error = Error;

    fn try_from(bindings: Vec<LineBinding>) -> Result<Self> {
        BindingTable::new(bindings)
    }
}

impl From<BindingTable> for Vec<LineBinding> {
    fn from(table: BindingTable) -> Self {
        table.0
    }
}

impl<'a> IntoIterator for &'a BindingTable {
    type Item = &'a LineBinding;
    type IntoIter = std::slice::Iter<'a, LineBinding>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for BindingTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let entries: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", entries.join(","))
    }
}

impl std::str::FromStr for BindingTable {
    type Err = Error;

    /// Parse a full mapping such as `19:103:1,6:108,26:105,5:28`.
    ///
    /// Empty entries (a trailing comma, for instance) are skipped.
    fn from_str(s: &str) -> Result<Self> {
        let bindings = s
            .split(ENTRY_DELIMITER)
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::parse)
            .collect::<Result<Vec<LineBinding>>>()?;

        BindingTable::new(bindings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn key(code: u16) -> KeyCode {
        KeyCode::new(code).unwrap()
    }

    #[rstest]
    #[case("1", 1)]
    #[case("103", 103)]
    #[case(" 28 ", 28)]
    #[case("767", 767)]
    fn test_keycode_valid(#[case] input: &str, #[case] expected: u16) {
        let code: KeyCode = input.parse().unwrap();
        assert_eq!(code.as_u16(), expected);
    }

    #[rstest]
    #[case("0")] // KEY_RESERVED
    #[case("768")] // > KEY_MAX
    #[case("-1")]
    #[case("up")]
    #[case("")]
    fn test_keycode_invalid(#[case] input: &str) {
        let result: Result<KeyCode> = input.parse();
        assert!(matches!(result, Err(Error::InvalidKeyCode(_))));
    }

    #[test]
    fn test_active_level() {
        assert!(ActiveLevel::Low.is_pressed(0));
        assert!(!ActiveLevel::Low.is_pressed(1));
        assert!(ActiveLevel::High.is_pressed(1));
        assert!(!ActiveLevel::High.is_pressed(0));
        assert_eq!(ActiveLevel::default(), ActiveLevel::Low);
    }

    #[rstest]
    #[case("19:103:1", 19, 103, Some(1))]
    #[case("6:108", 6, 108, None)]
    #[case("6:108:0", 6, 108, None)]
    #[case(" 5 : 28 ", 5, 28, None)]
    fn test_line_binding_valid(
        #[case] input: &str,
        #[case] line: u32,
        #[case] primary: u16,
        #[case] long: Option<u16>,
    ) {
        let binding: LineBinding = input.parse().unwrap();
        assert_eq!(binding.line, LineId::new(line));
        assert_eq!(binding.primary, key(primary));
        assert_eq!(binding.long, long.map(key));
        assert_eq!(binding.has_long_press(), long.is_some());
    }

    #[rstest]
    #[case("19")]
    #[case("19:103:1:2")]
    #[case("a:103")]
    #[case("19:x")]
    #[case("19:103:x")]
    #[case("19:0")]
    #[case("19:103:9999")]
    fn test_line_binding_invalid(#[case] input: &str) {
        let result: Result<LineBinding> = input.parse();
        assert!(result.is_err(), "{input} should not parse");
    }

    #[test]
    fn test_line_binding_display() {
        let tap = LineBinding::new(LineId::new(6), key(108));
        let long = tap.with_long(key(1));
        assert_eq!(tap.to_string(), "6:108");
        assert_eq!(long.to_string(), "6:108:1");
    }

    #[test]
    fn test_binding_table_parse() {
        let table: BindingTable = "19:103:1,6:108,26:105,5:28".parse().unwrap();

        assert_eq!(table.len(), 4);
        assert!(!table.is_empty());
        assert_eq!(
            table.get(LineId::new(19)).unwrap().long,
            Some(key(1))
        );
        assert!(table.get(LineId::new(7)).is_none());

        let lines: Vec<u32> = table.iter().map(|b| b.line.offset()).collect();
        assert_eq!(lines, vec![19, 6, 26, 5]);
    }

    #[test]
    fn test_binding_table_skips_empty_entries() {
        let table: BindingTable = "19:103,,6:108,".parse().unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_binding_table_duplicate_line() {
        let result: Result<BindingTable> = "19:103,19:108".parse();
        assert!(matches!(result, Err(Error::DuplicateLine(line)) if line == LineId::new(19)));
    }

    #[rstest]
    #[case("")]
    #[case(" , ,")]
    fn test_binding_table_empty(#[case] input: &str) {
        let result: Result<BindingTable> = input.parse();
        assert!(matches!(result, Err(Error::EmptyBindingTable)));
    }

    #[test]
    fn test_binding_table_keycodes() {
        let table: BindingTable = "19:103:1,6:108,26:103".parse().unwrap();
        let keys: Vec<u16> = table.keycodes().into_iter().map(u16::from).collect();
        assert_eq!(keys, vec![1, 103, 108]);
    }

    #[test]
    fn test_binding_table_display_roundtrip() {
        let table: BindingTable = "19:103:1,6:108".parse().unwrap();
        assert_eq!(table.to_string(), "19:103:1,6:108");
    }

    #[test]
    fn test_binding_table_serialization() {
        let table: BindingTable = "19:103:1,6:108".parse().unwrap();
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(
            json,
            r#"[{"line":19,"primary":103,"long":1},{"line":6,"primary":108,"long":null}]"#
        );

        let restored: BindingTable = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, table);
    }

    #[test]
    fn test_binding_table_deserialization_validates() {
        let duplicate = r#"[{"line":1,"primary":2,"long":null},{"line":1,"primary":3,"long":null}]"#;
        assert!(serde_json::from_str::<BindingTable>(duplicate).is_err());

        let reserved = r#"[{"line":1,"primary":0,"long":null}]"#;
        assert!(serde_json::from_str::<BindingTable>(reserved).is_err());
    }
}
