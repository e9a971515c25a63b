//! Property-based tests for the line mapping parser.
//!
//! These tests generate arbitrary mapping strings and check that the parser
//! accepts every well-formed table and rejects the malformed ones.

use proptest::prelude::*;
use std::collections::BTreeMap;
use gpbuttond_core::{BindingTable, Error, KeyCode, LineId};

/// Strategy for keycodes accepted by the input subsystem.
fn valid_keycode() -> impl Strategy<Value = u16> {
    1u16..=0x2ff
}

/// Strategy for a table of unique lines, each with a primary and an
/// optional long keycode.
fn valid_table() -> impl Strategy<Value = BTreeMap<u32, (u16, Option<u16>)>> {
    prop::collection::btree_map(
        0u32..64,
        (valid_keycode(), prop::option::of(valid_keycode())),
        1..17,
    )
}

fn render(table: &BTreeMap<u32, (u16, Option<u16>)>) -> String {
    table
        .iter()
        .map(|(line, (primary, long))| match long {
            Some(long) => format!("{line}:{primary}:{long}"),
            None => format!("{line}:{primary}"),
        })
        .collect::<Vec<_>>()
        .join(",")
}

proptest! {
    /// Property: every well-formed mapping yields one binding per entry with
    /// the keycodes it was written with.
    #[test]
    fn prop_well_formed_mapping_parses(table in valid_table()) {
        let parsed: BindingTable = render(&table).parse().unwrap();

        prop_assert_eq!(parsed.len(), table.len());
        for (line, (primary, long)) in &table {
            let binding = parsed.get(LineId::new(*line)).unwrap();
            prop_assert_eq!(binding.primary, KeyCode::new(*primary).unwrap());
            prop_assert_eq!(binding.long, long.map(|code| KeyCode::new(code).unwrap()));
        }
    }

    /// Property: repeating any line makes the whole mapping invalid.
    #[test]
    fn prop_duplicate_line_rejected(
        table in valid_table(),
        extra_key in valid_keycode(),
    ) {
        let (&line, _) = table.iter().next().unwrap();
        let mapping = format!("{},{line}:{extra_key}", render(&table));

        let result: Result<BindingTable, Error> = mapping.parse();
        prop_assert!(matches!(result, Err(Error::DuplicateLine(dup)) if dup == LineId::new(line)));
    }

    /// Property: a keycode above KEY_MAX is never accepted.
    #[test]
    fn prop_out_of_range_keycode_rejected(
        line in 0u32..64,
        code in 0x300u16..=u16::MAX,
    ) {
        let result: Result<BindingTable, Error> = format!("{line}:{code}").parse();
        prop_assert!(matches!(result, Err(Error::InvalidKeyCode(_))));
    }
}
