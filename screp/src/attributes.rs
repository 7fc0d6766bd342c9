//! The `(attributes)` member file: a fixed little-endian record layout,
//! grouped by scope and attribute id (§4.x).
//!
//! Unlike the Versioned stream, this format is read with
//! [`BitOrder::Lsb`] — a per-stream, construction-time choice (§9
//! "Big-endian vs little-endian bit order").

use std::collections::BTreeMap;

use crate::bit_reader::{BitCursor, BitOrder};
use crate::Result;

/// One decoded `(attributes)` record. `value` is stored reversed on the
/// wire relative to its natural byte order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeEntry {
    pub namespace: u32,
    pub attr_id: u32,
    pub scope: u8,
    pub value: [u8; 4],
}

/// All entries from a parsed `(attributes)` member file, grouped
/// `{scope -> {attr_id -> [entries]}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    pub source: u8,
    pub map_namespace: u32,
    by_scope: BTreeMap<u8, BTreeMap<u32, Vec<AttributeEntry>>>,
}

impl Attributes {
    /// Entries recorded under `scope` for `attr_id`, if any.
    pub fn get(&self, scope: u8, attr_id: u32) -> Option<&[AttributeEntry]> {
        self.by_scope.get(&scope)?.get(&attr_id).map(Vec::as_slice)
    }

    /// Every scope this file recorded entries for.
    pub fn scopes(&self) -> impl Iterator<Item = u8> + '_ {
        self.by_scope.keys().copied()
    }
}

fn read_u32_le(cursor: &mut BitCursor<'_>) -> Result<u32> {
    let bytes = cursor.read_aligned_bytes(4)?;
    let array: [u8; 4] = bytes
        .try_into()
        .map_err(|_| crate::Error::invalid_format("truncated u32 in (attributes)"))?;
    Ok(u32::from_le_bytes(array))
}

/// Parse the `(attributes)` member file's raw (already decompressed)
/// bytes: an 8-bit source, a 32-bit map namespace, a 32-bit entry count,
/// then that many `{namespace:u32, attrid:u32, scope:u8, value:[u8;4]
/// reversed}` records.
pub fn parse(data: &[u8]) -> Result<Attributes> {
    let mut cursor = BitCursor::new(data, BitOrder::Lsb);
    let source = cursor.read_aligned_bytes(1)?[0];
    let map_namespace = read_u32_le(&mut cursor)?;
    let count = read_u32_le(&mut cursor)?;

    let mut by_scope: BTreeMap<u8, BTreeMap<u32, Vec<AttributeEntry>>> = BTreeMap::new();
    for _ in 0..count {
        let namespace = read_u32_le(&mut cursor)?;
        let attr_id = read_u32_le(&mut cursor)?;
        let scope = cursor.read_aligned_bytes(1)?[0];
        let mut value: [u8; 4] = cursor
            .read_aligned_bytes(4)?
            .try_into()
            .map_err(|_| crate::Error::invalid_format("truncated attribute value in (attributes)"))?;
        value.reverse();

        by_scope
            .entry(scope)
            .or_default()
            .entry(attr_id)
            .or_default()
            .push(AttributeEntry { namespace, attr_id, scope, value });
    }

    Ok(Attributes { source, map_namespace, by_scope })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<u8> {
        let mut data = vec![1u8]; // source
        data.extend_from_slice(&0u32.to_le_bytes()); // map_namespace
        data.extend_from_slice(&1u32.to_le_bytes()); // count
        data.extend_from_slice(&5u32.to_le_bytes()); // namespace
        data.extend_from_slice(&10u32.to_le_bytes()); // attrid
        data.push(2); // scope
        data.extend_from_slice(&[1, 2, 3, 4]); // value, stored reversed
        data
    }

    #[test]
    fn parses_header_fields() {
        let attrs = parse(&sample()).unwrap();
        assert_eq!(attrs.source, 1);
        assert_eq!(attrs.map_namespace, 0);
    }

    #[test]
    fn groups_entries_by_scope_and_attr_id_and_reverses_the_value() {
        let attrs = parse(&sample()).unwrap();
        let entries = attrs.get(2, 10).expect("entry present");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].namespace, 5);
        assert_eq!(entries[0].value, [4, 3, 2, 1]);
    }

    #[test]
    fn missing_scope_or_attr_id_is_none() {
        let attrs = parse(&sample()).unwrap();
        assert!(attrs.get(99, 10).is_none());
        assert!(attrs.get(2, 99).is_none());
    }

    #[test]
    fn zero_count_yields_no_entries() {
        let mut data = vec![0u8];
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        let attrs = parse(&data).unwrap();
        assert_eq!(attrs.scopes().count(), 0);
    }

    #[test]
    fn truncated_input_is_an_error() {
        assert!(parse(&[1, 2, 3]).is_err());
    }
}
