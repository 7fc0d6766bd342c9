//! Hash table and block table (§3, §4.C)

use crate::byte_reader::ByteReader;
use crate::crypto::{decrypt_bytes, hash_string, hash_type};
use crate::{Error, Result};

/// Sentinel: this hash table slot has always been empty
pub const HASH_ENTRY_EMPTY: u32 = 0xFFFF_FFFF;
/// Sentinel: this hash table slot was deleted and can be reused, but the
/// probe chain must continue past it
pub const HASH_ENTRY_DELETED: u32 = 0xFFFF_FFFE;

/// A single hash table slot (§3 "Hash Table")
#[derive(Debug, Clone, Copy)]
pub struct HashEntry {
    /// First half of the filename hash, `hash_type::NAME_A`
    pub name1: u32,
    /// Second half of the filename hash, `hash_type::NAME_B`
    pub name2: u32,
    /// Locale id, or 0 for neutral
    pub locale: u16,
    /// Platform id, or 0 for default
    pub platform: u16,
    /// Index into the block table, or one of the `HASH_ENTRY_*` sentinels
    pub block_index: u32,
}

impl HashEntry {
    fn is_empty(&self) -> bool {
        self.block_index == HASH_ENTRY_EMPTY
    }
}

/// The decrypted hash table: maps filename hashes to block table indices
#[derive(Debug, Clone)]
pub struct HashTable {
    entries: Vec<HashEntry>,
}

impl HashTable {
    /// Read and decrypt `entry_count` 16-byte entries with the standard
    /// `(hash table)` key (OQ1: always attempt encrypted reading first).
    pub fn read(r: &mut ByteReader<'_>, entry_count: u32) -> Result<Self> {
        let byte_len = entry_count as usize * 16;
        let raw = r.read_bytes(byte_len)?;

        let key = hash_string("(hash table)", hash_type::FILE_KEY);
        let mut decrypted = raw.to_vec();
        decrypt_bytes(&mut decrypted, key);

        let entries = Self::parse_entries(&decrypted, entry_count)?;

        // OQ1: if the encrypted-read interpretation produced a table with
        // no occupied slots at all, it was likely never encrypted (some
        // malformed or hand-built archives skip encryption); fall back to
        // the raw bytes as-is rather than reporting zero files.
        if entries.iter().all(HashEntry::is_empty) {
            let fallback = Self::parse_entries(raw, entry_count)?;
            if fallback.iter().any(|e| !e.is_empty()) {
                return Ok(HashTable { entries: fallback });
            }
        }

        Ok(HashTable { entries })
    }

    fn parse_entries(data: &[u8], entry_count: u32) -> Result<Vec<HashEntry>> {
        let mut reader = ByteReader::new(data);
        let mut entries = Vec::with_capacity(entry_count as usize);
        for _ in 0..entry_count {
            let name1 = reader.read_u32_le()?;
            let name2 = reader.read_u32_le()?;
            let locale = reader.read_u16_le()?;
            let platform = reader.read_u16_le()?;
            let block_index = reader.read_u32_le()?;
            entries.push(HashEntry {
                name1,
                name2,
                locale,
                platform,
                block_index,
            });
        }
        Ok(entries)
    }

    /// Number of slots in the table
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no slots at all
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Probe for `name`'s block table index, following the linear chain
    /// from its starting slot and requiring both name halves to match
    /// (OQ4: no fuzzy fallback).
    pub fn find_file(&self, name: &str) -> Option<u32> {
        if self.entries.is_empty() {
            return None;
        }
        let table_size = self.entries.len() as u32;
        let start = hash_string(name, hash_type::TABLE_INDEX) % table_size;
        let name1 = hash_string(name, hash_type::NAME_A);
        let name2 = hash_string(name, hash_type::NAME_B);

        for probe in 0..table_size {
            let index = ((start + probe) % table_size) as usize;
            let entry = &self.entries[index];

            if entry.block_index == HASH_ENTRY_EMPTY {
                return None;
            }
            if entry.block_index == HASH_ENTRY_DELETED {
                continue;
            }
            if entry.name1 == name1 && entry.name2 == name2 {
                return Some(entry.block_index);
            }
        }
        None
    }

    /// Iterate all occupied slots, for listfile-free enumeration
    pub fn occupied(&self) -> impl Iterator<Item = &HashEntry> {
        self.entries.iter().filter(|e| !e.is_empty())
    }
}

bitflags::bitflags! {
    /// Per-file flags (§3 "Block Table")
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct BlockFlags: u32 {
        /// File is stored as one or more compressed sectors (generic compression)
        const COMPRESSED = 0x0000_0200;
        /// File uses PKWare implode compression (legacy, single-method)
        const IMPLODE = 0x0000_0100;
        /// File is encrypted
        const ENCRYPTED = 0x0001_0000;
        /// File's encryption key is adjusted by its offset in the archive
        const FIX_KEY = 0x0002_0000;
        /// Placeholder entry; has no real file data
        const PATCH_FILE = 0x0010_0000;
        /// Single-unit file: no sector subdivision
        const SINGLE_UNIT = 0x0100_0000;
        /// Deletion marker
        const DELETE_MARKER = 0x0200_0000;
        /// Sector checksums follow the file data
        const SECTOR_CRC = 0x0400_0000;
        /// Slot is in use
        const EXISTS = 0x8000_0000;
    }
}

impl BlockFlags {
    /// Whether any compression scheme applies (generic or implode)
    pub fn is_compressed(self) -> bool {
        self.intersects(BlockFlags::COMPRESSED | BlockFlags::IMPLODE)
    }
}

/// A single block table entry describing one file's storage (§3 "Block Table")
#[derive(Debug, Clone, Copy)]
pub struct BlockEntry {
    /// Offset of the file's data, relative to the archive's header offset
    pub file_pos: u32,
    /// Size of the file's data as stored in the archive (post-compression)
    pub compressed_size: u32,
    /// Size of the file's data once decompressed
    pub file_size: u32,
    /// Storage/compression/encryption flags
    pub flags: BlockFlags,
}

impl BlockEntry {
    /// Whether this slot describes a real, present file
    pub fn exists(&self) -> bool {
        self.flags.contains(BlockFlags::EXISTS)
    }
}

/// The decrypted block table: describes each file's storage parameters
#[derive(Debug, Clone)]
pub struct BlockTable {
    entries: Vec<BlockEntry>,
}

impl BlockTable {
    /// Read and decrypt `entry_count` 16-byte entries with the standard
    /// `(block table)` key.
    pub fn read(r: &mut ByteReader<'_>, entry_count: u32) -> Result<Self> {
        let byte_len = entry_count as usize * 16;
        let raw = r.read_bytes(byte_len)?;

        let key = hash_string("(block table)", hash_type::FILE_KEY);
        let mut decrypted = raw.to_vec();
        decrypt_bytes(&mut decrypted, key);

        let mut reader = ByteReader::new(&decrypted);
        let mut entries = Vec::with_capacity(entry_count as usize);
        for _ in 0..entry_count {
            let file_pos = reader.read_u32_le()?;
            let compressed_size = reader.read_u32_le()?;
            let file_size = reader.read_u32_le()?;
            let flags_raw = reader.read_u32_le()?;
            entries.push(BlockEntry {
                file_pos,
                compressed_size,
                file_size,
                flags: BlockFlags::from_bits_truncate(flags_raw),
            });
        }
        Ok(BlockTable { entries })
    }

    /// Number of slots in the table
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no slots at all
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a slot by index, validating it's in range
    pub fn get(&self, index: u32) -> Result<&BlockEntry> {
        self.entries
            .get(index as usize)
            .ok_or_else(|| Error::invalid_format(format!("block index {index} out of range")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::encrypt_bytes;

    fn encrypted_hash_table_bytes(entries: &[HashEntry]) -> Vec<u8> {
        let mut raw = Vec::new();
        for e in entries {
            raw.extend_from_slice(&e.name1.to_le_bytes());
            raw.extend_from_slice(&e.name2.to_le_bytes());
            raw.extend_from_slice(&e.locale.to_le_bytes());
            raw.extend_from_slice(&e.platform.to_le_bytes());
            raw.extend_from_slice(&e.block_index.to_le_bytes());
        }
        let key = hash_string("(hash table)", hash_type::FILE_KEY);
        encrypt_bytes(&mut raw, key);
        raw
    }

    #[test]
    fn finds_file_by_exact_name_hash_match() {
        let name = "replay.details";
        let name1 = hash_string(name, hash_type::NAME_A);
        let name2 = hash_string(name, hash_type::NAME_B);
        let table_size = 4u32;
        let start = (hash_string(name, hash_type::TABLE_INDEX) % table_size) as usize;

        let mut entries = vec![
            HashEntry {
                name1: 0,
                name2: 0,
                locale: 0,
                platform: 0,
                block_index: HASH_ENTRY_EMPTY,
            };
            table_size as usize
        ];
        entries[start] = HashEntry {
            name1,
            name2,
            locale: 0,
            platform: 0,
            block_index: 2,
        };

        let bytes = encrypted_hash_table_bytes(&entries);
        let mut r = ByteReader::new(&bytes);
        let table = HashTable::read(&mut r, table_size).unwrap();

        assert_eq!(table.find_file(name), Some(2));
        assert_eq!(table.find_file("no.such.file"), None);
    }

    #[test]
    fn requires_both_name_halves_to_match() {
        // I4 / OQ4
        let name = "replay.details";
        let name1 = hash_string(name, hash_type::NAME_A);
        let table_size = 2u32;
        let start = (hash_string(name, hash_type::TABLE_INDEX) % table_size) as usize;

        let mut entries = vec![
            HashEntry {
                name1: 0,
                name2: 0,
                locale: 0,
                platform: 0,
                block_index: HASH_ENTRY_EMPTY,
            };
            table_size as usize
        ];
        entries[start] = HashEntry {
            name1,
            name2: 0xDEAD_BEEF, // deliberately wrong
            locale: 0,
            platform: 0,
            block_index: 0,
        };

        let bytes = encrypted_hash_table_bytes(&entries);
        let mut r = ByteReader::new(&bytes);
        let table = HashTable::read(&mut r, table_size).unwrap();
        assert_eq!(table.find_file(name), None);
    }

    #[test]
    fn deleted_slots_do_not_terminate_the_probe_chain() {
        let name = "x";
        let name1 = hash_string(name, hash_type::NAME_A);
        let name2 = hash_string(name, hash_type::NAME_B);
        let table_size = 4u32;
        let start = (hash_string(name, hash_type::TABLE_INDEX) % table_size) as usize;
        let next = ((start as u32 + 1) % table_size) as usize;

        let mut entries = vec![
            HashEntry {
                name1: 0,
                name2: 0,
                locale: 0,
                platform: 0,
                block_index: HASH_ENTRY_EMPTY,
            };
            table_size as usize
        ];
        entries[start] = HashEntry {
            name1: 0,
            name2: 0,
            locale: 0,
            platform: 0,
            block_index: HASH_ENTRY_DELETED,
        };
        entries[next] = HashEntry {
            name1,
            name2,
            locale: 0,
            platform: 0,
            block_index: 7,
        };

        let bytes = encrypted_hash_table_bytes(&entries);
        let mut r = ByteReader::new(&bytes);
        let table = HashTable::read(&mut r, table_size).unwrap();
        assert_eq!(table.find_file(name), Some(7));
    }

    #[test]
    fn block_table_round_trips_flags_and_sizes() {
        let mut raw = Vec::new();
        raw.extend_from_slice(&100u32.to_le_bytes());
        raw.extend_from_slice(&200u32.to_le_bytes());
        raw.extend_from_slice(&400u32.to_le_bytes());
        raw.extend_from_slice(
            &(BlockFlags::EXISTS | BlockFlags::COMPRESSED)
                .bits()
                .to_le_bytes(),
        );
        let key = hash_string("(block table)", hash_type::FILE_KEY);
        encrypt_bytes(&mut raw, key);

        let mut r = ByteReader::new(&raw);
        let table = BlockTable::read(&mut r, 1).unwrap();
        let entry = table.get(0).unwrap();
        assert_eq!(entry.file_pos, 100);
        assert_eq!(entry.compressed_size, 200);
        assert_eq!(entry.file_size, 400);
        assert!(entry.exists());
        assert!(entry.flags.is_compressed());
    }

    #[test]
    fn out_of_range_block_index_is_invalid_format() {
        let mut r = ByteReader::new(&[]);
        let table = BlockTable::read(&mut r, 0).unwrap();
        assert!(matches!(table.get(0), Err(Error::InvalidFormat(_))));
    }
}
