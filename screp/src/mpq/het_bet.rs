//! HET/BET table headers (§4.C, OQ3: parsed and validated only, never
//! consulted for lookup — the classic hash/block tables remain the sole
//! path for filename resolution).

use super::header::{BET_TABLE_SIGNATURE, HET_TABLE_SIGNATURE};
use crate::byte_reader::ByteReader;
use crate::{Error, Result};

/// Common fields shared by the HET and BET extended-table headers
#[derive(Debug, Clone, Copy)]
struct ExtendedTableCommon {
    version: u32,
    data_size: u32,
}

fn read_common(r: &mut ByteReader<'_>, expected_signature: u32, name: &str) -> Result<ExtendedTableCommon> {
    let signature = r.read_u32_le()?;
    if signature != expected_signature {
        return Err(Error::invalid_format(format!(
            "missing {name} table signature"
        )));
    }
    let version = r.read_u32_le()?;
    let data_size = r.read_u32_le()?;
    Ok(ExtendedTableCommon { version, data_size })
}

/// HET (Hash Extended Table) header, v1 layout
#[derive(Debug, Clone, Copy)]
pub struct HetHeader {
    /// Table format version, expected to be 1
    pub version: u32,
    /// Size of the table's remaining data, in bytes
    pub data_size: u32,
    /// Total number of hash table slots
    pub table_size: u32,
    /// Number of file entries actually present
    pub entry_count: u32,
    /// Size, in bits, of each hash
    pub hash_entry_size: u32,
    /// Number of high bits of the hash stored in the HET name-hash array
    pub hash_table_key_size: u32,
    /// Number of bits used per BET index
    pub index_size_total: u32,
    /// Extra bits on top of `index_size_total` for collision resolution
    pub index_size_extra: u32,
    /// Effective per-entry index size, in bits
    pub index_size: u32,
    /// Size, in bytes, of the BET index table that follows the name hashes
    pub index_table_size: u32,
}

impl HetHeader {
    /// Parse and validate a HET table header (signature + version only;
    /// the name-hash and index arrays that follow are never decoded).
    pub fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        let common = read_common(r, HET_TABLE_SIGNATURE, "HET")?;
        if common.version != 1 {
            return Err(Error::invalid_format(format!(
                "unsupported HET table version {}",
                common.version
            )));
        }

        Ok(HetHeader {
            version: common.version,
            data_size: common.data_size,
            table_size: r.read_u32_le()?,
            entry_count: r.read_u32_le()?,
            hash_entry_size: r.read_u32_le()?,
            hash_table_key_size: r.read_u32_le()?,
            index_size_total: r.read_u32_le()?,
            index_size_extra: r.read_u32_le()?,
            index_size: r.read_u32_le()?,
            index_table_size: r.read_u32_le()?,
        })
    }
}

/// BET (Block Extended Table) header, v1 layout
#[derive(Debug, Clone, Copy)]
pub struct BetHeader {
    /// Table format version, expected to be 1
    pub version: u32,
    /// Size of the table's remaining data, in bytes
    pub data_size: u32,
    /// Size, in bytes, of this header plus the bit-packed flag/size tables
    pub table_size: u32,
    /// Number of file entries
    pub file_count: u32,
    /// Size, in bits, of one packed file record
    pub table_entry_size: u32,
}

impl BetHeader {
    /// Parse and validate a BET table header (signature + version only;
    /// the bit-packed file record array that follows is never decoded).
    pub fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        let common = read_common(r, BET_TABLE_SIGNATURE, "BET")?;
        if common.version != 1 {
            return Err(Error::invalid_format(format!(
                "unsupported BET table version {}",
                common.version
            )));
        }

        Ok(BetHeader {
            version: common.version,
            data_size: common.data_size,
            table_size: r.read_u32_le()?,
            file_count: r.read_u32_le()?,
            table_entry_size: r.read_u32_le()?,
        })
    }
}
