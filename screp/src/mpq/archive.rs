//! The top-level MPQ archive: header + both tables + file access (§3, §4.C)

use std::fs::File;
use std::path::Path;

use memmap2::Mmap;

use super::header::{self, FormatVersion, MpqHeader, UserDataHeader};
use super::het_bet::{BetHeader, HetHeader};
use super::tables::{BlockFlags, BlockTable, HashTable};
use crate::byte_reader::ByteReader;
use crate::compression::detect_and_decompress;
use crate::crypto::{decrypt_bytes, hash_string, hash_type};
use crate::{Error, Result};

enum Backing {
    Owned(Vec<u8>),
    Mapped(Mmap),
}

impl Backing {
    fn as_slice(&self) -> &[u8] {
        match self {
            Backing::Owned(v) => v,
            Backing::Mapped(m) => m,
        }
    }
}

/// Lists a file present in the archive (§3 "Listfile")
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// File name, if known from the listfile or a well-known member name
    pub name: Option<String>,
    /// Index into the block table
    pub block_index: u32,
    /// Decompressed size
    pub size: u64,
}

/// An opened MPQ archive: bytes plus the parsed header and tables.
///
/// Per OQ3, any HET/BET tables present are parsed for validation only;
/// filename resolution always goes through the classic hash table.
pub struct Archive {
    data: Backing,
    archive_offset: usize,
    user_data: Option<UserDataHeader>,
    header: MpqHeader,
    hash_table: HashTable,
    block_table: BlockTable,
    het_header: Option<HetHeader>,
    bet_header: Option<BetHeader>,
}

impl Archive {
    /// Memory-map and open an archive from a file path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        // SAFETY: the mapping is read-only and the archive is not mutated
        // concurrently by this process for the lifetime of the `Archive`.
        let mmap = unsafe { Mmap::map(&file)? };
        Self::from_backing(Backing::Mapped(mmap))
    }

    /// Open an archive already resident in memory
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_backing(Backing::Owned(data))
    }

    fn from_backing(data: Backing) -> Result<Self> {
        let (archive_offset, user_data, header) = header::find_header(data.as_slice())?;

        let mut hash_reader = ByteReader::new(data.as_slice());
        hash_reader.seek(archive_offset + header.effective_hash_table_pos() as usize)?;
        let hash_table = HashTable::read(&mut hash_reader, header.hash_table_size)?;

        let mut block_reader = ByteReader::new(data.as_slice());
        block_reader.seek(archive_offset + header.effective_block_table_pos() as usize)?;
        let block_table = BlockTable::read(&mut block_reader, header.block_table_size)?;

        let het_header = header.het_table_pos.and_then(|pos| {
            let mut r = ByteReader::new(data.as_slice());
            r.seek(archive_offset + pos as usize).ok()?;
            HetHeader::read(&mut r).ok()
        });
        let bet_header = header.bet_table_pos.and_then(|pos| {
            let mut r = ByteReader::new(data.as_slice());
            r.seek(archive_offset + pos as usize).ok()?;
            BetHeader::read(&mut r).ok()
        });

        Ok(Archive {
            data,
            archive_offset,
            user_data,
            header,
            hash_table,
            block_table,
            het_header,
            bet_header,
        })
    }

    /// The parsed MPQ header
    pub fn header(&self) -> &MpqHeader {
        &self.header
    }

    /// The leading user-data header, if this archive was an SC2 replay
    pub fn user_data(&self) -> Option<&UserDataHeader> {
        self.user_data.as_ref()
    }

    /// Absolute byte offset of the MPQ header within the archive's bytes
    pub fn archive_offset(&self) -> usize {
        self.archive_offset
    }

    /// The HET table header, if present and well-formed (OQ3: header only)
    pub fn het_header(&self) -> Option<&HetHeader> {
        self.het_header.as_ref()
    }

    /// The BET table header, if present and well-formed (OQ3: header only)
    pub fn bet_header(&self) -> Option<&BetHeader> {
        self.bet_header.as_ref()
    }

    /// Container format version
    pub fn format_version(&self) -> FormatVersion {
        self.header.format_version
    }

    /// The SC2 replay header payload carried in the user-data content,
    /// immediately following the 16-byte user-data header (§4.C
    /// "User-data content"). `None` when the archive had no user-data
    /// header at all.
    pub fn user_data_content(&self) -> Option<&[u8]> {
        let user_data = self.user_data?;
        let user_data_start = self.archive_offset.checked_sub(user_data.header_offset as usize)?;
        let content_start = user_data_start + 16;
        let content_end = content_start + user_data.user_data_header_size as usize;
        self.data.as_slice().get(content_start..content_end)
    }

    /// Read and fully decompress a member file by name
    pub fn read_file(&self, name: &str) -> Result<Vec<u8>> {
        let block_index = self
            .hash_table
            .find_file(name)
            .ok_or_else(|| Error::file_not_found(name))?;
        self.read_block(block_index, Some(name))
    }

    fn read_block(&self, block_index: u32, name: Option<&str>) -> Result<Vec<u8>> {
        let block = self.block_table.get(block_index)?;
        if !block.exists() {
            return Err(Error::invalid_format(format!(
                "block {block_index} does not exist"
            )));
        }
        if block.flags.contains(BlockFlags::PATCH_FILE) {
            return Err(Error::unsupported("patch file blocks"));
        }

        let start = self.archive_offset + block.file_pos as usize;
        let end = start + block.compressed_size as usize;
        let raw = self
            .data
            .as_slice()
            .get(start..end)
            .ok_or_else(|| Error::invalid_format("block data out of archive bounds"))?;

        let mut buf = raw.to_vec();
        if block.flags.contains(BlockFlags::ENCRYPTED) {
            let name = name.ok_or_else(|| {
                Error::unsupported("decrypting a file block without a known name")
            })?;
            let key = file_decryption_key(name, block.file_pos, block.flags);
            decrypt_bytes_in_place_padded(&mut buf, key);
        }

        // Multi-sector decompression is out of scope: SC2 member files are
        // observed to fit the single-unit path. Detect the compression
        // format by magic rather than trusting the block flags, and fall
        // back to the raw bytes on failure rather than erroring (§4.C,
        // §7 "Decompression failure").
        match detect_and_decompress(&buf) {
            Ok(decompressed) => Ok(decompressed),
            Err(e) => {
                log::warn!("decompression failed for block {block_index}, returning raw bytes: {e}");
                Ok(buf)
            }
        }
    }

    /// Iterate block table entries with a name where the classic hash
    /// table has one on record
    pub fn file_entries(&self) -> Vec<FileEntry> {
        self.hash_table
            .occupied()
            .filter_map(|entry| {
                let block = self.block_table.get(entry.block_index).ok()?;
                Some(FileEntry {
                    name: None,
                    block_index: entry.block_index,
                    size: block.file_size as u64,
                })
            })
            .collect()
    }
}

fn decrypt_bytes_in_place_padded(buf: &mut [u8], key: u32) {
    let whole = buf.len() - (buf.len() % 4);
    decrypt_bytes(&mut buf[..whole], key);
}

/// Derive the decryption key for a named, encrypted member file (§4.B),
/// optionally adjusted by its offset when `FIX_KEY` is set.
pub fn file_decryption_key(name: &str, file_pos: u32, flags: BlockFlags) -> u32 {
    let base = hash_string(base_name(name), hash_type::FILE_KEY);
    if flags.contains(BlockFlags::FIX_KEY) {
        (base ^ flags.bits()).wrapping_add(file_pos)
    } else {
        base
    }
}

fn base_name(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}
