//! Sniff-based decompression of extracted member-file bytes (§4.C "File
//! extraction", OQ6).
//!
//! SC2 replay member files carry no compression-method flag the core
//! trusts; instead, the reference client (and this implementation)
//! detects the compressed format from its magic bytes.

use std::io::Read;

use bzip2::read::BzDecoder;
use flate2::read::{GzDecoder, ZlibDecoder};

use crate::{Error, Result};

/// Detect `data`'s compression format from its magic bytes and
/// decompress it. Falls through to returning `data` unchanged when no
/// known magic is recognized — some member files are stored verbatim.
///
/// Only bzip2, gzip, and zlib/deflate are recognized (OQ6); SC2 replay
/// members are never observed using LZMA, PKWare implode, Huffman, or
/// ADPCM, so those formats are not sniffed for at all.
pub fn detect_and_decompress(data: &[u8]) -> Result<Vec<u8>> {
    if is_bzip2(data) {
        let start = if data.first() == Some(&0x10) { 1 } else { 0 };
        return inflate(BzDecoder::new(&data[start..]), "bzip2");
    }
    if data.len() >= 2 && data[0..2] == [0x1F, 0x8B] {
        return inflate(GzDecoder::new(data), "gzip");
    }
    if data.len() >= 2 && looks_like_zlib_header(data[0], data[1]) {
        return inflate(ZlibDecoder::new(data), "zlib");
    }
    Ok(data.to_vec())
}

fn is_bzip2(data: &[u8]) -> bool {
    data.starts_with(b"BZh") || (data.first() == Some(&0x10) && data[1..].starts_with(b"BZh"))
}

fn inflate<R: Read>(mut reader: R, format: &str) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    reader
        .read_to_end(&mut out)
        .map_err(|e| Error::invalid_format(format!("{format} decompression failed: {e}")))?;
    Ok(out)
}

fn looks_like_zlib_header(cmf: u8, flg: u8) -> bool {
    (cmf & 0x0F) == 8 && ((cmf as u16) * 256 + flg as u16) % 31 == 0
}
