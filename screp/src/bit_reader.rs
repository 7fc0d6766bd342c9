//! Bit-level cursor shared by the Versioned and BitPacked decoders (§3, §4.D)

use crate::byte_reader::ByteReader;
use crate::{Error, Result};

/// Bit fill order used when assembling a multi-bit value out of several
/// partial chunks taken from the latch.
///
/// The Versioned stream is always [`BitOrder::Msb`]; the attribute events
/// stream is always [`BitOrder::Lsb`]. This is a per-stream, construction-time
/// choice — it is never auto-detected (§9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitOrder {
    /// First bit read becomes the most significant bit of the result
    Msb,
    /// First bit read becomes the least significant bit of the result
    Lsb,
}

/// A sub-byte-resolution reader layered over a [`ByteReader`].
///
/// Holds a one-byte latch for the partially-consumed current byte and a
/// count of unconsumed bits remaining in it. `latch` always keeps its
/// unconsumed bits right-aligned in the low `latch_bits` bits, which makes
/// "take the top `k` bits of what's left" a plain shift-and-mask.
#[derive(Debug, Clone, Copy)]
pub struct BitCursor<'a> {
    bytes: ByteReader<'a>,
    latch: u8,
    latch_bits: u8,
    order: BitOrder,
}

impl<'a> BitCursor<'a> {
    /// Wrap a byte slice for bit-level reading in the given order
    pub fn new(data: &'a [u8], order: BitOrder) -> Self {
        Self {
            bytes: ByteReader::new(data),
            latch: 0,
            latch_bits: 0,
            order,
        }
    }

    fn fill_latch(&mut self) -> Result<()> {
        if self.latch_bits == 0 {
            self.latch = self.bytes.read_u8()?;
            self.latch_bits = 8;
        }
        Ok(())
    }

    /// Read `n` bits (`1..=32`) and assemble them into an unsigned integer
    /// per the cursor's [`BitOrder`].
    pub fn read_bits(&mut self, n: u32) -> Result<u32> {
        debug_assert!((1..=32).contains(&n), "read_bits supports 1..=32 bits");
        let mut result: u32 = 0;
        let mut accumulated: u32 = 0;

        while accumulated < n {
            self.fill_latch()?;
            let remaining_needed = n - accumulated;
            let chunk_size = remaining_needed.min(self.latch_bits as u32);

            let shift_out = self.latch_bits as u32 - chunk_size;
            let mask = ((1u32 << chunk_size) - 1) as u8;
            let chunk = (self.latch >> shift_out) & mask;

            self.latch_bits -= chunk_size as u8;
            self.latch &= (1u8.checked_shl(self.latch_bits as u32).unwrap_or(0)).wrapping_sub(1);

            let dest_shift = match self.order {
                BitOrder::Msb => n - accumulated - chunk_size,
                BitOrder::Lsb => accumulated,
            };
            result |= (chunk as u32) << dest_shift;
            accumulated += chunk_size;
        }

        Ok(result)
    }

    /// Clear the latch, then read `k` contiguous bytes
    pub fn read_aligned_bytes(&mut self, k: usize) -> Result<&'a [u8]> {
        self.byte_align();
        self.bytes.read_bytes(k)
    }

    /// Clear the latch without reading, discarding any unconsumed bits of
    /// the current byte
    pub fn byte_align(&mut self) {
        self.latch = 0;
        self.latch_bits = 0;
    }

    /// Total bits consumed so far: `byte_position*8 - latch_bits_remaining`
    pub fn used_bits(&self) -> u64 {
        self.bytes.position() as u64 * 8 - self.latch_bits as u64
    }

    /// `true` once the latch is empty and the byte cursor is at the end
    pub fn done(&self) -> bool {
        self.latch_bits == 0 && self.bytes.at_end()
    }
}
