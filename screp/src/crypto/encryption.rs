//! Block (de/en)cryption of 32-bit-word-aligned buffers (§4.B)

use super::table::CRYPT_TABLE;

/// Decrypt a buffer of little-endian `u32` words in place
pub fn decrypt_block(data: &mut [u32], mut key: u32) {
    if key == 0 {
        return;
    }
    let mut seed: u32 = 0xEEEE_EEEE;

    for word in data.iter_mut() {
        seed = seed.wrapping_add(CRYPT_TABLE[0x400 + (key & 0xFF) as usize]);
        let plain = *word ^ key.wrapping_add(seed);
        *word = plain;

        key = (!key << 0x15).wrapping_add(0x1111_1111) | (key >> 0x0B);
        seed = plain
            .wrapping_add(seed)
            .wrapping_add(seed << 5)
            .wrapping_add(3);
    }
}

/// Encrypt a buffer of little-endian `u32` words in place (the mirror of
/// [`decrypt_block`], used by the test suite to build synthetic fixtures —
/// SPEC_FULL §4.B)
pub fn encrypt_block(data: &mut [u32], mut key: u32) {
    if key == 0 {
        return;
    }
    let mut seed: u32 = 0xEEEE_EEEE;

    for word in data.iter_mut() {
        seed = seed.wrapping_add(CRYPT_TABLE[0x400 + (key & 0xFF) as usize]);
        let plain = *word;
        *word = plain ^ key.wrapping_add(seed);

        key = (!key << 0x15).wrapping_add(0x1111_1111) | (key >> 0x0B);
        seed = plain
            .wrapping_add(seed)
            .wrapping_add(seed << 5)
            .wrapping_add(3);
    }
}

/// Decrypt a single `u32` word with a fresh `0xEEEEEEEE` seed
pub fn decrypt_dword(value: u32, key: u32) -> u32 {
    if key == 0 {
        return value;
    }
    let seed = 0xEEEE_EEEEu32.wrapping_add(CRYPT_TABLE[0x400 + (key & 0xFF) as usize]);
    value ^ key.wrapping_add(seed)
}

/// Byte-buffer convenience wrapper: decrypt a little-endian byte buffer
/// whose length is a multiple of 4, in place
pub fn decrypt_bytes(data: &mut [u8], key: u32) {
    let mut words: Vec<u32> = data
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    decrypt_block(&mut words, key);
    for (chunk, word) in data.chunks_exact_mut(4).zip(words) {
        chunk.copy_from_slice(&word.to_le_bytes());
    }
}

/// Byte-buffer convenience wrapper: encrypt a little-endian byte buffer
/// whose length is a multiple of 4, in place
pub fn encrypt_bytes(data: &mut [u8], key: u32) {
    let mut words: Vec<u32> = data
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    encrypt_block(&mut words, key);
    for (chunk, word) in data.chunks_exact_mut(4).zip(words) {
        chunk.copy_from_slice(&word.to_le_bytes());
    }
}
