//! Hex token text, little-endian words and two's-complement helpers.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Error, Result};

/// Parse space-separated two-digit hex tokens (`"7b 00 14"`) into bytes
pub fn parse_hex_bytes(text: &str) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    for token in text.split_whitespace() {
        if token.len() != 2 {
            return Err(Error::malformed(format!("hex token {token:?} is not exactly two digits")));
        }
        let decoded = hex::decode(token)
            .map_err(|e| Error::malformed(format!("hex token {token:?}: {e}")))?;
        bytes.extend_from_slice(&decoded);
    }
    Ok(bytes)
}

/// Render bytes as lowercase two-digit hex tokens joined by single spaces
pub fn format_hex_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&hex::encode([*byte]));
    }
    out
}

/// Pair stored bytes into 16-bit words, low byte first.
///
/// A trailing unpaired byte is dropped.
pub fn to_words(bytes: &[u8]) -> Vec<u16> {
    bytes.chunks_exact(2).map(LittleEndian::read_u16).collect()
}

/// Join a low and a high 16-bit word into a 32-bit value
#[inline]
pub fn join_words(low: u16, high: u16) -> u32 {
    (u32::from(high) << 16) | u32::from(low)
}

/// Bit pattern of a signed coefficient as stored in an NV table.
///
/// Negative values become `(0xFFFFFFFF ^ |v|) + 1`.
pub fn twos_complement(value: i32) -> u32 {
    if value < 0 {
        (0xFFFF_FFFF ^ value.unsigned_abs()).wrapping_add(1)
    } else {
        value.unsigned_abs()
    }
}

/// Interpret a stored 32-bit pattern as a signed coefficient.
///
/// With bit 31 set the value is `-((0xFFFFFFFF ^ raw) + 1)`.
pub fn sign_extend(raw: u32) -> i32 {
    if raw & 0x8000_0000 != 0 {
        let magnitude = i64::from(0xFFFF_FFFF ^ raw) + 1;
        // magnitude is in 1..=2^31, so the negation always fits
        (-magnitude) as i32
    } else {
        raw as i32
    }
}
