//! FBRx droop NV table codec
//!
//! Droop equalizer coefficients are stored in NV items as hex-byte text.
//! A payload holds one or more tables, each laid out as:
//!
//! - Bytes 0-1: data-type tag `0x007b`, little-endian (`7b 00`)
//! - Byte 2: bandwidth code in MHz (`0a` or `14`)
//! - Byte 3: reserved, always zero
//! - Byte 4: group delay
//! - Byte 5: tap count N (at most 32)
//! - Bytes 6-133: N little-endian `i32` coefficients, zero padded to 128 bytes
//!
//! Decoding works on 16-bit words: the tag and bandwidth are matched as whole
//! words and each coefficient is rebuilt from two consecutive words.

pub mod words;

use byteorder::{LittleEndian, WriteBytesExt};

use crate::bandwidth::Bandwidth;
use crate::error::{Error, Result};
use words::{format_hex_bytes, join_words, parse_hex_bytes, sign_extend, to_words, twos_complement};

/// Data-type tag that opens every droop table
pub const DATA_TYPE_TAG: u16 = 0x007b;

/// Bytes reserved for coefficient data in every table
pub const TABLE_DATA_BYTES: usize = 128;

/// Most coefficients a table can hold
pub const MAX_TAPS: usize = TABLE_DATA_BYTES / 4;

/// Header bytes in front of the coefficient data
pub const TABLE_HEADER_BYTES: usize = 6;

/// Equalizer coefficients: real parts plus parallel imaginary parts
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CoefficientVector {
    real: Vec<i32>,
    imag: Vec<i32>,
}

impl CoefficientVector {
    /// Build a vector from real parts; imaginary parts are all zero
    pub fn from_real(real: Vec<i32>) -> Self {
        let imag = vec![0; real.len()];
        Self { real, imag }
    }

    pub fn real(&self) -> &[i32] {
        &self.real
    }

    pub fn imag(&self) -> &[i32] {
        &self.imag
    }

    /// Number of taps
    pub fn len(&self) -> usize {
        self.real.len()
    }

    pub fn is_empty(&self) -> bool {
        self.real.is_empty()
    }
}

/// One decoded or to-be-encoded droop table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NvRecord {
    pub bandwidth: Bandwidth,
    pub group_delay: u8,
    pub coefficients: CoefficientVector,
}

impl NvRecord {
    pub fn new(bandwidth: Bandwidth, group_delay: u8, coefficients: CoefficientVector) -> Self {
        Self {
            bandwidth,
            group_delay,
            coefficients,
        }
    }

    pub fn tap_count(&self) -> usize {
        self.coefficients.len()
    }

    /// Encoded table bytes (header plus padded coefficient data)
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        encode_table(
            &self.coefficients,
            self.group_delay,
            self.tap_count(),
            self.bandwidth,
        )
    }

    /// Encoded table as hex-byte text
    pub fn encode(&self) -> Result<String> {
        Ok(format_hex_bytes(&self.to_bytes()?))
    }
}

/// Encode a coefficient vector as a padded table of hex-byte text.
///
/// `tap_count` must match the vector length and may not exceed [`MAX_TAPS`].
pub fn encode(
    coefficients: &CoefficientVector,
    group_delay: u8,
    tap_count: usize,
    bandwidth: Bandwidth,
) -> Result<String> {
    let bytes = encode_table(coefficients, group_delay, tap_count, bandwidth)?;
    Ok(format_hex_bytes(&bytes))
}

fn encode_table(
    coefficients: &CoefficientVector,
    group_delay: u8,
    tap_count: usize,
    bandwidth: Bandwidth,
) -> Result<Vec<u8>> {
    if tap_count > MAX_TAPS {
        return Err(Error::unsupported(format!("tap count {tap_count} exceeds {MAX_TAPS}")));
    }
    if coefficients.len() != tap_count {
        return Err(Error::malformed(format!(
            "declared {tap_count} taps but {} coefficients were given",
            coefficients.len()
        )));
    }

    let mut out = Vec::with_capacity(TABLE_HEADER_BYTES + TABLE_DATA_BYTES);
    out.write_u16::<LittleEndian>(DATA_TYPE_TAG)?;
    out.write_u8(bandwidth.mhz())?;
    out.write_u8(0)?;
    out.write_u8(group_delay)?;
    // tap_count <= MAX_TAPS was checked above
    out.write_u8(tap_count as u8)?;

    for &value in coefficients.real() {
        out.write_u32::<LittleEndian>(twos_complement(value))?;
    }

    out.resize(TABLE_HEADER_BYTES + TABLE_DATA_BYTES, 0);
    Ok(out)
}

/// Decode the coefficients for `bandwidth` from an NV payload.
///
/// Returns `Ok(None)` when the payload has no table for that bandwidth.
pub fn decode(payload: &str, bandwidth: Bandwidth) -> Result<Option<CoefficientVector>> {
    Ok(decode_record(payload, bandwidth)?.map(|record| record.coefficients))
}

/// Decode the first table for `bandwidth` from an NV payload.
///
/// Tables of the other bandwidth are stepped over whole. A table that claims
/// more coefficients than the payload holds is a malformed record; a table
/// with zero taps is treated as absent.
pub fn decode_record(payload: &str, bandwidth: Bandwidth) -> Result<Option<NvRecord>> {
    let words = to_words(&parse_hex_bytes(payload)?);

    let mut i = 0;
    while i + 1 < words.len() {
        if words[i] != DATA_TYPE_TAG {
            i += 1;
            continue;
        }
        i += 1;

        let Some(found) = Bandwidth::from_tag_word(words[i]) else {
            i += 1;
            continue;
        };
        i += 1;

        let Some(&layout) = words.get(i) else {
            return Err(Error::malformed(format!("{found} MHz table ends before its tap count")));
        };
        let [group_delay, taps] = layout.to_le_bytes();
        let taps = usize::from(taps);
        i += 1;

        let end = i + 2 * taps;
        if end > words.len() {
            return Err(Error::malformed(format!(
                "{found} MHz table declares {taps} taps but only {} words remain",
                words.len() - i
            )));
        }

        if found == bandwidth && taps > 0 {
            let real = words[i..end]
                .chunks_exact(2)
                .map(|pair| sign_extend(join_words(pair[0], pair[1])))
                .collect();
            tracing::debug!(bandwidth = %found, taps, group_delay, "decoded droop table");
            let coefficients = CoefficientVector::from_real(real);
            return Ok(Some(NvRecord::new(found, group_delay, coefficients)));
        }
        i = end;
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn vector(real: &[i32]) -> CoefficientVector {
        CoefficientVector::from_real(real.to_vec())
    }

    #[test]
    fn test_encode_reference_table() {
        let encoded = encode(&vector(&[-1373, 18383]), 2, 2, Bandwidth::Mhz20).unwrap();

        let mut expected = String::from("7b 00 14 00 02 02 a3 fa ff ff cf 47 00 00");
        for _ in 0..120 {
            expected.push_str(" 00");
        }
        assert_eq!(encoded, expected);

        let decoded = decode(&encoded, Bandwidth::Mhz20).unwrap().unwrap();
        assert_eq!(decoded.real(), &[-1373, 18383]);
        assert_eq!(decoded.imag(), &[0, 0]);
    }

    #[test]
    fn test_coefficient_data_always_padded() {
        for taps in [0usize, 1, 7, 8, 31, 32] {
            let real: Vec<i32> = (0..taps as i32).map(|v| v * 1000 - 9000).collect();
            let encoded = encode(&vector(&real), 3, taps, Bandwidth::Mhz10).unwrap();
            let tokens = encoded.split(' ').count();
            let expected = TABLE_HEADER_BYTES + TABLE_DATA_BYTES;
            assert_eq!(tokens, expected, "taps = {taps}");
            assert!(encoded.split(' ').all(|t| t.len() == 2));
        }
    }

    #[test]
    fn test_roundtrip_all_tap_counts() {
        let pattern = [i32::MIN, -1, 0, 1, i32::MAX, -1373, 0x00FF_FF00];
        for taps in 1..=MAX_TAPS {
            let real: Vec<i32> = pattern.iter().cycle().take(taps).copied().collect();
            for bw in Bandwidth::ALL {
                let record = NvRecord::new(bw, 5, vector(&real));
                let encoded = record.encode().unwrap();
                let decoded = decode_record(&encoded, bw).unwrap().unwrap();
                assert_eq!(decoded, record, "taps = {taps}, bw = {bw}");
            }
        }
    }

    #[test]
    fn test_sign_extremes_roundtrip() {
        for value in [-1, i32::MAX, i32::MIN] {
            let encoded = encode(&vector(&[value]), 0, 1, Bandwidth::Mhz10).unwrap();
            let decoded = decode(&encoded, Bandwidth::Mhz10).unwrap().unwrap();
            assert_eq!(decoded.real(), &[value]);
        }
    }

    #[test]
    fn test_decode_other_bandwidth_not_found() {
        let encoded = encode(&vector(&[-145, -755]), 1, 2, Bandwidth::Mhz10).unwrap();
        assert_eq!(decode(&encoded, Bandwidth::Mhz20).unwrap(), None);
    }

    #[test]
    fn test_decode_picks_requested_table_from_payload() {
        let bw10 = NvRecord::new(Bandwidth::Mhz10, 1, vector(&[-145, -755, 17594]));
        let bw20 = NvRecord::new(Bandwidth::Mhz20, 2, vector(&[-1373, 18383]));
        let payload = format!(
            "00 00 02 00 {} {}",
            bw10.encode().unwrap(),
            bw20.encode().unwrap()
        );

        let decoded = decode_record(&payload, Bandwidth::Mhz10).unwrap();
        assert_eq!(decoded, Some(bw10));
        let decoded = decode_record(&payload, Bandwidth::Mhz20).unwrap();
        assert_eq!(decoded, Some(bw20));
    }

    #[test]
    fn test_decode_skips_unknown_bandwidth_tag() {
        // 7b 00 followed by a 5 MHz tag is not a table we read
        let bw20 = NvRecord::new(Bandwidth::Mhz20, 2, vector(&[42]));
        let payload = format!("7b 00 05 00 {}", bw20.encode().unwrap());
        let decoded = decode_record(&payload, Bandwidth::Mhz20).unwrap();
        assert_eq!(decoded, Some(bw20));
    }

    #[test]
    fn test_decode_zero_taps_is_not_found() {
        let encoded = encode(&CoefficientVector::default(), 0, 0, Bandwidth::Mhz20).unwrap();
        assert_eq!(decode(&encoded, Bandwidth::Mhz20).unwrap(), None);
    }

    #[test]
    fn test_decode_truncated_table_is_malformed() {
        let err = decode("7b 00 14 00 02 02 a3 fa ff ff", Bandwidth::Mhz20).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedRecord);

        let err = decode("7b 00 14 00", Bandwidth::Mhz20).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedRecord);
    }

    #[test]
    fn test_decode_empty_payload() {
        assert_eq!(decode("", Bandwidth::Mhz10).unwrap(), None);
        assert_eq!(decode("   ", Bandwidth::Mhz20).unwrap(), None);
    }

    #[test]
    fn test_encode_rejects_bad_tap_counts() {
        let err = encode(&vector(&[1; 33]), 0, 33, Bandwidth::Mhz20).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedParameter);

        let err = encode(&vector(&[1, 2, 3]), 0, 2, Bandwidth::Mhz20).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedRecord);
    }
}
