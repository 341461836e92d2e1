//! Supported LTE channel bandwidths.
//!
//! Only the 10 MHz and 20 MHz classes are characterised. Each class has its
//! own tag word inside an NV payload, its own resource-block count and its own
//! static default NV item.

use std::fmt;

use crate::error::{Error, Result};

/// Bandwidth class of a droop record or measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bandwidth {
    Mhz10,
    Mhz20,
}

impl Bandwidth {
    pub const ALL: [Bandwidth; 2] = [Bandwidth::Mhz10, Bandwidth::Mhz20];

    /// Bandwidth in MHz, which is also the numeric code written into NV tables
    pub fn mhz(self) -> u8 {
        match self {
            Bandwidth::Mhz10 => 10,
            Bandwidth::Mhz20 => 20,
        }
    }

    /// Tag word that follows the data-type tag in a stored NV table
    pub fn tag_word(self) -> u16 {
        u16::from(self.mhz())
    }

    /// Total uplink resource blocks for the bandwidth
    pub fn max_resource_blocks(self) -> u32 {
        match self {
            Bandwidth::Mhz10 => 50,
            Bandwidth::Mhz20 => 100,
        }
    }

    /// NV id of the static (non band-specific) equalizer for the bandwidth
    pub fn static_nv_id(self) -> &'static str {
        match self {
            Bandwidth::Mhz10 => "27476",
            Bandwidth::Mhz20 => "27478",
        }
    }

    pub fn from_mhz(mhz: u32) -> Result<Self> {
        match mhz {
            10 => Ok(Bandwidth::Mhz10),
            20 => Ok(Bandwidth::Mhz20),
            other => Err(Error::unsupported(format!(
                "bandwidth {other} MHz (only 10 and 20 are supported)"
            ))),
        }
    }

    /// Parse a textual bandwidth such as `"20"` taken from a file name or label
    pub fn from_label(label: &str) -> Result<Self> {
        let mhz = label
            .trim()
            .parse::<u32>()
            .map_err(|_| Error::unsupported(format!("bandwidth label {label:?}")))?;
        Self::from_mhz(mhz)
    }

    pub fn from_tag_word(word: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|bw| bw.tag_word() == word)
    }
}

impl fmt::Display for Bandwidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mhz())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_tag_words() {
        assert_eq!(Bandwidth::Mhz10.tag_word(), 0x000a);
        assert_eq!(Bandwidth::Mhz20.tag_word(), 0x0014);
        assert_eq!(Bandwidth::from_tag_word(0x0014), Some(Bandwidth::Mhz20));
        assert_eq!(Bandwidth::from_tag_word(0x0005), None);
    }

    #[test]
    fn test_from_label() {
        assert_eq!(Bandwidth::from_label("10").unwrap(), Bandwidth::Mhz10);
        assert_eq!(Bandwidth::from_label(" 20 ").unwrap(), Bandwidth::Mhz20);

        let err = Bandwidth::from_label("15").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedParameter);
        assert!(Bandwidth::from_label("1.4").is_err());
    }

    #[test]
    fn test_display_is_mhz() {
        assert_eq!(Bandwidth::Mhz10.to_string(), "10");
        assert_eq!(Bandwidth::Mhz20.to_string(), "20");
    }
}
