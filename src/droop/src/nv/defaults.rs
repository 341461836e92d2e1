//! Static (band independent) droop equalizers

use crate::bandwidth::Bandwidth;
use crate::codec::CoefficientVector;
use crate::document::Document;
use crate::error::{Error, Result};

use super::{locate, Selector};

/// Built-in 10 MHz equalizer, used when the NV file has no static item
const BUILTIN_BW10: [i32; 8] = [-145, -755, 17594, 1128, -2663, 1938, -943, 231];

/// Built-in 20 MHz equalizer, used when the NV file has no static item
const BUILTIN_BW20: [i32; 8] = [-1373, 18383, 1058, -3232, 2589, -1471, 533, -103];

/// Position of the tap count inside a static item's decimal list
const TAP_COUNT_INDEX: usize = 2;

/// Fallback equalizers, one per bandwidth
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticDefaults {
    bw10: CoefficientVector,
    bw20: CoefficientVector,
}

impl Default for StaticDefaults {
    fn default() -> Self {
        Self {
            bw10: CoefficientVector::from_real(BUILTIN_BW10.to_vec()),
            bw20: CoefficientVector::from_real(BUILTIN_BW20.to_vec()),
        }
    }
}

impl StaticDefaults {
    /// Read the static items out of an NV document.
    ///
    /// A bandwidth whose item is missing keeps its built-in vector.
    pub fn from_document(document: &Document) -> Result<Self> {
        let mut defaults = Self::default();
        for bandwidth in Bandwidth::ALL {
            let id = bandwidth.static_nv_id();
            match locate(document, Selector::Id(id)) {
                Some(text) => {
                    let parsed = parse_static_item(text).map_err(|e| match e {
                        Error::MalformedRecord(msg) => {
                            Error::malformed(format!("static NV {id}: {msg}"))
                        }
                        other => other,
                    })?;
                    *defaults.get_mut(bandwidth) = parsed;
                }
                None => {
                    tracing::warn!(
                        nv_id = id,
                        %bandwidth,
                        "static droop NV not found, using built-in equalizer"
                    );
                }
            }
        }
        Ok(defaults)
    }

    pub fn get(&self, bandwidth: Bandwidth) -> &CoefficientVector {
        match bandwidth {
            Bandwidth::Mhz10 => &self.bw10,
            Bandwidth::Mhz20 => &self.bw20,
        }
    }

    fn get_mut(&mut self, bandwidth: Bandwidth) -> &mut CoefficientVector {
        match bandwidth {
            Bandwidth::Mhz10 => &mut self.bw10,
            Bandwidth::Mhz20 => &mut self.bw20,
        }
    }
}

/// Parse `"v0, v1, N, c0, c1, ..."` into the N coefficients after the count.
///
/// Only the count and the coefficients are read; other fields may hold
/// anything, including nothing after a trailing comma.
fn parse_static_item(text: &str) -> Result<CoefficientVector> {
    let values: Vec<&str> = text.split(',').map(str::trim).collect();

    let count = values
        .get(TAP_COUNT_INDEX)
        .ok_or_else(|| Error::malformed("list is too short to hold a tap count"))?;
    let count = count
        .parse::<usize>()
        .ok()
        .filter(|&c| c > 0)
        .ok_or_else(|| Error::malformed(format!("tap count {count:?} is not positive")))?;

    let start = TAP_COUNT_INDEX + 1;
    let coefficients = values
        .get(start..start + count)
        .ok_or_else(|| {
            Error::malformed(format!(
                "declares {count} taps but holds {}",
                values.len().saturating_sub(start)
            ))
        })?
        .iter()
        .map(|v| {
            v.parse::<i32>()
                .map_err(|_| Error::malformed(format!("coefficient {v:?} is not a 32-bit integer")))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CoefficientVector::from_real(coefficients))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_builtin_defaults() {
        let defaults = StaticDefaults::default();
        assert_eq!(defaults.get(Bandwidth::Mhz10).real()[0], -145);
        assert_eq!(defaults.get(Bandwidth::Mhz20).real()[1], 18383);
        assert_eq!(defaults.get(Bandwidth::Mhz20).imag(), &[0; 8]);
    }

    #[test]
    fn test_parse_static_item() {
        let vector = parse_static_item("0, 4, 3, -10, 20, -30, 99, 98").unwrap();
        assert_eq!(vector.real(), &[-10, 20, -30]);
    }

    #[test]
    fn test_parse_static_item_ignores_other_fields() {
        assert_eq!(parse_static_item("0,0,2,7,-7,").unwrap().real(), &[7, -7]);
        let vector = parse_static_item("1.0,x,2,7,-7,extra").unwrap();
        assert_eq!(vector.real(), &[7, -7]);
    }

    #[test]
    fn test_parse_static_item_errors() {
        for bad in [
            "0, 1",
            "0, 1, 4, 1, 2",
            "0, 1, x, 1",
            "0, 1, 0",
            "0, 1, 1, 99999999999",
        ] {
            let err = parse_static_item(bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedRecord, "{bad}");
        }
    }

    #[test]
    fn test_from_document_overrides_present_items() {
        let doc = Document::parse(
            "<NvSource>\
               <NvItem id=\"27478\" name=\"STATIC\">0, 0, 2, 7, -7</NvItem>\
             </NvSource>",
        )
        .unwrap();
        let defaults = StaticDefaults::from_document(&doc).unwrap();
        assert_eq!(defaults.get(Bandwidth::Mhz20).real(), &[7, -7]);
        assert_eq!(
            defaults.get(Bandwidth::Mhz10),
            StaticDefaults::default().get(Bandwidth::Mhz10)
        );
    }

    #[test]
    fn test_from_document_trailing_comma() {
        let xml = r#"<NvSource><NvItem id="27478">0,0,2,7,-7,</NvItem></NvSource>"#;
        let doc = Document::parse(xml).unwrap();
        let defaults = StaticDefaults::from_document(&doc).unwrap();
        assert_eq!(defaults.get(Bandwidth::Mhz20).real(), &[7, -7]);
    }

    #[test]
    fn test_from_document_reports_item_id() {
        let doc =
            Document::parse("<NvSource><NvItem id=\"27476\">1, 2</NvItem></NvSource>").unwrap();
        let err = StaticDefaults::from_document(&doc).unwrap_err();
        assert!(err.to_string().contains("27476"));
    }
}
