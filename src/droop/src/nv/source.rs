//! Building `<NvSource>` documents from encoded droop tables

use byteorder::{LittleEndian, WriteBytesExt};
use quick_xml::escape::escape;

use crate::codec::words::format_hex_bytes;
use crate::codec::NvRecord;
use crate::error::{Error, Result};

use super::{calibrated_item_name, nv_id_for_band};

/// Attributes shared by every hex byte-stream item
const ITEM_ENCODING: &str = r#"mapping="byteStream" encoding="hex" index="0""#;

/// Version written at the start of every calibrated droop payload
pub const NV_VERSION: u16 = 0;

/// Full value of a calibrated droop item: version, table count, tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NvPayload {
    pub version: u16,
    pub records: Vec<NvRecord>,
}

impl NvPayload {
    pub fn new(records: Vec<NvRecord>) -> Self {
        Self {
            version: NV_VERSION,
            records,
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let count = u16::try_from(self.records.len())
            .map_err(|_| Error::unsupported(format!("{} tables in one item", self.records.len())))?;

        let mut out = Vec::new();
        out.write_u16::<LittleEndian>(self.version)?;
        out.write_u16::<LittleEndian>(count)?;
        for record in &self.records {
            out.extend_from_slice(&record.to_bytes()?);
        }
        Ok(out)
    }

    /// Hex-byte text ready to embed in an `<NvItem>`
    pub fn encode(&self) -> Result<String> {
        Ok(format_hex_bytes(&self.to_bytes()?))
    }
}

/// One `<NvItem>` element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NvItem {
    pub id: u32,
    pub name: String,
    pub payload: String,
}

impl NvItem {
    /// Calibrated droop item for `band`, with the id from the band table
    pub fn calibrated(band: &str, payload: &NvPayload) -> Result<Self> {
        let id = nv_id_for_band(band)
            .ok_or_else(|| Error::unsupported(format!("band {band} has no droop NV id")))?;
        Ok(Self {
            id,
            name: calibrated_item_name(band),
            payload: payload.encode()?,
        })
    }

    pub fn to_xml(&self) -> String {
        format!(
            "<NvItem id=\"{}\" subscriptionid=\"0\" name=\"{}\" {ITEM_ENCODING}>{}</NvItem>",
            self.id,
            escape(self.name.as_str()),
            escape(self.payload.as_str()),
        )
    }
}

/// An `<NvSource>` document, one item per line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NvDocument {
    pub items: Vec<NvItem>,
}

impl NvDocument {
    pub fn push(&mut self, item: NvItem) {
        self.items.push(item);
    }

    pub fn to_xml(&self) -> String {
        let mut out = String::from("<NvSource>\n");
        for item in &self.items {
            out.push_str(&item.to_xml());
            out.push('\n');
        }
        out.push_str("</NvSource>\n");
        out
    }
}
