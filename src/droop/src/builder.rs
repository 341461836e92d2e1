//! Turning equalizer tables into calibrated NV documents

use std::fs;
use std::path::{Path, PathBuf};

use crate::codec::NvRecord;
use crate::config::Config;
use crate::equalizer::{self, EqualizerTable};
use crate::error::{Error, Result};
use crate::nv::{NvDocument, NvItem, NvPayload};

/// One NV document per device type, in device-type order
pub fn build_documents(table: &EqualizerTable) -> Result<Vec<(String, NvDocument)>> {
    let mut documents = Vec::new();
    for device_type in table.device_types() {
        let mut document = NvDocument::default();
        for (technology, band, entries) in table.bands(device_type) {
            let records = entries
                .iter()
                .map(|entry| {
                    let coefficients = entry.coefficients.clone();
                    NvRecord::new(entry.bandwidth, entry.group_delay, coefficients)
                })
                .collect();
            let item = NvItem::calibrated(band, &NvPayload::new(records))?;
            tracing::debug!(
                %device_type,
                %technology,
                %band,
                id = item.id,
                tables = entries.len(),
                "built NV item"
            );
            document.push(item);
        }
        documents.push((device_type.to_string(), document));
    }
    Ok(documents)
}

/// Write `<root>/<device type><suffix>.xml` for every device type
pub fn write_documents(root: &Path, table: &EqualizerTable, suffix: &str) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(Error::missing("output directory", root));
    }
    let mut written = Vec::new();
    for (device_type, document) in build_documents(table)? {
        let path = root.join(format!("{device_type}{suffix}.xml"));
        fs::write(&path, document.to_xml())?;
        tracing::info!(path = %path.display(), items = document.items.len(), "wrote NV file");
        written.push(path);
    }
    Ok(written)
}

/// Read `<root>/<file_name>` and write its NV documents next to it
pub fn convert_workbook(root: &Path, file_name: &str, config: &Config) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(Error::missing("root directory", root));
    }
    let table = equalizer::read_workbook(&root.join(file_name), &config.builder.marker)?;
    write_documents(root, &table, &config.builder.output_suffix)
}
