//! Droop characterisation workbook
//!
//! One sheet per device type, band and bandwidth:
//!
//! ```text
//! row | A (headings)                    | B          | C..
//! 0   | FBRx Measurement Mode           | mode       |
//! 1   | Measurement Equalizer (real)    | real[0]    | real[1..]
//! 2   | Measurement Equalizer (imag)    | imag[0]    | imag[1..]
//! 3-7 | averaging / length / ripple     | parameters |
//! 8   | Measurement Freqs               | freq(rb) for each resource block column
//! 9.. | Data_<channel>_<iteration>      | power by ascending resource block
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::Workbook;

use crate::bandwidth::Bandwidth;
use crate::codec::CoefficientVector;
use crate::config::{Config, ReportConfig};
use crate::document::Document;
use crate::error::{Error, Result};
use crate::measurement::{self, MeasurementSet, Series};
use crate::nv::{self, StaticDefaults};

/// Column-A headings, one per fixed row
pub const HEADINGS: [&str; 9] = [
    "FBRx Measurement Mode",
    "Measurement Equalizer (real)",
    "Measurement Equalizer (imag)",
    "Averaging Method",
    "New equalizer length",
    "Magnitude ripple tolerance",
    "Magnitude ripple target",
    "Magnitude ripple limit",
    "Measurement Freqs",
];

const REAL_ROW: u32 = 1;
const IMAG_ROW: u32 = 2;
const FREQ_ROW: u32 = 8;
const FIRST_DATA_ROW: u32 = 9;

/// Placeholder written in column B of the frequency row
const FREQ_PLACEHOLDER: f64 = -1.0;

const HEADING_COLUMN_WIDTH: f64 = 30.0;

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
}

/// Measurement frequency offset (MHz) of a resource block
pub fn frequency_for_rb(resource_block: u32, bandwidth: Bandwidth) -> f64 {
    let half = f64::from(bandwidth.max_resource_blocks()) / 2.0;
    (f64::from(resource_block) - half) * 0.18 + 0.09
}

/// In-memory contents of one report sheet
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    pub name: String,
    cells: BTreeMap<(u32, u16), Cell>,
}

impl SheetLayout {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cells: BTreeMap::new(),
        }
    }

    /// Lay out one sheet. Frequencies are taken from the first series only.
    pub fn build(
        device_type: &str,
        band: &str,
        bandwidth: Bandwidth,
        coefficients: &CoefficientVector,
        series: &[Series<'_>],
        config: &ReportConfig,
    ) -> Self {
        let mut sheet = Self::new(format!("{device_type}_{band}_{bandwidth}"));

        for (row, heading) in (0u32..).zip(HEADINGS) {
            sheet.set(row, 0, Cell::Text(heading.to_string()));
        }

        let real = coefficients.real();
        let imag = coefficients.imag();
        let column_b = [
            config.fbrx_mode(bandwidth),
            real.first().copied().map_or(0.0, f64::from),
            imag.first().copied().map_or(0.0, f64::from),
            config.averaging_method,
            config.equalizer_length,
            config.ripple_tolerance,
            config.ripple_target,
            config.ripple_limit,
            FREQ_PLACEHOLDER,
        ];
        for (row, value) in (0u32..).zip(column_b) {
            sheet.set(row, 1, Cell::Number(value));
        }

        for (col, (&re, &im)) in (2u16..).zip(real.iter().zip(imag).skip(1)) {
            sheet.set(REAL_ROW, col, Cell::Number(f64::from(re)));
            sheet.set(IMAG_ROW, col, Cell::Number(f64::from(im)));
        }

        for (i, row_series) in series.iter().enumerate() {
            let row = FIRST_DATA_ROW + i as u32;
            let label = format!("Data_{}_{}", row_series.channel, row_series.iteration);
            sheet.set(row, 0, Cell::Text(label));
            for (col, (&rb, &power)) in (1u16..).zip(&row_series.points) {
                sheet.set(row, col, Cell::Number(power));
                if i == 0 {
                    sheet.set(FREQ_ROW, col, Cell::Number(frequency_for_rb(rb, bandwidth)));
                }
            }
        }

        sheet
    }

    /// Write a cell, replacing anything already there
    pub fn set(&mut self, row: u32, col: u16, cell: Cell) {
        self.cells.insert((row, col), cell);
    }

    pub fn get(&self, row: u32, col: u16) -> Option<&Cell> {
        self.cells.get(&(row, col))
    }

    pub fn cells(&self) -> impl Iterator<Item = (&(u32, u16), &Cell)> {
        self.cells.iter()
    }
}

/// Lay out every band/bandwidth sheet for a measurement set.
///
/// Each sheet uses the band's calibrated equalizer from `nv_document` when
/// present, otherwise the static default for the bandwidth.
pub fn build_report(
    measurements: &MeasurementSet,
    nv_document: &Document,
    defaults: &StaticDefaults,
    device_type: &str,
    config: &ReportConfig,
) -> Result<Vec<SheetLayout>> {
    let mut sheets = Vec::new();
    for band in measurements.bands() {
        for bandwidth in measurements.bandwidths(band) {
            let calibrated = nv::extract_calibrated(nv_document, band, bandwidth)?;
            let coefficients = match &calibrated {
                Some(found) => {
                    tracing::info!(%band, %bandwidth, "using calibrated droop equalizer");
                    found
                }
                None => {
                    tracing::info!(
                        %band,
                        %bandwidth,
                        "no calibrated droop equalizer, using static default"
                    );
                    defaults.get(bandwidth)
                }
            };

            let series = measurements.series(band, bandwidth);
            sheets.push(SheetLayout::build(
                device_type,
                band,
                bandwidth,
                coefficients,
                &series,
                config,
            ));
        }
    }
    Ok(sheets)
}

/// Renders sheet layouts into an `.xlsx` workbook
pub struct ReportWriter {
    workbook: Workbook,
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportWriter {
    pub fn new() -> Self {
        Self {
            workbook: Workbook::new(),
        }
    }

    pub fn add_sheet(&mut self, layout: &SheetLayout) -> Result<()> {
        let worksheet = self.workbook.add_worksheet();
        worksheet.set_name(&layout.name)?;
        worksheet.set_column_width(0, HEADING_COLUMN_WIDTH)?;
        for (&(row, col), cell) in layout.cells() {
            match cell {
                Cell::Text(text) => worksheet.write_string(row, col, text)?,
                Cell::Number(value) => worksheet.write_number(row, col, *value)?,
            };
        }
        Ok(())
    }

    pub fn save(mut self, path: &Path) -> Result<()> {
        self.workbook.save(path)?;
        Ok(())
    }
}

/// Write all layouts to one workbook at `path`
pub fn write_report(layouts: &[SheetLayout], path: &Path) -> Result<()> {
    let mut writer = ReportWriter::new();
    for layout in layouts {
        writer.add_sheet(layout)?;
    }
    writer.save(path)
}

/// Aggregate the measurements under `root`, pair them with the equalizers in
/// `<root>/<nv_file_name>` and save `<root>/<workbook_name>_<device_type>.xlsx`.
pub fn characterize(
    root: &Path,
    device_type: &str,
    nv_file_name: &str,
    config: &Config,
) -> Result<PathBuf> {
    if !root.is_dir() {
        return Err(Error::missing("root directory", root));
    }
    let nv_document = Document::from_path(&root.join(nv_file_name))?;
    let defaults = StaticDefaults::from_document(&nv_document)?;

    let measurements = measurement::aggregate(root, &config.measurement)?;
    tracing::info!(points = measurements.len(), "aggregated measurements");

    let layouts = build_report(
        &measurements,
        &nv_document,
        &defaults,
        device_type,
        &config.report,
    )?;
    let path = root.join(format!("{}_{device_type}.xlsx", config.report.workbook_name));
    write_report(&layouts, &path)?;
    tracing::info!(path = %path.display(), sheets = layouts.len(), "saved output");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::MeasurementKey;

    fn number(sheet: &SheetLayout, row: u32, col: u16) -> f64 {
        match sheet.get(row, col) {
            Some(Cell::Number(v)) => *v,
            other => panic!("expected number at ({row}, {col}), got {other:?}"),
        }
    }

    fn text(sheet: &SheetLayout, row: u32, col: u16) -> &str {
        match sheet.get(row, col) {
            Some(Cell::Text(t)) => t,
            other => panic!("expected text at ({row}, {col}), got {other:?}"),
        }
    }

    fn sample_set() -> MeasurementSet {
        let mut set = MeasurementSet::new();
        for (iteration, offset) in [("run1", 0.0), ("run2", 0.5)] {
            for (rb, power) in [(0, 23.0), (25, 22.0), (49, 21.0)] {
                set.insert(
                    MeasurementKey {
                        band: "B1".into(),
                        bandwidth: Bandwidth::Mhz10,
                        channel: "18300".into(),
                        iteration: iteration.into(),
                        resource_block: rb,
                    },
                    power + offset,
                );
            }
        }
        set
    }

    #[test]
    fn test_frequency_for_rb() {
        assert!((frequency_for_rb(0, Bandwidth::Mhz10) - -4.41).abs() < 1e-9);
        assert!((frequency_for_rb(50, Bandwidth::Mhz20) - 0.09).abs() < 1e-9);
        assert!((frequency_for_rb(99, Bandwidth::Mhz20) - 8.91).abs() < 1e-9);
    }

    #[test]
    fn test_layout() {
        let set = sample_set();
        let coefficients = CoefficientVector::from_real(vec![-145, -755, 17594]);
        let series = set.series("B1", Bandwidth::Mhz10);
        let sheet = SheetLayout::build(
            "MTP",
            "B1",
            Bandwidth::Mhz10,
            &coefficients,
            &series,
            &ReportConfig::default(),
        );

        assert_eq!(sheet.name, "MTP_B1_10");
        assert_eq!(text(&sheet, 0, 0), "FBRx Measurement Mode");
        assert_eq!(text(&sheet, 8, 0), "Measurement Freqs");

        assert_eq!(number(&sheet, 0, 1), 3.0);
        assert_eq!(number(&sheet, 1, 1), -145.0);
        assert_eq!(number(&sheet, 2, 1), 0.0);
        assert_eq!(number(&sheet, 4, 1), 10.0);
        assert_eq!(number(&sheet, 7, 1), 0.2);

        assert_eq!(number(&sheet, 1, 2), -755.0);
        assert_eq!(number(&sheet, 1, 3), 17594.0);
        assert_eq!(number(&sheet, 2, 3), 0.0);
        assert!(sheet.get(1, 4).is_none());

        // frequency row replaces the column-B placeholder
        assert!((number(&sheet, 8, 1) - frequency_for_rb(0, Bandwidth::Mhz10)).abs() < 1e-9);
        assert!((number(&sheet, 8, 3) - frequency_for_rb(49, Bandwidth::Mhz10)).abs() < 1e-9);

        assert_eq!(text(&sheet, 9, 0), "Data_18300_run1");
        assert_eq!(number(&sheet, 9, 1), 23.0);
        assert_eq!(number(&sheet, 9, 3), 21.0);
        assert_eq!(text(&sheet, 10, 0), "Data_18300_run2");
        assert_eq!(number(&sheet, 10, 2), 22.5);
    }

    #[test]
    fn test_layout_without_measurements_keeps_placeholder() {
        let sheet = SheetLayout::build(
            "QRD",
            "B7",
            Bandwidth::Mhz20,
            &CoefficientVector::from_real(vec![1]),
            &[],
            &ReportConfig::default(),
        );
        assert_eq!(number(&sheet, 0, 1), 1.0);
        assert_eq!(number(&sheet, 8, 1), -1.0);
        assert!(sheet.get(FIRST_DATA_ROW, 0).is_none());
    }

    #[test]
    fn test_build_report_prefers_calibrated() {
        use crate::codec::NvRecord;
        use crate::nv::{NvDocument, NvItem, NvPayload};

        let calibrated = NvRecord::new(
            Bandwidth::Mhz10,
            1,
            CoefficientVector::from_real(vec![77, 88]),
        );
        let mut nv_doc = NvDocument::default();
        nv_doc.push(NvItem::calibrated("B1", &NvPayload::new(vec![calibrated])).unwrap());
        let nv_doc = Document::parse(&nv_doc.to_xml()).unwrap();

        let mut set = sample_set();
        set.insert(
            MeasurementKey {
                band: "B2".into(),
                bandwidth: Bandwidth::Mhz20,
                channel: "900".into(),
                iteration: "run1".into(),
                resource_block: 0,
            },
            20.0,
        );

        let sheets = build_report(
            &set,
            &nv_doc,
            &StaticDefaults::default(),
            "MTP",
            &ReportConfig::default(),
        )
        .unwrap();

        assert_eq!(sheets.len(), 2);
        assert_eq!(sheets[0].name, "MTP_B1_10");
        assert_eq!(number(&sheets[0], 1, 1), 77.0);
        assert_eq!(sheets[1].name, "MTP_B2_20");
        assert_eq!(number(&sheets[1], 1, 1), -1373.0);
    }

    #[test]
    fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("DroopCharData_MTP.xlsx");
        let set = sample_set();
        let sheet = SheetLayout::build(
            "MTP",
            "B1",
            Bandwidth::Mhz10,
            StaticDefaults::default().get(Bandwidth::Mhz10),
            &set.series("B1", Bandwidth::Mhz10),
            &ReportConfig::default(),
        );

        write_report(&[sheet], &path).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn test_characterize() {
        use std::fs;

        let root = tempfile::tempdir().unwrap();
        let band_dir = root.path().join("run1").join("B3_FDD");
        fs::create_dir_all(&band_dir).unwrap();
        fs::write(
            band_dir.join("MaxPwr_20MHz.xml"),
            r#"<TestLog><Test I="6020200"><Name>LTE_MaxPower</Name>
<DataSetCollection><DataSet>
<Inputs><DI><N>Channel</N><V>1575</V></DI><DI><N>UL_Start_RB</N><V>0</V></DI></Inputs>
<Outputs><Result><DI><N>MaxTxPwr</N><V>23.5</V></DI></Result></Outputs>
</DataSet></DataSetCollection></Test></TestLog>"#,
        )
        .unwrap();
        fs::write(
            root.path().join("testQCN.xml"),
            r#"<NvSource><NvItem id="27478" name="static">0,0,2,100,200</NvItem></NvSource>"#,
        )
        .unwrap();

        let path = characterize(root.path(), "MTP", "testQCN.xml", &Config::default()).unwrap();
        assert_eq!(path, root.path().join("DroopCharData_MTP.xlsx"));
        assert!(path.is_file());
    }

    #[test]
    fn test_characterize_missing_nv_file() {
        let root = tempfile::tempdir().unwrap();
        let err = characterize(root.path(), "MTP", "testQCN.xml", &Config::default()).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::MissingInput);
    }
}
