//! Equalizer workbook reader
//!
//! The source workbook has one sheet per band (`B1`, `B41C`, ...). Below a
//! marker cell (`NV`) in column A, each row describes one equalizer:
//!
//! ```text
//! A: "LTE-20 (MTP)"   B: -   C: group delay   D: tap count   E..: coefficients
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use crate::bandwidth::Bandwidth;
use crate::codec::{CoefficientVector, MAX_TAPS};
use crate::error::{Error, Result};

const LABEL_COLUMN: usize = 0;
const GROUP_DELAY_COLUMN: usize = 2;
const TAP_COUNT_COLUMN: usize = 3;
const FIRST_COEFFICIENT_COLUMN: usize = 4;

/// A worksheet cell value, independent of the workbook library
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => Cell::Empty,
            Data::String(s) => Cell::Text(s.clone()),
            Data::Float(f) => Cell::Number(*f),
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Bool(b) => Cell::Number(if *b { 1.0 } else { 0.0 }),
            other => Cell::Text(other.to_string()),
        }
    }
}

impl Cell {
    fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            Cell::Text(s) => s.trim().parse().ok(),
            Cell::Empty => None,
        }
    }
}

/// One equalizer row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EqualizerEntry {
    pub bandwidth: Bandwidth,
    pub group_delay: u8,
    pub coefficients: CoefficientVector,
}

/// Equalizers grouped by device type, technology and band.
///
/// Entries within a band keep worksheet row order; a repeated bandwidth
/// replaces the earlier entry in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EqualizerTable {
    entries: BTreeMap<String, BTreeMap<String, BTreeMap<String, Vec<EqualizerEntry>>>>,
}

impl EqualizerTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        device_type: &str,
        technology: &str,
        band: &str,
        entry: EqualizerEntry,
    ) {
        let rows = self
            .entries
            .entry(device_type.to_string())
            .or_default()
            .entry(technology.to_string())
            .or_default()
            .entry(band.to_string())
            .or_default();
        match rows.iter_mut().find(|e| e.bandwidth == entry.bandwidth) {
            Some(existing) => *existing = entry,
            None => rows.push(entry),
        }
    }

    pub fn device_types(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// `(technology, band, entries)` for one device type
    pub fn bands(&self, device_type: &str) -> Vec<(&str, &str, &[EqualizerEntry])> {
        let Some(technologies) = self.entries.get(device_type) else {
            return Vec::new();
        };
        technologies
            .iter()
            .flat_map(|(tech, bands)| {
                bands
                    .iter()
                    .map(move |(band, rows)| (tech.as_str(), band.as_str(), rows.as_slice()))
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Normalise a sheet name to the band naming used by NV items.
///
/// `B41c` becomes `B41_C`, a trailing `A` is dropped (`B28A` is `B28`), and
/// names ending in a digit are unchanged.
pub fn normalize_band(sheet_name: &str) -> String {
    let Some(last) = sheet_name.chars().last() else {
        return String::new();
    };
    if last.is_ascii_digit() {
        return sheet_name.to_string();
    }
    let stem = &sheet_name[..sheet_name.len() - last.len_utf8()];
    let band = if last.eq_ignore_ascii_case(&'a') {
        stem.to_string()
    } else {
        format!("{stem}_{last}")
    };
    band.to_uppercase()
}

/// Read every equalizer row of one band sheet into `table`
pub fn read_sheet(
    table: &mut EqualizerTable,
    band: &str,
    rows: &[Vec<Cell>],
    marker: &str,
) -> Result<()> {
    let Some(marker_row) = rows.iter().position(|row| {
        row.get(LABEL_COLUMN).and_then(Cell::as_text).map(str::trim) == Some(marker)
    }) else {
        tracing::warn!(%band, %marker, "sheet has no marker cell, skipping");
        return Ok(());
    };

    for (offset, row) in rows[marker_row + 1..].iter().enumerate() {
        let row_number = marker_row + offset + 2;
        let Some(label) = row.get(LABEL_COLUMN).and_then(Cell::as_text) else {
            continue;
        };
        let words: Vec<&str> = label.split_whitespace().collect();
        if words.is_empty() || words[0] == marker {
            continue;
        }

        let bad_label = |what: &str| {
            Error::malformed(format!("{band} row {row_number}: label {label:?} {what}"))
        };
        let (technology, bandwidth) = words[0]
            .split_once('-')
            .ok_or_else(|| bad_label("has no technology-bandwidth"))?;
        let device_type: String = words
            .get(1)
            .ok_or_else(|| bad_label("has no device type"))?
            .chars()
            .filter(|c| !matches!(c, '(' | ')' | ' '))
            .collect();
        if device_type.is_empty() {
            return Err(bad_label("has an empty device type"));
        }

        let bandwidth = match Bandwidth::from_label(bandwidth) {
            Ok(bw) => bw,
            Err(e) => {
                tracing::warn!(%band, row = row_number, error = %e, "skipping equalizer row");
                continue;
            }
        };

        let entry = read_entry(row, bandwidth).map_err(|e| match e {
            Error::MalformedRecord(msg) => {
                Error::malformed(format!("{band} row {row_number}: {msg}"))
            }
            Error::UnsupportedParameter(msg) => {
                Error::unsupported(format!("{band} row {row_number}: {msg}"))
            }
            other => other,
        })?;
        tracing::debug!(
            %band,
            %technology,
            %device_type,
            %bandwidth,
            taps = entry.coefficients.len(),
            "read equalizer row"
        );
        table.insert(&device_type, technology, band, entry);
    }
    Ok(())
}

fn read_entry(row: &[Cell], bandwidth: Bandwidth) -> Result<EqualizerEntry> {
    let group_delay = integer_cell(row, GROUP_DELAY_COLUMN, "group delay")?;
    let group_delay = u8::try_from(group_delay).map_err(|_| {
        Error::unsupported(format!("group delay {group_delay} does not fit in a byte"))
    })?;

    let taps = integer_cell(row, TAP_COUNT_COLUMN, "tap count")?;
    let taps = usize::try_from(taps)
        .ok()
        .filter(|&t| t <= MAX_TAPS)
        .ok_or_else(|| Error::unsupported(format!("tap count {taps} (at most {MAX_TAPS})")))?;

    let real = (0..taps)
        .map(|i| {
            let value = integer_cell(row, FIRST_COEFFICIENT_COLUMN + i, "coefficient")?;
            i32::try_from(value)
                .map_err(|_| Error::malformed(format!("coefficient {value} overflows i32")))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(EqualizerEntry {
        bandwidth,
        group_delay,
        coefficients: CoefficientVector::from_real(real),
    })
}

/// Numeric cell truncated toward zero
fn integer_cell(row: &[Cell], column: usize, what: &str) -> Result<i64> {
    let value = row.get(column).and_then(Cell::as_number).ok_or_else(|| {
        Error::malformed(format!("{what} in column {} is not a number", column + 1))
    })?;
    if !value.is_finite() || value.abs() >= 9.0e18 {
        return Err(Error::malformed(format!("{what} {value} is out of range")));
    }
    Ok(value.trunc() as i64)
}

/// Read all band sheets of an equalizer workbook (`.xlsx`, `.xls`, `.ods`)
pub fn read_workbook(path: &Path, marker: &str) -> Result<EqualizerTable> {
    if !path.is_file() {
        return Err(Error::missing("equalizer workbook", path));
    }
    let mut workbook = open_workbook_auto(path)?;

    let mut table = EqualizerTable::new();
    for sheet_name in workbook.sheet_names() {
        if !sheet_name.starts_with('B') {
            continue;
        }
        let band = normalize_band(&sheet_name);
        tracing::info!(sheet = %sheet_name, %band, "processing band");

        let range = workbook.worksheet_range(&sheet_name)?;
        let rows = grid_from_range(&range);
        read_sheet(&mut table, &band, &rows, marker)?;
    }

    if table.is_empty() {
        tracing::warn!(path = %path.display(), "no equalizer rows found");
    }
    Ok(table)
}

/// Dense grid anchored at cell A1, so column indices are absolute
fn grid_from_range(range: &calamine::Range<Data>) -> Vec<Vec<Cell>> {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };
    let (start_row, start_col) = (start_row as usize, start_col as usize);

    let mut grid: Vec<Vec<Cell>> = vec![Vec::new(); start_row];
    for row in range.rows() {
        let mut cells = vec![Cell::Empty; start_col];
        cells.extend(row.iter().map(Cell::from));
        grid.push(cells);
    }
    grid
}
