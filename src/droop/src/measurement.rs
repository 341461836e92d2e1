//! Max-power measurement aggregation
//!
//! Test logs are laid out as `root/<iteration>/<band>_<...>/<name>_<bw>MHz<...>.xml`.
//! Every LTE max-power test in every log contributes one power value keyed
//! by band, bandwidth, channel, iteration directory and start resource block.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::bandwidth::Bandwidth;
use crate::config::MeasurementConfig;
use crate::document::{Document, Element};
use crate::error::{Error, Result};

/// Full key of one power measurement
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MeasurementKey {
    pub band: String,
    pub bandwidth: Bandwidth,
    pub channel: String,
    /// Name of the test directory the log came from
    pub iteration: String,
    pub resource_block: u32,
}

/// One channel/iteration row of a band and bandwidth: power by resource block
#[derive(Debug, Clone, PartialEq)]
pub struct Series<'a> {
    pub channel: &'a str,
    pub iteration: &'a str,
    pub points: BTreeMap<u32, f64>,
}

/// Aggregated measurements, ordered by key
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementSet {
    points: BTreeMap<MeasurementKey, f64>,
}

impl MeasurementSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a measurement. A repeated key keeps the latest value; the
    /// replaced value is returned.
    pub fn insert(&mut self, key: MeasurementKey, power: f64) -> Option<f64> {
        let previous = self.points.insert(key, power);
        if let Some(old) = previous {
            tracing::debug!(old, new = power, "measurement overwritten by a later file");
        }
        previous
    }

    pub fn get(&self, key: &MeasurementKey) -> Option<f64> {
        self.points.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Distinct bands, sorted
    pub fn bands(&self) -> Vec<&str> {
        let mut bands: Vec<&str> = self.points.keys().map(|k| k.band.as_str()).collect();
        bands.dedup();
        bands
    }

    /// Bandwidths measured for `band`, sorted; empty for an unknown band
    pub fn bandwidths(&self, band: &str) -> Vec<Bandwidth> {
        let mut bandwidths: Vec<Bandwidth> = self
            .points
            .keys()
            .filter(|k| k.band == band)
            .map(|k| k.bandwidth)
            .collect();
        bandwidths.dedup();
        bandwidths
    }

    /// Channel/iteration rows for one band and bandwidth, in key order
    pub fn series(&self, band: &str, bandwidth: Bandwidth) -> Vec<Series<'_>> {
        let mut rows: Vec<Series<'_>> = Vec::new();
        for (key, &power) in self
            .points
            .iter()
            .filter(|(k, _)| k.band == band && k.bandwidth == bandwidth)
        {
            match rows.last_mut() {
                Some(row) if row.channel == key.channel && row.iteration == key.iteration => {
                    row.points.insert(key.resource_block, power);
                }
                _ => rows.push(Series {
                    channel: &key.channel,
                    iteration: &key.iteration,
                    points: BTreeMap::from([(key.resource_block, power)]),
                }),
            }
        }
        rows
    }
}

/// Channel, start resource block and max power read from one test record
#[derive(Debug, Clone, PartialEq)]
pub struct TestPoint {
    pub channel: String,
    pub start_rb: u32,
    pub max_power: f64,
}

/// Walk `root` and aggregate every matching test record.
///
/// A missing or empty root is fatal. Files whose name does not carry a
/// supported bandwidth are skipped.
pub fn aggregate(root: &Path, config: &MeasurementConfig) -> Result<MeasurementSet> {
    if !root.is_dir() {
        return Err(Error::missing("measurement root directory", root));
    }
    let test_dirs = list_dir(root)?;
    if test_dirs.is_empty() {
        return Err(Error::missing("test directories (expected root/test/band layout)", root));
    }

    let mut set = MeasurementSet::new();
    for test_dir in test_dirs.iter().filter(|p| p.is_dir()) {
        let iteration = file_name(test_dir);

        for band_dir in list_dir(test_dir)?.iter().filter(|p| p.is_dir()) {
            let band = band_from_dir_name(&file_name(band_dir)).to_string();

            for file in list_dir(band_dir)?.iter().filter(|p| p.is_file()) {
                let name = file_name(file);
                let Some(bandwidth) = bandwidth_from_file_name(&name) else {
                    tracing::debug!(
                        file = %file.display(),
                        "skipping file without a 10/20 MHz bandwidth"
                    );
                    continue;
                };

                tracing::info!(%iteration, %band, %bandwidth, file = %name, "processing file");
                let document = Document::from_path(file)?;
                let points = extract_points(&document, config).map_err(|e| e.in_file(file))?;

                for point in points {
                    let key = MeasurementKey {
                        band: band.clone(),
                        bandwidth,
                        channel: point.channel,
                        iteration: iteration.clone(),
                        resource_block: point.start_rb,
                    };
                    set.insert(key, point.max_power);
                }
            }
        }
    }

    Ok(set)
}

/// Read every max-power test record in a test-result document
pub fn extract_points(document: &Document, config: &MeasurementConfig) -> Result<Vec<TestPoint>> {
    let mut points = Vec::new();
    for test in document.root().descendants_named(&config.test_element) {
        if test.attr(&config.test_id_attribute) != Some(config.test_id.as_str()) {
            continue;
        }

        let name = test.child_text("Name");
        if name != Some(config.test_name.as_str()) {
            tracing::warn!(
                expected = %config.test_name,
                found = name.unwrap_or("<none>"),
                "test record is not formatted as expected"
            );
        }

        let data_set = required_child(test, "DataSetCollection")
            .and_then(|dsc| required_child(dsc, "DataSet"))?;
        let inputs = required_child(data_set, "Inputs")?;
        let outputs = required_child(data_set, "Outputs")?;

        let mut channel = None;
        let mut start_rb = None;
        for di in inputs.children_named("DI") {
            let value = di.child_text("V");
            match di.child_text("N") {
                Some(n) if n == config.channel_tag => channel = value,
                Some(n) if n == config.start_rb_tag => start_rb = value,
                _ => {}
            }
        }

        let max_power = outputs
            .descendants_named("Result")
            .into_iter()
            .filter_map(|result| result.child("DI"))
            .find(|di| di.child_text("N") == Some(config.max_power_tag.as_str()))
            .and_then(|di| di.child_text("V"));

        let channel = channel
            .ok_or_else(|| Error::malformed(format!("test has no {} input", config.channel_tag)))?;
        let start_rb = start_rb
            .ok_or_else(|| Error::malformed(format!("test has no {} input", config.start_rb_tag)))?;
        let max_power = max_power.ok_or_else(|| {
            Error::malformed(format!("test has no {} output", config.max_power_tag))
        })?;

        points.push(TestPoint {
            channel: channel.to_string(),
            start_rb: start_rb.parse::<u32>().map_err(|_| {
                Error::malformed(format!("{} {start_rb:?} is not an integer", config.start_rb_tag))
            })?,
            max_power: max_power.parse::<f64>().map_err(|_| {
                Error::malformed(format!("{} {max_power:?} is not a number", config.max_power_tag))
            })?,
        });
    }
    Ok(points)
}

fn required_child<'a>(element: &'a Element, name: &str) -> Result<&'a Element> {
    element
        .child(name)
        .ok_or_else(|| Error::malformed(format!("<{}> has no <{name}>", element.name)))
}

/// Band from a band directory name: everything before the first `_`
pub fn band_from_dir_name(name: &str) -> &str {
    name.split_once('_').map_or(name, |(band, _)| band)
}

/// Bandwidth from a log file name: the text between the first `_` and `MHz`.
///
/// A name without an `_` carries no bandwidth, so a bare `20MHz.xml` is
/// skipped rather than read as a 20 MHz log.
pub fn bandwidth_from_file_name(name: &str) -> Option<Bandwidth> {
    let (_, rest) = name.split_once('_')?;
    let end = rest.find("MHz")?;
    Bandwidth::from_label(&rest[..end]).ok()
}

/// Immediate children of a directory, sorted by name
fn list_dir(path: &Path) -> Result<Vec<PathBuf>> {
    WalkDir::new(path)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .map(|entry| entry.map(walkdir::DirEntry::into_path).map_err(Error::from))
        .collect()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
