//! Tool configuration
//!
//! Every value has a default matching the standard LTE max-power sweep and
//! equalizer workbook layout, so a config file only needs the keys it changes.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::bandwidth::Bandwidth;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub measurement: MeasurementConfig,
    pub report: ReportConfig,
    pub builder: BuilderConfig,
}

/// Element and value names used to pick measurements out of test logs
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MeasurementConfig {
    pub test_element: String,
    pub test_id_attribute: String,
    pub test_id: String,
    pub test_name: String,
    pub channel_tag: String,
    pub start_rb_tag: String,
    pub max_power_tag: String,
}

impl Default for MeasurementConfig {
    fn default() -> Self {
        Self {
            test_element: "Test".into(),
            test_id_attribute: "I".into(),
            test_id: "6020200".into(),
            test_name: "LTE_MaxPower".into(),
            channel_tag: "Channel".into(),
            start_rb_tag: "UL_Start_RB".into(),
            max_power_tag: "MaxTxPwr".into(),
        }
    }
}

/// Fixed parameters written to column B of every report sheet
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub workbook_name: String,
    pub averaging_method: f64,
    pub equalizer_length: f64,
    pub ripple_tolerance: f64,
    pub ripple_target: f64,
    pub ripple_limit: f64,
    pub fbrx_mode_bw10: f64,
    pub fbrx_mode_bw20: f64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            workbook_name: "DroopCharData".into(),
            averaging_method: 1.0,
            equalizer_length: 10.0,
            ripple_tolerance: 0.025,
            ripple_target: 0.05,
            ripple_limit: 0.2,
            fbrx_mode_bw10: 3.0,
            fbrx_mode_bw20: 1.0,
        }
    }
}

impl ReportConfig {
    pub fn fbrx_mode(&self, bandwidth: Bandwidth) -> f64 {
        match bandwidth {
            Bandwidth::Mhz10 => self.fbrx_mode_bw10,
            Bandwidth::Mhz20 => self.fbrx_mode_bw20,
        }
    }
}

/// Equalizer workbook and NV output settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Column-A cell that marks where equalizer rows begin
    pub marker: String,
    /// Appended to the device type to form the output file name
    pub output_suffix: String,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            marker: "NV".into(),
            output_suffix: "_DroopNVs".into(),
        }
    }
}

impl Config {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::missing("config file", path));
        }
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}
