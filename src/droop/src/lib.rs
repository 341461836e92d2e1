//! # droop
//!
//! FBRx droop equalizer tooling for LTE RF calibration.
//!
//! This library provides functionality to:
//! - Encode and decode droop FIR coefficient tables in hex-byte NV payloads
//! - Look up calibrated and static droop NV items in NV XML files
//! - Aggregate max-power sweeps from test-log directory trees
//! - Write per band/bandwidth characterisation workbooks
//! - Convert equalizer workbooks into calibrated NV documents
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! # fn main() -> Result<(), droop::Error> {
//! let config = droop::Config::default();
//!
//! // Measurement tree plus NV file -> characterisation workbook
//! let report = droop::characterize(Path::new("data"), "MTP", "testQCN.xml", &config)?;
//! println!("Saved output to: {}", report.display());
//!
//! // Equalizer workbook -> one NV document per device type
//! for path in droop::convert_workbook(Path::new("data"), "FBRxEqualizers.xlsx", &config)? {
//!     println!("Wrote {}", path.display());
//! }
//! # Ok(())
//! # }
//! ```

pub mod bandwidth;
pub mod builder;
pub mod codec;
pub mod config;
pub mod document;
pub mod equalizer;
pub mod error;
pub mod measurement;
pub mod nv;
pub mod report;

// Re-export commonly used items
#[doc(inline)]
pub use bandwidth::Bandwidth;
#[doc(inline)]
pub use builder::{build_documents, convert_workbook, write_documents};
#[doc(inline)]
pub use codec::{decode, decode_record, encode, CoefficientVector, NvRecord};
#[doc(inline)]
pub use config::{BuilderConfig, Config, MeasurementConfig, ReportConfig};
#[doc(inline)]
pub use document::{Document, Element};
#[doc(inline)]
pub use equalizer::{normalize_band, read_workbook, EqualizerEntry, EqualizerTable};
#[doc(inline)]
pub use error::{Error, ErrorKind, Result};
#[doc(inline)]
pub use measurement::{aggregate, MeasurementKey, MeasurementSet, Series};
#[doc(inline)]
pub use report::{build_report, characterize, write_report, SheetLayout};

// NV item lookup
#[doc(inline)]
pub use nv::{
    calibrated_item_name, extract_calibrated, locate, nv_id_for_band, NvDocument, NvItem,
    NvPayload, Selector, StaticDefaults,
};
