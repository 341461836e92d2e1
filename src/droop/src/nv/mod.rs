//! NV item lookup and construction
//!
//! NV files are `<NvSource>` documents whose top-level `<NvItem>` children
//! carry an `id`, a `name` and the item value as text. Droop equalizers live
//! in two kinds of item:
//!
//! - static items (ids 27476/27478), one per bandwidth, holding a
//!   comma-separated decimal list
//! - band-specific calibrated items named
//!   `RFNV_LTE_C0_<band>_FBRX_DROOP_FIR_FILTER_COEFF_Z_I`, holding hex tables

mod bands;
mod defaults;
mod source;

pub use bands::{nv_band_by_name, nv_id_for_band, NvBand, NV_BANDS};
pub use defaults::StaticDefaults;
pub use source::{NvDocument, NvItem, NvPayload, NV_VERSION};

use crate::bandwidth::Bandwidth;
use crate::codec::{self, CoefficientVector};
use crate::document::Document;
use crate::error::Result;

/// How to pick an NV item out of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector<'a> {
    /// Match the `id` attribute
    Id(&'a str),
    /// Match the `name` attribute
    Name(&'a str),
}

impl Selector<'_> {
    fn matches(&self, element: &crate::document::Element) -> bool {
        match *self {
            Selector::Id(id) => element.attr("id") == Some(id),
            Selector::Name(name) => element.attr("name") == Some(name),
        }
    }
}

/// Text of the first top-level item matching `selector`
pub fn locate<'d>(document: &'d Document, selector: Selector<'_>) -> Option<&'d str> {
    document
        .root()
        .children
        .iter()
        .find(|child| selector.matches(child))
        .map(|child| child.text.as_str())
}

/// Name of the calibrated droop item for a band (`B41_C` style)
pub fn calibrated_item_name(band: &str) -> String {
    format!("RFNV_LTE_C0_{band}_FBRX_DROOP_FIR_FILTER_COEFF_Z_I")
}

/// Decode the calibrated coefficients for `band` and `bandwidth`.
///
/// `Ok(None)` means the item or its table for that bandwidth is absent and
/// the caller should use the static default.
pub fn extract_calibrated(
    document: &Document,
    band: &str,
    bandwidth: Bandwidth,
) -> Result<Option<CoefficientVector>> {
    let name = calibrated_item_name(band);
    let Some(payload) = locate(document, Selector::Name(&name)) else {
        tracing::debug!(%band, "no calibrated droop item");
        return Ok(None);
    };
    codec::decode(payload, bandwidth)
}
