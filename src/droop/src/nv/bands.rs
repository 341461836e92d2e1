//! Band to calibrated droop NV id table

/// Calibrated droop NV item for one LTE band
#[derive(Debug, Clone, PartialEq)]
pub struct NvBand {
    pub band: &'static str,
    pub nv_id: u32,
}

/// All bands with a calibrated droop item.
///
/// Split bands use an underscore suffix (`B41_B`). There is no B15, B16,
/// B22, B24, B27, B32, B33, B35-B37 item, and 28515 is not assigned.
pub const NV_BANDS: &[NvBand] = &[
    NvBand {
        band: "B1",
        nv_id: 28493,
    },
    NvBand {
        band: "B2",
        nv_id: 28494,
    },
    NvBand {
        band: "B3",
        nv_id: 28495,
    },
    NvBand {
        band: "B4",
        nv_id: 28496,
    },
    NvBand {
        band: "B5",
        nv_id: 28497,
    },
    NvBand {
        band: "B6",
        nv_id: 28498,
    },
    NvBand {
        band: "B7",
        nv_id: 28499,
    },
    NvBand {
        band: "B8",
        nv_id: 28500,
    },
    NvBand {
        band: "B9",
        nv_id: 28501,
    },
    NvBand {
        band: "B10",
        nv_id: 28502,
    },
    NvBand {
        band: "B11",
        nv_id: 28503,
    },
    NvBand {
        band: "B12",
        nv_id: 28504,
    },
    NvBand {
        band: "B13",
        nv_id: 28505,
    },
    NvBand {
        band: "B14",
        nv_id: 28506,
    },
    NvBand {
        band: "B17",
        nv_id: 28507,
    },
    NvBand {
        band: "B18",
        nv_id: 28508,
    },
    NvBand {
        band: "B19",
        nv_id: 28509,
    },
    NvBand {
        band: "B20",
        nv_id: 28510,
    },
    NvBand {
        band: "B21",
        nv_id: 28511,
    },
    NvBand {
        band: "B23",
        nv_id: 28512,
    },
    NvBand {
        band: "B25",
        nv_id: 28513,
    },
    NvBand {
        band: "B26",
        nv_id: 28514,
    },
    NvBand {
        band: "B28",
        nv_id: 28516,
    },
    NvBand {
        band: "B28_B",
        nv_id: 28517,
    },
    NvBand {
        band: "B29",
        nv_id: 28518,
    },
    NvBand {
        band: "B30",
        nv_id: 28519,
    },
    NvBand {
        band: "B31",
        nv_id: 28520,
    },
    NvBand {
        band: "B34",
        nv_id: 28521,
    },
    NvBand {
        band: "B38",
        nv_id: 28522,
    },
    NvBand {
        band: "B39",
        nv_id: 28523,
    },
    NvBand {
        band: "B39_B",
        nv_id: 28524,
    },
    NvBand {
        band: "B40",
        nv_id: 28525,
    },
    NvBand {
        band: "B40_B",
        nv_id: 28526,
    },
    NvBand {
        band: "B41",
        nv_id: 28527,
    },
    NvBand {
        band: "B41_B",
        nv_id: 28528,
    },
    NvBand {
        band: "B41_C",
        nv_id: 28529,
    },
    NvBand {
        band: "B42",
        nv_id: 28530,
    },
    NvBand {
        band: "B43",
        nv_id: 28531,
    },
    NvBand {
        band: "B44",
        nv_id: 28532,
    },
];

/// Look up a band entry by its normalised name
pub fn nv_band_by_name(band: &str) -> Option<&'static NvBand> {
    NV_BANDS.iter().find(|b| b.band == band)
}

/// Calibrated droop NV id for a band
pub fn nv_id_for_band(band: &str) -> Option<u32> {
    nv_band_by_name(band).map(|b| b.nv_id)
}
