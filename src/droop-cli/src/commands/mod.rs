//! Command handlers for the droop tools

pub mod characterize;
pub mod nv;
