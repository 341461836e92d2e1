//! `droop-char`: measurement tree + NV file -> characterisation workbook

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::cli::CharCli;
use crate::config;

/// Run the characterisation pipeline, returning the workbook path
pub fn handle(cli: &CharCli) -> Result<PathBuf> {
    tracing::info!(
        root = %cli.root_directory.display(),
        device_type = %cli.device_type,
        nv_file = %cli.nv_file_name,
        "starting droop characterisation"
    );

    let config = config::load(cli.common.config.as_deref())?;
    let root = &cli.root_directory;
    let path = droop::characterize(root, &cli.device_type, &cli.nv_file_name, &config)
        .with_context(|| format!("Failed to characterise {}", root.display()))?;

    tracing::info!(path = %path.display(), "saved output");
    Ok(path)
}
