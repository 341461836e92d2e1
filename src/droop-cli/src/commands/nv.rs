//! `droop-nv`: equalizer workbook -> per device type NV files

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::cli::NvCli;
use crate::config;

/// Run the NV builder, returning the files written
pub fn handle(cli: &NvCli) -> Result<Vec<PathBuf>> {
    tracing::info!(
        root = %cli.root_directory.display(),
        file = %cli.file_name,
        "starting droop NV conversion"
    );

    let config = config::load(cli.common.config.as_deref())?;
    let workbook = cli.root_directory.join(&cli.file_name);
    let paths = droop::convert_workbook(&cli.root_directory, &cli.file_name, &config)
        .with_context(|| format!("Failed to convert {}", workbook.display()))?;

    if paths.is_empty() {
        tracing::warn!("no NV files written");
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_missing_workbook_fails() {
        let dir = tempfile::tempdir().unwrap();
        let cli = NvCli::try_parse_from([
            "droop-nv",
            dir.path().to_str().unwrap(),
            "FBRxEqualizers.xlsx",
        ])
        .unwrap();

        let err = handle(&cli).unwrap_err();
        assert!(err.to_string().contains("Failed to convert"));
        let root = err.downcast_ref::<droop::Error>().unwrap();
        assert_eq!(root.kind(), droop::ErrorKind::MissingInput);
    }
}
