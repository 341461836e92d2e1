//! CLI argument definitions for the droop tools

use clap::{Args, Parser};
use std::path::PathBuf;

/// Options shared by both tools
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct CommonArgs {
    /// Config file (defaults to <config dir>/droop/config.toml if present)
    #[arg(short, long, env = "DROOP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log debug details
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Parser, Debug)]
#[command(name = "droop-char")]
#[command(about = "Build a droop characterisation workbook", long_about = None)]
#[command(version)]
pub struct CharCli {
    /// Directory holding <test>/<band>/*_<bw>MHz.xml logs and the NV file
    pub root_directory: PathBuf,

    /// Device type, used in sheet and workbook names (e.g. MTP)
    pub device_type: String,

    /// NV XML file name, relative to the root directory
    pub nv_file_name: String,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Parser, Debug)]
#[command(name = "droop-nv")]
#[command(about = "Convert equalizer workbooks to NV files", long_about = None)]
#[command(version)]
pub struct NvCli {
    /// Directory holding the workbook; NV files are written here
    pub root_directory: PathBuf,

    /// Equalizer workbook file name, relative to the root directory
    pub file_name: String,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_char_args() {
        let args = ["droop-char", "data", "MTP", "testQCN.xml", "-v"];
        let cli = CharCli::try_parse_from(args).unwrap();
        assert_eq!(cli.root_directory, PathBuf::from("data"));
        assert_eq!(cli.device_type, "MTP");
        assert_eq!(cli.nv_file_name, "testQCN.xml");
        assert!(cli.common.verbose);
        assert!(cli.common.config.is_none());
    }

    #[test]
    fn test_nv_args_with_config() {
        let cli = NvCli::try_parse_from([
            "droop-nv",
            "--config",
            "droop.toml",
            "data",
            "FBRxEqualizers.xlsx",
        ])
        .unwrap();
        assert_eq!(cli.file_name, "FBRxEqualizers.xlsx");
        assert_eq!(cli.common.config, Some(PathBuf::from("droop.toml")));
    }

    #[test]
    fn test_missing_arguments_are_rejected() {
        let err = CharCli::try_parse_from(["droop-char", "data", "MTP"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

        let err = NvCli::try_parse_from(["droop-nv"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

        let err = NvCli::try_parse_from(["droop-nv", "data", "a.xlsx", "extra"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }
}
