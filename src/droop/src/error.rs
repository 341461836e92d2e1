//! Error types shared by every droop pipeline.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Coarse classification of every [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An input file, directory or worksheet is absent or empty.
    MissingInput,
    /// Input exists but does not have the expected structure.
    MalformedRecord,
    /// A value is well-formed but outside what the tools support.
    UnsupportedParameter,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing {what}: {}", path.display())]
    MissingInput { what: &'static str, path: PathBuf },

    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    #[error("Unsupported parameter: {0}")]
    UnsupportedParameter(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("Report error: {0}")]
    Report(#[from] rust_xlsxwriter::XlsxError),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                ErrorKind::MalformedRecord
            }
            Error::MissingInput { .. } | Error::Io(_) | Error::Walk(_) => ErrorKind::MissingInput,
            Error::UnsupportedParameter(_) => ErrorKind::UnsupportedParameter,
            Error::MalformedRecord(_)
            | Error::Xml(_)
            | Error::Workbook(_)
            | Error::Report(_)
            | Error::Config(_) => ErrorKind::MalformedRecord,
        }
    }

    pub(crate) fn missing(what: &'static str, path: &Path) -> Self {
        Error::MissingInput {
            what,
            path: path.to_path_buf(),
        }
    }

    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Error::MalformedRecord(msg.into())
    }

    pub(crate) fn unsupported(msg: impl Into<String>) -> Self {
        Error::UnsupportedParameter(msg.into())
    }

    /// Prefix a malformed-record message with the file it came from.
    pub(crate) fn in_file(self, path: &Path) -> Self {
        match self {
            Error::MalformedRecord(msg) => {
                Error::MalformedRecord(format!("{}: {}", path.display(), msg))
            }
            other => other,
        }
    }
}
