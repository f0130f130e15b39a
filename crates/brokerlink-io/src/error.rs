use brokerlink_core::CoreError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("xlsx error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error("input has no header row")]
    MissingHeader,
    #[error("invalid output path: {0}")]
    InvalidOutputPath(PathBuf),
    #[error("output path matches input: {0}")]
    OutputMatchesInput(PathBuf),
}

pub type Result<T> = std::result::Result<T, IoError>;
