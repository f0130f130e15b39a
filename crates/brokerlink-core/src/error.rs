use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("missing required column: {0}")]
    MissingColumn(String),
    #[error("duplicate column: {0}")]
    DuplicateColumn(String),
    #[error("row {row} has {found} cells but the header has {expected}")]
    RowTooLong {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("invalid template name")]
    InvalidTemplateName,
    #[error("unknown template: {0}")]
    UnknownTemplate(String),
    #[error("invalid device mode: {0}")]
    InvalidDeviceMode(String),
    #[error("invalid phone number: {0}")]
    InvalidPhone(String),
}
