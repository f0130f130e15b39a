use crate::error::{IoError, Result};
use brokerlink_core::Table;
use std::fs::File;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    pub delimiter: u8,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

/// Reads a header row and data rows into a [`Table`]. Short rows are padded;
/// rows wider than the header are rejected.
pub fn read_table<R: Read>(input: R, options: &CsvOptions) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    if headers.is_empty() || headers.iter().all(str::is_empty) {
        return Err(IoError::MissingHeader);
    }

    let mut table = Table::new(headers.iter())?;
    for record in reader.records() {
        let record = record?;
        table.push_row(record.iter().map(str::to_string).collect())?;
    }
    Ok(table)
}

pub fn read_table_from_path(path: &Path, options: &CsvOptions) -> Result<Table> {
    let file = File::open(path)?;
    read_table(file, options)
}
