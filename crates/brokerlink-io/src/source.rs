use crate::delimited::{read_table_from_path, CsvOptions};
use crate::Result;
use brokerlink_core::Table;
use std::path::{Path, PathBuf};

pub trait TableSource {
    fn source_name(&self) -> String;
    fn read_table(&self) -> Result<Table>;
}

/// A delimited text file on disk.
#[derive(Debug, Clone)]
pub struct CsvFile {
    path: PathBuf,
    options: CsvOptions,
}

impl CsvFile {
    pub fn new(path: impl Into<PathBuf>, options: CsvOptions) -> Self {
        Self {
            path: path.into(),
            options,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TableSource for CsvFile {
    fn source_name(&self) -> String {
        self.path.display().to_string()
    }

    fn read_table(&self) -> Result<Table> {
        read_table_from_path(&self.path, &self.options)
    }
}
