use crate::error::CoreError;
use std::collections::HashSet;

/// Rows of string cells aligned to an ordered header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(columns: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.as_str()) {
                return Err(CoreError::DuplicateColumn(column.clone()));
            }
        }
        Ok(Self {
            columns,
            rows: Vec::new(),
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appends a row. Short rows are padded with empty cells.
    pub fn push_row(&mut self, mut row: Vec<String>) -> Result<(), CoreError> {
        let expected = self.columns.len();
        if row.len() > expected {
            return Err(CoreError::RowTooLong {
                row: self.rows.len() + 1,
                found: row.len(),
                expected,
            });
        }
        row.resize(expected, String::new());
        self.rows.push(row);
        Ok(())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn require_column(&self, name: &str) -> Result<usize, CoreError> {
        self.column_index(name)
            .ok_or_else(|| CoreError::MissingColumn(name.to_string()))
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|cells| cells[idx].as_str())
    }

    pub fn column_values(&self, column: &str) -> Option<Vec<&str>> {
        let idx = self.column_index(column)?;
        Some(self.rows.iter().map(|row| row[idx].as_str()).collect())
    }

    /// Removes the named columns that exist and returns the names removed.
    pub fn drop_columns(&mut self, names: &[&str]) -> Vec<String> {
        let keep: Vec<bool> = self
            .columns
            .iter()
            .map(|column| !names.contains(&column.as_str()))
            .collect();
        if keep.iter().all(|keep| *keep) {
            return Vec::new();
        }

        let mut dropped = Vec::new();
        let columns = std::mem::take(&mut self.columns);
        for (column, keep) in columns.into_iter().zip(&keep) {
            if *keep {
                self.columns.push(column);
            } else {
                dropped.push(column);
            }
        }
        for row in &mut self.rows {
            let cells = std::mem::take(row);
            *row = cells
                .into_iter()
                .zip(&keep)
                .filter_map(|(cell, keep)| keep.then_some(cell))
                .collect();
        }
        dropped
    }

    /// Adds a column at the end, or replaces the values of an existing one.
    /// Missing values are filled with empty cells.
    pub fn set_column(&mut self, name: &str, values: Vec<String>) {
        let mut values = values.into_iter();
        match self.column_index(name) {
            Some(idx) => {
                for row in &mut self.rows {
                    row[idx] = values.next().unwrap_or_default();
                }
            }
            None => {
                self.columns.push(name.to_string());
                for row in &mut self.rows {
                    row.push(values.next().unwrap_or_default());
                }
            }
        }
    }

    pub fn move_column_to_end(&mut self, name: &str) {
        let Some(idx) = self.column_index(name) else {
            return;
        };
        let column = self.columns.remove(idx);
        self.columns.push(column);
        for row in &mut self.rows {
            let cell = row.remove(idx);
            row.push(cell);
        }
    }

    /// Projects the table onto the named columns in the given order. Names that
    /// are not present are skipped.
    pub fn select_columns(self, names: &[&str]) -> Table {
        let indices: Vec<usize> = names
            .iter()
            .filter_map(|name| self.column_index(name))
            .collect();
        let columns = indices.iter().map(|&idx| self.columns[idx].clone()).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&idx| row[idx].clone()).collect())
            .collect();
        Table { columns, rows }
    }

    pub(crate) fn into_parts(self) -> (Vec<String>, Vec<Vec<String>>) {
        (self.columns, self.rows)
    }

    pub(crate) fn from_parts(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }
}
