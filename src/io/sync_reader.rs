//! Synchronous CSV reader with iterator interface
//!
//! Provides a streaming iterator over operation records from a CSV file.
//! Delegates CSV format concerns to the csv_format module.
//!
//! # Design
//!
//! The SyncReader uses csv::Reader to read and deserialize CSV records
//! sequentially, one at a time, without loading the entire file into
//! memory. Fatal errors (file not found) surface from `new()`; per-row
//! problems are yielded as Err variants with the line number so a driver
//! can log and continue.

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::OperationRecord;
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::path::Path;

/// Synchronous CSV reader over operation records
///
/// Implements `Iterator`, yielding `Result<OperationRecord, String>` per
/// CSV row. Memory usage stays constant regardless of file size.
#[derive(Debug)]
pub struct SyncReader {
    reader: csv::Reader<File>,
    line_num: usize,
}

impl SyncReader {
    /// Create a new SyncReader from a file path
    ///
    /// The CSV reader trims whitespace and tolerates rows with missing
    /// trailing fields (loads leave the recipient column empty).
    ///
    /// # Errors
    ///
    /// Returns a message if the file cannot be opened.
    pub fn new(path: &Path) -> Result<Self, String> {
        let file = File::open(path)
            .map_err(|e| format!("Failed to open file '{}': {}", path.display(), e))?;

        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        Ok(Self {
            reader,
            line_num: 0,
        })
    }
}

impl Iterator for SyncReader {
    type Item = Result<OperationRecord, String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.line_num += 1;

        // The csv reader keeps its position; each call resumes where the
        // previous record ended
        match self.reader.deserialize::<CsvRecord>().next() {
            Some(Ok(csv_record)) => match convert_csv_record(csv_record) {
                Ok(operation) => Some(Ok(operation)),
                Err(e) => Some(Err(format!("Line {}: {}", self.line_num, e))),
            },
            Some(Err(e)) => Some(Err(format!(
                "Line {}: CSV parse error: {}",
                self.line_num, e
            ))),
            None => None,
        }
    }
}
