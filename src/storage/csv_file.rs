// src/storage/csv_file.rs

//! Append-only CSV sink.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::{FIELDS, TitleRecord};
use crate::storage::{FlushSummary, RecordSink};

/// Sink appending records to a CSV file.
///
/// The header row is written only when the destination is absent or empty,
/// so repeated runs against the same file keep a single header. Rows are
/// never deduplicated against prior content.
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSink for CsvSink {
    fn flush(&mut self, batch: &[TitleRecord]) -> Result<FlushSummary> {
        let existing_len = std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        let created = existing_len == 0;
        if created {
            writer.write_record(FIELDS)?;
        }

        for record in batch {
            writer.write_record(record.as_row())?;
        }
        writer.flush()?;

        Ok(FlushSummary {
            written: batch.len(),
            created,
        })
    }
}
