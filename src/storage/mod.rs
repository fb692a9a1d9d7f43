//! Storage abstractions for record persistence.
//!
//! The sink is append-only: the output grows across runs and the header row
//! is written exactly once over the file's lifetime. Persistence failures
//! are not contained anywhere; once durable output cannot be trusted the
//! run must stop.

pub mod csv_file;

use crate::error::Result;
use crate::models::TitleRecord;

// Re-export for convenience
pub use csv_file::CsvSink;

/// Summary of one flush operation.
#[derive(Debug, Clone)]
pub struct FlushSummary {
    /// Number of rows appended
    pub written: usize,
    /// Whether this flush created the destination and wrote the header
    pub created: bool,
}

/// Trait for record persistence backends.
pub trait RecordSink {
    /// Append every record in the batch, in order.
    fn flush(&mut self, batch: &[TitleRecord]) -> Result<FlushSummary>;
}
