//! Run statistics.

use chrono::{DateTime, Utc};

/// Summary of one harvest run.
#[derive(Debug, Clone)]
pub struct HarvestStats {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Keywords actually processed; fewer than requested on early shutdown
    pub keyword_count: usize,
    pub link_count: usize,
    pub record_count: usize,
    pub fetch_failures: usize,
}

impl HarvestStats {
    /// Wall-clock duration of the run in seconds.
    pub fn duration_secs(&self) -> i64 {
        (self.end_time - self.start_time).num_seconds()
    }
}
