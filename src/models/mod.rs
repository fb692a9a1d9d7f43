// src/models/mod.rs

//! Domain models for the harvester application.

mod config;
mod record;
mod stats;

// Re-export all public types
pub use config::{Config, CrawlerConfig, LinkScope, OutputConfig, RetryConfig, SiteConfig};
pub use record::{FIELDS, TitleRecord};
pub use stats::HarvestStats;
