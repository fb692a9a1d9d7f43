//! Service layer for the harvester application.
//!
//! This module contains the business logic for:
//! - Retrying HTTP fetches (`Fetcher`)
//! - Search-results parsing (`SearchPageParser`)
//! - Detail-page record extraction (`DetailExtractor`)

mod extract;
mod fetcher;
mod search;

pub use extract::DetailExtractor;
pub use fetcher::Fetcher;
pub use search::SearchPageParser;
