//! Pipeline entry points for harvester operations.
//!
//! - `run_harvest`: search every keyword, fetch and extract detail pages,
//!   flush records per keyword

pub mod harvest;

pub use harvest::run_harvest;
