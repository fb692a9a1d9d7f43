// src/services/extract.rs

//! Detail-page record extraction.
//!
//! Detail pages embed several JSON-LD blocks: the title record itself plus
//! unrelated metadata such as breadcrumbs and organization info. The
//! extractor scans every block, skips anything that fails to parse, and
//! keeps only blocks carrying an `actor` list, which is what distinguishes
//! the title record from the rest.

use scraper::{Html, Selector};
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::TitleRecord;

const JSON_LD_SELECTOR: &str = "script[type=\"application/ld+json\"]";

/// Extractor for embedded JSON-LD title records.
pub struct DetailExtractor {
    script: Selector,
}

impl DetailExtractor {
    pub fn new() -> Result<Self> {
        let script = Selector::parse(JSON_LD_SELECTOR)
            .map_err(|e| AppError::selector(JSON_LD_SELECTOR, format!("{e:?}")))?;
        Ok(Self { script })
    }

    /// Extract every accepted title record from one detail-page body.
    ///
    /// A malformed block is skipped, never aborting the page. Each block
    /// passing the `actor` discriminator yields one record bound to `url`.
    /// A page with no accepted blocks yields an empty vec.
    pub fn extract_records(&self, url: &str, body: &str) -> Vec<TitleRecord> {
        let document = Html::parse_document(body);
        let mut records = Vec::new();

        for script in document.select(&self.script) {
            let raw: String = script.text().collect();
            let block: Value = match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(e) => {
                    log::debug!("Skipping malformed JSON-LD block on {url}: {e}");
                    continue;
                }
            };

            // Discriminator: blocks without a cast list are breadcrumbs,
            // organization metadata or similar.
            if block.get("actor").is_none() {
                continue;
            }

            records.push(build_record(url, &block));
        }

        records
    }
}

fn build_record(url: &str, block: &Value) -> TitleRecord {
    let mut record = TitleRecord::for_url(url);

    record.kind = text_value(block.get("@type"));
    record.name = text_value(block.get("name"));
    record.description = text_value(block.get("description"));
    record.date_published = text_value(block.get("datePublished"));

    if let Some(rating) = block.get("aggregateRating") {
        record.rating_count = text_value(rating.get("ratingCount"));
        record.best_rating = text_value(rating.get("bestRating"));
        record.worst_rating = text_value(rating.get("worstRating"));
        record.rating_value = text_value(rating.get("ratingValue"));
    }

    record.actor = join_names(block.get("actor"));
    record.directors = join_names(block.get("director"));
    record.writers = join_names(block.get("creator"));

    record
}

/// Render a scalar JSON value as its literal text; anything else is empty.
fn text_value(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Join the `name` fields of an entity list with ", ".
///
/// Names are trimmed and empty results dropped, so the output never
/// contains empty segments or stray whitespace. Entries without a name
/// (organization references in credit lists) are skipped.
fn join_names(value: Option<&Value>) -> String {
    let Some(Value::Array(entries)) = value else {
        return String::new();
    };

    entries
        .iter()
        .filter_map(|entry| entry.get("name"))
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}
