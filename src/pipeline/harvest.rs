// src/pipeline/harvest.rs

//! Harvest pipeline.
//!
//! Drives the search → fetch → extract → flush cycle per keyword. The batch
//! of extracted records is flushed and dropped after every keyword, so a
//! failure later in the run never loses the keywords already persisted.
//!
//! Per-link failures are contained here: a link whose fetch exhausts the
//! retry bound is logged and skipped. Persistence failures propagate and
//! terminate the run.

use std::time::Duration;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use tokio::sync::watch;

use crate::error::Result;
use crate::models::{Config, HarvestStats, LinkScope, TitleRecord};
use crate::services::{DetailExtractor, Fetcher, SearchPageParser};
use crate::storage::RecordSink;
use crate::utils::search_url;

/// Run the full harvest over the given keywords.
///
/// `shutdown` flips to `true` when the run should stop early; in-flight
/// fetches finish, the current batch is flushed, and remaining work is
/// skipped.
pub async fn run_harvest(
    config: &Config,
    keywords: &[String],
    sink: &mut dyn RecordSink,
    shutdown: watch::Receiver<bool>,
) -> Result<HarvestStats> {
    let start_time = Utc::now();

    let fetcher = Fetcher::new(&config.crawler)?;
    let search_parser = SearchPageParser::new(&config.site)?;
    let extractor = DetailExtractor::new()?;

    let delay = Duration::from_millis(config.crawler.request_delay_ms);
    let concurrency = config.crawler.max_concurrent.max(1);

    let mut links: Vec<String> = Vec::new();
    let mut keyword_count = 0;
    let mut link_count = 0;
    let mut record_count = 0;
    let mut fetch_failures = 0;

    for keyword in keywords {
        if *shutdown.borrow() {
            log::warn!("Shutdown requested, skipping remaining keywords");
            break;
        }
        keyword_count += 1;

        // Politeness delay before hitting the search endpoint.
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let url = search_url(&config.site.base_url, &config.site.search_path, keyword)?;
        log::info!("Searching for '{}'", keyword);

        let body = match fetcher.fetch(&url).await {
            Ok(body) => body,
            Err(error) if error.is_fetch() => {
                fetch_failures += 1;
                log::warn!("Search for '{}' abandoned: {}", keyword, error);
                continue;
            }
            Err(error) => return Err(error),
        };

        if config.crawler.link_scope == LinkScope::PerKeyword {
            links.clear();
        }
        let found = search_parser.parse(&body);
        log::info!("Found {} candidate links for '{}'", found.len(), keyword);
        links.extend(found);

        if links.is_empty() {
            continue;
        }
        link_count += links.len();

        // Fetch detail pages with bounded concurrency, extract as results
        // arrive, in link order.
        let mut batch: Vec<TitleRecord> = Vec::new();
        let mut cancelled = false;
        {
            let fetcher = &fetcher;
            let mut pages = stream::iter(links.iter().cloned())
                .map(|link| async move {
                    let result = fetcher.fetch(&link).await;
                    (link, result)
                })
                .buffered(concurrency);

            while let Some((link, result)) = pages.next().await {
                match result {
                    Ok(page) => {
                        let records = extractor.extract_records(&link, &page);
                        if records.is_empty() {
                            log::debug!("No title record found on {}", link);
                        }
                        batch.extend(records);
                    }
                    Err(error) => {
                        fetch_failures += 1;
                        log::warn!("Skipping link {}: {}", link, error);
                    }
                }

                if *shutdown.borrow() {
                    log::warn!("Shutdown requested, abandoning remaining links");
                    cancelled = true;
                    break;
                }
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }
        }

        record_count += batch.len();

        // Persistence errors are the one failure class allowed to surface.
        let summary = sink.flush(&batch)?;
        log::info!(
            "Flushed {} records for '{}'{}",
            summary.written,
            keyword,
            if summary.created {
                " (new output file)"
            } else {
                ""
            }
        );
        batch.clear();

        if cancelled {
            break;
        }
    }

    let stats = HarvestStats {
        start_time,
        end_time: Utc::now(),
        keyword_count,
        link_count,
        record_count,
        fetch_failures,
    };

    log::info!(
        "Harvest finished: {} keywords, {} links, {} records, {} fetch failures in {}s",
        stats.keyword_count,
        stats.link_count,
        stats.record_count,
        stats.fetch_failures,
        stats.duration_secs()
    );

    Ok(stats)
}
