// src/services/search.rs

//! Search-results page parsing.
//!
//! Locates the results container on a search page and collects the ordered
//! candidate detail-page links. An absent container or list is a normal
//! "no results" outcome, not an error.

use scraper::{Html, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::SiteConfig;
use crate::utils::resolve_url;

/// Parser for the catalog's search-results page.
///
/// Selectors come from config because they track the site's current markup.
pub struct SearchPageParser {
    base: Url,
    container: Selector,
    list: Selector,
    item: Selector,
    link: Selector,
}

impl SearchPageParser {
    /// Compile the configured selectors.
    pub fn new(site: &SiteConfig) -> Result<Self> {
        Ok(Self {
            base: Url::parse(&site.base_url)?,
            container: parse_selector(&site.results_container)?,
            list: parse_selector(&site.results_list)?,
            item: parse_selector(&site.results_item)?,
            link: parse_selector(&site.results_link)?,
        })
    }

    /// Extract candidate detail-page URLs from a search-results page body.
    ///
    /// Preserves page order. Items without an extractable link are skipped
    /// silently; no deduplication is performed.
    pub fn parse(&self, body: &str) -> Vec<String> {
        let document = Html::parse_document(body);

        let Some(container) = document.select(&self.container).next() else {
            return Vec::new();
        };
        let Some(list) = container.select(&self.list).next() else {
            return Vec::new();
        };

        let mut links = Vec::new();
        for item in list.select(&self.item) {
            let Some(anchor) = item.select(&self.link).next() else {
                continue;
            };
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            links.push(resolve_url(&self.base, href));
        }
        links
    }
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> SearchPageParser {
        let site = SiteConfig {
            results_container: "div.findSection".to_string(),
            ..SiteConfig::default()
        };
        SearchPageParser::new(&site).unwrap()
    }

    #[test]
    fn test_collects_links_in_page_order() {
        let body = r#"
            <div class="findSection">
              <ul>
                <li><a href="/title/tt000123/">OMG 2</a></li>
                <li><span>no link here</span></li>
                <li><a href="/title/tt000456/">Ruslaan</a></li>
              </ul>
            </div>
        "#;
        assert_eq!(
            parser().parse(body),
            vec![
                "https://www.imdb.com/title/tt000123/".to_string(),
                "https://www.imdb.com/title/tt000456/".to_string(),
            ]
        );
    }

    #[test]
    fn test_missing_container_yields_empty() {
        let body = "<div class='other'><ul><li><a href='/x'>x</a></li></ul></div>";
        assert!(parser().parse(body).is_empty());
    }

    #[test]
    fn test_container_without_list_yields_empty() {
        let body = "<div class='findSection'><p>No results found</p></div>";
        assert!(parser().parse(body).is_empty());
    }

    #[test]
    fn test_absolute_links_kept_as_is() {
        let body = r#"
            <div class="findSection">
              <ul><li><a href="https://other.example/x">x</a></li></ul>
            </div>
        "#;
        assert_eq!(parser().parse(body), vec!["https://other.example/x".to_string()]);
    }

    #[test]
    fn test_invalid_selector_is_rejected() {
        let site = SiteConfig {
            results_container: "[[invalid".to_string(),
            ..SiteConfig::default()
        };
        assert!(SearchPageParser::new(&site).is_err());
    }
}
