//! Utility functions and helpers.

use url::Url;

use crate::error::Result;

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Build the search endpoint URL for a keyword, with query encoding.
pub fn search_url(base_url: &str, search_path: &str, keyword: &str) -> Result<String> {
    let base = Url::parse(base_url)?;
    let mut url = base.join(search_path)?;
    url.query_pairs_mut().append_pair("q", keyword.trim());
    Ok(url.to_string())
}
