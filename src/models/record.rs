//! Normalized title record extracted from a detail page.

use serde::{Deserialize, Serialize};

/// Column order of the CSV output. Stable across runs; changing it would
/// corrupt files appended to by earlier versions.
pub const FIELDS: [&str; 12] = [
    "type",
    "name",
    "description",
    "ratingCount",
    "bestRating",
    "worstRating",
    "ratingValue",
    "datePublished",
    "actor",
    "directors",
    "writers",
    "url",
];

/// One normalized record for a catalog title.
///
/// All fields are strings; missing source fields stay empty. `url` is always
/// populated with the detail-page URL the record came from. List-valued
/// source fields (cast and credits) are flattened to ", "-joined strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleRecord {
    pub kind: String,
    pub name: String,
    pub description: String,
    pub rating_count: String,
    pub best_rating: String,
    pub worst_rating: String,
    pub rating_value: String,
    pub date_published: String,
    pub actor: String,
    pub directors: String,
    pub writers: String,
    pub url: String,
}

impl TitleRecord {
    /// Empty record bound to a detail-page URL.
    pub fn for_url(url: impl Into<String>) -> Self {
        Self {
            kind: String::new(),
            name: String::new(),
            description: String::new(),
            rating_count: String::new(),
            best_rating: String::new(),
            worst_rating: String::new(),
            rating_value: String::new(),
            date_published: String::new(),
            actor: String::new(),
            directors: String::new(),
            writers: String::new(),
            url: url.into(),
        }
    }

    /// Field values in [`FIELDS`] order, for one CSV row.
    pub fn as_row(&self) -> [&str; 12] {
        [
            &self.kind,
            &self.name,
            &self.description,
            &self.rating_count,
            &self.best_rating,
            &self.worst_rating,
            &self.rating_value,
            &self.date_published,
            &self.actor,
            &self.directors,
            &self.writers,
            &self.url,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_url_populates_only_url() {
        let record = TitleRecord::for_url("https://www.imdb.com/title/tt000123/");
        assert_eq!(record.url, "https://www.imdb.com/title/tt000123/");
        assert!(record.name.is_empty());
        assert!(record.actor.is_empty());
    }

    #[test]
    fn test_row_matches_field_order() {
        let mut record = TitleRecord::for_url("u");
        record.kind = "Movie".to_string();
        record.writers = "W".to_string();
        let row = record.as_row();
        assert_eq!(row.len(), FIELDS.len());
        assert_eq!(row[0], "Movie");
        assert_eq!(row[10], "W");
        assert_eq!(row[11], "u");
    }
}
