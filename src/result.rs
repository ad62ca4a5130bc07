//! Extraction output.
//!
//! The pipeline treats [`Article`] as an opaque value: it is produced by an
//! [`Extractor`](crate::Extractor) and returned to the caller untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Readable content extracted from a web page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Article title.
    pub title: String,

    /// Author line, if one was found.
    pub byline: Option<String>,

    /// Short description or first paragraph.
    pub excerpt: Option<String>,

    /// Name of the publishing site.
    pub site_name: Option<String>,

    /// Document language as declared by the page.
    pub language: Option<String>,

    /// Text direction (`ltr` / `rtl`).
    pub direction: Option<String>,

    /// Cleaned article HTML.
    pub content: String,

    /// Article text without markup.
    pub text_content: String,

    /// Length of `text_content` in characters.
    pub length: usize,

    /// Publication time, when the page declares an RFC 3339 timestamp.
    pub published_time: Option<DateTime<Utc>>,

    /// Lead image URL.
    pub image: Option<String>,

    /// Site icon URL.
    pub favicon: Option<String>,

    /// URL the article was resolved against.
    pub url: Option<String>,
}

impl Article {
    /// Returns true when no readable text was extracted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text_content.trim().is_empty()
    }
}

/// Parses a page-declared timestamp.
///
/// Pages mostly use RFC 3339; a bare date is read as midnight UTC. Anything
/// else is dropped rather than guessed at.
pub(crate) fn parse_published_time(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
