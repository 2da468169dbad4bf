//! Article listing written next to the rendered pages.

use std::cmp::Reverse;

use chrono::NaiveDate;
use folio_frontmatter::{DateValue, Metadata};
use serde::Serialize;

/// One row of `index.json`.
#[derive(Debug, Serialize)]
pub(crate) struct IndexEntry {
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Effective date in canonical form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub degraded: bool,
    #[serde(skip)]
    sort_key: Option<NaiveDate>,
}

impl IndexEntry {
    pub(crate) fn new(slug: String, metadata: &Metadata, degraded: bool) -> Self {
        let date = metadata.effective_date();
        Self {
            slug,
            title: metadata.title.clone(),
            subtitle: metadata.subtitle.clone(),
            date: date.map(DateValue::canonical),
            location: metadata.location.clone(),
            degraded,
            sort_key: date.and_then(sort_date),
        }
    }
}

/// Sort newest first. Undated articles go last, ordered by slug.
pub(crate) fn sort_entries(entries: &mut [IndexEntry]) {
    entries.sort_by(|a, b| {
        let key = |e: &IndexEntry| (e.sort_key.is_none(), Reverse(e.sort_key));
        key(a).cmp(&key(b)).then_with(|| a.slug.cmp(&b.slug))
    });
}

/// Date used for ordering. Text values that start with a year sort as the
/// first day of that year.
fn sort_date(value: &DateValue) -> Option<NaiveDate> {
    if let Some(date) = value.as_date() {
        return Some(date);
    }
    let text = value.canonical();
    let text = text.trim();
    let year = text.get(..4).filter(|y| y.bytes().all(|b| b.is_ascii_digit()))?;
    if text[4..].starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, 1, 1)
}
