//! Result type definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};

/// A single search result
///
/// Field names on the wire follow the host's JSON contract
/// (`Link`, `Title`, `Description`, `Date`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Result {
    /// The URL of the result
    pub link: String,
    /// Human-readable label
    pub title: String,
    /// Content snippet/description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Publication or modification date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
}

impl Result {
    /// Create a new result
    pub fn new(link: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            title: title.into(),
            description: None,
            date: None,
        }
    }
}

/// Ordered list of search results, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Results(Vec<Result>);

impl Results {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: Result) {
        self.0.push(result);
    }

    /// Sort by title, keeping insertion order among equal titles
    pub fn sort_by_title(&mut self) {
        self.0.sort_by(|a, b| a.title.cmp(&b.title));
    }

    /// Slice out a 1-indexed page.
    ///
    /// Pages below 1 are treated as page 1. A page past the end yields an
    /// empty list.
    pub fn page(self, page: usize, per_page: usize) -> Self {
        let low = page.max(1).saturating_sub(1).saturating_mul(per_page);
        if low >= self.0.len() {
            return Self::new();
        }
        let high = low.saturating_add(per_page).min(self.0.len());

        let mut items = self.0;
        items.truncate(high);
        Self(items.split_off(low))
    }

    /// Keep at most `limit` results
    pub fn truncate(&mut self, limit: usize) {
        self.0.truncate(limit);
    }
}

impl Deref for Results {
    type Target = [Result];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Results {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Vec<Result>> for Results {
    fn from(results: Vec<Result>) -> Self {
        Self(results)
    }
}

impl FromIterator<Result> for Results {
    fn from_iter<I: IntoIterator<Item = Result>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(count: usize) -> Results {
        (0..count)
            .map(|i| Result::new(format!("http://example.com/{}", i), format!("r{}", i)))
            .collect()
    }

    #[test]
    fn test_page_slices() {
        let page = numbered(25).page(3, 10);
        assert_eq!(page.len(), 5);
        assert_eq!(page[0].title, "r20");
        assert_eq!(page[4].title, "r24");

        assert_eq!(numbered(25).page(1, 10).len(), 10);
        assert_eq!(numbered(25).page(2, 10)[0].title, "r10");
    }

    #[test]
    fn test_page_out_of_range_is_empty() {
        assert!(numbered(25).page(10, 10).is_empty());
        assert!(numbered(20).page(3, 10).is_empty());
        assert!(Results::new().page(1, 10).is_empty());
    }

    #[test]
    fn test_page_zero_is_first_page() {
        let first = numbered(12).page(1, 10);
        assert_eq!(numbered(12).page(0, 10), first);
    }

    #[test]
    fn test_sort_by_title_is_stable() {
        let mut results: Results = vec![
            Result::new("http://b/1", "beta"),
            Result::new("http://a/1", "alpha"),
            Result::new("http://b/2", "beta"),
        ]
        .into();

        results.sort_by_title();

        assert_eq!(results[0].title, "alpha");
        assert_eq!(results[1].link, "http://b/1");
        assert_eq!(results[2].link, "http://b/2");
    }

    #[test]
    fn test_wire_field_names() {
        let json = serde_json::to_value(Result::new("http://x", "X")).unwrap();
        assert_eq!(json["Link"], "http://x");
        assert_eq!(json["Title"], "X");
        assert!(json.get("Description").is_none());

        let results: Results = vec![Result::new("http://x", "X")].into();
        assert!(serde_json::to_value(&results).unwrap().is_array());
    }
}
