//! Search query and related data models

use crate::results::Results;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Typed search arguments handed to a provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Substring to match; empty matches everything
    #[serde(default)]
    pub keyword: String,
    /// Page number (1-indexed). Missing or below 1 means page 1.
    #[serde(default)]
    pub page: Option<i64>,
}

impl SearchRequest {
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            page: None,
        }
    }

    pub fn with_page(mut self, page: i64) -> Self {
        self.page = Some(page);
        self
    }

    /// Normalized page number
    pub fn page(&self) -> usize {
        match self.page {
            Some(page) if page >= 1 => usize::try_from(page).unwrap_or(usize::MAX),
            _ => 1,
        }
    }
}

/// A search against one provider, as tracked by the host
#[derive(Debug, Clone, Default)]
pub struct Query {
    /// Name of the provider to search
    pub provider: String,
    /// Search keyword
    pub keyword: String,
    /// Page number (1-indexed)
    pub page: i64,
    /// 1-indexed result to redirect to, 0 for none
    pub goto: usize,
    /// Time budget, zero for the host default
    pub timeout: Duration,
    /// Maximum number of results kept, 0 for no limit
    pub limit: usize,
    /// Last HTTP status observed for this query
    pub http_status: u16,
    /// When execution started
    pub start: Option<DateTime<Utc>>,
    /// How long execution took
    pub elapsed: Duration,
    /// Accumulated results
    pub results: Results,
}

impl Query {
    pub fn new(provider: impl Into<String>, keyword: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            keyword: keyword.into(),
            page: 1,
            ..Default::default()
        }
    }

    pub fn with_page(mut self, page: i64) -> Self {
        self.page = page;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Effective timeout given the host's default and ceiling
    pub fn effective_timeout(&self, default: Duration, max: Duration) -> Duration {
        if self.timeout.is_zero() {
            default.min(max)
        } else {
            self.timeout.min(max)
        }
    }

    /// Provider-facing view of this query
    pub fn request(&self) -> SearchRequest {
        SearchRequest {
            keyword: self.keyword.clone(),
            page: Some(self.page),
        }
    }

    /// Link of the result `goto` points at, if any
    pub fn goto_link(&self) -> Option<&str> {
        self.goto
            .checked_sub(1)
            .and_then(|index| self.results.get(index))
            .map(|r| r.link.as_str())
    }
}

/// Parse a host timeout string such as `5000ms`, `5s` or `1m`.
///
/// A bare number is taken as milliseconds.
pub fn parse_timeout(value: &str) -> Option<Duration> {
    let value = value.trim();
    let split = value
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(value.len());
    let (number, unit) = value.split_at(split);
    let number: f64 = number.parse().ok()?;
    if !number.is_finite() || number < 0.0 {
        return None;
    }

    let seconds = match unit.trim() {
        "" | "ms" => number / 1000.0,
        "s" => number,
        "m" => number * 60.0,
        _ => return None,
    };
    Duration::try_from_secs_f64(seconds).ok()
}
