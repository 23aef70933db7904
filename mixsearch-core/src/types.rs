//! Core types for search results, filters, and adapter identification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum characters of `content_preview` before the ellipsis marker.
pub const PREVIEW_CHARS: usize = 500;

/// Outcome of the content-extraction stage for one result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStatus {
    /// Content was extracted and stored on the result.
    Success,
    /// Extraction failed; `error` carries the reason.
    Error,
}

impl fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// A single search result, before or after content extraction.
///
/// Created by a backend adapter with only `title`/`url`/`description`/
/// `timestamp` set; the extraction pipeline later fills in the content
/// fields or records a per-result failure. Never persisted — lives for
/// the duration of one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The title of the result page.
    pub title: String,
    /// The URL of the result page. Unique within one result set.
    pub url: String,
    /// Snippet text summarising the page.
    pub description: String,
    /// Full extracted page text. Empty until extraction runs.
    #[serde(default)]
    pub full_content: String,
    /// First [`PREVIEW_CHARS`] characters of `full_content`, with a
    /// `"..."` marker when truncated. Empty until extraction runs.
    #[serde(default)]
    pub content_preview: String,
    /// Whitespace-token count of `full_content`.
    #[serde(default)]
    pub word_count: usize,
    /// ISO-8601 timestamp of the search (or, for news items, the
    /// publication date reported by the backend).
    pub timestamp: String,
    /// Whether content extraction succeeded for this result.
    pub fetch_status: FetchStatus,
    /// Extraction failure reason. Present iff `fetch_status` is `Error`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResult {
    /// Create a result as adapters do: search metadata only, content
    /// fields empty until the extraction stage runs.
    pub fn new(title: String, url: String, description: String, timestamp: String) -> Self {
        Self {
            title,
            url,
            description,
            full_content: String::new(),
            content_preview: String::new(),
            word_count: 0,
            timestamp,
            fetch_status: FetchStatus::Success,
            error: None,
        }
    }

    /// Record successful extraction: stores the content, derives the
    /// preview and word count, and clears any previous error.
    pub fn set_content(&mut self, content: String) {
        self.content_preview = preview_of(&content);
        self.word_count = content.split_whitespace().count();
        self.full_content = content;
        self.fetch_status = FetchStatus::Success;
        self.error = None;
    }

    /// Record an extraction failure, leaving `full_content` empty.
    pub fn set_error(&mut self, reason: String) {
        self.full_content = String::new();
        self.content_preview = String::new();
        self.word_count = 0;
        self.fetch_status = FetchStatus::Error;
        self.error = Some(reason);
    }
}

/// Derive the preview string: first [`PREVIEW_CHARS`] characters plus an
/// ellipsis marker when the content is longer, the content itself
/// otherwise.
pub fn preview_of(content: &str) -> String {
    let mut chars = content.char_indices();
    match chars.nth(PREVIEW_CHARS) {
        Some((byte_idx, _)) => {
            let mut preview = content[..byte_idx].to_owned();
            preview.push_str("...");
            preview
        }
        None => content.to_owned(),
    }
}

/// The search verticals a backend can be asked for.
///
/// Absent means the default text search. Unrecognised strings at the
/// boundary map to `None` deterministically (see [`SourceKind::parse`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    News,
    Images,
    Videos,
}

impl SourceKind {
    /// Parse a caller-supplied source string, case-insensitively.
    ///
    /// Returns `None` for anything that is not a recognised vertical —
    /// callers fall back to the default text search.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "news" => Some(Self::News),
            "images" => Some(Self::Images),
            "videos" => Some(Self::Videos),
            _ => None,
        }
    }
}

/// Coarse recency buckets shared by every backend that supports a time
/// filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRange {
    Day,
    Week,
    Month,
    Year,
}

impl TimeRange {
    /// Map a `recency_days` value to a bucket.
    ///
    /// 1 → day, 2..=7 → week, 8..=30 → month, 31..=365 → year. Zero,
    /// negative, and >365 values mean "no time filter".
    pub fn from_recency_days(days: i64) -> Option<Self> {
        match days {
            1 => Some(Self::Day),
            2..=7 => Some(Self::Week),
            8..=30 => Some(Self::Month),
            31..=365 => Some(Self::Year),
            _ => None,
        }
    }

    /// Single-letter encoding used by Brave (`tf=`) and the DuckDuckGo
    /// HTML endpoint (`df=`).
    pub fn short_code(&self) -> &'static str {
        match self {
            Self::Day => "d",
            Self::Week => "w",
            Self::Month => "m",
            Self::Year => "y",
        }
    }
}

/// Optional cross-cutting query refinements.
///
/// A closed structure: every recognised field is listed here, and an
/// absent field always means "no constraint" — adapters must never
/// substitute a backend default that leaks into caller-visible
/// behaviour. Not every adapter honours every field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchFilters {
    /// Days to look back: 1 = past day, ≤7 = past week, ≤30 = past
    /// month, ≤365 = past year. Absent or out of range = no filter.
    pub recency_days: Option<i64>,
    /// Search vertical. Absent = general text search.
    pub source: Option<SourceKind>,
    /// ISO language code, e.g. "en".
    pub language: Option<String>,
    /// ISO country/region code, e.g. "us".
    pub country: Option<String>,
}

impl SearchFilters {
    /// The recency bucket requested by these filters, if any.
    pub fn time_range(&self) -> Option<TimeRange> {
        self.recency_days.and_then(TimeRange::from_recency_days)
    }
}

/// The backend adapters, in no particular order. The selector's
/// priority order lives in [`crate::config::SearchConfig::adapters`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdapterKind {
    /// Metasearch client with Brave-primary / DuckDuckGo-secondary
    /// sub-backends. Highest default priority.
    Metasearch,
    /// Browser-rendered Brave SERP scrape.
    BraveBrowser,
    /// Direct HTTP scrape of the DuckDuckGo HTML results page.
    DuckDuckGoHttp,
}

impl AdapterKind {
    /// Human-readable adapter name, used in logs and traces.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Metasearch => "Metasearch",
            Self::BraveBrowser => "BraveBrowser",
            Self::DuckDuckGoHttp => "DuckDuckGoHttp",
        }
    }
}

impl fmt::Display for AdapterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
