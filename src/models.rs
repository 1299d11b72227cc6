//! Data models for extracted headlines and compliance decisions.
//!
//! This module defines the core data structures used throughout the application:
//! - [`HeadlineRecord`]: A single candidate headline found on a page
//! - [`ComplianceResult`]: The outcome of a robots.txt check for a site

use chrono::{Local, NaiveDateTime, Timelike};

/// Format used for every timestamp written to the console, the text report
/// and the CSV export.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Placeholder rendered wherever a headline has no link.
pub const LINK_PLACEHOLDER: &str = "N/A";

/// A candidate headline extracted from a document.
///
/// Records are immutable once created. The text is always trimmed and lies
/// within the accepted length bounds enforced by the extractor.
///
/// # Fields
///
/// * `text` - The trimmed visible text of the matched element
/// * `link` - The `href` of the nearest anchor, copied verbatim
/// * `strategy` - The selector string that produced the record
/// * `captured_at` - Local wall-clock time of extraction, second precision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlineRecord {
    text: String,
    link: Option<String>,
    strategy: String,
    captured_at: NaiveDateTime,
}

impl HeadlineRecord {
    /// Create a record stamped with the current local time.
    pub fn new(text: impl Into<String>, link: Option<String>, strategy: impl Into<String>) -> Self {
        let now = Local::now().naive_local();
        Self::captured(text, link, strategy, now.with_nanosecond(0).unwrap_or(now))
    }

    /// Create a record with an explicit capture time.
    pub fn captured(
        text: impl Into<String>,
        link: Option<String>,
        strategy: impl Into<String>,
        captured_at: NaiveDateTime,
    ) -> Self {
        Self {
            text: text.into(),
            link,
            strategy: strategy.into(),
            captured_at,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    /// The link, or [`LINK_PLACEHOLDER`] when the element had no anchor.
    pub fn link_or_placeholder(&self) -> &str {
        self.link().unwrap_or(LINK_PLACEHOLDER)
    }

    pub fn strategy(&self) -> &str {
        &self.strategy
    }

    /// Capture time rendered with [`TIMESTAMP_FORMAT`].
    pub fn timestamp(&self) -> String {
        self.captured_at.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// The outcome of checking a site's robots.txt.
///
/// `min_delay_secs` is never negative. When the policy does not name a
/// crawl delay it is [`ComplianceResult::DEFAULT_DELAY_SECS`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComplianceResult {
    /// Whether the agent may fetch the site root.
    pub allowed: bool,
    /// Seconds to wait before issuing the page request.
    pub min_delay_secs: f64,
}

impl ComplianceResult {
    pub const DEFAULT_DELAY_SECS: f64 = 1.0;

    /// The fail-open decision used when no policy could be read.
    pub fn permissive() -> Self {
        Self {
            allowed: true,
            min_delay_secs: Self::DEFAULT_DELAY_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 5, 6)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_headline_record_accessors() {
        let record = HeadlineRecord::captured(
            "Markets rally after rate decision",
            Some("/markets/rally".to_string()),
            "h2",
            at(14, 30, 5),
        );
        assert_eq!(record.text(), "Markets rally after rate decision");
        assert_eq!(record.link(), Some("/markets/rally"));
        assert_eq!(record.strategy(), "h2");
        assert_eq!(record.timestamp(), "2025-05-06 14:30:05");
    }

    #[test]
    fn test_link_placeholder_when_absent() {
        let record = HeadlineRecord::captured("A headline without a link", None, ".title", at(8, 0, 0));
        assert_eq!(record.link(), None);
        assert_eq!(record.link_or_placeholder(), "N/A");
    }

    #[test]
    fn test_new_record_has_second_precision() {
        let record = HeadlineRecord::new("Something happened today", None, "h1");
        assert_eq!(record.captured_at.nanosecond(), 0);
    }

    #[test]
    fn test_permissive_compliance() {
        let result = ComplianceResult::permissive();
        assert!(result.allowed);
        assert_eq!(result.min_delay_secs, 1.0);
    }
}
