//! Utility functions for URL handling, agent tokens and log formatting.
//!
//! This module provides helper functions used throughout the application:
//! - URL normalisation and base-URL derivation for the compliance check
//! - Product-token extraction for robots.txt agent matching
//! - String truncation for logging
//! - Output directory preparation for the exporters

use crate::errors::ScrapeError;
use std::path::Path;
use tokio::fs;
use url::Url;

/// Prefix `https://` onto a URL that carries no scheme.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_url("example.com"), "https://example.com");
/// assert_eq!(normalize_url("http://example.com"), "http://example.com");
/// ```
pub fn normalize_url(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() || raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("https://{raw}")
    }
}

/// Derive the site root (scheme, host and port) from a page URL.
///
/// # Errors
///
/// Returns [`ScrapeError::EmptyUrl`] for blank input and
/// [`ScrapeError::InvalidUrl`] when the URL cannot be parsed or has no host.
pub fn base_url(url: &str) -> Result<String, ScrapeError> {
    if url.trim().is_empty() {
        return Err(ScrapeError::EmptyUrl);
    }
    let parsed = Url::parse(url).map_err(|e| ScrapeError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    if parsed.host_str().is_none() {
        return Err(ScrapeError::InvalidUrl {
            url: url.to_string(),
            reason: "URL has no host".to_string(),
        });
    }
    Ok(parsed.origin().ascii_serialization())
}

/// The product token of a User-Agent string, used to match robots.txt groups.
///
/// `"NewsScraperBot/1.0 (+Educational Purpose)"` becomes `"NewsScraperBot"`.
pub fn agent_product_token(user_agent: &str) -> &str {
    let token = user_agent
        .split(|c: char| c == '/' || c.is_whitespace())
        .next()
        .unwrap_or("");
    if token.is_empty() { "*" } else { token }
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and a count of
/// the dropped bytes appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

/// Create the parent directory of an output file if it is missing.
pub async fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent).await,
        _ => Ok(()),
    }
}
