//! Error types for the scraping pipeline.
//!
//! Only [`ScrapeError`] ever reaches the caller of a scrape, and only for bad
//! input. Every other failure degrades to fewer results and is logged where it
//! happens.

use thiserror::Error;

/// Failure while retrieving a document.
#[derive(Debug, Error)]
pub enum FetchError {
    /// DNS, connection, TLS or timeout failure.
    #[error("transport error: {0}")]
    Transport(String),
    /// The server answered with a non-success status.
    #[error("HTTP status {status}")]
    HttpStatus { status: u16 },
    /// Anything else, such as an undecodable body.
    #[error("unexpected error: {0}")]
    Unknown(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            FetchError::HttpStatus {
                status: status.as_u16(),
            }
        } else if e.is_timeout() || e.is_connect() || e.is_request() || e.is_redirect() {
            FetchError::Transport(e.to_string())
        } else {
            FetchError::Unknown(e.to_string())
        }
    }
}

/// A selector strategy that could not be evaluated.
#[derive(Debug, Error)]
#[error("selector `{selector}` is invalid: {reason}")]
pub struct SelectorError {
    pub selector: String,
    pub reason: String,
}

/// Failure while writing an export file.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Caller-supplied input the orchestration step refuses to run with.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("no URL provided")]
    EmptyUrl,
    #[error("invalid URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },
}
