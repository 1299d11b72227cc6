//! Plain-text report generation.
//!
//! # Report Layout
//!
//! ```text
//! News Headlines Scraped on 2025-05-06 14:30:00
//! ============================================================
//!
//! 1. Floods close roads across the valley
//!    Link: /a
//!    Found with: h1
//!    Scraped at: 2025-05-06 14:29:58
//!
//!
//! ============================================================
//! SUMMARY
//! Total Headlines: 1
//! URLs Scraped: 1
//! Scraped URLs: https://news.example.com/world
//! ```

use super::RULE;
use crate::errors::ExportError;
use crate::models::TIMESTAMP_FORMAT;
use crate::session::SessionState;
use crate::utils::ensure_parent_dir;
use chrono::{Local, NaiveDateTime};
use itertools::Itertools;
use std::fmt::Write;
use std::path::Path;
use tokio::fs;
use tracing::{error, info, instrument};

/// Render the report for `session` as generated at `generated_at`.
pub fn render_report(session: &SessionState, generated_at: NaiveDateTime) -> String {
    let mut out = String::new();

    writeln!(out, "News Headlines Scraped on {}", generated_at.format(TIMESTAMP_FORMAT)).unwrap();
    writeln!(out, "{RULE}\n").unwrap();

    for (i, headline) in session.headlines().iter().enumerate() {
        writeln!(out, "{}. {}", i + 1, headline.text()).unwrap();
        writeln!(out, "   Link: {}", headline.link_or_placeholder()).unwrap();
        writeln!(out, "   Found with: {}", headline.strategy()).unwrap();
        writeln!(out, "   Scraped at: {}\n", headline.timestamp()).unwrap();
    }

    writeln!(out, "\n{RULE}").unwrap();
    writeln!(out, "SUMMARY").unwrap();
    writeln!(out, "Total Headlines: {}", session.len()).unwrap();
    writeln!(out, "URLs Scraped: {}", session.visited_count()).unwrap();
    writeln!(out, "Scraped URLs: {}", session.visited_urls().join(", ")).unwrap();

    out
}

/// Write the text report for `session` to `path`, replacing any existing file.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_text_report(session: &SessionState, path: &Path) -> Result<(), ExportError> {
    let report = render_report(session, Local::now().naive_local());
    let io_err = |source| ExportError::Io {
        path: path.display().to_string(),
        source,
    };

    let result = match ensure_parent_dir(path).await {
        Ok(()) => fs::write(path, report).await.map_err(io_err),
        Err(e) => Err(io_err(e)),
    };

    match &result {
        Ok(()) => info!(headlines = session.len(), "Headlines saved to text report"),
        Err(e) => error!(error = %e, "Failed to write text report"),
    }
    result
}
