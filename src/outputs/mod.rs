//! Output generation for accumulated headlines.
//!
//! This module contains submodules responsible for presenting a
//! [`SessionState`](crate::session::SessionState):
//!
//! # Submodules
//!
//! - [`text`]: Writes a numbered plain-text report with a summary block
//! - [`csv`]: Writes one CSV row per headline
//! - [`console`]: Prints the first few headlines to stdout
//!
//! Both file exporters overwrite their target on every run and write UTF-8.
//! Failures come back as [`ExportError`](crate::errors::ExportError) so the
//! caller can report them and carry on.

pub mod console;
pub mod csv;
pub mod text;

/// Default path of the plain-text report.
pub const DEFAULT_TEXT_PATH: &str = "news_headlines.txt";
/// Default path of the CSV export.
pub const DEFAULT_CSV_PATH: &str = "news_headlines.csv";

/// Horizontal rule used by the text report and the console listing.
pub(crate) const RULE: &str = "============================================================";
