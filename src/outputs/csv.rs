//! CSV export of accumulated headlines.
//!
//! The header row is always written, even for an empty session. Rows follow
//! session order, with a 1-based index and `N/A` for missing links.

use crate::errors::ExportError;
use crate::session::SessionState;
use crate::utils::ensure_parent_dir;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tracing::{error, info, instrument};

/// Column names, in order.
pub const HEADER: [&str; 5] = ["Index", "Headline", "Link", "Selector", "Timestamp"];

/// One row of the CSV export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvRow {
    #[serde(rename = "Index")]
    pub index: usize,
    #[serde(rename = "Headline")]
    pub headline: String,
    #[serde(rename = "Link")]
    pub link: String,
    #[serde(rename = "Selector")]
    pub selector: String,
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
}

/// Rows for every headline in `session`.
pub fn rows(session: &SessionState) -> Vec<CsvRow> {
    session
        .headlines()
        .iter()
        .enumerate()
        .map(|(i, h)| CsvRow {
            index: i + 1,
            headline: h.text().to_string(),
            link: h.link_or_placeholder().to_string(),
            selector: h.strategy().to_string(),
            timestamp: h.timestamp(),
        })
        .collect()
}

/// Encode `session` as CSV bytes.
pub fn render_csv(session: &SessionState) -> Result<Vec<u8>, ExportError> {
    let mut writer = ::csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(HEADER)?;
    for row in rows(session) {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.into_error().into()))
}

/// Write the CSV export for `session` to `path`, replacing any existing file.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_csv(session: &SessionState, path: &Path) -> Result<(), ExportError> {
    let result: Result<(), ExportError> = async {
        let bytes = render_csv(session)?;
        let io_err = |source| ExportError::Io {
            path: path.display().to_string(),
            source,
        };
        ensure_parent_dir(path).await.map_err(io_err)?;
        fs::write(path, bytes).await.map_err(io_err)
    }
    .await;

    match &result {
        Ok(()) => info!(rows = session.len(), "Headlines saved to CSV"),
        Err(e) => error!(error = %e, "Failed to write CSV"),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HeadlineRecord;
    use chrono::NaiveDate;

    fn session() -> SessionState {
        let at = NaiveDate::from_ymd_opt(2025, 5, 6)
            .unwrap()
            .and_hms_opt(14, 29, 58)
            .unwrap();
        let mut session = SessionState::new();
        session.append(&[
            HeadlineRecord::captured(
                "Floods close roads, \"worst in decades\"",
                Some("/news?id=1&x=2".to_string()),
                r#"[class*="headline"]"#,
                at,
            ),
            HeadlineRecord::captured("Local team wins the championship final", None, "h2", at),
            HeadlineRecord::captured("Line one of a headline\nand line two", None, ".title", at),
        ]);
        session
    }

    #[test]
    fn test_header_written_for_empty_session() {
        let bytes = render_csv(&SessionState::new()).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "Index,Headline,Link,Selector,Timestamp\n");
    }

    #[test]
    fn test_placeholder_for_missing_link() {
        let text = String::from_utf8(render_csv(&session()).unwrap()).unwrap();
        assert!(text.contains("2,Local team wins the championship final,N/A,h2,2025-05-06 14:29:58\n"));
    }

    #[test]
    fn test_round_trip_preserves_tuples_and_order() {
        let session = session();
        let bytes = render_csv(&session).unwrap();

        let mut reader = ::csv::Reader::from_reader(bytes.as_slice());
        assert_eq!(reader.headers().unwrap().iter().collect::<Vec<_>>(), HEADER);
        let parsed: Vec<CsvRow> = reader.deserialize().collect::<Result<_, _>>().unwrap();

        let expected: Vec<(String, String, String, String)> = session
            .headlines()
            .iter()
            .map(|h| {
                (
                    h.text().to_string(),
                    h.link_or_placeholder().to_string(),
                    h.strategy().to_string(),
                    h.timestamp(),
                )
            })
            .collect();
        let actual: Vec<(String, String, String, String)> = parsed
            .iter()
            .map(|r| (r.headline.clone(), r.link.clone(), r.selector.clone(), r.timestamp.clone()))
            .collect();
        assert_eq!(actual, expected);
        assert_eq!(parsed.iter().map(|r| r.index).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_write_csv_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/news_headlines.csv");
        write_csv(&session(), &path).await.unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("Index,Headline,Link,Selector,Timestamp\n1,"));
    }

    #[tokio::test]
    async fn test_write_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_csv(&session(), dir.path()).await.unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
    }
}
