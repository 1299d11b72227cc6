//! Session state and the scrape orchestration.
//!
//! A [`SessionState`] accumulates every headline found during a run together
//! with the URLs that were successfully processed. It is owned by the caller
//! and passed into each [`Scraper::scrape_site`] call, so a fresh session is
//! just `SessionState::default()`.
//!
//! # Pipeline
//!
//! 1. Derive the site root from the page URL
//! 2. Check robots.txt (fails open)
//! 3. Fetch the page after the required delay
//! 4. Extract headlines
//! 5. Append unseen headlines to the session and mark the URL visited

use crate::compliance::check_compliance;
use crate::errors::ScrapeError;
use crate::extractor::extract_headlines;
use crate::fetcher::fetch_document;
use crate::http::HttpGet;
use crate::models::HeadlineRecord;
use crate::utils::{base_url, normalize_url};
use std::collections::{BTreeSet, HashSet};
use tracing::{error, info, instrument, warn};

/// Headlines and visited URLs accumulated across scrape calls.
///
/// No two stored headlines share the same text. Records are only ever
/// appended, in discovery order.
#[derive(Debug, Default, Clone)]
pub struct SessionState {
    headlines: Vec<HeadlineRecord>,
    texts: HashSet<String>,
    visited: BTreeSet<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// All stored headlines in discovery order.
    pub fn headlines(&self) -> &[HeadlineRecord] {
        &self.headlines
    }

    /// URLs that were fetched and parsed successfully.
    pub fn visited_urls(&self) -> impl Iterator<Item = &str> {
        self.visited.iter().map(String::as_str)
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn has_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    pub fn len(&self) -> usize {
        self.headlines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headlines.is_empty()
    }

    /// Append records whose text is not already stored. Returns how many
    /// were added.
    pub fn append<'a>(&mut self, records: impl IntoIterator<Item = &'a HeadlineRecord>) -> usize {
        let before = self.headlines.len();
        for record in records {
            if self.texts.insert(record.text().to_string()) {
                self.headlines.push(record.clone());
            }
        }
        self.headlines.len() - before
    }

    pub fn mark_visited(&mut self, url: &str) {
        self.visited.insert(url.to_string());
    }
}

/// Runs the compliance, fetch and extraction steps for one page at a time.
#[derive(Debug)]
pub struct Scraper<C> {
    client: C,
    user_agent: String,
}

impl<C: HttpGet> Scraper<C> {
    /// Create a scraper that identifies itself as `user_agent` in robots.txt
    /// lookups. `client` is expected to send the same identity.
    pub fn new(client: C, user_agent: impl Into<String>) -> Self {
        Self {
            client,
            user_agent: user_agent.into(),
        }
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Scrape headlines from `url` into `session`.
    ///
    /// Returns the headlines found on this page, including any whose text was
    /// already in the session. A robots.txt denial or a failed fetch yields an
    /// empty list and leaves the session untouched.
    ///
    /// # Errors
    ///
    /// Only for unusable input: a blank URL or one without a host.
    #[instrument(level = "info", skip(self, session, selectors))]
    pub async fn scrape_site(
        &self,
        session: &mut SessionState,
        url: &str,
        selectors: Option<&[String]>,
    ) -> Result<Vec<HeadlineRecord>, ScrapeError> {
        let base = base_url(url)?;
        info!(%base, "Starting to scrape");

        let compliance = check_compliance(&self.client, &base, &self.user_agent).await;
        if !compliance.allowed {
            warn!("robots.txt disallows scraping; skipping URL");
            return Ok(Vec::new());
        }

        let markup = match fetch_document(&self.client, url, compliance.min_delay_secs).await {
            Ok(m) => m,
            Err(e) => {
                warn!(error = %e, "Failed to fetch content; no headlines from this URL");
                return Ok(Vec::new());
            }
        };

        let headlines = extract_headlines(&markup, selectors);
        let added = session.append(&headlines);
        session.mark_visited(url);

        info!(
            found = headlines.len(),
            added,
            session_total = session.len(),
            "Scrape complete"
        );
        Ok(headlines)
    }

    /// Scrape each `(url, selectors)` target into `session`, in order.
    ///
    /// URLs are normalized first. A URL already visited this session is
    /// skipped, and a URL that cannot be scraped is logged and skipped, so
    /// one bad target never discards what earlier targets found. Returns the
    /// number of targets that were scraped.
    #[instrument(level = "info", skip_all, fields(targets = targets.len()))]
    pub async fn scrape_targets(
        &self,
        session: &mut SessionState,
        targets: &[(String, Option<Vec<String>>)],
    ) -> usize {
        let mut scraped = 0;
        for (raw, selectors) in targets {
            let url = normalize_url(raw);
            if session.has_visited(&url) {
                info!(%url, "URL already scraped this session; skipping");
                continue;
            }
            match self.scrape_site(session, &url, selectors.as_deref()).await {
                Ok(found) => {
                    scraped += 1;
                    info!(%url, found = found.len(), agent = %self.user_agent, "Finished URL");
                }
                Err(e) => error!(%url, error = %e, "Skipping unusable URL"),
            }
        }
        scraped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::DEFAULT_USER_AGENT;
    use crate::http::stub::StubClient;

    const PAGE: &str = "https://news.example.com/world";
    const ROBOTS: &str = "https://news.example.com/robots.txt";
    const FRONT: &str = r#"
        <h1><a href="/a">Floods close roads across the valley</a></h1>
        <h2>Local team wins the championship final</h2>
        <nav><span class="title">Home</span></nav>
    "#;

    fn record(text: &str) -> HeadlineRecord {
        HeadlineRecord::new(text, None, "h1")
    }

    fn scraper(client: StubClient) -> Scraper<StubClient> {
        Scraper::new(client, DEFAULT_USER_AGENT)
    }

    #[test]
    fn test_append_is_idempotent() {
        let batch = vec![record("First headline of the day"), record("Second headline of the day")];
        let mut session = SessionState::new();
        assert_eq!(session.append(&batch), 2);
        assert_eq!(session.append(&batch), 0);
        assert_eq!(session.len(), 2);
        assert_eq!(session.headlines()[0].text(), "First headline of the day");
    }

    #[test]
    fn test_append_keeps_first_occurrence_across_batches() {
        let mut session = SessionState::new();
        session.append(&[HeadlineRecord::new("Shared headline between pages", Some("/one".into()), "h1")]);
        session.append(&[
            HeadlineRecord::new("Shared headline between pages", Some("/two".into()), "h2"),
            record("Only on the second page"),
        ]);
        assert_eq!(session.len(), 2);
        assert_eq!(session.headlines()[0].link(), Some("/one"));
    }

    #[tokio::test]
    async fn test_scrape_accumulates_into_session() {
        let client = StubClient::new()
            .route(ROBOTS, 200, "User-agent: *\nCrawl-delay: 0\n")
            .route(PAGE, 200, FRONT);
        let scraper = scraper(client);
        let mut session = SessionState::new();

        let found = scraper.scrape_site(&mut session, PAGE, None).await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].link(), Some("/a"));
        assert_eq!(session.len(), 2);
        assert!(session.has_visited(PAGE));
    }

    #[tokio::test]
    async fn test_second_scrape_returns_call_results_not_session() {
        let other = "https://news.example.com/sport";
        let client = StubClient::new()
            .route(ROBOTS, 200, "User-agent: *\nCrawl-delay: 0\n")
            .route(PAGE, 200, FRONT)
            .route(other, 200, "<h2>Local team wins the championship final</h2>");
        let scraper = scraper(client);
        let mut session = SessionState::new();

        scraper.scrape_site(&mut session, PAGE, None).await.unwrap();
        let found = scraper.scrape_site(&mut session, other, None).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(session.len(), 2);
        assert_eq!(session.visited_count(), 2);
    }

    #[tokio::test]
    async fn test_disallowed_site_is_not_fetched() {
        let client = StubClient::new()
            .route(ROBOTS, 200, "User-agent: *\nDisallow: /\n")
            .route(PAGE, 200, FRONT);
        let scraper = scraper(client);
        let mut session = SessionState::new();

        let found = scraper.scrape_site(&mut session, PAGE, None).await.unwrap();
        assert!(found.is_empty());
        assert_eq!(session.visited_count(), 0);
        assert!(session.is_empty());
        assert_eq!(scraper.client.requests(), vec![ROBOTS.to_string()]);
    }

    #[tokio::test]
    async fn test_fetch_failure_yields_empty() {
        let client = StubClient::new()
            .route(ROBOTS, 200, "User-agent: *\nCrawl-delay: 0\n")
            .route(PAGE, 502, "bad gateway");
        let scraper = scraper(client);
        let mut session = SessionState::new();

        let found = scraper.scrape_site(&mut session, PAGE, None).await.unwrap();
        assert!(found.is_empty());
        assert!(!session.has_visited(PAGE));
    }

    #[tokio::test]
    async fn test_custom_selectors_override_defaults() {
        let client = StubClient::new()
            .route(ROBOTS, 200, "User-agent: *\nCrawl-delay: 0\n")
            .route(PAGE, 200, r#"<h1>Heading that should be ignored</h1><span class="text">Quote selected by custom strategy</span>"#);
        let scraper = scraper(client);
        let mut session = SessionState::new();
        let selectors = vec![".text".to_string()];

        let found = scraper
            .scrape_site(&mut session, PAGE, Some(selectors.as_slice()))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].strategy(), ".text");
    }

    #[tokio::test]
    async fn test_empty_url_is_rejected() {
        let scraper = scraper(StubClient::new());
        let mut session = SessionState::new();
        let err = scraper.scrape_site(&mut session, "", None).await.unwrap_err();
        assert!(matches!(err, ScrapeError::EmptyUrl));
        assert!(scraper.client.requests().is_empty());
    }

    fn targets(urls: &[&str]) -> Vec<(String, Option<Vec<String>>)> {
        urls.iter().map(|u| (u.to_string(), None)).collect()
    }

    #[tokio::test]
    async fn test_bad_target_does_not_discard_earlier_results() {
        let other = "https://news.example.com/sport";
        let client = StubClient::new()
            .route(ROBOTS, 200, "User-agent: *\nCrawl-delay: 0\n")
            .route(PAGE, 200, FRONT)
            .route(other, 200, "<h2>Late goal decides the derby match</h2>");
        let scraper = scraper(client);
        let mut session = SessionState::new();

        let scraped = scraper
            .scrape_targets(&mut session, &targets(&[PAGE, "bad host", other]))
            .await;
        assert_eq!(scraped, 2);
        assert_eq!(session.len(), 3);
        assert!(session.has_visited(PAGE));
        assert!(session.has_visited(other));
        assert!(!scraper.client.requests().iter().any(|r| r.contains("bad host")));
    }

    #[tokio::test]
    async fn test_repeated_target_is_fetched_once() {
        let client = StubClient::new()
            .route(ROBOTS, 200, "User-agent: *\nCrawl-delay: 0\n")
            .route(PAGE, 200, FRONT);
        let scraper = scraper(client);
        let mut session = SessionState::new();

        let scraped = scraper
            .scrape_targets(&mut session, &targets(&[PAGE, "news.example.com/world"]))
            .await;
        assert_eq!(scraped, 1);
        assert_eq!(session.len(), 2);
        let page_hits = scraper.client.requests().iter().filter(|r| *r == PAGE).count();
        assert_eq!(page_hits, 1);
    }

    #[tokio::test]
    async fn test_failed_target_is_retried_when_repeated() {
        let client = StubClient::new()
            .route(ROBOTS, 200, "User-agent: *\nCrawl-delay: 0\n")
            .route(PAGE, 503, "busy");
        let scraper = scraper(client);
        let mut session = SessionState::new();

        scraper.scrape_targets(&mut session, &targets(&[PAGE, PAGE])).await;
        let page_hits = scraper.client.requests().iter().filter(|r| *r == PAGE).count();
        assert_eq!(page_hits, 2);
        assert!(session.is_empty());
    }
}
