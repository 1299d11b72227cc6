//! HTTP transport used by the compliance gate and the fetcher.
//!
//! The pipeline only depends on the [`HttpGet`] trait, so the network can be
//! swapped out. [`ReqwestClient`] is the production implementation: a single
//! `reqwest::Client` carrying the identifying headers and a bounded timeout,
//! reused for every request so connections stay alive between calls.

use crate::errors::FetchError;
use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, CONNECTION, HeaderMap, HeaderValue, UPGRADE_INSECURE_REQUESTS,
    USER_AGENT,
};
use std::error::Error;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

/// Default identifying agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = "NewsScraperBot/1.0 (+Educational Purpose)";

/// Upper bound on a single request, connect through body.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Status and body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for issuing a single GET request.
///
/// Implementors report transport-level failures as [`FetchError::Transport`]
/// and return every answered request as an [`HttpResponse`], whatever its
/// status. Interpreting the status is left to the caller.
pub trait HttpGet {
    /// Issue a GET for `url`.
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError>;
}

/// Production [`HttpGet`] backed by a persistent `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
    user_agent: String,
}

impl ReqwestClient {
    /// Build a client that identifies itself as `user_agent`.
    ///
    /// # Errors
    ///
    /// Fails if `user_agent` is not a valid header value or the TLS backend
    /// cannot be initialised.
    pub fn new(user_agent: &str) -> Result<Self, Box<dyn Error>> {
        let client = reqwest::Client::builder()
            .default_headers(default_headers(user_agent)?)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            user_agent: user_agent.to_string(),
        })
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

impl HttpGet for ReqwestClient {
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        let t0 = Instant::now();
        let response = match self.client.get(url).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!(elapsed_ms = t0.elapsed().as_millis() as u64, error = %e, "GET failed");
                return Err(e.into());
            }
        };
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!(
            status,
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "GET completed"
        );
        Ok(HttpResponse { status, body })
    }
}

/// Headers carried on every request. `Accept-Encoding` is negotiated by
/// reqwest itself through its `gzip` and `deflate` features.
fn default_headers(user_agent: &str) -> Result<HeaderMap, Box<dyn Error>> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_str(user_agent)?);
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
    Ok(headers)
}
