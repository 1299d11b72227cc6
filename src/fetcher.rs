//! Rate-limited document retrieval.
//!
//! Pacing is a plain sleep before each request. There is no retry: a single
//! failure is final for that URL.

use crate::errors::FetchError;
use crate::http::HttpGet;
use crate::utils::truncate_for_log;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument};

/// Wait `delay_secs`, then GET `url` and return its body.
///
/// # Errors
///
/// - [`FetchError::HttpStatus`] for any non-2xx answer
/// - [`FetchError::Transport`] for DNS, connection and timeout failures
/// - [`FetchError::Unknown`] for anything else
#[instrument(level = "info", skip(client))]
pub async fn fetch_document<C: HttpGet>(
    client: &C,
    url: &str,
    delay_secs: f64,
) -> Result<String, FetchError> {
    let delay = pacing_delay(delay_secs);
    if !delay.is_zero() {
        debug!(?delay, "Honoring crawl delay");
        sleep(delay).await;
    }

    info!("Fetching page");
    let response = match client.get(url).await {
        Ok(r) => r,
        Err(e) => {
            error!(error = %e, "Fetch failed");
            return Err(e);
        }
    };

    if !response.is_success() {
        error!(
            status = response.status,
            body_preview = %truncate_for_log(&response.body, 200),
            "Fetch returned error status"
        );
        return Err(FetchError::HttpStatus {
            status: response.status,
        });
    }

    info!(status = response.status, bytes = response.body.len(), "Fetched page");
    Ok(response.body)
}

/// Convert a crawl delay in seconds to a sleep duration.
///
/// Negative delays become zero. NaN and delays too large for a [`Duration`]
/// saturate at [`Duration::MAX`], so a site asking for an extreme delay is
/// never fetched sooner than it asked.
pub fn pacing_delay(delay_secs: f64) -> Duration {
    if delay_secs.is_nan() {
        return Duration::MAX;
    }
    if delay_secs <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(delay_secs).unwrap_or(Duration::MAX)
}
