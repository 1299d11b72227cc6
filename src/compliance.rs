//! robots.txt compliance gate.
//!
//! Before any page is fetched the site's `/robots.txt` is read and evaluated
//! for our agent. The gate fails open: if the policy cannot be retrieved or
//! parsed, scraping proceeds with the default one-second delay. A missing
//! policy is common and is not treated as a denial.
//!
//! # Delay Lookup
//!
//! 1. `Crawl-delay` of the group matching our agent's product token
//! 2. `Crawl-delay` of the `*` group
//! 3. [`ComplianceResult::DEFAULT_DELAY_SECS`]

use crate::http::HttpGet;
use crate::models::ComplianceResult;
use crate::utils::agent_product_token;
use std::error::Error;
use texting_robots::Robot;
use tracing::{info, instrument, warn};
use url::Url;

/// Check whether `user_agent` may fetch `base_url` and how long to wait.
///
/// Never fails; every retrieval or parse problem yields
/// [`ComplianceResult::permissive`].
#[instrument(level = "info", skip(client))]
pub async fn check_compliance<C: HttpGet>(
    client: &C,
    base_url: &str,
    user_agent: &str,
) -> ComplianceResult {
    let (robots_url, site_path) = match Url::parse(base_url).and_then(|u| {
        let robots = u.join("/robots.txt")?;
        Ok((robots.to_string(), u.path().to_string()))
    }) {
        Ok(pair) => pair,
        Err(e) => {
            warn!(error = %e, "Could not derive robots.txt URL; failing open");
            return ComplianceResult::permissive();
        }
    };

    let response = match client.get(&robots_url).await {
        Ok(r) if r.is_success() => r,
        Ok(r) => {
            warn!(status = r.status, %robots_url, "robots.txt not available; failing open");
            return ComplianceResult::permissive();
        }
        Err(e) => {
            warn!(error = %e, %robots_url, "Could not check robots.txt; failing open");
            return ComplianceResult::permissive();
        }
    };

    match evaluate_policy(&response.body, &site_path, user_agent) {
        Ok(result) => {
            info!(
                allowed = result.allowed,
                delay_secs = result.min_delay_secs,
                "robots.txt checked"
            );
            result
        }
        Err(e) => {
            warn!(error = %e, %robots_url, "Could not parse robots.txt; failing open");
            ComplianceResult::permissive()
        }
    }
}

/// Evaluate a robots.txt body for `user_agent` fetching `path`.
pub fn evaluate_policy(
    robots_txt: &str,
    path: &str,
    user_agent: &str,
) -> Result<ComplianceResult, Box<dyn Error>> {
    let token = agent_product_token(user_agent);
    let robot = parse_robots(token, robots_txt)?;
    let allowed = robot.allowed(path);

    let delay = match robot.delay {
        Some(d) => Some(d),
        None if token != "*" => parse_robots("*", robots_txt)?.delay,
        None => None,
    };

    Ok(ComplianceResult {
        allowed,
        min_delay_secs: delay
            .map(crawl_delay_secs)
            .unwrap_or(ComplianceResult::DEFAULT_DELAY_SECS),
    })
}

/// A declared `Crawl-delay` in seconds. An explicit zero stays zero, negative
/// values clamp to zero and NaN is read as an unbounded delay.
fn crawl_delay_secs(declared: f32) -> f64 {
    let secs = f64::from(declared);
    if secs.is_nan() {
        f64::INFINITY
    } else {
        secs.max(0.0)
    }
}

fn parse_robots(agent: &str, robots_txt: &str) -> Result<Robot, Box<dyn Error>> {
    Robot::new(agent, robots_txt.as_bytes()).map_err(|e| e.to_string().into())
}
