//! # News Headlines
//!
//! A polite headline scraper. For each requested page it checks the site's
//! robots.txt, waits the requested crawl delay, fetches the page once, and
//! extracts candidate headlines with an ordered table of CSS selector
//! strategies. Results accumulate in a session that is printed to the console
//! and exported as a text report and a CSV file.
//!
//! ## Usage
//!
//! ```sh
//! news_headlines https://lite.cnn.com text.npr.org
//! news_headlines --preset quotes --no-save
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Compliance**: Read robots.txt and decide whether and when to fetch
//! 2. **Fetching**: Download the page after the crawl delay, single attempt
//! 3. **Extraction**: Run selector strategies and deduplicate by text
//! 4. **Session**: Accumulate unique headlines and visited URLs
//! 5. **Output**: Console listing, text report and CSV export

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod compliance;
mod errors;
mod extractor;
mod fetcher;
mod http;
mod models;
mod outputs;
mod session;
mod utils;

use cli::Cli;
use http::ReqwestClient;
use outputs::{console, csv, text};
use session::{Scraper, SessionState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news_headlines starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let client = ReqwestClient::new(&args.user_agent)?;
    info!(user_agent = %client.user_agent(), "HTTP client ready");
    let scraper = Scraper::new(client, args.user_agent.clone());
    let mut session = SessionState::new();
    let targets = args.targets();

    tokio::select! {
        scraped = scraper.scrape_targets(&mut session, &targets) => {
            debug!(scraped, "All targets processed");
        }
        _ = tokio::signal::ctrl_c() => {
            warn!("Scraping interrupted by user");
        }
    }

    console::display_headlines(&session, args.display_limit);

    if session.is_empty() {
        info!("No headlines were found to save");
    } else if args.no_save {
        info!("--no-save given; skipping exports");
    } else {
        // Export failures are logged inside the writers and do not stop the run.
        let text_ok = text::write_text_report(&session, &args.text_output).await.is_ok();
        let csv_ok = csv::write_csv(&session, &args.csv_output).await.is_ok();
        if !(text_ok && csv_ok) {
            error!(text_ok, csv_ok, "One or more exports failed");
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        headlines = session.len(),
        urls_scraped = session.visited_count(),
        "Execution complete"
    );

    Ok(())
}
