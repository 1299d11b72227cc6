//! Command-line interface definitions for the headline scraper.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! The agent identity can also be provided through the environment.

use crate::http::DEFAULT_USER_AGENT;
use crate::outputs::{DEFAULT_CSV_PATH, DEFAULT_TEXT_PATH};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Built-in demo targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// Quotes to Scrape demo site, using the `.text` selector
    Quotes,
    /// example.com, using heading tags only
    Example,
}

impl Preset {
    pub fn url(self) -> &'static str {
        match self {
            Preset::Quotes => "http://quotes.toscrape.com/",
            Preset::Example => "https://example.com",
        }
    }

    pub fn selectors(self) -> Vec<String> {
        let list: &[&str] = match self {
            Preset::Quotes => &[".text"],
            Preset::Example => &["h1", "h2", "h3"],
        };
        list.iter().map(|s| s.to_string()).collect()
    }
}

/// Command-line arguments for the headline scraper.
///
/// # Examples
///
/// ```sh
/// # Scrape one site with the default selector strategies
/// news_headlines https://lite.cnn.com
///
/// # Custom selectors, no files written
/// news_headlines text.npr.org -s h3 -s .title --no-save
///
/// # Demo site
/// news_headlines --preset quotes
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Pages to scrape, in order. `https://` is assumed when no scheme is given
    #[arg(required_unless_present = "preset")]
    pub urls: Vec<String>,

    /// Scrape a built-in demo site
    #[arg(long, value_enum)]
    pub preset: Option<Preset>,

    /// Selector to try, in priority order; replaces the default strategies
    #[arg(short, long = "selector")]
    pub selectors: Vec<String>,

    /// Identifying User-Agent, also used for robots.txt matching
    #[arg(short, long, env = "SCRAPER_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Path of the plain-text report
    #[arg(short, long, default_value = DEFAULT_TEXT_PATH)]
    pub text_output: PathBuf,

    /// Path of the CSV export
    #[arg(short, long, default_value = DEFAULT_CSV_PATH)]
    pub csv_output: PathBuf,

    /// Number of headlines printed to the console
    #[arg(short = 'l', long, default_value_t = 10)]
    pub display_limit: usize,

    /// Skip writing the report files
    #[arg(long)]
    pub no_save: bool,
}

impl Cli {
    /// The ordered `(url, selectors)` jobs for this run. Preset targets come
    /// first and carry their own selectors unless `--selector` was given.
    pub fn targets(&self) -> Vec<(String, Option<Vec<String>>)> {
        let custom = (!self.selectors.is_empty()).then(|| self.selectors.clone());
        let mut jobs = Vec::new();
        if let Some(preset) = self.preset {
            jobs.push((
                preset.url().to_string(),
                Some(custom.clone().unwrap_or_else(|| preset.selectors())),
            ));
        }
        jobs.extend(self.urls.iter().map(|u| (u.clone(), custom.clone())));
        jobs
    }
}
