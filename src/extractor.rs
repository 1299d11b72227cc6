//! Headline extraction from page markup.
//!
//! Extraction runs an ordered table of selector strategies over the parsed
//! document. Each strategy is evaluated independently: a strategy that fails
//! is logged and skipped, and the remaining ones still run.
//!
//! # Default Strategies
//!
//! | Order | Selector | Kind |
//! |-------|----------|------|
//! | 1-3 | `h1`, `h2`, `h3` | Heading tags |
//! | 4-7 | `.headline`, `.title`, `.news-title`, `.article-title` | Class names |
//! | 8-9 | `[class*="headline"]`, `[class*="title"]` | Class substrings |
//!
//! # Deduplication
//!
//! Duplicates are removed twice. Each strategy keeps only the first element
//! per distinct text, so its reported count reflects distinct headlines. After
//! all strategies have run, the combined list is collapsed again so each text
//! appears once, keeping the record from the earliest strategy.

use crate::errors::SelectorError;
use crate::models::HeadlineRecord;
use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};

/// Shortest accepted headline, in characters.
pub const MIN_HEADLINE_CHARS: usize = 11;
/// Longest accepted headline, in characters.
pub const MAX_HEADLINE_CHARS: usize = 199;

/// Selectors tried when the caller supplies none, in priority order.
pub const DEFAULT_SELECTORS: [&str; 9] = [
    "h1",
    "h2",
    "h3",
    ".headline",
    ".title",
    ".news-title",
    ".article-title",
    r#"[class*="headline"]"#,
    r#"[class*="title"]"#,
];

static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());

/// A named query used to locate candidate headline elements.
///
/// The strategy's tag is the selector string itself, and is recorded on every
/// [`HeadlineRecord`] it produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorStrategy {
    selector: String,
}

impl SelectorStrategy {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.selector
    }

    /// Run this strategy against `document`.
    ///
    /// Returns one record per distinct accepted text, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError`] when the selector cannot be parsed.
    pub fn evaluate(&self, document: &Html) -> Result<Vec<HeadlineRecord>, SelectorError> {
        let selector = Selector::parse(&self.selector).map_err(|e| SelectorError {
            selector: self.selector.clone(),
            reason: e.to_string(),
        })?;

        let mut seen = HashSet::new();
        let mut records = Vec::new();
        let mut matched = 0usize;

        for element in document.select(&selector) {
            matched += 1;
            let text = element_text(&element);
            if !is_headline_length(&text) || seen.contains(&text) {
                continue;
            }
            let link = resolve_link(&element);
            seen.insert(text.clone());
            records.push(HeadlineRecord::new(text, link, self.selector.as_str()));
        }

        debug!(
            selector = %self.selector,
            matched,
            kept = records.len(),
            "Evaluated selector strategy"
        );
        Ok(records)
    }
}

/// The built-in strategy table.
pub fn default_strategies() -> Vec<SelectorStrategy> {
    DEFAULT_SELECTORS.iter().copied().map(SelectorStrategy::new).collect()
}

/// Build a strategy table from caller-supplied selectors, falling back to
/// [`default_strategies`] when none are given.
pub fn strategies_for(selectors: Option<&[String]>) -> Vec<SelectorStrategy> {
    match selectors {
        Some(list) if !list.is_empty() => list.iter().map(SelectorStrategy::new).collect(),
        _ => default_strategies(),
    }
}

/// Extract candidate headlines from `markup`.
///
/// `selectors` overrides the default strategy table. The result holds each
/// distinct text once, ordered by first discovery across the strategy list.
#[instrument(level = "info", skip_all, fields(bytes = markup.len()))]
pub fn extract_headlines(markup: &str, selectors: Option<&[String]>) -> Vec<HeadlineRecord> {
    run_strategies(markup, &strategies_for(selectors))
}

/// Run an explicit strategy table over `markup`.
pub fn run_strategies(markup: &str, strategies: &[SelectorStrategy]) -> Vec<HeadlineRecord> {
    if markup.trim().is_empty() {
        return Vec::new();
    }
    let document = Html::parse_document(markup);

    let mut candidates = Vec::new();
    for strategy in strategies {
        match strategy.evaluate(&document) {
            Ok(records) => {
                if !records.is_empty() {
                    info!(
                        selector = %strategy.tag(),
                        count = records.len(),
                        "Found headlines with selector"
                    );
                }
                candidates.extend(records);
            }
            Err(e) => {
                warn!(selector = %strategy.tag(), error = %e, "Skipping selector strategy");
            }
        }
    }

    let total = candidates.len();
    let unique: Vec<HeadlineRecord> = candidates
        .into_iter()
        .unique_by(|r| r.text().to_string())
        .collect();
    info!(candidates = total, unique = unique.len(), "Total unique headlines found");
    unique
}

/// Trimmed text content of an element.
fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn is_headline_length(text: &str) -> bool {
    (MIN_HEADLINE_CHARS..=MAX_HEADLINE_CHARS).contains(&text.chars().count())
}

/// `href` of the first descendant anchor, else of the nearest enclosing
/// anchor. The value is returned verbatim.
fn resolve_link(element: &ElementRef<'_>) -> Option<String> {
    let anchor = element.select(&ANCHOR).next().or_else(|| {
        element
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|a| a.value().name() == "a")
    })?;
    anchor.value().attr("href").map(str::to_string)
}
