//! Console listing of accumulated headlines.

use super::RULE;
use crate::session::SessionState;
use std::fmt::Write;

/// Render up to `limit` headlines from `session` for the terminal.
pub fn render_listing(session: &SessionState, limit: usize) -> String {
    let mut out = String::new();
    if session.is_empty() {
        writeln!(out, "No headlines found to display").unwrap();
        return out;
    }

    let shown = limit.min(session.len());
    writeln!(out, "\nSCRAPED HEADLINES (Showing {} of {})", shown, session.len()).unwrap();
    writeln!(out, "{RULE}").unwrap();

    for (i, headline) in session.headlines().iter().take(shown).enumerate() {
        writeln!(out, "\n{}. {}", i + 1, headline.text()).unwrap();
        if let Some(link) = headline.link() {
            writeln!(out, "   Link: {link}").unwrap();
        }
        writeln!(out, "   Scraped at: {}", headline.timestamp()).unwrap();
    }
    out
}

/// Print up to `limit` headlines to stdout.
pub fn display_headlines(session: &SessionState, limit: usize) {
    print!("{}", render_listing(session, limit));
}
