//! Venue base-name normalization
//!
//! Strips every edition token (years, ordinals, `Edition N`, apostrophe
//! years, ordinal words) from a venue string so that all editions of one
//! conference series share a single base name.

use std::sync::LazyLock;

use regex::Regex;

use crate::edition::{APOSTROPHE_YEAR, EDITION_X, ORDINAL, TEXTUAL_ORDINAL, YEAR};

/// One alternation over all edition tokens, scanned left to right.
///
/// A single pass matters: in `Edition 2019` the `Edition N` branch consumes
/// the year, whereas sequential stripping would leave `Edition` behind.
static EDITION_TOKENS: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!("(?i){YEAR}|{ORDINAL}|{EDITION_X}|{APOSTROPHE_YEAR}|{TEXTUAL_ORDINAL}");
    Regex::new(&pattern).expect("invalid edition token pattern")
});

static MULTI_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("invalid whitespace pattern"));

fn is_edge_punct(c: char) -> bool {
    matches!(c, ' ' | ',' | '-')
}

/// Base name of a venue string.
///
/// Edition tokens are removed, whitespace runs collapse to one space, and
/// leading/trailing spaces, commas and hyphens are trimmed. Interior
/// punctuation is kept.
pub fn normalize_venue(name: &str) -> String {
    let stripped = EDITION_TOKENS.replace_all(name, "");
    let collapsed = MULTI_SPACE.replace_all(&stripped, " ");
    collapsed.trim_matches(is_edge_punct).trim().to_string()
}
