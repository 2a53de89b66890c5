//! Edition number extraction from free-text conference venue strings
//!
//! Five token patterns are recognised. When several appear in one string,
//! the first pattern (in the priority order below) with a usable value wins;
//! within a pattern the leftmost occurrence wins.
//!
//! | Kind              | Example            | Value                   |
//! |-------------------|--------------------|-------------------------|
//! | `edition_x`       | `Edition 5`        | 5                       |
//! | `textual_ordinal` | `Twenty-First`     | 21                      |
//! | `ordinal`         | `3rd`              | 3                       |
//! | `apostrophe_year` | `'17`              | 2017 (century inferred) |
//! | `year`            | `2019`             | 2019                    |

use std::fmt;
use std::sync::LazyLock;

use chrono::Datelike;
use regex::{Captures, Regex};

// Pattern fragments. The venue normalizer strips the same tokens.
pub(crate) const YEAR: &str = r"\b\d{4}\b";
pub(crate) const ORDINAL: &str = r"(\d+)(?:st|nd|rd|th)\b";
pub(crate) const EDITION_X: &str = r"Edition\s+(\d+)";
pub(crate) const APOSTROPHE_YEAR: &str = r"['’](\d{2})\b";
pub(crate) const TEXTUAL_ORDINAL: &str = concat!(
    r"\b(First|Second|Third|Fourth|Fifth|Sixth|Seventh|Eighth|Ninth|Tenth|",
    r"Eleventh|Twelfth|Thirteenth|Fourteenth|Fifteenth|Sixteenth|Seventeenth|",
    r"Eighteenth|Nineteenth|Twentieth|",
    r"Twenty[- ]?First|Twenty[- ]?Second|Twenty[- ]?Third|Twenty[- ]?Fourth|",
    r"Twenty[- ]?Fifth|Twenty[- ]?Sixth|Twenty[- ]?Seventh|Twenty[- ]?Eighth|",
    r"Twenty[- ]?Ninth|Thirtieth)\b",
);

/// Ordinal words keyed by lower-case spelling with separators removed.
const ORDINAL_WORDS: &[(&str, u64)] = &[
    ("first", 1),
    ("second", 2),
    ("third", 3),
    ("fourth", 4),
    ("fifth", 5),
    ("sixth", 6),
    ("seventh", 7),
    ("eighth", 8),
    ("ninth", 9),
    ("tenth", 10),
    ("eleventh", 11),
    ("twelfth", 12),
    ("thirteenth", 13),
    ("fourteenth", 14),
    ("fifteenth", 15),
    ("sixteenth", 16),
    ("seventeenth", 17),
    ("eighteenth", 18),
    ("nineteenth", 19),
    ("twentieth", 20),
    ("twentyfirst", 21),
    ("twentysecond", 22),
    ("twentythird", 23),
    ("twentyfourth", 24),
    ("twentyfifth", 25),
    ("twentysixth", 26),
    ("twentyseventh", 27),
    ("twentyeighth", 28),
    ("twentyninth", 29),
    ("thirtieth", 30),
];

/// Value of an ordinal word such as `Twenty-First` or `twenty first`.
pub fn ordinal_word_value(word: &str) -> Option<u64> {
    let key: String = word
        .chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();
    ORDINAL_WORDS
        .iter()
        .find(|(w, _)| *w == key)
        .map(|(_, n)| *n)
}

/// Which token pattern produced an edition number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EditionKind {
    EditionX,
    TextualOrdinal,
    Ordinal,
    ApostropheYear,
    Year,
}

impl EditionKind {
    /// All kinds, highest priority first.
    pub const PRIORITY: [EditionKind; 5] = [
        Self::EditionX,
        Self::TextualOrdinal,
        Self::Ordinal,
        Self::ApostropheYear,
        Self::Year,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::EditionX => "edition_x",
            Self::TextualOrdinal => "textual_ordinal",
            Self::Ordinal => "ordinal",
            Self::ApostropheYear => "apostrophe_year",
            Self::Year => "year",
        }
    }

    fn pattern(self) -> &'static str {
        match self {
            Self::EditionX => EDITION_X,
            Self::TextualOrdinal => TEXTUAL_ORDINAL,
            Self::Ordinal => ORDINAL,
            Self::ApostropheYear => APOSTROPHE_YEAR,
            Self::Year => YEAR,
        }
    }

    /// Numeric value of one match, `None` when the token is unusable.
    fn value(self, caps: &Captures<'_>, reference_year: i32) -> Option<u64> {
        match self {
            Self::EditionX | Self::Ordinal => caps.get(1)?.as_str().parse().ok(),
            Self::TextualOrdinal => ordinal_word_value(caps.get(1)?.as_str()),
            Self::ApostropheYear => {
                let yy: u64 = caps.get(1)?.as_str().parse().ok()?;
                Some(expand_two_digit_year(yy, reference_year))
            }
            Self::Year => caps.get(0)?.as_str().parse().ok(),
        }
    }
}

impl fmt::Display for EditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Two-digit years up to one past the reference year's are 20xx, others 19xx.
pub fn expand_two_digit_year(yy: u64, reference_year: i32) -> u64 {
    let pivot = reference_year.rem_euclid(100) as u64 + 1;
    if yy <= pivot { 2000 + yy } else { 1900 + yy }
}

struct Matcher {
    kind: EditionKind,
    regex: Regex,
}

/// Case-insensitive matchers in priority order.
static MATCHERS: LazyLock<Vec<Matcher>> = LazyLock::new(|| {
    EditionKind::PRIORITY
        .iter()
        .map(|&kind| Matcher {
            kind,
            regex: Regex::new(&format!("(?i){}", kind.pattern())).expect("invalid edition pattern"),
        })
        .collect()
});

/// An extracted edition number and the token kind it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edition {
    pub kind: EditionKind,
    pub value: u64,
}

/// Detect the edition in `text`, resolving two-digit years against
/// `reference_year`.
pub fn detect_edition_at(text: &str, reference_year: i32) -> Option<Edition> {
    MATCHERS.iter().find_map(|m| {
        m.regex
            .captures_iter(text)
            .find_map(|caps| m.kind.value(&caps, reference_year))
            .map(|value| Edition {
                kind: m.kind,
                value,
            })
    })
}

/// Edition number of `text` resolved against `reference_year`.
pub fn extract_edition_at(text: &str, reference_year: i32) -> Option<u64> {
    detect_edition_at(text, reference_year).map(|e| e.value)
}

/// Edition number of `text`; two-digit years are resolved against the
/// current calendar year.
pub fn extract_edition(text: &str) -> Option<u64> {
    extract_edition_at(text, current_year())
}

pub fn current_year() -> i32 {
    chrono::Utc::now().year()
}
