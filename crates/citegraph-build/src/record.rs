//! Input record model (Semantic Scholar Graph API shapes)
//!
//! Fetched dumps are denormalized and sparse: any field may be `null`, and
//! list fields may contain `null` elements. The deserializers below turn
//! those into empty values so the builder only has to check presence.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

// === Null-handling deserializers ===

/// Deserialize null as empty Vec and drop null elements
fn null_to_empty_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<Option<T>>>::deserialize(deserializer)
        .map(|opt| opt.unwrap_or_default().into_iter().flatten().collect())
}

/// Deserialize an id that may arrive as a string or a number; blank is none
fn flexible_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match Option::<RawId>::deserialize(deserializer)? {
        Some(RawId::Text(s)) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Some(RawId::Number(n)) => Some(n.to_string()),
        None => None,
    })
}

pub const JOURNAL_ARTICLE: &str = "JournalArticle";
pub const CONFERENCE: &str = "Conference";

// === Paper ===

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperRecord {
    #[serde(default, deserialize_with = "flexible_id")]
    pub paper_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "abstract", default)]
    pub abstract_text: Option<String>,
    /// Free-text venue string, source of edition numbers
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "null_to_empty_vec")]
    pub publication_types: Vec<String>,
    #[serde(default)]
    pub publication_venue: Option<PublicationVenue>,
    #[serde(default)]
    pub journal: Option<JournalInfo>,
    #[serde(default, deserialize_with = "null_to_empty_vec")]
    pub authors: Vec<AuthorRef>,
    #[serde(default, deserialize_with = "null_to_empty_vec")]
    pub citations: Vec<CitationRef>,
    #[serde(default, deserialize_with = "null_to_empty_vec")]
    pub fields_of_study: Vec<String>,
    /// Remaining API fields, carried through `combine` untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl PaperRecord {
    pub fn has_type(&self, kind: &str) -> bool {
        self.publication_types.iter().any(|t| t == kind)
    }

    /// Journal-only article with a venue descriptor.
    pub fn is_journal_article(&self) -> bool {
        self.has_type(JOURNAL_ARTICLE)
            && !self.has_type(CONFERENCE)
            && self.publication_venue.is_some()
    }

    pub fn is_conference(&self) -> bool {
        self.has_type(CONFERENCE)
    }

    /// Trimmed, non-empty venue id.
    pub fn venue_id(&self) -> Option<&str> {
        self.publication_venue
            .as_ref()
            .and_then(|v| v.id.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Trimmed, non-empty journal volume label.
    pub fn volume(&self) -> Option<&str> {
        self.journal
            .as_ref()
            .and_then(|j| j.volume.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn pages(&self) -> Option<&str> {
        self.journal.as_ref().and_then(|j| j.pages.as_deref())
    }

    /// First listed author's id; `None` when the first author has no id.
    pub fn corresponding_author(&self) -> Option<&str> {
        self.authors.first().and_then(|a| a.author_id.as_deref())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublicationVenue {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub issn: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(rename = "type", default)]
    pub venue_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JournalInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "flexible_id")]
    pub volume: Option<String>,
    #[serde(default)]
    pub pages: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorRef {
    #[serde(default, deserialize_with = "flexible_id")]
    pub author_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitationRef {
    #[serde(default, deserialize_with = "flexible_id")]
    pub paper_id: Option<String>,
}

// === Author details ===

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorDetail {
    #[serde(default, deserialize_with = "flexible_id")]
    pub author_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_to_empty_vec")]
    pub affiliations: Vec<String>,
    #[serde(default)]
    pub h_index: Option<u32>,
}

// === Keywords and reviews ===

/// paperId → keywords
pub type PaperKeywords = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewEntry {
    #[serde(default, deserialize_with = "flexible_id")]
    pub author_id: Option<String>,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default)]
    pub vote: Option<String>,
}

/// paperId → reviews.
///
/// Accepts both the plain reviewer list (`{"p1": ["a1", "a2"]}`) and the
/// review metadata shape (`{"p1": {"reviewer_1": {"authorId": ..}}}`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaperReviews(pub BTreeMap<String, Vec<ReviewEntry>>);

impl<'de> Deserialize<'de> for PaperReviews {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(transparent)]
        struct ReviewerId(#[serde(deserialize_with = "flexible_id")] Option<String>);

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Reviewers {
            Ids(Vec<ReviewerId>),
            Detailed(BTreeMap<String, ReviewEntry>),
        }

        let raw = BTreeMap::<String, Reviewers>::deserialize(deserializer)?;
        let map = raw
            .into_iter()
            .map(|(paper_id, reviewers)| {
                let entries = match reviewers {
                    Reviewers::Ids(ids) => ids
                        .into_iter()
                        .map(|ReviewerId(author_id)| ReviewEntry {
                            author_id,
                            comments: None,
                            vote: None,
                        })
                        .collect(),
                    Reviewers::Detailed(by_slot) => by_slot.into_values().collect(),
                };
                (paper_id, entries)
            })
            .collect();
        Ok(Self(map))
    }
}

impl PaperReviews {
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<ReviewEntry>)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
