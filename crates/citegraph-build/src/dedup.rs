//! Node and edge tables with surrogate-key deduplication
//!
//! [`GraphBuilder::build`] walks the paper records once per table family and
//! produces [`GraphTables`]: every derived entity (volume, edition,
//! keyword, affiliation) receives exactly one surrogate id per distinct
//! key, and every relation list is free of duplicate pairs.
//!
//! Conference editions are resolved in two branches:
//!
//! 1. papers whose venue string yields an edition number are grouped by
//!    `(base name, edition)`, one location per group;
//! 2. the rest are grouped by `(year, base name)` in ascending order and
//!    numbered synthetically: the first group of a base name is edition
//!    [`FALLBACK_FIRST_EDITION`], each later group of that base name +1.

use std::collections::{BTreeMap, BTreeSet};
use std::hash::Hash;

use rustc_hash::{FxHashMap, FxHashSet};

use citegraph_core::clean_field;

use crate::edition::{self, Edition};
use crate::record::{AuthorDetail, PaperKeywords, PaperRecord, PaperReviews};
use crate::stats::BuildStats;
use crate::synth::CityPicker;
use crate::venue::normalize_venue;

/// Synthetic edition number of the first unnumbered group of a venue.
pub const FALLBACK_FIRST_EDITION: u64 = 3;

// === Id and location sources ===

/// Mints surrogate ids.
pub trait IdSource {
    fn next_id(&mut self) -> String;
}

/// Random UUID v4 ids.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl IdSource for UuidIds {
    fn next_id(&mut self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// `prefix1`, `prefix2`, ... for reproducible output.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

/// Picks the location of a conference edition.
pub trait LocationSource {
    fn pick_location(&mut self) -> String;
}

impl<F: FnMut() -> String> LocationSource for F {
    fn pick_location(&mut self) -> String {
        self()
    }
}

// === Keys ===

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VolumeKey {
    pub journal_id: String,
    pub year: i32,
    pub number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EditionKey {
    pub venue_id: String,
    pub edition: u64,
    pub location: String,
    pub year: Option<i32>,
}

// === Nodes ===

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperNode {
    pub paper_id: String,
    pub url: String,
    pub title: String,
    pub abstract_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorNode {
    pub author_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalNode {
    pub journal_id: String,
    pub name: String,
    pub issn: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeNode {
    pub volume_id: String,
    pub key: VolumeKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Conference,
    Workshop,
}

impl EventKind {
    /// `Workshop` when the venue name mentions a workshop.
    pub fn from_name(name: &str) -> Self {
        if name.to_lowercase().contains("workshop") {
            Self::Workshop
        } else {
            Self::Conference
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Conference => "Conference",
            Self::Workshop => "Workshop",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventNode {
    pub event_id: String,
    pub name: String,
    pub issn: String,
    pub url: String,
    pub kind: EventKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditionNode {
    pub edition_id: String,
    pub key: EditionKey,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordNode {
    pub keyword_id: String,
    pub keyword: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffiliationNode {
    pub aff_id: String,
    pub name: String,
}

// === Edges ===

/// Directed pair of node ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Link {
    pub from: String,
    pub to: String,
}

/// Paper placed in a volume or edition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub paper_id: String,
    pub container_id: String,
    pub pages: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRow {
    pub author_id: String,
    pub paper_id: String,
    pub comments: Option<String>,
    pub vote: Option<String>,
}

/// Resolved edition of one conference paper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperEdition {
    pub paper_id: String,
    pub base_name: String,
    pub edition: u64,
    /// Extracted from the venue string (`Some`) or numbered synthetically
    pub extracted: Option<Edition>,
    pub location: String,
    pub year: Option<i32>,
    pub venue_id: String,
    pub edition_id: String,
}

/// All node and edge tables of one build.
#[derive(Debug, Default)]
pub struct GraphTables {
    pub papers: Vec<PaperNode>,
    pub authors: Vec<AuthorNode>,
    pub journals: Vec<JournalNode>,
    pub volumes: Vec<VolumeNode>,
    pub events: Vec<EventNode>,
    pub editions: Vec<EditionNode>,
    pub keywords: Vec<KeywordNode>,
    pub affiliations: Vec<AffiliationNode>,
    /// author → paper
    pub wrote: Vec<Link>,
    /// paper → first author
    pub corresponded_by: Vec<Link>,
    /// paper → citing paper
    pub cited_in: Vec<Link>,
    pub published_in_volume: Vec<Placement>,
    pub published_in_edition: Vec<Placement>,
    /// journal → volume
    pub journal_has_volume: Vec<Link>,
    /// event → edition
    pub event_has_edition: Vec<Link>,
    /// paper → keyword
    pub related_to: Vec<Link>,
    /// author → paper
    pub reviewed: Vec<Link>,
    pub reviews: Vec<ReviewRow>,
    /// author → affiliation
    pub affiliated_with: Vec<Link>,
    pub paper_editions: Vec<PaperEdition>,
    pub stats: BuildStats,
}

impl GraphTables {
    pub fn volume_id(&self, key: &VolumeKey) -> Option<&str> {
        self.volumes
            .iter()
            .find(|v| &v.key == key)
            .map(|v| v.volume_id.as_str())
    }

    pub fn affiliation_id(&self, name: &str) -> Option<&str> {
        self.affiliations
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.aff_id.as_str())
    }

    pub fn keyword_id(&self, keyword: &str) -> Option<&str> {
        self.keywords
            .iter()
            .find(|k| k.keyword == keyword)
            .map(|k| k.keyword_id.as_str())
    }

    pub fn paper_edition(&self, paper_id: &str) -> Option<&PaperEdition> {
        self.paper_editions.iter().find(|e| e.paper_id == paper_id)
    }
}

/// Borrowed build inputs.
#[derive(Debug, Clone, Copy)]
pub struct GraphInput<'a> {
    pub papers: &'a [PaperRecord],
    pub authors: &'a [AuthorDetail],
    pub keywords: &'a PaperKeywords,
    pub reviews: &'a PaperReviews,
}

// === Dedup helpers ===

/// Key → surrogate id, minting on first sight.
struct Interner<K> {
    ids: FxHashMap<K, String>,
}

impl<K: Hash + Eq> Interner<K> {
    fn new() -> Self {
        Self {
            ids: FxHashMap::default(),
        }
    }

    /// Id of `key` and whether it was minted by this call.
    fn intern(&mut self, key: K, source: &mut impl IdSource) -> (String, bool) {
        if let Some(id) = self.ids.get(&key) {
            return (id.clone(), false);
        }
        let id = source.next_id();
        self.ids.insert(key, id.clone());
        (id, true)
    }
}

/// Insertion-ordered unique links.
#[derive(Default)]
struct LinkSet {
    seen: FxHashSet<Link>,
    links: Vec<Link>,
}

impl LinkSet {
    fn insert(&mut self, from: &str, to: &str) -> bool {
        let link = Link {
            from: from.to_string(),
            to: to.to_string(),
        };
        if self.seen.contains(&link) {
            return false;
        }
        self.seen.insert(link.clone());
        self.links.push(link);
        true
    }

    fn into_vec(self) -> Vec<Link> {
        self.links
    }
}

fn text(value: Option<&str>) -> String {
    value.map(clean_field).unwrap_or_default()
}

// === Builder ===

/// Builds [`GraphTables`] from paper records and side inputs.
pub struct GraphBuilder<I = UuidIds, L = CityPicker> {
    ids: I,
    locations: L,
    reference_year: i32,
    avoid_collisions: bool,
}

impl GraphBuilder<UuidIds, CityPicker> {
    /// UUID ids and seeded city locations.
    pub fn new(seed: u64) -> Self {
        Self::with_sources(UuidIds, CityPicker::seeded(seed))
    }
}

impl<I: IdSource, L: LocationSource> GraphBuilder<I, L> {
    pub fn with_sources(ids: I, locations: L) -> Self {
        Self {
            ids,
            locations,
            reference_year: edition::current_year(),
            avoid_collisions: false,
        }
    }

    /// Year against which two-digit apostrophe years are resolved.
    pub fn reference_year(mut self, year: i32) -> Self {
        self.reference_year = year;
        self
    }

    /// Skip synthetic edition numbers already taken by an extracted edition
    /// of the same base name.
    pub fn avoid_edition_collisions(mut self, enabled: bool) -> Self {
        self.avoid_collisions = enabled;
        self
    }

    pub fn build(&mut self, input: &GraphInput<'_>) -> GraphTables {
        let mut tables = GraphTables::default();
        let papers = unique_papers(input.papers, &mut tables.stats);

        add_papers(&papers, &mut tables);
        add_authorship(&papers, &mut tables);
        add_citations(&papers, &mut tables);
        self.add_journals(&papers, &mut tables);
        add_events(&papers, &mut tables);
        self.add_editions(&papers, &mut tables);
        self.add_keywords(input.keywords, &mut tables);
        add_reviews(input.reviews, &mut tables);
        self.add_affiliations(input.authors, &mut tables);

        log::debug!("Build stats: {:?}", tables.stats);
        tables
    }

    fn add_journals(&mut self, papers: &[(&str, &PaperRecord)], t: &mut GraphTables) {
        let mut journals = FxHashSet::default();
        let mut volumes = Interner::new();
        let mut has_volume = LinkSet::default();
        let mut placed = FxHashSet::default();

        for &(paper_id, paper) in papers.iter().filter(|(_, p)| p.is_journal_article()) {
            t.stats.journal_papers += 1;
            let Some(journal_id) = paper.venue_id() else {
                t.stats.volumes_incomplete += 1;
                log::debug!("{paper_id}: journal paper without venue id");
                continue;
            };

            if journals.insert(journal_id.to_string()) {
                let venue = paper.publication_venue.as_ref();
                t.journals.push(JournalNode {
                    journal_id: journal_id.to_string(),
                    name: text(venue.and_then(|v| v.name.as_deref())),
                    issn: text(venue.and_then(|v| v.issn.as_deref())),
                    url: text(venue.and_then(|v| v.url.as_deref())),
                });
            }

            let (Some(year), Some(number)) = (paper.year, paper.volume()) else {
                t.stats.volumes_incomplete += 1;
                log::debug!("{paper_id}: journal paper without year or volume");
                continue;
            };
            let key = VolumeKey {
                journal_id: journal_id.to_string(),
                year,
                number: number.to_string(),
            };
            let (volume_id, minted) = volumes.intern(key.clone(), &mut self.ids);
            if minted {
                t.volumes.push(VolumeNode {
                    volume_id: volume_id.clone(),
                    key,
                });
            }
            has_volume.insert(journal_id, &volume_id);
            if placed.insert((paper_id, volume_id.clone())) {
                t.published_in_volume.push(Placement {
                    paper_id: paper_id.to_string(),
                    container_id: volume_id,
                    pages: paper.pages().map(str::to_string),
                });
            }
        }
        t.journal_has_volume = has_volume.into_vec();
    }

    fn add_editions(&mut self, papers: &[(&str, &PaperRecord)], t: &mut GraphTables) {
        struct Pending<'a> {
            paper_id: &'a str,
            paper: &'a PaperRecord,
            base_name: String,
            extracted: Option<Edition>,
        }

        let pending: Vec<Pending<'_>> = papers
            .iter()
            .filter(|(_, p)| p.is_conference())
            .map(|&(paper_id, paper)| {
                let venue = paper.venue.as_deref().unwrap_or_default();
                Pending {
                    paper_id,
                    paper,
                    base_name: normalize_venue(venue),
                    extracted: edition::detect_edition_at(venue, self.reference_year),
                }
            })
            .collect();
        t.stats.conference_papers += pending.len();

        // (edition, location) per pending paper
        let mut resolved: Vec<Option<(u64, String)>> = vec![None; pending.len()];

        let mut matched: BTreeMap<(&str, u64), Vec<usize>> = BTreeMap::new();
        let mut unmatched: BTreeMap<(i32, &str), Vec<usize>> = BTreeMap::new();
        for (idx, p) in pending.iter().enumerate() {
            match (p.extracted, p.paper.year) {
                (Some(e), _) => matched.entry((&p.base_name, e.value)).or_default().push(idx),
                (None, Some(year)) => unmatched.entry((year, &p.base_name)).or_default().push(idx),
                (None, None) => {
                    t.stats.editions_unresolved += 1;
                    log::debug!("{}: no edition and no year", p.paper_id);
                }
            }
        }

        for (&(_, number), members) in &matched {
            let location = self.locations.pick_location();
            for &idx in members {
                resolved[idx] = Some((number, location.clone()));
            }
        }

        let taken: BTreeSet<(&str, u64)> = matched.keys().copied().collect();
        let mut last_number: FxHashMap<&str, u64> = FxHashMap::default();
        for (&(_, base_name), members) in &unmatched {
            let mut number = match last_number.get(base_name) {
                Some(n) => n + 1,
                None => FALLBACK_FIRST_EDITION,
            };
            if self.avoid_collisions {
                while taken.contains(&(base_name, number)) {
                    number += 1;
                }
            }
            last_number.insert(base_name, number);

            let location = self.locations.pick_location();
            for &idx in members {
                resolved[idx] = Some((number, location.clone()));
            }
        }

        let mut editions = Interner::new();
        let mut has_edition = LinkSet::default();
        let mut placed = FxHashSet::default();
        for (p, resolution) in pending.iter().zip(resolved) {
            let Some((number, location)) = resolution else {
                continue;
            };
            let Some(venue_id) = p.paper.venue_id() else {
                t.stats.conference_without_venue += 1;
                log::debug!("{}: conference paper without venue id", p.paper_id);
                continue;
            };
            if p.extracted.is_some() {
                t.stats.editions_extracted += 1;
            } else {
                t.stats.editions_synthetic += 1;
            }

            let key = EditionKey {
                venue_id: venue_id.to_string(),
                edition: number,
                location: location.clone(),
                year: p.paper.year,
            };
            let (edition_id, minted) = editions.intern(key.clone(), &mut self.ids);
            if minted {
                t.editions.push(EditionNode {
                    edition_id: edition_id.clone(),
                    key,
                });
            }
            has_edition.insert(venue_id, &edition_id);

            let pages = p.paper.pages().map(str::to_string);
            if placed.insert((p.paper_id, edition_id.clone(), pages.clone())) {
                t.published_in_edition.push(Placement {
                    paper_id: p.paper_id.to_string(),
                    container_id: edition_id.clone(),
                    pages,
                });
            }

            t.paper_editions.push(PaperEdition {
                paper_id: p.paper_id.to_string(),
                base_name: p.base_name.clone(),
                edition: number,
                extracted: p.extracted,
                location,
                year: p.paper.year,
                venue_id: venue_id.to_string(),
                edition_id,
            });
        }
        t.event_has_edition = has_edition.into_vec();
    }

    fn add_keywords(&mut self, keywords: &PaperKeywords, t: &mut GraphTables) {
        let mut distinct = BTreeSet::new();
        for kw in keywords.values().flatten() {
            let normalized = kw.trim().to_lowercase();
            if normalized.is_empty() {
                t.stats.blank_keywords += 1;
            } else {
                distinct.insert(normalized);
            }
        }

        let mut ids: FxHashMap<String, String> = FxHashMap::default();
        for keyword in distinct {
            let keyword_id = self.ids.next_id();
            ids.insert(keyword.clone(), keyword_id.clone());
            t.keywords.push(KeywordNode {
                keyword_id,
                keyword,
            });
        }

        let mut related = LinkSet::default();
        for (paper_id, kws) in keywords {
            for kw in kws {
                if let Some(keyword_id) = ids.get(&kw.trim().to_lowercase()) {
                    related.insert(paper_id, keyword_id);
                }
            }
        }
        t.related_to = related.into_vec();
    }

    fn add_affiliations(&mut self, authors: &[AuthorDetail], t: &mut GraphTables) {
        let mut affiliations = Interner::new();
        let mut affiliated = LinkSet::default();
        for author in authors {
            let Some(author_id) = author.author_id.as_deref() else {
                t.stats.authors_without_id += 1;
                continue;
            };
            for raw in &author.affiliations {
                let name = raw.trim();
                if name.is_empty() {
                    t.stats.blank_affiliations += 1;
                    continue;
                }
                let (aff_id, minted) = affiliations.intern(name.to_string(), &mut self.ids);
                if minted {
                    t.affiliations.push(AffiliationNode {
                        aff_id: aff_id.clone(),
                        name: name.to_string(),
                    });
                }
                affiliated.insert(author_id, &aff_id);
            }
        }
        t.affiliated_with = affiliated.into_vec();
    }
}

/// Papers with an id, first occurrence of each id only.
fn unique_papers<'a>(papers: &'a [PaperRecord], stats: &mut BuildStats) -> Vec<(&'a str, &'a PaperRecord)> {
    let mut seen = FxHashSet::default();
    let mut out = Vec::with_capacity(papers.len());
    for paper in papers {
        stats.papers_in += 1;
        let Some(paper_id) = paper.paper_id.as_deref() else {
            stats.papers_without_id += 1;
            continue;
        };
        if seen.insert(paper_id) {
            out.push((paper_id, paper));
        } else {
            stats.duplicate_papers += 1;
        }
    }
    out
}

fn add_papers(papers: &[(&str, &PaperRecord)], t: &mut GraphTables) {
    t.papers = papers
        .iter()
        .map(|&(paper_id, p)| PaperNode {
            paper_id: clean_field(paper_id),
            url: text(p.url.as_deref()),
            title: text(p.title.as_deref()),
            abstract_text: text(p.abstract_text.as_deref()),
        })
        .collect();
}

fn add_authorship(papers: &[(&str, &PaperRecord)], t: &mut GraphTables) {
    let mut authors = FxHashSet::default();
    let mut wrote = LinkSet::default();
    for &(paper_id, paper) in papers {
        for author in &paper.authors {
            let Some(author_id) = author.author_id.as_deref() else {
                t.stats.authors_without_id += 1;
                continue;
            };
            if authors.insert(author_id) {
                t.authors.push(AuthorNode {
                    author_id: author_id.to_string(),
                    name: text(author.name.as_deref()),
                });
            }
            wrote.insert(author_id, paper_id);
        }
        if let Some(author_id) = paper.corresponding_author() {
            t.corresponded_by.push(Link {
                from: paper_id.to_string(),
                to: author_id.to_string(),
            });
        }
    }
    t.wrote = wrote.into_vec();
}

/// One row per citation entry; repeated entries are kept.
fn add_citations(papers: &[(&str, &PaperRecord)], t: &mut GraphTables) {
    for &(paper_id, paper) in papers {
        for citation in &paper.citations {
            match citation.paper_id.as_deref() {
                Some(citing) => t.cited_in.push(Link {
                    from: paper_id.to_string(),
                    to: citing.to_string(),
                }),
                None => t.stats.citations_without_id += 1,
            }
        }
    }
}

fn add_events(papers: &[(&str, &PaperRecord)], t: &mut GraphTables) {
    let mut events = FxHashSet::default();
    for (_, paper) in papers.iter().filter(|(_, p)| p.is_conference()) {
        let (Some(venue), Some(event_id)) = (paper.publication_venue.as_ref(), paper.venue_id())
        else {
            continue;
        };
        if events.insert(event_id) {
            let name = text(venue.name.as_deref());
            t.events.push(EventNode {
                event_id: event_id.to_string(),
                kind: EventKind::from_name(&name),
                name,
                issn: text(venue.issn.as_deref()),
                url: text(venue.url.as_deref()),
            });
        }
    }
}

fn add_reviews(reviews: &PaperReviews, t: &mut GraphTables) {
    let mut reviewed = LinkSet::default();
    for (paper_id, entries) in reviews.iter() {
        for entry in entries {
            let Some(author_id) = entry.author_id.as_deref() else {
                t.stats.reviews_without_id += 1;
                continue;
            };
            if reviewed.insert(author_id, paper_id) && (entry.comments.is_some() || entry.vote.is_some()) {
                t.reviews.push(ReviewRow {
                    author_id: author_id.to_string(),
                    paper_id: paper_id.clone(),
                    comments: entry.comments.as_deref().map(clean_field),
                    vote: entry.vote.clone(),
                });
            }
        }
    }
    t.reviewed = reviewed.into_vec();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edition::EditionKind;
    use crate::record::ReviewEntry;

    const REF_YEAR: i32 = 2025;

    fn paper(json: serde_json::Value) -> PaperRecord {
        serde_json::from_value(json).unwrap()
    }

    fn conference(id: &str, venue: &str, venue_id: Option<&str>, year: Option<i32>) -> PaperRecord {
        paper(serde_json::json!({
            "paperId": id,
            "venue": venue,
            "year": year,
            "publicationTypes": ["Conference"],
            "publicationVenue": venue_id.map(|v| serde_json::json!({"id": v, "name": venue})),
            "journal": {"pages": "1-10"},
        }))
    }

    fn journal(id: &str, journal_id: &str, year: i32, volume: &str) -> PaperRecord {
        paper(serde_json::json!({
            "paperId": id,
            "year": year,
            "publicationTypes": ["JournalArticle"],
            "publicationVenue": {"id": journal_id, "name": "J", "issn": "1234-5678"},
            "journal": {"volume": volume, "pages": "5-9"},
        }))
    }

    fn counter_locations() -> impl FnMut() -> String {
        let mut n = 0;
        move || {
            n += 1;
            format!("city{n}")
        }
    }

    fn builder() -> GraphBuilder<SequentialIds, impl FnMut() -> String> {
        GraphBuilder::with_sources(SequentialIds::new("id"), counter_locations()).reference_year(REF_YEAR)
    }

    struct Fixture {
        keywords: PaperKeywords,
        reviews: PaperReviews,
        authors: Vec<AuthorDetail>,
    }

    impl Fixture {
        fn empty() -> Self {
            Self {
                keywords: PaperKeywords::new(),
                reviews: PaperReviews::default(),
                authors: Vec::new(),
            }
        }

        fn input<'a>(&'a self, papers: &'a [PaperRecord]) -> GraphInput<'a> {
            GraphInput {
                papers,
                authors: &self.authors,
                keywords: &self.keywords,
                reviews: &self.reviews,
            }
        }
    }

    fn build(papers: &[PaperRecord]) -> GraphTables {
        let f = Fixture::empty();
        builder().build(&f.input(papers))
    }

    #[test]
    fn sequential_ids() {
        let mut ids = SequentialIds::new("v");
        assert_eq!(ids.next_id(), "v1");
        assert_eq!(ids.next_id(), "v2");
    }

    #[test]
    fn uuid_ids_are_distinct() {
        let mut ids = UuidIds;
        assert_ne!(ids.next_id(), ids.next_id());
    }

    #[test]
    fn event_kind_from_name() {
        assert_eq!(EventKind::from_name("Intl. WORKSHOP on Graphs"), EventKind::Workshop);
        assert_eq!(EventKind::from_name("VLDB"), EventKind::Conference);
    }

    #[test]
    fn duplicate_and_idless_papers_dropped() {
        let p = conference("p1", "VLDB 2019", Some("v"), Some(2019));
        let no_id = paper(serde_json::json!({"title": "orphan"}));
        let t = build(&[p.clone(), p, no_id]);
        assert_eq!(t.papers.len(), 1);
        assert_eq!(t.stats.duplicate_papers, 1);
        assert_eq!(t.stats.papers_without_id, 1);
    }

    #[test]
    fn paper_text_cleaned() {
        let p = paper(serde_json::json!({
            "paperId": "p1",
            "title": " A \"quoted\"\ntitle ",
            "abstract": null,
        }));
        let t = build(&[p]);
        assert_eq!(t.papers[0].title, "A 'quoted' title");
        assert_eq!(t.papers[0].abstract_text, "");
    }

    #[test]
    fn authorship_pairs_unique() {
        let p = paper(serde_json::json!({
            "paperId": "p1",
            "authors": [
                {"authorId": "a1", "name": "Ann"},
                {"authorId": "a1", "name": "Ann"},
                {"authorId": null, "name": "Ghost"},
                {"authorId": "a2", "name": "Bob"},
            ],
        }));
        let t = build(&[p]);
        assert_eq!(t.wrote.len(), 2);
        assert_eq!(t.authors.len(), 2);
        assert_eq!(t.stats.authors_without_id, 1);
        assert_eq!(
            t.corresponded_by,
            vec![Link {
                from: "p1".into(),
                to: "a1".into()
            }]
        );
    }

    #[test]
    fn corresponding_author_requires_first_author_id() {
        let p = paper(serde_json::json!({
            "paperId": "p1",
            "authors": [{"authorId": null}, {"authorId": "a2"}],
        }));
        assert!(build(&[p]).corresponded_by.is_empty());
    }

    #[test]
    fn citations_skip_null_ids() {
        let p = paper(serde_json::json!({
            "paperId": "p1",
            "citations": [{"paperId": "c1"}, {"paperId": null}, {"paperId": "c2"}],
        }));
        let t = build(&[p]);
        assert_eq!(t.cited_in.len(), 2);
        assert_eq!(t.cited_in[0].to, "c1");
        assert_eq!(t.stats.citations_without_id, 1);
    }

    #[test]
    fn repeated_citation_entries_each_emit_a_row() {
        let p = paper(serde_json::json!({
            "paperId": "p1",
            "citations": [{"paperId": "c1"}, {"paperId": "c1"}],
        }));
        let t = build(&[p]);
        assert_eq!(t.cited_in.len(), 2);
        assert!(t.cited_in.iter().all(|l| l.from == "p1" && l.to == "c1"));
    }

    #[test]
    fn one_volume_id_per_key() {
        let papers = [
            journal("p1", "j1", 2020, "12"),
            journal("p2", "j1", 2020, " 12 "),
            journal("p3", "j1", 2021, "13"),
            journal("p4", "j2", 2020, "12"),
        ];
        let t = build(&papers);
        assert_eq!(t.volumes.len(), 3);
        assert_eq!(t.journals.len(), 2);
        assert_eq!(t.published_in_volume.len(), 4);
        assert_eq!(t.published_in_volume[0].container_id, t.published_in_volume[1].container_id);
        assert_eq!(t.journal_has_volume.len(), 3);

        let key = VolumeKey {
            journal_id: "j1".into(),
            year: 2020,
            number: "12".into(),
        };
        assert_eq!(t.volume_id(&key), Some(t.published_in_volume[0].container_id.as_str()));
        assert_eq!(t.published_in_volume[0].pages.as_deref(), Some("5-9"));
    }

    #[test]
    fn incomplete_volumes_skipped() {
        let mut no_volume = journal("p1", "j1", 2020, "");
        no_volume.journal.as_mut().unwrap().volume = None;
        let mut no_year = journal("p2", "j1", 2020, "4");
        no_year.year = None;
        let t = build(&[no_volume, no_year]);
        assert!(t.volumes.is_empty());
        assert_eq!(t.journals.len(), 1);
        assert_eq!(t.stats.volumes_incomplete, 2);
    }

    #[test]
    fn conference_papers_are_not_journals() {
        let mut p = journal("p1", "j1", 2020, "4");
        p.publication_types.push("Conference".into());
        let t = build(&[p]);
        assert!(t.journals.is_empty());
        assert_eq!(t.events.len(), 1);
    }

    #[test]
    fn matched_editions_share_group() {
        let papers = [
            conference("p1", "3rd Workshop on X, 2019", Some("v1"), Some(2019)),
            conference("p2", "Third Workshop on X", Some("v1"), Some(2019)),
            conference("p3", "4th Workshop on X", Some("v1"), Some(2020)),
        ];
        let t = build(&papers);
        let e1 = t.paper_edition("p1").unwrap();
        let e2 = t.paper_edition("p2").unwrap();
        let e3 = t.paper_edition("p3").unwrap();
        assert_eq!(e1.base_name, "Workshop on X");
        assert_eq!((e1.edition, e2.edition, e3.edition), (3, 3, 4));
        assert_eq!(e1.location, e2.location);
        assert_ne!(e1.location, e3.location);
        assert_eq!(e1.edition_id, e2.edition_id);
        assert_eq!(e1.extracted.map(|e| e.kind), Some(EditionKind::Ordinal));
        assert_eq!(e2.extracted.map(|e| e.kind), Some(EditionKind::TextualOrdinal));
        assert_eq!(t.editions.len(), 2);
        assert_eq!(t.event_has_edition.len(), 2);
        assert_eq!(t.events[0].kind, EventKind::Workshop);
    }

    #[test]
    fn fallback_numbers_ascend_by_year() {
        let papers = [
            conference("p3", "Data Days", Some("v"), Some(2021)),
            conference("p1", "Data Days", Some("v"), Some(2019)),
            conference("p2", "Data Days", Some("v"), Some(2020)),
            conference("p4", "Data Days", Some("v"), Some(2019)),
        ];
        let t = build(&papers);
        let ed = |id: &str| t.paper_edition(id).unwrap().edition;
        assert_eq!(ed("p1"), 3);
        assert_eq!(ed("p4"), 3);
        assert_eq!(ed("p2"), 4);
        assert_eq!(ed("p3"), 5);
        assert!(t.paper_editions.iter().all(|e| e.extracted.is_none()));
        assert_eq!(t.stats.editions_synthetic, 4);
        assert_eq!(t.editions.len(), 3);
    }

    #[test]
    fn fallback_counts_per_base_name() {
        let papers = [
            conference("p1", "Alpha Meeting", Some("a"), Some(2019)),
            conference("p2", "Beta Meeting", Some("b"), Some(2019)),
            conference("p3", "Beta Meeting", Some("b"), Some(2020)),
        ];
        let t = build(&papers);
        assert_eq!(t.paper_edition("p1").unwrap().edition, 3);
        assert_eq!(t.paper_edition("p2").unwrap().edition, 3);
        assert_eq!(t.paper_edition("p3").unwrap().edition, 4);
    }

    #[test]
    fn fallback_may_collide_with_extracted() {
        let papers = [
            conference("p1", "3rd Graph Forum", Some("g"), Some(2018)),
            conference("p2", "Graph Forum", Some("g"), Some(2019)),
        ];
        let t = build(&papers);
        assert_eq!(t.paper_edition("p1").unwrap().edition, 3);
        assert_eq!(t.paper_edition("p2").unwrap().edition, 3);
        // different year and location keep the edition nodes apart
        assert_eq!(t.editions.len(), 2);
    }

    #[test]
    fn collision_avoidance_skips_taken_numbers() {
        let papers = [
            conference("p1", "3rd Graph Forum", Some("g"), Some(2018)),
            conference("p2", "4th Graph Forum", Some("g"), Some(2019)),
            conference("p3", "Graph Forum", Some("g"), Some(2020)),
            conference("p4", "Graph Forum", Some("g"), Some(2021)),
        ];
        let f = Fixture::empty();
        let t = builder().avoid_edition_collisions(true).build(&f.input(&papers));
        assert_eq!(t.paper_edition("p3").unwrap().edition, 5);
        assert_eq!(t.paper_edition("p4").unwrap().edition, 6);
    }

    #[test]
    fn papers_without_venue_id_still_consume_fallback_numbers() {
        let papers = [
            conference("p1", "Data Days", None, Some(2019)),
            conference("p2", "Data Days", Some("v"), Some(2020)),
        ];
        let t = build(&papers);
        assert!(t.paper_edition("p1").is_none());
        assert_eq!(t.paper_edition("p2").unwrap().edition, 4);
        assert_eq!(t.stats.conference_without_venue, 1);
        assert!(t.events.iter().all(|e| e.event_id == "v"));
    }

    #[test]
    fn unresolvable_editions_counted() {
        let t = build(&[conference("p1", "Data Days", Some("v"), None)]);
        assert!(t.paper_editions.is_empty());
        assert_eq!(t.stats.editions_unresolved, 1);
    }

    #[test]
    fn edition_placement_carries_pages() {
        let t = build(&[conference("p1", "Edition 2 of X", Some("v"), Some(2020))]);
        assert_eq!(t.published_in_edition[0].pages.as_deref(), Some("1-10"));
        assert_eq!(t.paper_edition("p1").unwrap().edition, 2);
    }

    #[test]
    fn partition_is_idempotent() {
        let papers = [
            conference("p1", "23rd ACM Symposium on Y", Some("v"), Some(2019)),
            conference("p2", "ACM Symposium on Y '20", Some("v"), Some(2020)),
            conference("p3", "ACM Symposium on Y", Some("v"), Some(2021)),
        ];
        let a = build(&papers);
        let b = build(&papers);
        let groups = |t: &GraphTables| -> Vec<(String, u64)> {
            t.paper_editions
                .iter()
                .map(|e| (e.paper_id.clone(), e.edition))
                .collect()
        };
        assert_eq!(groups(&a), groups(&b));
        assert!(a.paper_editions.iter().all(|e| e.base_name == "ACM Symposium on Y"));
    }

    #[test]
    fn affiliations_keyed_by_trimmed_name() {
        let mut f = Fixture::empty();
        f.authors = vec![
            AuthorDetail {
                author_id: Some("a1".into()),
                affiliations: vec!["  MIT ".into(), "".into(), "MIT".into()],
                ..Default::default()
            },
            AuthorDetail {
                author_id: Some("a2".into()),
                affiliations: vec!["MIT".into(), "UPC".into()],
                ..Default::default()
            },
            AuthorDetail {
                author_id: None,
                affiliations: vec!["Nowhere".into()],
                ..Default::default()
            },
        ];
        let t = builder().build(&f.input(&[]));
        assert_eq!(t.affiliations.len(), 2);
        let mit = t.affiliation_id("MIT").unwrap();
        assert!(t.affiliation_id("Nowhere").is_none());
        assert_eq!(t.affiliated_with.len(), 3);
        assert_eq!(t.affiliated_with.iter().filter(|l| l.to == mit).count(), 2);
        assert_eq!(t.stats.blank_affiliations, 1);
    }

    #[test]
    fn keywords_normalized_and_linked() {
        let mut f = Fixture::empty();
        f.keywords.insert("p1".into(), vec!["Databases".into(), " databases ".into(), "".into()]);
        f.keywords.insert("p2".into(), vec!["Indexing".into()]);
        let t = builder().build(&f.input(&[]));
        assert_eq!(t.keywords.len(), 2);
        assert!(t.keyword_id("databases").is_some());
        assert_eq!(t.related_to.len(), 2);
        assert_eq!(t.stats.blank_keywords, 1);
    }

    #[test]
    fn reviews_from_both_shapes() {
        let mut f = Fixture::empty();
        f.reviews.0.insert(
            "p1".into(),
            vec![
                ReviewEntry {
                    author_id: Some("a1".into()),
                    comments: None,
                    vote: None,
                };
                2
            ],
        );
        f.reviews.0.insert(
            "p2".into(),
            vec![ReviewEntry {
                author_id: Some("a2".into()),
                comments: Some("Fine".into()),
                vote: Some("accepted".into()),
            }],
        );
        let t = builder().build(&f.input(&[]));
        assert_eq!(t.reviewed.len(), 2);
        assert_eq!(t.reviews.len(), 1);
        assert_eq!(t.reviews[0].vote.as_deref(), Some("accepted"));
    }

    #[test]
    fn reviewer_without_id_skipped() {
        let mut f = Fixture::empty();
        f.reviews.0.insert(
            "p1".into(),
            vec![
                ReviewEntry {
                    author_id: None,
                    comments: Some("x".into()),
                    vote: Some("rejected".into()),
                },
                ReviewEntry {
                    author_id: Some("a2".into()),
                    comments: Some("ok".into()),
                    vote: Some("accepted".into()),
                },
            ],
        );
        let t = builder().build(&f.input(&[]));
        assert_eq!(t.stats.reviews_without_id, 1);
        assert_eq!(t.reviewed.len(), 1);
        assert_eq!(t.reviewed[0].from, "a2");
        assert_eq!(t.reviews.len(), 1);
        assert_eq!(t.reviews[0].author_id, "a2");
        assert_eq!(t.reviews[0].vote.as_deref(), Some("accepted"));
    }
}
