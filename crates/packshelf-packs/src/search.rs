//! Pack search over a [`PackIndex`].
//!
//! Ranking is tiered, with ties broken by name:
//! 1. exact name match
//! 2. name contains the query
//! 3. description or any tag contains the query
//!
//! Matching ignores case. An empty query matches every pack.

use serde::Serialize;

use crate::index::PackIndex;
use crate::types::{Pack, PackKind, PackSummary};

/// Why a pack matched, in rank order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum MatchKind {
    ExactName,
    NameContains,
    DescriptionOrTag,
    /// Empty query; everything matches.
    All,
}

/// One search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    #[serde(flatten)]
    pub pack: PackSummary,
    pub matched: MatchKind,
}

/// Filters applied before ranking, and an optional cap on results.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub kind: Option<PackKind>,
    pub tag: Option<String>,
    pub limit: Option<usize>,
}

impl SearchOptions {
    pub fn kind(mut self, kind: PackKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Search the index with default options.
pub fn search(index: &PackIndex, query: &str) -> Vec<SearchHit> {
    search_with(index, query, &SearchOptions::default())
}

/// Search the index, applying `options`.
pub fn search_with(index: &PackIndex, query: &str, options: &SearchOptions) -> Vec<SearchHit> {
    let query = query.trim().to_lowercase();

    let mut hits: Vec<(MatchKind, &Pack)> = index
        .iter()
        .filter(|p| options.kind.is_none_or(|k| p.kind == k))
        .filter(|p| options.tag.as_deref().is_none_or(|t| p.has_tag(t)))
        .filter_map(|p| classify(p, &query).map(|m| (m, p)))
        .collect();

    hits.sort_by(|(ma, a), (mb, b)| ma.cmp(mb).then_with(|| a.name.cmp(&b.name)));

    if let Some(limit) = options.limit {
        hits.truncate(limit);
    }

    hits.into_iter()
        .map(|(matched, pack)| SearchHit {
            pack: pack.summary(),
            matched,
        })
        .collect()
}

/// Decide whether `pack` matches the lowercased `query`, and how well.
fn classify(pack: &Pack, query: &str) -> Option<MatchKind> {
    if query.is_empty() {
        return Some(MatchKind::All);
    }

    let name = pack.name.to_lowercase();
    if name == query {
        return Some(MatchKind::ExactName);
    }
    if name.contains(query) {
        return Some(MatchKind::NameContains);
    }
    if pack.description.to_lowercase().contains(query)
        || pack.tags.iter().any(|t| t.to_lowercase().contains(query))
    {
        return Some(MatchKind::DescriptionOrTag);
    }
    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
