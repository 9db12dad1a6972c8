//! Similarity ranker
//!
//! Resolves a free-text query to one corpus item and ranks every other item
//! by cosine similarity to it.
//!
//! Query resolution is two-stage and the first stage that matches wins:
//!
//! 1. case-insensitive exact title match
//! 2. case-insensitive substring match (query inside title)
//!
//! Within a stage the first item in corpus order is chosen. Ties in score
//! keep corpus order, so the output for a given corpus and query is fully
//! deterministic.

use crate::corpus::CorpusHandle;
use crate::{Error, Result};
use serde::Serialize;
use tracing::debug;

/// Which resolution stage picked the query item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Exact,
    Substring,
}

/// The corpus item a query resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QueryMatch {
    pub index: usize,
    pub kind: MatchKind,
}

/// One ranked candidate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub index: usize,
    pub title: String,
    pub score: f32,
}

/// Ranked candidates for one query, best first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendations {
    pub query: QueryMatch,
    pub query_title: String,
    pub items: Vec<Recommendation>,
}

impl Recommendations {
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// `(title, score)` pairs in rank order
    pub fn pairs(&self) -> Vec<(&str, f32)> {
        self.items.iter().map(|r| (r.title.as_str(), r.score)).collect()
    }
}

/// Resolve query text to a corpus row
pub fn resolve_query(handle: &CorpusHandle, query: &str) -> Result<QueryMatch> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Err(Error::NotFound(query.to_string()));
    }

    let titles = handle.lowered_titles();

    if let Some(index) = titles.iter().position(|t| *t == needle) {
        debug!(query, index, "resolved by exact title");
        return Ok(QueryMatch { index, kind: MatchKind::Exact });
    }

    if let Some(index) = titles.iter().position(|t| t.contains(&needle)) {
        debug!(query, index, "resolved by substring");
        return Ok(QueryMatch { index, kind: MatchKind::Substring });
    }

    Err(Error::NotFound(query.to_string()))
}

/// Top `k` items most similar to the item `query` resolves to
///
/// The resolved item is never part of its own results.
pub fn recommend(handle: &CorpusHandle, query: &str, k: usize) -> Result<Recommendations> {
    let resolved = resolve_query(handle, query)?;
    let items = rank(handle, resolved.index, k);
    let query_title = handle
        .item(resolved.index)
        .map(|item| item.title.clone())
        .unwrap_or_default();

    Ok(Recommendations {
        query: resolved,
        query_title,
        items,
    })
}

/// [`recommend`] with the handle's configured `top_k`
pub fn recommend_default(handle: &CorpusHandle, query: &str) -> Result<Recommendations> {
    recommend(handle, query, handle.config().top_k)
}

/// Rank every item except `index` against it
///
/// Returns an empty list for an out-of-range index.
pub fn rank(handle: &CorpusHandle, index: usize, k: usize) -> Vec<Recommendation> {
    let Some(scores) = handle.scores_for(index) else {
        return Vec::new();
    };

    let mut candidates: Vec<(usize, f32)> = scores
        .iter()
        .copied()
        .enumerate()
        .filter(|&(i, _)| i != index)
        .collect();

    // Stable sort: equal scores keep corpus order.
    candidates.sort_by(|a, b| b.1.total_cmp(&a.1));
    candidates.truncate(k);

    candidates
        .into_iter()
        .filter_map(|(i, score)| {
            handle.item(i).map(|item| Recommendation {
                index: i,
                title: item.title.clone(),
                score,
            })
        })
        .collect()
}
