use crate::config::QueryConfig;
use crate::index::{InvertedIndex, NodeId, Posting};
use crate::node::NodeSummary;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One ranked search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub node: NodeSummary,
    pub path: String,
    pub score: f64,
}

/// Classic edit distance over chars (insert, delete, substitute all cost 1).
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() { return b.len(); }
    if b.is_empty() { return a.len(); }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut cur = vec![0usize; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        cur[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            cur[j + 1] = if ca == cb {
                prev[j]
            } else {
                1 + prev[j].min(prev[j + 1]).min(cur[j])
            };
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}

/// `1 - distance / max_len`, computed as a single division so that
/// boundary values like 3/5 land exactly on their float literal.
pub fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    let d = levenshtein(a, b);
    (max_len - d) as f64 / max_len as f64
}

/// Merges postings keyed by node id, keeping the best score per id.
/// Offering the same posting twice changes nothing.
#[derive(Debug, Default)]
pub struct HitSet {
    slots: HashMap<String, usize>,
    hits: Vec<(NodeId, f64)>,
}

impl HitSet {
    pub fn new() -> Self { Self::default() }

    pub fn offer(&mut self, index: &InvertedIndex, posting: Posting) {
        let Some(entry) = index.node(posting.node) else { return };
        match self.slots.get(&entry.node.id).copied() {
            Some(slot) => {
                if self.hits[slot].1 < posting.score {
                    self.hits[slot] = (posting.node, posting.score);
                }
            }
            None => {
                self.slots.insert(entry.node.id.clone(), self.hits.len());
                self.hits.push((posting.node, posting.score));
            }
        }
    }

    pub fn len(&self) -> usize { self.hits.len() }

    pub fn is_empty(&self) -> bool { self.hits.is_empty() }

    /// Best-first, ties kept in first-offered order, cut to `limit`.
    pub fn into_ranked(self, index: &InvertedIndex, limit: usize) -> Vec<SearchHit> {
        let mut hits = self.hits;
        hits.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        hits.into_iter()
            .take(limit)
            .filter_map(|(id, score)| {
                index.node(id).map(|e| SearchHit { node: e.node.clone(), path: e.path.clone(), score })
            })
            .collect()
    }
}

/// Offer every posting stored under the lower-cased query.
pub fn exact_lookup(index: &InvertedIndex, query: &str, hits: &mut HitSet) {
    let q = query.to_lowercase();
    if let Some(postings) = index.get(&q) {
        for p in postings {
            hits.offer(index, *p);
        }
    }
}

/// Offer similarity-discounted postings for every key that contains, or is
/// contained in, the query and is similar enough to it.
pub fn fuzzy_lookup(index: &InvertedIndex, query: &str, cfg: &QueryConfig, hits: &mut HitSet) {
    let q = query.to_lowercase();
    if q.chars().count() < cfg.min_fuzzy_len {
        return;
    }
    for (key, postings) in index.terms() {
        if !(key.contains(q.as_str()) || q.contains(key)) {
            continue;
        }
        let sim = similarity(&q, key);
        if sim <= cfg.fuzzy_threshold {
            continue;
        }
        for p in postings {
            hits.offer(index, Posting { node: p.node, score: p.score * sim });
        }
    }
}

/// Exact plus fuzzy matches, deduplicated by node id, best first.
pub fn search(index: &InvertedIndex, query: &str, cfg: &QueryConfig) -> Vec<SearchHit> {
    if query.trim().is_empty() {
        return Vec::new();
    }
    let mut hits = HitSet::new();
    exact_lookup(index, query, &mut hits);
    fuzzy_lookup(index, query, cfg, &mut hits);
    tracing::debug!(query, matched = hits.len(), "search resolved");
    hits.into_ranked(index, cfg.max_results)
}
