use crate::config::ScoringConfig;
use crate::node::{Node, NodeSummary};
use crate::score::{join_path, path_depth, score_with};
use crate::tokenizer::{description_words, name_substrings};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type TermId = u32;
pub type NodeId = u32;

/// Per-node data kept alongside the postings, addressed by [`NodeId`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeEntry {
    pub node: NodeSummary,
    /// Breadcrumb, e.g. `Kernel > Process Management > Scheduler (CFS)`.
    pub path: String,
    pub depth: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub node: NodeId,
    pub score: f64,
}

/// Substring/word/command inverted index over a node tree.
///
/// Keys are interned in first-seen order; iterating [`InvertedIndex::terms`]
/// walks them in that order, which keeps fuzzy results reproducible.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    pub dictionary: HashMap<String, TermId>,
    terms: Vec<String>,
    postings: Vec<Vec<Posting>>,
    nodes: Vec<NodeEntry>,
    num_postings: usize,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    /// Build a fresh index over `roots`.
    pub fn from_nodes(roots: &[Node], cfg: &ScoringConfig) -> Self {
        let mut index = Self::new();
        index.build_index(roots, "", cfg);
        tracing::info!(
            nodes = index.nodes.len(),
            keys = index.len(),
            postings = index.num_postings,
            "search index built"
        );
        index
    }

    /// Index `nodes` (and their subtrees) below `parent_path`. Appends to
    /// whatever is already indexed; call [`InvertedIndex::clear`] first to rebuild.
    pub fn build_index(&mut self, nodes: &[Node], parent_path: &str, cfg: &ScoringConfig) {
        for node in nodes {
            let path = join_path(parent_path, &node.name);
            let id = self.nodes.len() as NodeId;
            let depth = path_depth(&path);
            let name_lower = node.name.to_lowercase();
            self.nodes.push(NodeEntry { node: node.summary(), depth, path: path.clone() });

            for (sub, start) in name_substrings(&node.name) {
                let score = score_with(cfg, node, &name_lower, depth, &sub, start);
                self.insert(sub, Posting { node: id, score });
            }

            if let Some(desc) = &node.description {
                for word in description_words(desc, cfg.min_word_len) {
                    let score = score_with(cfg, node, &name_lower, depth, &word, 0) * cfg.description_factor;
                    self.insert(word, Posting { node: id, score });
                }
            }

            for command in &node.commands {
                let cmd = command.cmd.to_lowercase();
                let score = score_with(cfg, node, &name_lower, depth, &cmd, 0) * cfg.command_factor;
                self.insert(cmd, Posting { node: id, score });
            }

            if !node.children.is_empty() {
                self.build_index(&node.children, &path, cfg);
            }
        }
    }

    fn insert(&mut self, key: String, posting: Posting) {
        let tid = match self.dictionary.get(&key) {
            Some(&tid) => tid,
            None => {
                let tid = self.terms.len() as TermId;
                self.terms.push(key.clone());
                self.postings.push(Vec::new());
                self.dictionary.insert(key, tid);
                tid
            }
        };
        self.postings[tid as usize].push(posting);
        self.num_postings += 1;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize { self.terms.len() }

    pub fn is_empty(&self) -> bool { self.terms.is_empty() }

    pub fn num_postings(&self) -> usize { self.num_postings }

    pub fn num_nodes(&self) -> usize { self.nodes.len() }

    /// Postings stored under `key`, in insertion order.
    pub fn get(&self, key: &str) -> Option<&[Posting]> {
        self.dictionary.get(key).map(|&tid| self.postings[tid as usize].as_slice())
    }

    /// All `(key, postings)` pairs in first-seen order.
    pub fn terms(&self) -> impl Iterator<Item = (&str, &[Posting])> + '_ {
        self.terms
            .iter()
            .zip(self.postings.iter())
            .map(|(k, p)| (k.as_str(), p.as_slice()))
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeEntry> {
        self.nodes.get(id as usize)
    }

    pub fn nodes(&self) -> &[NodeEntry] { &self.nodes }
}
