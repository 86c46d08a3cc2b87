use crate::config::EngineConfig;
use crate::filter::{filter_nodes, FilterCriteria, FilterHit};
use crate::index::InvertedIndex;
use crate::node::{ingest, Node, RawNode};
use crate::protocol::{FilterResults, InitComplete, Request, Response, SearchResults};
use crate::query::{search, SearchHit};
use crate::stats::{estimate_memory, IndexStats};

/// Owns the node tree and its index. All operations are synchronous; a
/// transport that needs ordering guarantees should own one of these
/// exclusively and feed it one request at a time.
#[derive(Debug, Default)]
pub struct SearchEngine {
    config: EngineConfig,
    roots: Vec<Node>,
    index: InvertedIndex,
}

impl SearchEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config, roots: Vec::new(), index: InvertedIndex::new() }
    }

    pub fn config(&self) -> &EngineConfig { &self.config }

    pub fn index(&self) -> &InvertedIndex { &self.index }

    pub fn roots(&self) -> &[Node] { &self.roots }

    /// Validate `raw` and replace the current tree and index with it.
    /// Returns the number of index keys.
    pub fn init(&mut self, raw: Vec<RawNode>) -> usize {
        self.load(ingest(raw))
    }

    /// Like [`SearchEngine::init`] for an already validated tree.
    pub fn load(&mut self, roots: Vec<Node>) -> usize {
        let index = InvertedIndex::from_nodes(&roots, &self.config.scoring);
        self.roots = roots;
        self.index = index;
        self.index.len()
    }

    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        search(&self.index, query, &self.config.query)
    }

    pub fn filter(&self, criteria: &FilterCriteria) -> Vec<FilterHit> {
        filter_nodes(&self.roots, criteria)
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            total_nodes: self.roots.iter().map(Node::count).sum(),
            index_size: self.index.len(),
            memory_usage: estimate_memory(&self.index),
        }
    }

    /// Process one request to completion.
    pub fn handle(&mut self, request: Request) -> Response {
        match request {
            Request::Init(data) => {
                let index_size = self.init(data.nodes);
                Response::InitComplete(InitComplete { index_size })
            }
            Request::Search(data) => {
                let results = self.search(&data.query);
                Response::SearchResults(SearchResults { query: data.query, results, seq: data.seq })
            }
            Request::Filter(data) => {
                let results = self.filter(&data.criteria);
                Response::FilterResults(FilterResults { criteria: data.criteria, results, seq: data.seq })
            }
            Request::GetStats => Response::Stats(self.stats()),
        }
    }
}
