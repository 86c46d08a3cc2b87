//! Search indexing and ranking for the Linux documentation map.
//!
//! A tree of [`Node`]s is flattened into an [`InvertedIndex`] keyed by
//! every name substring, description word and command string. Queries
//! combine an exact key lookup with an edit-distance pass over all keys.

pub mod config;
pub mod dataset;
pub mod engine;
pub mod filter;
pub mod index;
pub mod node;
pub mod protocol;
pub mod query;
pub mod score;
pub mod stats;
pub mod tokenizer;

pub use config::{EngineConfig, QueryConfig, ScoringConfig};
pub use engine::SearchEngine;
pub use filter::{FilterCriteria, FilterHit};
pub use index::{InvertedIndex, NodeEntry, NodeId, Posting, TermId};
pub use node::{Command, Node, NodeSummary, RawNode};
pub use protocol::{Envelope, Request, Response};
pub use query::SearchHit;
pub use stats::IndexStats;
