use crate::index::InvertedIndex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    pub total_nodes: usize,
    pub index_size: usize,
    pub memory_usage: usize,
}

const REF_BYTES: usize = 8;
const NUMBER_BYTES: usize = 8;
const BOOL_BYTES: usize = 4;
const CHAR_BYTES: usize = 2;

/// Rough byte count of a JSON value: 2 bytes per char of every string
/// (object keys included), 8 per number, 4 per boolean.
pub fn rough_size(value: &Value) -> usize {
    let mut bytes = 0;
    let mut stack = vec![value];
    while let Some(v) = stack.pop() {
        match v {
            Value::Null => {}
            Value::Bool(_) => bytes += BOOL_BYTES,
            Value::Number(_) => bytes += NUMBER_BYTES,
            Value::String(s) => bytes += s.chars().count() * CHAR_BYTES,
            Value::Array(items) => stack.extend(items.iter()),
            Value::Object(map) => {
                for (k, item) in map {
                    bytes += k.chars().count() * CHAR_BYTES;
                    stack.push(item);
                }
            }
        }
    }
    bytes
}

/// Approximate footprint of the index: keys, one node reference and one
/// score per posting, and the node table counted once.
pub fn estimate_memory(index: &InvertedIndex) -> usize {
    let mut bytes = 0;
    for (key, postings) in index.terms() {
        bytes += key.chars().count() * CHAR_BYTES;
        bytes += postings.len() * (REF_BYTES + NUMBER_BYTES);
    }
    match serde_json::to_value(index.nodes()) {
        Ok(table) => bytes + rough_size(&table),
        Err(err) => {
            tracing::warn!(%err, "node table not measurable");
            bytes
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoringConfig;
    use crate::node::Node;
    use serde_json::json;

    #[test]
    fn rough_size_counts_scalars() {
        let v = json!({"ab": "xyz", "n": 1, "ok": true, "list": [1.5, null]});
        // keys: ab(4) n(2) ok(4) list(8) = 18; "xyz" 6; numbers 16; bool 4
        assert_eq!(rough_size(&v), 18 + 6 + 16 + 4);
    }

    #[test]
    fn memory_grows_with_the_index() {
        let cfg = ScoringConfig::default();
        let small = InvertedIndex::from_nodes(&[Node::new("ab")], &cfg);
        let big = InvertedIndex::from_nodes(&[Node::new("abcdefgh")], &cfg);
        assert!(estimate_memory(&small) > 0);
        assert!(estimate_memory(&big) > estimate_memory(&small));
        assert_eq!(estimate_memory(&InvertedIndex::new()), rough_size(&json!([])));
    }
}
