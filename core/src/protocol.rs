//! `{type, data}` messages exchanged between a host and the search worker.
//!
//! Requests are decoded in two steps: the envelope first, then `data`
//! according to `type`. An unrecognised `type` decodes to `None` and gets
//! no response.

use crate::filter::{FilterCriteria, FilterHit};
use crate::node::RawNode;
use crate::query::SearchHit;
use crate::stats::IndexStats;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const INIT: &str = "INIT";
pub const SEARCH: &str = "SEARCH";
pub const FILTER: &str = "FILTER";
pub const GET_STATS: &str = "GET_STATS";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InitData {
    #[serde(default, deserialize_with = "crate::node::tolerant_list")]
    pub nodes: Vec<RawNode>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchData {
    #[serde(default)]
    pub query: String,
    /// Host-assigned sequence number, echoed back untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seq: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterData {
    #[serde(default)]
    pub criteria: FilterCriteria,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seq: Option<u64>,
}

#[derive(Debug, Clone)]
pub enum Request {
    Init(InitData),
    Search(SearchData),
    Filter(FilterData),
    GetStats,
}

impl Request {
    /// Decode a request. `Ok(None)` for an unknown type; `Err` when a known
    /// type carries a payload of the wrong shape.
    pub fn from_envelope(env: Envelope) -> Result<Option<Request>> {
        let data = if env.data.is_null() { serde_json::json!({}) } else { env.data };
        let req = match env.kind.as_str() {
            INIT => Request::Init(serde_json::from_value(data).context("decoding INIT data")?),
            SEARCH => Request::Search(serde_json::from_value(data).context("decoding SEARCH data")?),
            FILTER => Request::Filter(serde_json::from_value(data).context("decoding FILTER data")?),
            GET_STATS => Request::GetStats,
            other => {
                tracing::debug!(kind = other, "ignoring unknown message type");
                return Ok(None);
            }
        };
        Ok(Some(req))
    }

    pub fn from_json(text: &str) -> Result<Option<Request>> {
        let env: Envelope = serde_json::from_str(text).context("decoding message envelope")?;
        Self::from_envelope(env)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Request::Init(_) => INIT,
            Request::Search(_) => SEARCH,
            Request::Filter(_) => FILTER,
            Request::GetStats => GET_STATS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitComplete {
    pub index_size: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub query: String,
    pub results: Vec<SearchHit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seq: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterResults {
    pub criteria: FilterCriteria,
    pub results: Vec<FilterHit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seq: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Response {
    InitComplete(InitComplete),
    SearchResults(SearchResults),
    FilterResults(FilterResults),
    Stats(IndexStats),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_types_are_ignored() {
        assert!(Request::from_json(r#"{"type": "PING", "data": {}}"#).unwrap().is_none());
    }

    #[test]
    fn get_stats_needs_no_data() {
        let req = Request::from_json(r#"{"type": "GET_STATS"}"#).unwrap().unwrap();
        assert_eq!(req.kind(), GET_STATS);
    }

    #[test]
    fn malformed_payload_for_known_type_is_an_error() {
        let err = Request::from_json(r#"{"type": "SEARCH", "data": {"query": 5}}"#).unwrap_err();
        assert!(format!("{err:#}").contains("SEARCH"));
    }

    #[test]
    fn search_keeps_its_sequence_number() {
        match Request::from_json(r#"{"type": "SEARCH", "data": {"query": "bash", "seq": 7}}"#).unwrap() {
            Some(Request::Search(d)) => {
                assert_eq!(d.query, "bash");
                assert_eq!(d.seq, Some(7));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn responses_use_tagged_camel_case_layout() {
        let v = serde_json::to_value(Response::InitComplete(InitComplete { index_size: 12 })).unwrap();
        assert_eq!(v, json!({"type": "INIT_COMPLETE", "data": {"indexSize": 12}}));
        let v = serde_json::to_value(Response::Stats(IndexStats { total_nodes: 1, index_size: 2, memory_usage: 3 })).unwrap();
        assert_eq!(v, json!({"type": "STATS", "data": {"totalNodes": 1, "indexSize": 2, "memoryUsage": 3}}));
    }
}
