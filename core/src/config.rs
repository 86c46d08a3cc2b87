use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Tuning constants for [`crate::score::score_of`] and the indexer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub base: f64,
    pub exact_bonus: f64,
    pub prefix_bonus: f64,
    pub type_weights: HashMap<String, f64>,
    pub level_weights: HashMap<String, f64>,
    pub depth_step: f64,
    pub depth_floor: f64,
    /// Multiplier for postings that come from description words.
    pub description_factor: f64,
    /// Multiplier for postings that come from command strings.
    pub command_factor: f64,
    /// Description words shorter than this are not indexed.
    pub min_word_len: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let type_weights = [
            ("kernel", 1.2),
            ("service", 1.1),
            ("network", 1.1),
            ("filesystem", 1.0),
            ("userspace", 0.9),
        ];
        let level_weights = [("beginner", 1.3), ("intermediate", 1.0), ("advanced", 0.8)];
        Self {
            base: 100.0,
            exact_bonus: 50.0,
            prefix_bonus: 30.0,
            type_weights: type_weights.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            level_weights: level_weights.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            depth_step: 0.05,
            depth_floor: 0.5,
            description_factor: 0.5,
            command_factor: 0.8,
            min_word_len: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Candidates must be strictly more similar than this.
    pub fuzzy_threshold: f64,
    /// Queries shorter than this (in chars) skip the fuzzy pass.
    pub min_fuzzy_len: usize,
    pub max_results: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self { fuzzy_threshold: 0.6, min_fuzzy_len: 2, max_results: 50 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub scoring: ScoringConfig,
    pub query: QueryConfig,
}

impl EngineConfig {
    /// Read a JSON config. Missing fields keep their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading engine config {}", path.display()))?;
        let cfg = serde_json::from_str(&text)
            .with_context(|| format!("parsing engine config {}", path.display()))?;
        Ok(cfg)
    }

    /// `from_json_file` when a path is given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_json_file(p),
            None => Ok(Self::default()),
        }
    }
}
