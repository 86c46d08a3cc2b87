use crate::config::ScoringConfig;
use crate::node::Node;

/// Separator used when building breadcrumb paths.
pub const PATH_SEPARATOR: &str = " > ";

/// Breadcrumb for `name` under `parent_path`.
pub fn join_path(parent_path: &str, name: &str) -> String {
    if parent_path.is_empty() {
        name.to_string()
    } else {
        format!("{parent_path}{PATH_SEPARATOR}{name}")
    }
}

/// Number of segments in a breadcrumb; a root-level node has depth 1.
pub fn path_depth(path: &str) -> usize {
    path.split(PATH_SEPARATOR).count()
}

pub fn depth_penalty(cfg: &ScoringConfig, depth: usize) -> f64 {
    (1.0 - depth as f64 * cfg.depth_step).max(cfg.depth_floor)
}

/// Relevance of `node` for an index key `term` matched at `position`
/// (in chars) of its name. `path` is the node's breadcrumb.
pub fn score_of(cfg: &ScoringConfig, node: &Node, path: &str, term: &str, position: usize) -> f64 {
    score_with(cfg, node, &node.name.to_lowercase(), path_depth(path), term, position)
}

/// [`score_of`] with the lower-cased name and the path depth already
/// computed, for callers scoring many terms of the same node.
pub fn score_with(cfg: &ScoringConfig, node: &Node, name_lower: &str, depth: usize, term: &str, position: usize) -> f64 {
    let mut score = cfg.base;
    if name_lower == term {
        score += cfg.exact_bonus;
    }
    if position == 0 {
        score += cfg.prefix_bonus;
    }
    score *= weight(&cfg.type_weights, node.kind.as_deref());
    score *= weight(&cfg.level_weights, node.level.as_deref());
    score * depth_penalty(cfg, depth)
}

fn weight(table: &std::collections::HashMap<String, f64>, key: Option<&str>) -> f64 {
    key.and_then(|k| table.get(k)).copied().unwrap_or(1.0)
}
