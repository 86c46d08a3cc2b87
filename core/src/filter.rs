use crate::node::{Node, NodeSummary};
use crate::score::join_path;
use serde::{Deserialize, Serialize};

/// Conditions a node must all satisfy. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Case-insensitive substring of any category tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub has_commands: bool,
    #[serde(default)]
    pub has_examples: bool,
}

impl FilterCriteria {
    /// An empty string in `type`, `level` or `category` means no constraint.
    pub fn matches(&self, node: &Node) -> bool {
        if let Some(kind) = self.kind.as_deref().filter(|k| !k.is_empty()) {
            if node.kind.as_deref() != Some(kind) {
                return false;
            }
        }
        if let Some(level) = self.level.as_deref().filter(|l| !l.is_empty()) {
            if node.level.as_deref() != Some(level) {
                return false;
            }
        }
        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            let wanted = category.to_lowercase();
            if !node.categories.iter().any(|c| c.to_lowercase().contains(&wanted)) {
                return false;
            }
        }
        if self.has_commands && node.commands.is_empty() {
            return false;
        }
        if self.has_examples && node.examples.is_empty() {
            return false;
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterHit {
    pub node: NodeSummary,
    pub path: String,
}

/// Pre-order scan of the whole tree.
pub fn filter_nodes(roots: &[Node], criteria: &FilterCriteria) -> Vec<FilterHit> {
    let mut out = Vec::new();
    walk(roots, "", criteria, &mut out);
    out
}

fn walk(nodes: &[Node], parent_path: &str, criteria: &FilterCriteria, out: &mut Vec<FilterHit>) {
    for node in nodes {
        let path = join_path(parent_path, &node.name);
        if criteria.matches(node) {
            out.push(FilterHit { node: node.summary(), path: path.clone() });
        }
        walk(&node.children, &path, criteria, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> Vec<Node> {
        let mut sched = Node::new("Scheduler").with_kind("kernel").with_level("intermediate").with_command("chrt");
        sched.categories = vec!["Process Management".into()];
        let mut mm = Node::new("Memory").with_kind("kernel").with_level("advanced");
        mm.examples = vec![serde_json::json!({"title": "vmstat"})];
        vec![
            Node::new("Kernel").with_kind("kernel").with_children(vec![sched, mm]),
            Node::new("Bash").with_kind("userspace").with_level("beginner").with_command("bash -c"),
        ]
    }

    fn names(hits: &[FilterHit]) -> Vec<&str> {
        hits.iter().map(|h| h.node.name.as_str()).collect()
    }

    #[test]
    fn empty_criteria_returns_everything_in_preorder() {
        let hits = filter_nodes(&tree(), &FilterCriteria::default());
        assert_eq!(names(&hits), vec!["Kernel", "Scheduler", "Memory", "Bash"]);
        assert_eq!(hits[2].path, "Kernel > Memory");
    }

    #[test]
    fn criteria_are_anded() {
        let c = FilterCriteria { kind: Some("kernel".into()), has_commands: true, ..Default::default() };
        assert_eq!(names(&filter_nodes(&tree(), &c)), vec!["Scheduler"]);
    }

    #[test]
    fn category_is_case_insensitive_substring() {
        let c = FilterCriteria { category: Some("process".into()), ..Default::default() };
        assert_eq!(names(&filter_nodes(&tree(), &c)), vec!["Scheduler"]);
    }

    #[test]
    fn has_examples_and_level() {
        let c = FilterCriteria { has_examples: true, level: Some("advanced".into()), ..Default::default() };
        assert_eq!(names(&filter_nodes(&tree(), &c)), vec!["Memory"]);
    }

    #[test]
    fn empty_string_criteria_are_unset() {
        let c: FilterCriteria = serde_json::from_str(r#"{"type": "", "level": "", "category": ""}"#).unwrap();
        assert_eq!(names(&filter_nodes(&tree(), &c)), vec!["Kernel", "Scheduler", "Memory", "Bash"]);
        let c = FilterCriteria { kind: Some(String::new()), level: Some("beginner".into()), ..Default::default() };
        assert_eq!(names(&filter_nodes(&tree(), &c)), vec!["Bash"]);
    }

    #[test]
    fn criteria_use_camel_case_on_the_wire() {
        let c: FilterCriteria = serde_json::from_str(r#"{"type": "kernel", "hasCommands": true}"#).unwrap();
        assert_eq!(c.kind.as_deref(), Some("kernel"));
        assert!(c.has_commands);
        assert!(!c.has_examples);
    }
}
