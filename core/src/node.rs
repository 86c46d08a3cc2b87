use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One `{cmd, desc}` entry attached to a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub cmd: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMetadata {
    #[serde(default, deserialize_with = "or_default")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawOperations {
    #[serde(default, deserialize_with = "tolerant_list")]
    pub commands: Vec<Command>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConcepts {
    #[serde(default, deserialize_with = "tolerant_list")]
    pub category: Vec<String>,
}

/// A node exactly as it appears in the dataset documents. Nothing is
/// required here and any JSON object decodes: a field of the wrong type
/// reads as absent, a list entry of the wrong shape is dropped on its own.
/// [`ingest`] decides what is usable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawNode {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub name: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "or_default")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub level: Option<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub metadata: Option<RawMetadata>,
    #[serde(default, deserialize_with = "tolerant_list")]
    pub commands: Vec<Command>,
    #[serde(default, deserialize_with = "or_default")]
    pub operations: Option<RawOperations>,
    #[serde(default, deserialize_with = "or_default")]
    pub cs_concepts: Option<RawConcepts>,
    #[serde(default, deserialize_with = "or_default")]
    pub examples: Vec<Value>,
    #[serde(default, deserialize_with = "tolerant_list")]
    pub files: Vec<String>,
    #[serde(default, deserialize_with = "tolerant_list")]
    pub children: Vec<RawNode>,
}

/// Decode every usable entry of a JSON list. `null` is an empty list;
/// entries that fail to decode are skipped with a warning.
pub fn decode_list<T: DeserializeOwned>(value: Value) -> Vec<T> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match serde_json::from_value(item) {
                Ok(v) => Some(v),
                Err(err) => {
                    tracing::warn!(%err, "skipping malformed list entry");
                    None
                }
            })
            .collect(),
        Value::Null => Vec::new(),
        other => {
            tracing::warn!(value = %other, "expected a list");
            Vec::new()
        }
    }
}

pub(crate) fn tolerant_list<'de, D, T>(de: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(decode_list(Value::deserialize(de)?))
}

fn or_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(de)?;
    if value.is_null() {
        return Ok(T::default());
    }
    Ok(serde_json::from_value(value).unwrap_or_else(|err| {
        tracing::warn!(%err, "ignoring malformed node field");
        T::default()
    }))
}

fn string_or_number<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(de)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Null => None,
        other => {
            tracing::warn!(value = %other, "ignoring malformed node id");
            None
        }
    })
}

/// A validated documentation node. `name` is always non-empty and `id`
/// is always set.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub name: String,
    pub kind: Option<String>,
    pub level: Option<String>,
    pub description: Option<String>,
    pub commands: Vec<Command>,
    pub categories: Vec<String>,
    pub examples: Vec<Value>,
    pub files: Vec<String>,
    pub children: Vec<Node>,
}

impl Node {
    /// Minimal node, mostly useful when building trees in code.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            kind: None,
            level: None,
            description: None,
            commands: Vec::new(),
            categories: Vec::new(),
            examples: Vec::new(),
            files: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_command(mut self, cmd: impl Into<String>) -> Self {
        self.commands.push(Command { cmd: cmd.into(), desc: None });
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    /// Number of nodes in this subtree, this node included.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Node::count).sum::<usize>()
    }

    pub fn summary(&self) -> NodeSummary {
        NodeSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            kind: self.kind.clone(),
            level: self.level.clone(),
            description: self.description.clone(),
            commands: self.commands.clone(),
            categories: self.categories.clone(),
            files: self.files.clone(),
            child_count: self.children.len(),
        }
    }
}

/// What result payloads carry for a node: everything but the subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSummary {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<Command>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,
    #[serde(default)]
    pub child_count: usize,
}

impl RawNode {
    /// Validate this node and its subtree. Returns `None` when the node
    /// has no usable name; its children are dropped with it.
    pub fn into_node(self) -> Option<Node> {
        let name = match self.name {
            Some(n) if !n.trim().is_empty() => n,
            _ => {
                tracing::warn!(id = ?self.id, children = self.children.len(), "skipping node without a name");
                return None;
            }
        };
        let description = self
            .description
            .or_else(|| self.metadata.and_then(|m| m.description));
        let mut commands = self.commands;
        if let Some(ops) = self.operations {
            commands.extend(ops.commands);
        }
        Some(Node {
            id: self.id.filter(|id| !id.is_empty()).unwrap_or_else(|| name.clone()),
            name,
            kind: self.kind,
            level: self.level,
            description,
            commands,
            categories: self.cs_concepts.map(|c| c.category).unwrap_or_default(),
            examples: self.examples,
            files: self.files,
            children: ingest(self.children),
        })
    }
}

/// Validate a forest of raw nodes, keeping document order.
pub fn ingest(raw: Vec<RawNode>) -> Vec<Node> {
    raw.into_iter().filter_map(RawNode::into_node).collect()
}
