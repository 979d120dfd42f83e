//! # Nodes
//!
//! Entities stored in the document arena. A node has a document-assigned id,
//! a type tag resolved through the [`Schema`](crate::Schema), and a payload
//! that is either a text property, an ordered list of child ids, or nothing.
//!
//! Children are stored as ids, never as owned nodes. Ownership is tracked by
//! the [`Document`](crate::Document) so a node can sit in at most one
//! sequence at a time.

use crate::Annotation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Document-assigned node identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        NodeId(s)
    }
}

impl From<&NodeId> for NodeId {
    fn from(id: &NodeId) -> Self {
        id.clone()
    }
}

/// A node in the document arena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,

    #[serde(rename = "type")]
    pub node_type: String,

    pub content: NodeContent,
}

impl Node {
    pub fn text(&self) -> Option<&TextContent> {
        match &self.content {
            NodeContent::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn children(&self) -> Option<&[NodeId]> {
        match &self.content {
            NodeContent::Children(children) => Some(children),
            _ => None,
        }
    }

    /// Position of `child` within this node's children
    pub fn position_of(&self, child: &NodeId) -> Option<usize> {
        self.children()?.iter().position(|c| c == child)
    }
}

/// Type-specific payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum NodeContent {
    Text(TextContent),
    Children(Vec<NodeId>),
    Void,
}

/// Text property with its inline annotations
///
/// Offsets are character offsets, not byte offsets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub text: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

impl TextContent {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            annotations: Vec::new(),
        }
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Characters in `[start, end)`
    pub fn slice(&self, start: usize, end: usize) -> String {
        self.text.chars().skip(start).take(end.saturating_sub(start)).collect()
    }

    pub(crate) fn insert(&mut self, offset: usize, value: &str) {
        let at = byte_offset(&self.text, offset);
        self.text.insert_str(at, value);
    }

    pub(crate) fn remove(&mut self, start: usize, end: usize) -> String {
        let from = byte_offset(&self.text, start);
        let to = byte_offset(&self.text, end);
        self.text.drain(from..to).collect()
    }
}

fn byte_offset(text: &str, offset: usize) -> usize {
    text.char_indices()
        .nth(offset)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

/// Payload for creating a node; the id is always assigned by the document
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSpec {
    pub node_type: String,
    pub content: NodeContent,
}

impl NodeSpec {
    pub fn text(node_type: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            content: NodeContent::Text(TextContent::new(text)),
        }
    }

    pub fn annotated(node_type: impl Into<String>, content: TextContent) -> Self {
        Self {
            node_type: node_type.into(),
            content: NodeContent::Text(content),
        }
    }

    pub fn children(node_type: impl Into<String>, ids: Vec<NodeId>) -> Self {
        Self {
            node_type: node_type.into(),
            content: NodeContent::Children(ids),
        }
    }

    pub fn void(node_type: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            content: NodeContent::Void,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_offsets_are_chars() {
        let mut text = TextContent::new("héllo");
        assert_eq!(text.len(), 5);

        text.insert(2, "X");
        assert_eq!(text.text, "héXllo");

        let removed = text.remove(1, 3);
        assert_eq!(removed, "éX");
        assert_eq!(text.text, "hllo");
    }

    #[test]
    fn test_insert_at_end() {
        let mut text = TextContent::new("ab");
        text.insert(2, "c");
        assert_eq!(text.text, "abc");
        assert_eq!(text.slice(1, 3), "bc");
    }

    #[test]
    fn test_node_serialization() {
        let node = Node {
            id: NodeId::new("list-1"),
            node_type: "list".to_string(),
            content: NodeContent::Children(vec![NodeId::new("list-item-2")]),
        };

        let json = serde_json::to_string(&node).unwrap();
        let deserialized: Node = serde_json::from_str(&json).unwrap();

        assert_eq!(node, deserialized);
        assert_eq!(node.position_of(&NodeId::new("list-item-2")), Some(0));
    }
}
