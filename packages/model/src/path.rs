//! # Paths
//!
//! Addresses of properties inside the document.
//!
//! ```text
//! Text(p1)                 p1.content             concrete
//! Children(list-1)         list-1.items           concrete
//! ChildText(list-1, 2)     list-1.items[2].content   display path
//! ```
//!
//! Display paths are what a selection inside a list item carries. They are
//! resolved to concrete storage paths with
//! [`Document::real_path`](crate::Document::real_path).

use crate::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Path {
    /// Text property of a text-bearing node
    Text { node: NodeId },

    /// Ordered child sequence of a container or list
    Children { node: NodeId },

    /// Text property of the `index`-th child of `parent`
    ChildText { parent: NodeId, index: usize },
}

impl Path {
    pub fn text(node: impl Into<NodeId>) -> Self {
        Path::Text { node: node.into() }
    }

    pub fn children(node: impl Into<NodeId>) -> Self {
        Path::Children { node: node.into() }
    }

    pub fn child_text(parent: impl Into<NodeId>, index: usize) -> Self {
        Path::ChildText {
            parent: parent.into(),
            index,
        }
    }

    /// Outermost node the path goes through
    pub fn root(&self) -> &NodeId {
        match self {
            Path::Text { node } | Path::Children { node } => node,
            Path::ChildText { parent, .. } => parent,
        }
    }

    pub fn is_concrete(&self) -> bool {
        !matches!(self, Path::ChildText { .. })
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Path::Text { node } => write!(f, "{}.content", node),
            Path::Children { node } => write!(f, "{}.items", node),
            Path::ChildText { parent, index } => write!(f, "{}.items[{}].content", parent, index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Path::text("p1").to_string(), "p1.content");
        assert_eq!(Path::children("body").to_string(), "body.items");
        assert_eq!(Path::child_text("l1", 2).to_string(), "l1.items[2].content");
    }

    #[test]
    fn test_root_and_concreteness() {
        let display = Path::child_text("l1", 0);
        assert_eq!(display.root(), &NodeId::new("l1"));
        assert!(!display.is_concrete());
        assert!(Path::text("p1").is_concrete());
    }
}
