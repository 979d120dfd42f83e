//! # Primitive Operations
//!
//! The smallest recorded changes to a [`Document`]. Every edit is a sequence
//! of these, and every operation carries enough state to build its inverse:
//!
//! | Operation        | Inverse          |
//! |------------------|------------------|
//! | `Create`         | `Delete`         |
//! | `InsertChild`    | `RemoveChild`    |
//! | `InsertText`     | `DeleteText`     |
//! | `SetAnnotations` | `SetAnnotations` with before/after swapped |

use crate::annotation::Annotation;
use crate::{Document, DocumentError, DocumentResult, Node, NodeId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Operation {
    Create {
        node: Node,
    },

    Delete {
        node: Node,
    },

    InsertChild {
        parent: NodeId,
        index: usize,
        child: NodeId,
    },

    RemoveChild {
        parent: NodeId,
        index: usize,
        child: NodeId,
    },

    InsertText {
        node: NodeId,
        offset: usize,
        text: String,
    },

    DeleteText {
        node: NodeId,
        offset: usize,
        text: String,
    },

    SetAnnotations {
        node: NodeId,
        before: Vec<Annotation>,
        after: Vec<Annotation>,
    },
}

impl Operation {
    /// Apply this operation to the document
    pub fn apply(&self, doc: &mut Document) -> DocumentResult<()> {
        match self {
            Operation::Create { node } => doc.insert_node(node.clone()),

            Operation::Delete { node } => doc.remove_node(&node.id).map(|_| ()),

            Operation::InsertChild { parent, index, child } => doc.insert_child(parent, *index, child),

            Operation::RemoveChild { parent, index, child } => {
                let actual = doc
                    .children_of(parent)?
                    .get(*index)
                    .cloned()
                    .ok_or_else(|| DocumentError::NotFound(format!("{} in {}", child, parent)))?;
                if &actual != child {
                    return Err(DocumentError::NotFound(format!("{} at {} in {}", child, index, parent)));
                }
                doc.remove_child(parent, *index).map(|_| ())
            }

            Operation::InsertText { node, offset, text } => doc.insert_text(node, *offset, text),

            Operation::DeleteText { node, offset, text } => {
                let end = offset + text.chars().count();
                doc.delete_text(node, *offset, end).map(|_| ())
            }

            Operation::SetAnnotations { node, after, .. } => {
                doc.set_annotations(node, after.clone()).map(|_| ())
            }
        }
    }

    /// Operation that undoes this one
    pub fn inverse(&self) -> Operation {
        match self.clone() {
            Operation::Create { node } => Operation::Delete { node },
            Operation::Delete { node } => Operation::Create { node },
            Operation::InsertChild { parent, index, child } => Operation::RemoveChild { parent, index, child },
            Operation::RemoveChild { parent, index, child } => Operation::InsertChild { parent, index, child },
            Operation::InsertText { node, offset, text } => Operation::DeleteText { node, offset, text },
            Operation::DeleteText { node, offset, text } => Operation::InsertText { node, offset, text },
            Operation::SetAnnotations { node, before, after } => Operation::SetAnnotations {
                node,
                before: after,
                after: before,
            },
        }
    }

    /// Get a debug name for this operation
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Create { .. } => "create",
            Operation::Delete { .. } => "delete",
            Operation::InsertChild { .. } => "insert-child",
            Operation::RemoveChild { .. } => "remove-child",
            Operation::InsertText { .. } => "insert-text",
            Operation::DeleteText { .. } => "delete-text",
            Operation::SetAnnotations { .. } => "set-annotations",
        }
    }
}
