//! # Change Records
//!
//! What one committed transaction did, in a form that can be reverted.
//!
//! ## Design
//!
//! - Each primitive operation carries the state its inverse needs
//! - Reverting applies the inverses in reverse order
//! - Selections before and after are kept so a revert restores the caret too
//!
//! Keeping a history of changes (undo/redo stacks, grouping) is up to the
//! host; this module only makes a single change reversible.

use prose_model::{Document, DocumentResult, Operation, Selection};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentChange {
    /// The operations in this change (in application order)
    pub operations: Vec<Operation>,

    pub selection_before: Selection,
    pub selection_after: Selection,

    /// Optional description of this change, e.g. the edit action
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl DocumentChange {
    pub fn new(operations: Vec<Operation>, selection_before: Selection, selection_after: Selection) -> Self {
        Self {
            operations,
            selection_before,
            selection_after,
            description: None,
        }
    }

    /// Add a description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whether the document content was touched (as opposed to only the selection)
    pub fn touches_document(&self) -> bool {
        !self.operations.is_empty()
    }

    /// Change that undoes this one
    pub fn inverse(&self) -> DocumentChange {
        DocumentChange {
            operations: self.operations.iter().rev().map(Operation::inverse).collect(),
            selection_before: self.selection_after.clone(),
            selection_after: self.selection_before.clone(),
            description: self.description.clone(),
        }
    }

    /// Apply the operations of this change to `doc`
    ///
    /// Stops at the first failing operation; callers wanting atomicity apply
    /// to a copy.
    pub fn apply_to(&self, doc: &mut Document) -> DocumentResult<()> {
        for op in &self.operations {
            op.apply(doc)?;
        }
        Ok(())
    }
}
