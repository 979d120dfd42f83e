//! # Transactions
//!
//! A transaction stages every mutation of one edit on a private copy of the
//! document and records each step as an invertible [`Operation`].
//!
//! ## Lifecycle
//!
//! ```text
//! open (clone doc) → get/create/delete/update ... → commit | discard
//! ```
//!
//! Nothing is visible outside until the session commits the staged document.
//! Dropping a transaction discards it, so an error anywhere in an edit leaves
//! the session's document exactly as it was.

use prose_model::{
    Annotation, Document, DocumentError, Node, NodeId, NodeSpec, Operation, Path, PropertySelection, Schema,
    Selection, SurfaceId, TextContent,
};
use crate::EditorError;

/// Mutation of the value at a path
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    /// Insert an id into an ordered sequence
    Insert { offset: usize, value: NodeId },

    /// Remove the id at `offset` from an ordered sequence
    Delete { offset: usize },

    InsertText { offset: usize, text: String },

    DeleteText { start: usize, end: usize },
}

pub struct Transaction {
    doc: Document,
    operations: Vec<Operation>,

    /// Selection the edit started from; handlers replace it with the result
    pub selection: Selection,

    /// Surface the edit was issued on
    pub surface_id: Option<SurfaceId>,
}

impl Transaction {
    pub(crate) fn new(doc: Document, selection: Selection, surface_id: Option<SurfaceId>) -> Self {
        Self {
            doc,
            operations: Vec::new(),
            selection,
            surface_id,
        }
    }

    pub(crate) fn into_parts(self) -> (Document, Vec<Operation>, Selection) {
        (self.doc, self.operations, self.selection)
    }

    /// Staged document, including every change made so far
    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn schema(&self) -> &Schema {
        self.doc.schema()
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn get(&self, id: &NodeId) -> Result<&Node, EditorError> {
        Ok(self.doc.get(id)?)
    }

    pub fn text(&self, path: &Path) -> Result<&TextContent, EditorError> {
        Ok(self.doc.text(path)?)
    }

    pub fn children(&self, id: &NodeId) -> Result<&[NodeId], EditorError> {
        Ok(self.doc.children_of(id)?)
    }

    pub fn position_of(&self, parent: &NodeId, child: &NodeId) -> Result<usize, EditorError> {
        Ok(self.doc.position_of(parent, child)?)
    }

    pub fn get_real_path(&self, path: &Path) -> Result<Path, EditorError> {
        Ok(self.doc.real_path(path)?)
    }

    fn apply(&mut self, op: Operation) -> Result<(), EditorError> {
        op.apply(&mut self.doc)?;
        self.operations.push(op);
        Ok(())
    }

    /// Create a node; the id is assigned by the document
    pub fn create(&mut self, spec: NodeSpec) -> Result<NodeId, EditorError> {
        self.doc.schema().check_content(&spec.node_type, &spec.content)?;
        let id = self.doc.allocate_id(&spec.node_type);
        self.apply(Operation::Create {
            node: Node {
                id: id.clone(),
                node_type: spec.node_type,
                content: spec.content,
            },
        })?;
        Ok(id)
    }

    /// Create an empty node of the schema's default text type
    pub fn create_default_text_node(&mut self) -> Result<NodeId, EditorError> {
        let node_type = self.doc.schema().default_text_type().to_string();
        self.create(NodeSpec::text(node_type, ""))
    }

    /// Delete a node and everything it owns
    ///
    /// Fails with `DanglingReference` while a parent still lists the node.
    pub fn delete(&mut self, id: &NodeId) -> Result<(), EditorError> {
        self.doc.get(id)?;
        if let Some(referrer) = self.doc.owner(id) {
            return Err(DocumentError::DanglingReference {
                node: id.clone(),
                referrer: referrer.clone(),
            }
            .into());
        }

        // parents before children, so each removal sees an unowned node
        let mut pending = vec![id.clone()];
        while let Some(next) = pending.pop() {
            let node = self.doc.get(&next)?.clone();
            if let Some(children) = node.children() {
                pending.extend(children.iter().rev().cloned());
            }
            self.apply(Operation::Delete { node })?;
        }
        Ok(())
    }

    pub fn update(&mut self, path: &Path, update: Update) -> Result<(), EditorError> {
        let real = self.get_real_path(path)?;
        match (real, update) {
            (Path::Children { node }, Update::Insert { offset, value }) => {
                self.apply(Operation::InsertChild {
                    parent: node,
                    index: offset,
                    child: value,
                })
            }
            (Path::Children { node }, Update::Delete { offset }) => {
                let children = self.doc.children_of(&node)?;
                let child = children.get(offset).cloned().ok_or_else(|| DocumentError::OutOfRange {
                    path: path.to_string(),
                    offset,
                    len: children.len(),
                })?;
                self.apply(Operation::RemoveChild {
                    parent: node,
                    index: offset,
                    child,
                })
            }
            (Path::Text { node }, Update::InsertText { offset, text }) => {
                self.apply(Operation::InsertText { node, offset, text })
            }
            (Path::Text { node }, Update::DeleteText { start, end }) => {
                let content = self.doc.text(&Path::text(&node))?;
                if start > end || end > content.len() {
                    return Err(DocumentError::OutOfRange {
                        path: path.to_string(),
                        offset: if start > end { start } else { end },
                        len: content.len(),
                    }
                    .into());
                }
                let text = content.slice(start, end);
                self.apply(Operation::DeleteText {
                    node,
                    offset: start,
                    text,
                })
            }
            (real, update) => Err(DocumentError::InvalidPath(format!("{:?} on {}", update, real)).into()),
        }
    }

    pub fn insert_text(&mut self, path: &Path, offset: usize, text: &str) -> Result<(), EditorError> {
        self.update(
            path,
            Update::InsertText {
                offset,
                text: text.to_string(),
            },
        )
    }

    pub fn delete_text(&mut self, path: &Path, start: usize, end: usize) -> Result<(), EditorError> {
        self.update(path, Update::DeleteText { start, end })
    }

    /// Replace the annotation set of a text node
    pub fn set_annotations(&mut self, id: &NodeId, annotations: Vec<Annotation>) -> Result<(), EditorError> {
        let before = self
            .doc
            .get(id)?
            .text()
            .map(|text| text.annotations.clone())
            .ok_or_else(|| DocumentError::InvalidPath(Path::text(id).to_string()))?;
        if before == annotations {
            return Ok(());
        }
        self.apply(Operation::SetAnnotations {
            node: id.clone(),
            before,
            after: annotations,
        })
    }

    /// Insert `node` into `container` at `position`
    pub fn show(&mut self, container: &NodeId, node: &NodeId, position: usize) -> Result<(), EditorError> {
        self.update(
            &Path::children(container),
            Update::Insert {
                offset: position,
                value: node.clone(),
            },
        )
    }

    /// Remove `node` from `container` without deleting it; returns its old position
    pub fn hide(&mut self, container: &NodeId, node: &NodeId) -> Result<usize, EditorError> {
        let position = self.position_of(container, node)?;
        self.update(&Path::children(container), Update::Delete { offset: position })?;
        Ok(position)
    }

    /// Collapsed caret in `container`, stamped with the edit's surface
    pub fn caret(&self, path: Path, offset: usize, container: &NodeId) -> Selection {
        let mut sel = PropertySelection::collapsed(path, offset).in_container(container);
        sel.surface_id = self
            .selection
            .surface_id()
            .map(str::to_string)
            .or_else(|| self.surface_id.clone());
        sel.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transaction() -> (Transaction, NodeId, NodeId) {
        let mut doc = Document::new(Schema::prose());
        let p = doc.create(NodeSpec::text("paragraph", "hello")).unwrap();
        let body = doc.create(NodeSpec::children("container", vec![p.clone()])).unwrap();
        (Transaction::new(doc, Selection::Null, None), body, p)
    }

    #[test]
    fn test_delete_referenced_node_fails() {
        let (mut tx, body, p) = transaction();
        let result = tx.delete(&p);
        assert_eq!(
            result,
            Err(EditorError::Document(DocumentError::DanglingReference {
                node: p.clone(),
                referrer: body.clone(),
            }))
        );
        assert!(tx.operations().is_empty());

        tx.hide(&body, &p).unwrap();
        tx.delete(&p).unwrap();
        assert!(tx.get(&p).is_err());
    }

    #[test]
    fn test_delete_cascades_to_children() {
        let (mut tx, body, _p) = transaction();
        let item = tx.create(NodeSpec::text("list-item", "x")).unwrap();
        let list = tx.create(NodeSpec::children("list", vec![item.clone()])).unwrap();
        tx.show(&body, &list, 1).unwrap();

        tx.hide(&body, &list).unwrap();
        tx.delete(&list).unwrap();

        assert!(tx.get(&list).is_err());
        assert!(tx.get(&item).is_err());
    }

    #[test]
    fn test_update_text_out_of_range() {
        let (mut tx, _body, p) = transaction();
        let result = tx.delete_text(&Path::text(&p), 3, 9);
        assert!(matches!(
            result,
            Err(EditorError::Document(DocumentError::OutOfRange { .. }))
        ));

        tx.delete_text(&Path::text(&p), 1, 3).unwrap();
        assert_eq!(tx.text(&Path::text(&p)).unwrap().text, "hlo");
    }

    #[test]
    fn test_update_rejects_mismatched_path() {
        let (mut tx, body, _p) = transaction();
        let result = tx.update(&Path::children(&body), Update::DeleteText { start: 0, end: 1 });
        assert!(matches!(
            result,
            Err(EditorError::Document(DocumentError::InvalidPath(_)))
        ));
    }

    #[test]
    fn test_every_step_is_recorded() {
        let (mut tx, body, p) = transaction();
        let q = tx.create_default_text_node().unwrap();
        tx.show(&body, &q, 1).unwrap();
        tx.insert_text(&Path::text(&p), 5, "!").unwrap();

        let names: Vec<&str> = tx.operations().iter().map(|op| op.name()).collect();
        assert_eq!(names, vec!["create", "insert-child", "insert-text"]);
        assert_eq!(tx.get(&q).unwrap().node_type, "paragraph");
    }
}
