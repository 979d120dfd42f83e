//! # Document Arena
//!
//! All nodes of one document, keyed by id.
//!
//! ## Invariants
//!
//! - Containers and lists store child ids, not nodes
//! - A node is owned by at most one parent, and appears in it at most once
//! - A node cannot be removed while a parent still references it
//!   (`DanglingReference`); callers unlink first
//! - Annotation ranges stay inside their text
//!
//! Every mutating method validates before touching anything, so a failed call
//! leaves the document as it was.

use crate::annotation::Annotation;
use crate::{
    DocumentError, DocumentResult, Node, NodeContent, NodeId, NodeSpec, Path, Schema, Selection,
    TextContent,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Value a [`Path`] resolves to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathValue<'a> {
    Text(&'a TextContent),
    Children(&'a [NodeId]),
}

#[derive(Debug, Clone)]
pub struct Document {
    schema: Arc<Schema>,
    nodes: BTreeMap<NodeId, Node>,

    /// child id -> parent id
    owners: HashMap<NodeId, NodeId>,

    next_id: u64,
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes && self.owners == other.owners
    }
}

impl Document {
    pub fn new(schema: Schema) -> Self {
        Self::with_schema(Arc::new(schema))
    }

    pub fn with_schema(schema: Arc<Schema>) -> Self {
        Self {
            schema,
            nodes: BTreeMap::new(),
            owners: HashMap::new(),
            next_id: 1,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn get(&self, id: &NodeId) -> DocumentResult<&Node> {
        self.nodes
            .get(id)
            .ok_or_else(|| DocumentError::NotFound(id.to_string()))
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Parent currently referencing `id`
    pub fn owner(&self, id: &NodeId) -> Option<&NodeId> {
        self.owners.get(id)
    }

    /// Allocate an unused id for a node of `node_type`
    pub fn allocate_id(&mut self, node_type: &str) -> NodeId {
        loop {
            let id = NodeId::new(format!("{}-{}", node_type, self.next_id));
            self.next_id += 1;
            if !self.nodes.contains_key(&id) {
                return id;
            }
        }
    }

    /// Create a node from a spec, assigning a fresh id
    pub fn create(&mut self, spec: NodeSpec) -> DocumentResult<NodeId> {
        self.schema.check_content(&spec.node_type, &spec.content)?;
        let id = self.allocate_id(&spec.node_type);
        self.insert_node(Node {
            id: id.clone(),
            node_type: spec.node_type,
            content: spec.content,
        })?;
        Ok(id)
    }

    /// Insert a fully formed node; its children become owned by it
    pub fn insert_node(&mut self, node: Node) -> DocumentResult<()> {
        if self.nodes.contains_key(&node.id) {
            return Err(DocumentError::DuplicateId(node.id));
        }
        self.schema.check_content(&node.node_type, &node.content)?;

        match &node.content {
            NodeContent::Text(text) => check_annotations(&node.id, text, &text.annotations)?,
            NodeContent::Children(children) => {
                for (i, child) in children.iter().enumerate() {
                    self.get(child)?;
                    if let Some(owner) = self.owners.get(child) {
                        return Err(DocumentError::AlreadyAttached {
                            node: child.clone(),
                            owner: owner.clone(),
                        });
                    }
                    if child == &node.id || children[..i].contains(child) {
                        return Err(DocumentError::AlreadyAttached {
                            node: child.clone(),
                            owner: node.id.clone(),
                        });
                    }
                }
            }
            NodeContent::Void => {}
        }

        if let Some(children) = node.children() {
            for child in children {
                self.owners.insert(child.clone(), node.id.clone());
            }
        }
        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    /// Remove a node that no parent references
    ///
    /// Its children are released, not removed.
    pub fn remove_node(&mut self, id: &NodeId) -> DocumentResult<Node> {
        self.get(id)?;
        if let Some(referrer) = self.owners.get(id) {
            return Err(DocumentError::DanglingReference {
                node: id.clone(),
                referrer: referrer.clone(),
            });
        }
        let node = self
            .nodes
            .remove(id)
            .ok_or_else(|| DocumentError::NotFound(id.to_string()))?;
        if let Some(children) = node.children() {
            for child in children {
                self.owners.remove(child);
            }
        }
        Ok(node)
    }

    pub fn children_of(&self, id: &NodeId) -> DocumentResult<&[NodeId]> {
        self.get(id)?
            .children()
            .ok_or_else(|| DocumentError::InvalidPath(Path::children(id).to_string()))
    }

    /// Position of `child` in `parent`'s children
    pub fn position_of(&self, parent: &NodeId, child: &NodeId) -> DocumentResult<usize> {
        self.children_of(parent)?
            .iter()
            .position(|c| c == child)
            .ok_or_else(|| DocumentError::NotFound(format!("{} in {}", child, parent)))
    }

    pub fn insert_child(&mut self, parent: &NodeId, index: usize, child: &NodeId) -> DocumentResult<()> {
        let len = self.children_of(parent)?.len();
        if index > len {
            return Err(DocumentError::OutOfRange {
                path: Path::children(parent).to_string(),
                offset: index,
                len,
            });
        }
        self.get(child)?;
        if let Some(owner) = self.owners.get(child) {
            return Err(DocumentError::AlreadyAttached {
                node: child.clone(),
                owner: owner.clone(),
            });
        }
        let mut ancestor = Some(parent);
        while let Some(current) = ancestor {
            if current == child {
                return Err(DocumentError::CycleDetected(child.clone(), parent.clone()));
            }
            ancestor = self.owners.get(current);
        }

        if let Some(Node {
            content: NodeContent::Children(children),
            ..
        }) = self.nodes.get_mut(parent)
        {
            children.insert(index, child.clone());
        }
        self.owners.insert(child.clone(), parent.clone());
        Ok(())
    }

    pub fn remove_child(&mut self, parent: &NodeId, index: usize) -> DocumentResult<NodeId> {
        let len = self.children_of(parent)?.len();
        if index >= len {
            return Err(DocumentError::OutOfRange {
                path: Path::children(parent).to_string(),
                offset: index,
                len,
            });
        }
        let child = match self.nodes.get_mut(parent) {
            Some(Node {
                content: NodeContent::Children(children),
                ..
            }) => children.remove(index),
            _ => return Err(DocumentError::InvalidPath(Path::children(parent).to_string())),
        };
        self.owners.remove(&child);
        Ok(child)
    }

    fn text_mut(&mut self, id: &NodeId) -> DocumentResult<&mut TextContent> {
        match self.nodes.get_mut(id) {
            Some(Node {
                content: NodeContent::Text(text),
                ..
            }) => Ok(text),
            Some(_) => Err(DocumentError::InvalidPath(Path::text(id).to_string())),
            None => Err(DocumentError::NotFound(id.to_string())),
        }
    }

    /// Insert `value` at character `offset`; annotations are left alone
    pub fn insert_text(&mut self, id: &NodeId, offset: usize, value: &str) -> DocumentResult<()> {
        let text = self.text_mut(id)?;
        let len = text.len();
        if offset > len {
            return Err(DocumentError::OutOfRange {
                path: Path::text(id).to_string(),
                offset,
                len,
            });
        }
        text.insert(offset, value);
        Ok(())
    }

    /// Delete characters `[start, end)` and return them; annotations are left alone
    pub fn delete_text(&mut self, id: &NodeId, start: usize, end: usize) -> DocumentResult<String> {
        let text = self.text_mut(id)?;
        let len = text.len();
        if start > end || end > len {
            return Err(DocumentError::OutOfRange {
                path: Path::text(id).to_string(),
                offset: if start > end { start } else { end },
                len,
            });
        }
        Ok(text.remove(start, end))
    }

    /// Replace the annotation set of a text node, returning the previous one
    pub fn set_annotations(&mut self, id: &NodeId, annotations: Vec<Annotation>) -> DocumentResult<Vec<Annotation>> {
        let text = self.text_mut(id)?;
        check_annotations(id, text, &annotations)?;
        Ok(std::mem::replace(&mut text.annotations, annotations))
    }

    /// Map a display path to its storage path
    ///
    /// Idempotent on concrete paths.
    pub fn real_path(&self, path: &Path) -> DocumentResult<Path> {
        match path {
            Path::Text { .. } | Path::Children { .. } => Ok(path.clone()),
            Path::ChildText { parent, index } => {
                let children = self.children_of(parent)?;
                let child = children.get(*index).ok_or_else(|| DocumentError::OutOfRange {
                    path: path.to_string(),
                    offset: *index,
                    len: children.len(),
                })?;
                Ok(Path::text(child))
            }
        }
    }

    pub fn resolve(&self, path: &Path) -> DocumentResult<PathValue<'_>> {
        match self.real_path(path)? {
            Path::Text { node } => self
                .get(&node)?
                .text()
                .map(PathValue::Text)
                .ok_or_else(|| DocumentError::InvalidPath(path.to_string())),
            Path::Children { node } => Ok(PathValue::Children(self.children_of(&node)?)),
            Path::ChildText { .. } => Err(DocumentError::InvalidPath(path.to_string())),
        }
    }

    /// Text property a path points at
    pub fn text(&self, path: &Path) -> DocumentResult<&TextContent> {
        match self.resolve(path)? {
            PathValue::Text(text) => Ok(text),
            PathValue::Children(_) => Err(DocumentError::InvalidPath(path.to_string())),
        }
    }

    /// Display path of a text node's content as seen from `container`
    ///
    /// Nodes directly in the container are addressed by id; nodes nested in a
    /// list are addressed through their parent and index.
    pub fn text_path(&self, id: &NodeId, container: &NodeId) -> DocumentResult<Path> {
        match self.owners.get(id) {
            Some(owner) if owner != container => {
                let index = self.position_of(owner, id)?;
                Ok(Path::child_text(owner, index))
            }
            _ => Ok(Path::text(id)),
        }
    }

    /// First text path inside `id`, descending into its first child if needed
    pub fn first_text_path(&self, id: &NodeId, container: &NodeId) -> DocumentResult<Option<Path>> {
        let node = self.get(id)?;
        match &node.content {
            NodeContent::Text(_) => Ok(Some(self.text_path(id, container)?)),
            NodeContent::Children(children) => match children.first() {
                Some(first) => self.first_text_path(first, container),
                None => Ok(None),
            },
            NodeContent::Void => Ok(None),
        }
    }

    /// Last text path inside `id`, descending into its last child if needed
    pub fn last_text_path(&self, id: &NodeId, container: &NodeId) -> DocumentResult<Option<Path>> {
        let node = self.get(id)?;
        match &node.content {
            NodeContent::Text(_) => Ok(Some(self.text_path(id, container)?)),
            NodeContent::Children(children) => match children.last() {
                Some(last) => self.last_text_path(last, container),
                None => Ok(None),
            },
            NodeContent::Void => Ok(None),
        }
    }

    /// The entry of `container` that contains the node a path points into
    pub fn top_level_node(&self, path: &Path, container: &NodeId) -> DocumentResult<NodeId> {
        let mut current = path.root().clone();
        loop {
            match self.owners.get(&current) {
                Some(owner) if owner == container => return Ok(current),
                Some(owner) => current = owner.clone(),
                None => {
                    return Err(DocumentError::NotFound(format!("{} in {}", path, container)));
                }
            }
        }
    }

    fn check_container(&self, id: &NodeId) -> DocumentResult<()> {
        let node = self.get(id)?;
        if node.node_type != self.schema.container_type() {
            return Err(DocumentError::InvalidPath(format!(
                "{} is a {}, not a {}",
                id,
                node.node_type,
                self.schema.container_type()
            )));
        }
        Ok(())
    }

    /// Check that a selection addresses something that exists
    pub fn validate_selection(&self, selection: &Selection) -> DocumentResult<()> {
        match selection {
            Selection::Null | Selection::Custom(_) => Ok(()),
            Selection::Property(sel) => {
                if let Some(container) = &sel.container_id {
                    self.check_container(container)?;
                }
                if sel.start_offset > sel.end_offset {
                    return Err(DocumentError::OutOfRange {
                        path: sel.path.to_string(),
                        offset: sel.start_offset,
                        len: sel.end_offset,
                    });
                }
                let text = self.text(&sel.path)?;
                if sel.end_offset > text.len() {
                    return Err(DocumentError::OutOfRange {
                        path: sel.path.to_string(),
                        offset: sel.end_offset,
                        len: text.len(),
                    });
                }
                Ok(())
            }
            Selection::Node(sel) => {
                self.check_container(&sel.container_id)?;
                self.position_of(&sel.container_id, &sel.node_id).map(|_| ())
            }
            Selection::Container(sel) => {
                self.check_container(&sel.container_id)?;
                for coordinate in [&sel.start, &sel.end] {
                    let text = self.text(&coordinate.path)?;
                    if coordinate.offset > text.len() {
                        return Err(DocumentError::OutOfRange {
                            path: coordinate.path.to_string(),
                            offset: coordinate.offset,
                            len: text.len(),
                        });
                    }
                    self.top_level_node(&coordinate.path, &sel.container_id)?;
                }
                Ok(())
            }
        }
    }
}

fn check_annotations(id: &NodeId, text: &TextContent, annotations: &[Annotation]) -> DocumentResult<()> {
    let len = text.len();
    for annotation in annotations {
        if annotation.start > annotation.end || annotation.end > len {
            return Err(DocumentError::OutOfRange {
                path: Path::text(id).to_string(),
                offset: annotation.end.max(annotation.start),
                len,
            });
        }
    }
    Ok(())
}
