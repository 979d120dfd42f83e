//! # Editing Core
//!
//! `delete`, `break` and `type`, dispatched by selection shape.
//!
//! ## Flow
//!
//! ```text
//! selection null/custom? ──yes──→ no-op
//!        │ no
//!        ↓
//! open transaction → per-shape algorithm → (registry handler) → new selection
//!        │
//!        ↓
//! commit  |  InvalidPrecondition/Unhandled → logged no-op
//!         |  structural error → discarded, returned to caller
//! ```
//!
//! Every edit runs in exactly one transaction. Handlers looked up from the
//! [`BehaviorRegistry`] run inside that transaction and never open another.

use crate::behavior::{BehaviorRegistry, BreakArgs, EditingBehavior, MergeArgs};
use crate::config::EditorConfig;
use crate::list_editing::ListEditing;
use crate::text_editing::TextEditing;
use crate::text_ops;
use crate::transaction::Update;
use crate::{DocumentChange, EditingSession, EditorError, Transaction};
use prose_model::{
    ContainerSelection, Direction, NodeId, NodeSelection, NodeSelectionMode, Path, PropertySelection, Selection,
    SelectionPatch,
};
use std::ops::Range;

/// Behavior packages that can be named in configuration
fn behavior_by_name(name: &str) -> Option<Box<dyn EditingBehavior>> {
    match name {
        "text" => Some(Box::new(TextEditing)),
        "list" => Some(Box::new(ListEditing)),
        _ => None,
    }
}

#[derive(Debug)]
pub struct Editing {
    behaviors: BehaviorRegistry,
}

impl Default for Editing {
    fn default() -> Self {
        Self::with_default_behaviors()
    }
}

impl Editing {
    pub fn new(behaviors: BehaviorRegistry) -> Self {
        Self { behaviors }
    }

    /// Text and list behaviors, in that order
    pub fn with_default_behaviors() -> Self {
        let mut behaviors = BehaviorRegistry::new();
        behaviors.register(&TextEditing).register(&ListEditing);
        Self::new(behaviors)
    }

    /// Register the behaviors named in `config`, in the order given
    pub fn from_config(config: &EditorConfig) -> Result<Self, EditorError> {
        let mut behaviors = BehaviorRegistry::new();
        for name in &config.behaviors {
            let behavior =
                behavior_by_name(name).ok_or_else(|| EditorError::Config(format!("unknown behavior '{}'", name)))?;
            behaviors.register(behavior.as_ref());
        }
        Ok(Self::new(behaviors))
    }

    pub fn behaviors(&self) -> &BehaviorRegistry {
        &self.behaviors
    }

    pub fn behaviors_mut(&mut self) -> &mut BehaviorRegistry {
        &mut self.behaviors
    }

    /// Delete in `direction` from the current selection
    pub fn delete<S: EditingSession>(
        &self,
        session: &mut S,
        direction: Direction,
    ) -> Result<Option<DocumentChange>, EditorError> {
        if !is_editable(session.selection(), "delete") {
            return Ok(None);
        }
        let result = session.transaction("delete", |tx| {
            let selection = tx.selection.clone();
            tx.selection = self.delete_selection(tx, selection, direction)?;
            Ok(())
        });
        settle("delete", result)
    }

    /// Split at the current selection
    pub fn insert_break<S: EditingSession>(&self, session: &mut S) -> Result<Option<DocumentChange>, EditorError> {
        if !is_editable(session.selection(), "break") {
            return Ok(None);
        }
        let result = session.transaction("break", |tx| {
            let selection = tx.selection.clone();
            tx.selection = self.break_selection(tx, selection)?;
            Ok(())
        });
        settle("break", result)
    }

    /// Insert `text` at a collapsed caret
    pub fn type_text<S: EditingSession>(&self, session: &mut S, text: &str) -> Result<Option<DocumentChange>, EditorError> {
        if !is_editable(session.selection(), "type") {
            return Ok(None);
        }
        if text.is_empty() {
            tracing::debug!("type: nothing to insert");
            return Ok(None);
        }
        let result = session.transaction("type", |tx| {
            let sel = match &tx.selection {
                Selection::Property(sel) if sel.is_collapsed() => sel.clone(),
                other => {
                    return Err(EditorError::InvalidPrecondition(format!(
                        "cannot type into a {} selection",
                        shape(other)
                    )))
                }
            };
            text_ops::insert_text(tx, &sel.path, sel.start_offset, text)?;

            let offset = sel.start_offset + text.chars().count();
            tx.selection = sel.create_with(caret_at(offset)).into();
            Ok(())
        });
        settle("type", result)
    }

    fn delete_selection(
        &self,
        tx: &mut Transaction,
        selection: Selection,
        direction: Direction,
    ) -> Result<Selection, EditorError> {
        match selection {
            Selection::Null | Selection::Custom(_) => Ok(selection),
            Selection::Node(sel) => delete_node(tx, sel, direction),
            Selection::Property(sel) if sel.is_collapsed() => self.delete_character(tx, sel, direction),
            Selection::Property(sel) => {
                text_ops::delete_text(tx, &sel.path, sel.start_offset, sel.end_offset)?;
                Ok(sel.collapse(Direction::Left).into())
            }
            Selection::Container(sel) => self.delete_container(tx, sel),
        }
    }

    fn delete_character(
        &self,
        tx: &mut Transaction,
        sel: PropertySelection,
        direction: Direction,
    ) -> Result<Selection, EditorError> {
        let real = tx.get_real_path(&sel.path)?;
        let len = tx.text(&real)?.len();
        let offset = sel.start_offset;

        let (start, end) = match direction {
            Direction::Left if offset == 0 => return self.merge_at_boundary(tx, sel, direction),
            Direction::Right if offset >= len => return self.merge_at_boundary(tx, sel, direction),
            Direction::Left => (offset - 1, offset),
            Direction::Right => (offset, offset + 1),
        };
        text_ops::delete_text(tx, &real, start, end)?;
        Ok(sel.create_with(caret_at(start)).into())
    }

    fn merge_at_boundary(
        &self,
        tx: &mut Transaction,
        sel: PropertySelection,
        direction: Direction,
    ) -> Result<Selection, EditorError> {
        let container = sel
            .container_id
            .clone()
            .ok_or_else(|| EditorError::InvalidPrecondition("merging needs a container".to_string()))?;
        let node = tx.get_real_path(&sel.path)?.root().clone();
        let (first, second) = boundary_pair(tx, &node, &container, direction)?;
        self.merge(tx, &first, &second, container, sel.into(), direction)
    }

    fn merge(
        &self,
        tx: &mut Transaction,
        first: &NodeId,
        second: &NodeId,
        container_id: NodeId,
        selection: Selection,
        direction: Direction,
    ) -> Result<Selection, EditorError> {
        let first = tx.get(first)?.clone();
        let second = tx.get(second)?.clone();
        let handler = self
            .behaviors
            .find_merge(tx.schema(), &first.node_type, &second.node_type)
            .ok_or_else(|| {
                EditorError::Unhandled(format!("no merge behavior for {} + {}", first.node_type, second.node_type))
            })?;

        handler(
            tx,
            MergeArgs {
                first,
                second,
                container_id,
                selection,
                direction,
            },
        )
    }

    fn delete_container(&self, tx: &mut Transaction, sel: ContainerSelection) -> Result<Selection, EditorError> {
        match truncate(tx, &sel)? {
            Truncated::Within { path, start, end } => {
                text_ops::delete_text(tx, &path, start, end)?;
                Ok(tx.caret(path, start, &sel.container_id))
            }
            Truncated::Across { first, second } => {
                let caret = tx.caret(sel.start.path.clone(), sel.start.offset, &sel.container_id);
                self.merge(tx, &first, &second, sel.container_id.clone(), caret, Direction::Left)
            }
        }
    }

    fn break_selection(&self, tx: &mut Transaction, selection: Selection) -> Result<Selection, EditorError> {
        match selection {
            Selection::Null | Selection::Custom(_) => Ok(selection),
            Selection::Node(sel) => break_node(tx, sel),
            Selection::Property(sel) => self.break_property(tx, sel),
            Selection::Container(sel) => self.break_container(tx, sel),
        }
    }

    fn break_property(&self, tx: &mut Transaction, sel: PropertySelection) -> Result<Selection, EditorError> {
        let container = sel
            .container_id
            .clone()
            .ok_or_else(|| EditorError::InvalidPrecondition("breaking needs a container".to_string()))?;

        let sel = if sel.is_collapsed() {
            sel
        } else {
            text_ops::delete_text(tx, &sel.path, sel.start_offset, sel.end_offset)?;
            sel.collapse(Direction::Left)
        };

        // items are dispatched to their list, everything else to itself
        let node = tx.get_real_path(&sel.path)?.root().clone();
        let path = tx.document().text_path(&node, &container)?;
        let target = match &path {
            Path::ChildText { parent, .. } => parent.clone(),
            _ => node,
        };
        let target = tx.get(&target)?.clone();

        let handler = self
            .behaviors
            .find_break(tx.schema(), &target.node_type)
            .ok_or_else(|| EditorError::Unhandled(format!("no break behavior for {}", target.node_type)))?;

        let selection = sel.create_with(SelectionPatch {
            path: Some(path),
            ..Default::default()
        });
        handler(
            tx,
            BreakArgs {
                selection,
                container_id: container,
                node: target,
            },
        )
    }

    fn break_container(&self, tx: &mut Transaction, sel: ContainerSelection) -> Result<Selection, EditorError> {
        match truncate(tx, &sel)? {
            Truncated::Within { path, start, end } => {
                let mut within = PropertySelection::new(path, start, end).in_container(&sel.container_id);
                within.surface_id = sel.surface_id.clone();
                self.break_property(tx, within)
            }
            Truncated::Across { second, .. } => {
                let container = &sel.container_id;
                match tx.document().first_text_path(&second, container)? {
                    Some(path) => Ok(tx.caret(path, 0, container)),
                    None => {
                        let mut next = NodeSelection::new(second, NodeSelectionMode::Before, container);
                        next.surface_id = sel.surface_id.clone();
                        Ok(next.into())
                    }
                }
            }
        }
    }
}

fn is_editable(selection: &Selection, action: &str) -> bool {
    match selection {
        Selection::Null => {
            tracing::debug!(action, "no selection, nothing to do");
            false
        }
        Selection::Custom(sel) => {
            tracing::debug!(action, custom_type = %sel.custom_type, "custom selection is left to its component");
            false
        }
        _ => true,
    }
}

fn settle(
    action: &str,
    result: Result<Option<DocumentChange>, EditorError>,
) -> Result<Option<DocumentChange>, EditorError> {
    match result {
        Err(err) if err.is_no_op() => {
            tracing::debug!(action, reason = %err, "edit skipped");
            Ok(None)
        }
        Err(err) => {
            tracing::warn!(action, error = %err, "edit failed, nothing committed");
            Err(err)
        }
        ok => ok,
    }
}

fn shape(selection: &Selection) -> &'static str {
    match selection {
        Selection::Null => "null",
        Selection::Property(_) => "range",
        Selection::Node(_) => "node",
        Selection::Container(_) => "container",
        Selection::Custom(_) => "custom",
    }
}

fn caret_at(offset: usize) -> SelectionPatch {
    SelectionPatch {
        start_offset: Some(offset),
        end_offset: Some(offset),
        ..Default::default()
    }
}

fn owner_of(tx: &Transaction, id: &NodeId) -> Result<NodeId, EditorError> {
    tx.document()
        .owner(id)
        .cloned()
        .ok_or_else(|| EditorError::InvalidPrecondition(format!("{} is not attached", id)))
}

/// Node selection delete
///
/// A whole node, or the edge facing the delete, is replaced by an empty text
/// node. Otherwise the caret moves into the neighbour on the delete side.
fn delete_node(tx: &mut Transaction, sel: NodeSelection, direction: Direction) -> Result<Selection, EditorError> {
    let container = &sel.container_id;
    let replaces = matches!(
        (sel.mode, direction),
        (NodeSelectionMode::Full, _)
            | (NodeSelectionMode::Before, Direction::Right)
            | (NodeSelectionMode::After, Direction::Left)
    );

    if replaces {
        let position = tx.hide(container, &sel.node_id)?;
        tx.delete(&sel.node_id)?;
        let created = tx.create_default_text_node()?;
        tx.show(container, &created, position)?;
        return Ok(tx.caret(Path::text(&created), 0, container));
    }

    let position = tx.position_of(container, &sel.node_id)?;
    let siblings = tx.children(container)?;
    let neighbour = match direction {
        Direction::Left => position.checked_sub(1).and_then(|i| siblings.get(i)),
        Direction::Right => siblings.get(position + 1),
    }
    .cloned()
    .ok_or_else(|| EditorError::InvalidPrecondition(format!("nothing {:?} of {}", direction, sel.node_id)))?;

    let path = match direction {
        Direction::Left => tx.document().last_text_path(&neighbour, container)?,
        Direction::Right => tx.document().first_text_path(&neighbour, container)?,
    };
    match path {
        Some(path) => {
            let offset = match direction {
                Direction::Left => tx.text(&path)?.len(),
                Direction::Right => 0,
            };
            Ok(tx.caret(path, offset, container))
        }
        None => {
            let mode = match direction {
                Direction::Left => NodeSelectionMode::After,
                Direction::Right => NodeSelectionMode::Before,
            };
            let mut next = NodeSelection::new(neighbour, mode, container);
            next.surface_id = sel.surface_id.clone();
            Ok(next.into())
        }
    }
}

fn break_node(tx: &mut Transaction, sel: NodeSelection) -> Result<Selection, EditorError> {
    let container = sel.container_id.clone();
    let created = tx.create_default_text_node()?;

    match sel.mode {
        NodeSelectionMode::Before => {
            let position = tx.position_of(&container, &sel.node_id)?;
            tx.show(&container, &created, position)?;
            Ok(sel.into())
        }
        NodeSelectionMode::After => {
            let position = tx.position_of(&container, &sel.node_id)?;
            tx.show(&container, &created, position + 1)?;
            Ok(tx.caret(Path::text(&created), 0, &container))
        }
        NodeSelectionMode::Full => {
            let position = tx.hide(&container, &sel.node_id)?;
            tx.delete(&sel.node_id)?;
            tx.show(&container, &created, position)?;
            Ok(tx.caret(Path::text(&created), 0, &container))
        }
    }
}

/// The two nodes a boundary delete on `node` joins
///
/// Siblings in the innermost sequence pair up first; at the edge of a nested
/// sequence (a list) the search moves out to the sequence's own neighbours.
fn boundary_pair(
    tx: &Transaction,
    node: &NodeId,
    container: &NodeId,
    direction: Direction,
) -> Result<(NodeId, NodeId), EditorError> {
    let doc = tx.document();
    let mut current = node.clone();
    loop {
        let owner = owner_of(tx, &current)?;
        let siblings = doc.children_of(&owner)?;
        let index = doc.position_of(&owner, &current)?;
        let neighbour = match direction {
            Direction::Left => index.checked_sub(1).and_then(|i| siblings.get(i)),
            Direction::Right => siblings.get(index + 1),
        };

        if let Some(neighbour) = neighbour {
            return Ok(match direction {
                Direction::Left => (neighbour.clone(), current),
                Direction::Right => (current, neighbour.clone()),
            });
        }
        if &owner == container {
            return Err(EditorError::InvalidPrecondition(format!(
                "nothing to merge {:?} of {}",
                direction, node
            )));
        }
        current = owner;
    }
}

/// Outcome of cutting a container range down to its two end fragments
enum Truncated {
    /// Both ends are in one text node; nothing has been changed yet
    Within { path: Path, start: usize, end: usize },

    /// Interior removed; `first` and `second` are the fragments left over
    Across { first: NodeId, second: NodeId },
}

/// Cut the text and items covered by a container selection
///
/// Drops the tail of the start node, the head of the end node, list items
/// past either end and every container entry strictly between the two.
fn truncate(tx: &mut Transaction, sel: &ContainerSelection) -> Result<Truncated, EditorError> {
    let container = &sel.container_id;
    let start_node = tx.get_real_path(&sel.start.path)?.root().clone();
    let end_node = tx.get_real_path(&sel.end.path)?.root().clone();

    if start_node == end_node {
        return Ok(Truncated::Within {
            path: sel.start.path.clone(),
            start: sel.start.offset.min(sel.end.offset),
            end: sel.start.offset.max(sel.end.offset),
        });
    }

    let start_top = tx.document().top_level_node(&sel.start.path, container)?;
    let end_top = tx.document().top_level_node(&sel.end.path, container)?;
    let start_position = tx.position_of(container, &start_top)?;
    let end_position = tx.position_of(container, &end_top)?;
    if start_position > end_position {
        return Err(EditorError::InvalidPrecondition(
            "container selection ends before it starts".to_string(),
        ));
    }

    // both ends inside one list: the items have to be in document order too
    let shared = if start_top == end_top {
        let list = owner_of(tx, &start_node)?;
        if owner_of(tx, &end_node)? != list {
            return Err(EditorError::InvalidPrecondition(format!(
                "{} and {} are not in the same sequence",
                start_node, end_node
            )));
        }
        let from = tx.position_of(&list, &start_node)?;
        let to = tx.position_of(&list, &end_node)?;
        if from >= to {
            return Err(EditorError::InvalidPrecondition(
                "container selection ends before it starts".to_string(),
            ));
        }
        Some((list, from, to))
    } else {
        None
    };

    let start_len = tx.text(&Path::text(&start_node))?.len();
    text_ops::delete_text(tx, &Path::text(&start_node), sel.start.offset, start_len)?;
    text_ops::delete_text(tx, &Path::text(&end_node), 0, sel.end.offset)?;

    if let Some((list, from, to)) = shared {
        remove_items(tx, &list, from + 1..to)?;
        return Ok(Truncated::Across {
            first: start_node,
            second: end_node,
        });
    }

    if start_top != start_node {
        let list = owner_of(tx, &start_node)?;
        let from = tx.position_of(&list, &start_node)?;
        let len = tx.children(&list)?.len();
        remove_items(tx, &list, from + 1..len)?;
    }
    if end_top != end_node {
        let list = owner_of(tx, &end_node)?;
        let to = tx.position_of(&list, &end_node)?;
        remove_items(tx, &list, 0..to)?;
    }
    for position in (start_position + 1..end_position).rev() {
        let id = tx.children(container)?[position].clone();
        tx.hide(container, &id)?;
        tx.delete(&id)?;
    }

    Ok(Truncated::Across {
        first: start_top,
        second: end_top,
    })
}

/// Unlink and delete the items of `list` in `range`
fn remove_items(tx: &mut Transaction, list: &NodeId, range: Range<usize>) -> Result<(), EditorError> {
    for index in range.rev() {
        let id = tx.children(list)?[index].clone();
        tx.update(&Path::children(list), Update::Delete { offset: index })?;
        tx.delete(&id)?;
    }
    Ok(())
}
