//! # List Editing
//!
//! Merge and break handlers for list nodes. A list owns an ordered sequence
//! of item ids; carets inside items use display paths
//! (`Path::ChildText { parent: list, index }`).
//!
//! ## Break at item `i`, offset `o`, item length `L`
//!
//! | Case              | Result                                        |
//! |-------------------|-----------------------------------------------|
//! | `o == 0, L == 0`  | split the list at the empty item              |
//! | `o == 0, L > 0`   | new empty item at `i`                         |
//! | `0 < o < L`       | item keeps `[0, o)`, new item `i+1` gets rest |
//! | `o == L`          | new empty item at `i+1`                       |
//!
//! Splitting the list at an empty pivot turns the pivot into a default text
//! node between the two halves (or before/after the list at its edges, or in
//! place of a one-item list).

use crate::behavior::{BehaviorRegistry, BreakArgs, EditingBehavior, MergeArgs};
use crate::text_ops;
use crate::transaction::Update;
use crate::{EditorError, Transaction};
use prose_model::{Category, Direction, NodeId, NodeSpec, Path, Selection};

#[derive(Debug, Default, Clone, Copy)]
pub struct ListEditing;

impl ListEditing {
    pub const LIST: &'static str = "list";
}

impl EditingBehavior for ListEditing {
    fn name(&self) -> &'static str {
        "list"
    }

    fn register(&self, registry: &mut BehaviorRegistry) {
        registry
            .define_merge(Self::LIST, Self::LIST, merge_lists)
            .define_merge(Self::LIST, Category::TEXTISH, merge_text_into_list)
            .define_merge(Category::TEXTISH, Self::LIST, merge_list_into_text)
            .define_break(Self::LIST, break_list);
    }
}

fn owner_of(tx: &Transaction, id: &NodeId) -> Result<NodeId, EditorError> {
    tx.document()
        .owner(id)
        .cloned()
        .ok_or_else(|| EditorError::InvalidPrecondition(format!("{} is not attached", id)))
}

/// Move every item of `second` to the end of `first`, then drop `second`
fn merge_lists(tx: &mut Transaction, args: MergeArgs) -> Result<Selection, EditorError> {
    let first = args.first.id.clone();
    let second = args.second.id.clone();
    let base = tx.children(&first)?.len();

    // the seam has to be read before any item moves
    let seam = match tx.children(&first)?.last() {
        Some(last) => Some(tx.text(&Path::text(last))?.len()),
        None => None,
    };

    let items = tx.children(&second)?.to_vec();
    for index in (0..items.len()).rev() {
        tx.update(&Path::children(&second), Update::Delete { offset: index })?;
    }
    let owner = owner_of(tx, &second)?;
    tx.hide(&owner, &second)?;
    tx.delete(&second)?;

    for (k, item) in items.into_iter().enumerate() {
        tx.update(
            &Path::children(&first),
            Update::Insert {
                offset: base + k,
                value: item,
            },
        )?;
    }

    match (args.direction, seam) {
        (Direction::Left, Some(seam)) => Ok(tx.caret(Path::child_text(&first, base - 1), seam, &args.container_id)),
        (Direction::Left, None) => Err(EditorError::InvalidPrecondition(format!("{} has no items", first))),
        (Direction::Right, _) => Ok(args.selection),
    }
}

/// Append a text node following a list to the list's last item
fn merge_text_into_list(tx: &mut Transaction, args: MergeArgs) -> Result<Selection, EditorError> {
    let list = args.first.id.clone();
    let items = tx.children(&list)?;
    let last_index = items
        .len()
        .checked_sub(1)
        .ok_or_else(|| EditorError::InvalidPrecondition(format!("{} has no items", list)))?;
    let last = items[last_index].clone();
    let tail = args
        .second
        .text()
        .cloned()
        .ok_or_else(|| EditorError::InvalidPrecondition(format!("{} has no text", args.second.id)))?;

    let seam = text_ops::append_text(tx, &last, &tail)?;
    let owner = owner_of(tx, &args.second.id)?;
    tx.hide(&owner, &args.second.id)?;
    tx.delete(&args.second.id)?;

    Ok(tx.caret(Path::child_text(&list, last_index), seam, &args.container_id))
}

/// Append a list's first item to the text node before it
fn merge_list_into_text(tx: &mut Transaction, args: MergeArgs) -> Result<Selection, EditorError> {
    let list = args.second.id.clone();
    let head = tx
        .children(&list)?
        .first()
        .cloned()
        .ok_or_else(|| EditorError::InvalidPrecondition(format!("{} has no items", list)))?;
    let tail = tx.text(&Path::text(&head))?.clone();

    let seam = text_ops::append_text(tx, &args.first.id, &tail)?;
    tx.update(&Path::children(&list), Update::Delete { offset: 0 })?;
    tx.delete(&head)?;

    if tx.children(&list)?.is_empty() {
        let owner = owner_of(tx, &list)?;
        tx.hide(&owner, &list)?;
        tx.delete(&list)?;
    }

    let path = tx.document().text_path(&args.first.id, &args.container_id)?;
    Ok(tx.caret(path, seam, &args.container_id))
}

fn break_list(tx: &mut Transaction, args: BreakArgs) -> Result<Selection, EditorError> {
    let list = args.node.id.clone();
    let index = match &args.selection.path {
        Path::ChildText { parent, index } if parent == &list => *index,
        other => {
            return Err(EditorError::InvalidPrecondition(format!(
                "{} is not an item of {}",
                other, list
            )))
        }
    };

    let item = tx.get_real_path(&args.selection.path)?;
    let item_id = item.root().clone();
    let item_type = tx.get(&item_id)?.node_type.clone();
    let offset = args.selection.start_offset;
    let len = tx.text(&item)?.len();

    if offset == 0 && len == 0 {
        return split_list(tx, &list, index, &args.container_id);
    }

    let (spec, insert_at) = if offset == 0 {
        (NodeSpec::text(item_type, ""), index)
    } else if offset < len {
        let tail = text_ops::split_text(tx, &item, offset)?;
        (NodeSpec::annotated(item_type, tail), index + 1)
    } else {
        (NodeSpec::text(item_type, ""), index + 1)
    };
    let created = tx.create(spec)?;
    tx.update(
        &Path::children(&list),
        Update::Insert {
            offset: insert_at,
            value: created,
        },
    )?;

    // the caret always lands in the item after the split point
    Ok(tx.caret(Path::child_text(&list, index + 1), 0, &args.container_id))
}

/// Replace the empty item at `pivot` with a default text node in the flow
fn split_list(tx: &mut Transaction, list: &NodeId, pivot: usize, container: &NodeId) -> Result<Selection, EditorError> {
    let flow = owner_of(tx, list)?;
    let position = tx.position_of(&flow, list)?;
    let items = tx.children(list)?.to_vec();
    let pivot_id = items
        .get(pivot)
        .cloned()
        .ok_or_else(|| EditorError::InvalidPrecondition(format!("{} has no item {}", list, pivot)))?;

    let paragraph = if items.len() < 2 {
        tx.hide(&flow, list)?;
        tx.delete(list)?;
        let paragraph = tx.create_default_text_node()?;
        tx.show(&flow, &paragraph, position)?;
        paragraph
    } else if pivot == 0 || pivot == items.len() - 1 {
        tx.update(&Path::children(list), Update::Delete { offset: pivot })?;
        tx.delete(&pivot_id)?;
        let paragraph = tx.create_default_text_node()?;
        let at = if pivot == 0 { position } else { position + 1 };
        tx.show(&flow, &paragraph, at)?;
        paragraph
    } else {
        for index in (pivot..items.len()).rev() {
            tx.update(&Path::children(list), Update::Delete { offset: index })?;
        }
        tx.delete(&pivot_id)?;

        let list_type = tx.get(list)?.node_type.clone();
        let rest = tx.create(NodeSpec::children(list_type, items[pivot + 1..].to_vec()))?;
        let paragraph = tx.create_default_text_node()?;
        tx.show(&flow, &paragraph, position + 1)?;
        tx.show(&flow, &rest, position + 2)?;
        paragraph
    };

    let path = tx.document().text_path(&paragraph, container)?;
    Ok(tx.caret(path, 0, container))
}

#[cfg(test)]
mod tests {
    use super::*;
    use prose_model::{Document, PropertySelection, Schema};

    fn list_doc(items: &[&str]) -> (Transaction, NodeId, NodeId) {
        let mut doc = Document::new(Schema::prose());
        let ids: Vec<NodeId> = items
            .iter()
            .map(|t| doc.create(NodeSpec::text("list-item", *t)).unwrap())
            .collect();
        let list = doc.create(NodeSpec::children("list", ids)).unwrap();
        let body = doc.create(NodeSpec::children("container", vec![list.clone()])).unwrap();
        (Transaction::new(doc, Selection::Null, None), body, list)
    }

    fn item_texts(tx: &Transaction, list: &NodeId) -> Vec<String> {
        tx.children(list)
            .unwrap()
            .iter()
            .map(|id| tx.text(&Path::text(id)).unwrap().text.clone())
            .collect()
    }

    fn break_at(tx: &mut Transaction, body: &NodeId, list: &NodeId, index: usize, offset: usize) -> Selection {
        let mut registry = BehaviorRegistry::new();
        registry.register(&ListEditing);
        let handler = registry.find_break(tx.schema(), "list").unwrap();
        let args = BreakArgs {
            selection: PropertySelection::collapsed(Path::child_text(list, index), offset).in_container(body),
            container_id: body.clone(),
            node: tx.get(list).unwrap().clone(),
        };
        handler(tx, args).unwrap()
    }

    #[test]
    fn test_break_at_item_start_inserts_before() {
        let (mut tx, body, list) = list_doc(&["a", "bc"]);
        let sel = break_at(&mut tx, &body, &list, 1, 0);

        assert_eq!(item_texts(&tx, &list), vec!["a", "", "bc"]);
        assert_eq!(sel, tx.caret(Path::child_text(&list, 2), 0, &body));
    }

    #[test]
    fn test_break_at_item_end_appends() {
        let (mut tx, body, list) = list_doc(&["a", "bc"]);
        let sel = break_at(&mut tx, &body, &list, 1, 2);

        assert_eq!(item_texts(&tx, &list), vec!["a", "bc", ""]);
        assert_eq!(sel, tx.caret(Path::child_text(&list, 2), 0, &body));
        let created = tx.children(&list).unwrap()[2].clone();
        assert_eq!(tx.get(&created).unwrap().node_type, "list-item");
    }

    #[test]
    fn test_single_empty_item_becomes_paragraph() {
        let (mut tx, body, list) = list_doc(&[""]);
        let sel = break_at(&mut tx, &body, &list, 0, 0);

        assert!(tx.get(&list).is_err());
        let flow = tx.children(&body).unwrap().to_vec();
        assert_eq!(flow.len(), 1);
        assert_eq!(tx.get(&flow[0]).unwrap().node_type, "paragraph");
        assert_eq!(sel, tx.caret(Path::text(&flow[0]), 0, &body));
    }

    #[test]
    fn test_last_empty_item_moves_after_list() {
        let (mut tx, body, list) = list_doc(&["x", ""]);
        break_at(&mut tx, &body, &list, 1, 0);

        assert_eq!(item_texts(&tx, &list), vec!["x"]);
        let flow = tx.children(&body).unwrap().to_vec();
        assert_eq!(flow[0], list);
        assert_eq!(tx.get(&flow[1]).unwrap().node_type, "paragraph");
    }

    #[test]
    fn test_break_rejects_foreign_path() {
        let (mut tx, body, list) = list_doc(&["a"]);
        let mut registry = BehaviorRegistry::new();
        registry.register(&ListEditing);
        let handler = registry.find_break(tx.schema(), "list").unwrap();
        let args = BreakArgs {
            selection: PropertySelection::collapsed(Path::child_text("list-99", 0), 0),
            container_id: body,
            node: tx.get(&list).unwrap().clone(),
        };
        assert!(matches!(
            handler(&mut tx, args),
            Err(EditorError::InvalidPrecondition(_))
        ));
    }
}
