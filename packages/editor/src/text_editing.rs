//! Merge and break for plain text nodes (paragraphs, headings, list items).

use crate::behavior::{BehaviorRegistry, BreakArgs, EditingBehavior, MergeArgs};
use crate::text_ops;
use crate::{EditorError, Transaction};
use prose_model::{Category, NodeSpec, Path, Selection};

#[derive(Debug, Default, Clone, Copy)]
pub struct TextEditing;

impl EditingBehavior for TextEditing {
    fn name(&self) -> &'static str {
        "text"
    }

    fn register(&self, registry: &mut BehaviorRegistry) {
        registry
            .define_merge(Category::TEXTISH, Category::TEXTISH, merge_text)
            .define_break(Category::TEXTISH, break_text);
    }
}

/// Append `second` to `first` and drop `second`; caret at the seam
fn merge_text(tx: &mut Transaction, args: MergeArgs) -> Result<Selection, EditorError> {
    let tail = args
        .second
        .text()
        .cloned()
        .ok_or_else(|| EditorError::InvalidPrecondition(format!("{} has no text", args.second.id)))?;
    let owner = tx
        .document()
        .owner(&args.second.id)
        .cloned()
        .ok_or_else(|| EditorError::InvalidPrecondition(format!("{} is not attached", args.second.id)))?;

    let seam = text_ops::append_text(tx, &args.first.id, &tail)?;
    tx.hide(&owner, &args.second.id)?;
    tx.delete(&args.second.id)?;

    let path = tx.document().text_path(&args.first.id, &args.container_id)?;
    Ok(tx.caret(path, seam, &args.container_id))
}

/// Split the node at the caret; the tail becomes a new sibling
fn break_text(tx: &mut Transaction, args: BreakArgs) -> Result<Selection, EditorError> {
    let node = &args.node;
    let owner = tx
        .document()
        .owner(&node.id)
        .cloned()
        .ok_or_else(|| EditorError::InvalidPrecondition(format!("{} is not attached", node.id)))?;

    let offset = args.selection.start_offset;
    let len = tx.text(&Path::text(&node.id))?.len();
    let tail = text_ops::split_text(tx, &Path::text(&node.id), offset)?;

    // breaking at the end starts a fresh default block (heading -> paragraph)
    let node_type = if offset == len {
        tx.schema().default_text_type().to_string()
    } else {
        node.node_type.clone()
    };
    let created = tx.create(NodeSpec::annotated(node_type, tail))?;
    let position = tx.position_of(&owner, &node.id)?;
    tx.show(&owner, &created, position + 1)?;

    let path = tx.document().text_path(&created, &args.container_id)?;
    Ok(tx.caret(path, 0, &args.container_id))
}
