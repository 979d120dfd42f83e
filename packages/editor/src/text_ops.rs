//! Text edits that keep annotations consistent.
//!
//! Each helper records the text change and the resulting annotation set as
//! separate operations. Annotations are shrunk before text is removed and
//! grown after text is added, so every intermediate state (and every state
//! reached while reverting) keeps annotation ranges inside the text.

use crate::{EditorError, Transaction};
use prose_model::annotation;
use prose_model::{NodeId, Path, TextContent};

fn text_node(tx: &Transaction, path: &Path) -> Result<NodeId, EditorError> {
    match tx.get_real_path(path)? {
        Path::Text { node } => Ok(node),
        other => Err(EditorError::InvalidPrecondition(format!("{} is not a text path", other))),
    }
}

/// Delete `[start, end)` at `path`, truncating or dropping annotations
pub fn delete_text(tx: &mut Transaction, path: &Path, start: usize, end: usize) -> Result<(), EditorError> {
    if start == end {
        return Ok(());
    }
    let node = text_node(tx, path)?;
    let content = tx.text(&Path::text(&node))?;
    if end > content.len() {
        // let the transaction report the range error
        return tx.delete_text(&Path::text(&node), start, end);
    }
    let annotations = annotation::deleted_text(&content.annotations, start, end);

    tx.set_annotations(&node, annotations)?;
    tx.delete_text(&Path::text(&node), start, end)
}

/// Insert `text` at `offset`, shifting or growing annotations
pub fn insert_text(tx: &mut Transaction, path: &Path, offset: usize, text: &str) -> Result<(), EditorError> {
    if text.is_empty() {
        return Ok(());
    }
    let node = text_node(tx, path)?;
    tx.insert_text(&Path::text(&node), offset, text)?;

    let annotations = tx.text(&Path::text(&node))?.annotations.clone();
    tx.set_annotations(&node, annotation::inserted_text(&annotations, offset, text.chars().count()))
}

/// Append `tail` (text and annotations) to the end of `node`
///
/// Returns the seam, the old length of `node`'s text.
pub fn append_text(tx: &mut Transaction, node: &NodeId, tail: &TextContent) -> Result<usize, EditorError> {
    let path = Path::text(node);
    let head = tx.text(&path)?.clone();
    let seam = head.len();
    if tail.is_empty() {
        return Ok(seam);
    }

    tx.insert_text(&path, seam, &tail.text)?;
    tx.set_annotations(node, annotation::appended(&head.annotations, &tail.annotations, seam))?;
    Ok(seam)
}

/// Cut the text at `path` at `offset` and return everything after it
///
/// Annotations straddling the cut are split between the two halves.
pub fn split_text(tx: &mut Transaction, path: &Path, offset: usize) -> Result<TextContent, EditorError> {
    let node = text_node(tx, path)?;
    let content = tx.text(&Path::text(&node))?.clone();
    let len = content.len();
    if offset > len {
        return Err(prose_model::DocumentError::OutOfRange {
            path: path.to_string(),
            offset,
            len,
        }
        .into());
    }

    let (head, tail) = annotation::split_at(&content.annotations, offset);
    let tail = TextContent {
        text: content.slice(offset, len),
        annotations: tail,
    };

    tx.set_annotations(&node, head)?;
    if offset < len {
        tx.delete_text(&Path::text(&node), offset, len)?;
    }
    Ok(tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use prose_model::{Annotation, Document, NodeSpec, Schema, Selection};

    fn transaction(content: TextContent) -> (Transaction, NodeId) {
        let mut doc = Document::new(Schema::prose());
        let p = doc.create(NodeSpec::annotated("paragraph", content)).unwrap();
        (Transaction::new(doc, Selection::Null, None), p)
    }

    #[test]
    fn test_delete_before_annotation_shifts_it() {
        let (mut tx, p) = transaction(TextContent::new("abcdefgh").with_annotation(Annotation::new("strong", 4, 6)));
        delete_text(&mut tx, &Path::text(&p), 1, 3).unwrap();

        let text = tx.text(&Path::text(&p)).unwrap();
        assert_eq!(text.text, "adefgh");
        assert_eq!(text.annotations, vec![Annotation::new("strong", 2, 4)]);
    }

    #[test]
    fn test_delete_containing_range_removes_annotation() {
        let (mut tx, p) = transaction(TextContent::new("abcdefgh").with_annotation(Annotation::new("em", 3, 5)));
        delete_text(&mut tx, &Path::text(&p), 2, 6).unwrap();
        assert!(tx.text(&Path::text(&p)).unwrap().annotations.is_empty());
    }

    #[test]
    fn test_delete_overlap_truncates() {
        let (mut tx, p) = transaction(TextContent::new("abcdefgh").with_annotation(Annotation::new("em", 2, 6)));
        delete_text(&mut tx, &Path::text(&p), 4, 8).unwrap();
        assert_eq!(
            tx.text(&Path::text(&p)).unwrap().annotations,
            vec![Annotation::new("em", 2, 4)]
        );
    }

    #[test]
    fn test_reverting_keeps_annotations_in_range() {
        let (mut tx, p) = transaction(TextContent::new("abcdef").with_annotation(Annotation::new("em", 2, 6)));
        let original = tx.document().clone();
        delete_text(&mut tx, &Path::text(&p), 3, 6).unwrap();
        insert_text(&mut tx, &Path::text(&p), 3, "xyz").unwrap();

        let (mut doc, operations, _) = tx.into_parts();
        for op in operations.iter().rev() {
            op.inverse().apply(&mut doc).unwrap();
        }
        assert_eq!(doc, original);
    }

    #[test]
    fn test_split_and_append() {
        let (mut tx, p) = transaction(TextContent::new("abcdef").with_annotation(Annotation::new("em", 1, 4)));
        let tail = split_text(&mut tx, &Path::text(&p), 3).unwrap();

        assert_eq!(tail.text, "def");
        assert_eq!(tail.annotations, vec![Annotation::new("em", 0, 1)]);
        assert_eq!(
            tx.text(&Path::text(&p)).unwrap().annotations,
            vec![Annotation::new("em", 1, 3)]
        );

        let seam = append_text(&mut tx, &p, &tail).unwrap();
        assert_eq!(seam, 3);
        let text = tx.text(&Path::text(&p)).unwrap();
        assert_eq!(text.text, "abcdef");
        assert_eq!(
            text.annotations,
            vec![Annotation::new("em", 1, 3), Annotation::new("em", 3, 4)]
        );
    }
}
