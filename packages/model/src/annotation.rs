//! # Annotations
//!
//! Inline range markers over a node's text property (emphasis, links, ...).
//!
//! Ranges are half-open `[start, end)` character ranges with
//! `0 <= start <= end <= len(text)`. The helpers here compute the annotation
//! set that results from a text edit; they never touch the text itself, so
//! callers can record the annotation change as its own operation.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Formatting kind, e.g. "strong" or "link"
    pub kind: String,
    pub start: usize,
    pub end: usize,
}

impl Annotation {
    pub fn new(kind: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            kind: kind.into(),
            start,
            end,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    fn shifted(&self, start: usize, end: usize) -> Self {
        Self {
            kind: self.kind.clone(),
            start,
            end,
        }
    }
}

/// Annotations after deleting `[start, end)` from the annotated text
///
/// Ranges after the deleted span move left, overlapping ranges are truncated
/// to their surviving part, and ranges fully inside the span are removed.
/// Collapsed markers sitting exactly on the span's edges survive.
pub fn deleted_text(annotations: &[Annotation], start: usize, end: usize) -> Vec<Annotation> {
    if start >= end {
        return annotations.to_vec();
    }
    let removed = end - start;
    let transform = |offset: usize| {
        if offset <= start {
            offset
        } else if offset >= end {
            offset - removed
        } else {
            start
        }
    };

    annotations
        .iter()
        .filter(|a| {
            let enclosed = if a.is_collapsed() {
                start < a.start && a.start < end
            } else {
                start <= a.start && a.end <= end
            };
            !enclosed
        })
        .map(|a| a.shifted(transform(a.start), transform(a.end)))
        .collect()
}

/// Annotations after inserting `len` characters at `offset`
///
/// Ranges starting at or after the insertion point move right; a range that
/// contains the insertion point grows to cover the inserted text.
pub fn inserted_text(annotations: &[Annotation], offset: usize, len: usize) -> Vec<Annotation> {
    annotations
        .iter()
        .map(|a| {
            if a.start >= offset {
                a.shifted(a.start + len, a.end + len)
            } else if a.end >= offset {
                a.shifted(a.start, a.end + len)
            } else {
                a.clone()
            }
        })
        .collect()
}

/// Partition annotations at `offset` for a text split
///
/// Returns `(head, tail)`: `head` keeps everything before the split point and
/// `tail` holds ranges rebased to the start of the split-off text. A range
/// straddling the split point is cut in two, one part on each side.
pub fn split_at(annotations: &[Annotation], offset: usize) -> (Vec<Annotation>, Vec<Annotation>) {
    let mut head = Vec::new();
    let mut tail = Vec::new();

    for a in annotations {
        if a.start >= offset {
            tail.push(a.shifted(a.start - offset, a.end - offset));
        } else if a.end > offset {
            head.push(a.shifted(a.start, offset));
            tail.push(a.shifted(0, a.end - offset));
        } else {
            head.push(a.clone());
        }
    }

    (head, tail)
}

/// Annotations of `first` followed by those of `second` shifted by `seam`
pub fn appended(first: &[Annotation], second: &[Annotation], seam: usize) -> Vec<Annotation> {
    first
        .iter()
        .cloned()
        .chain(second.iter().map(|a| a.shifted(a.start + seam, a.end + seam)))
        .collect()
}
