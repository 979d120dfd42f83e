//! # Behavior Registry
//!
//! Node types change how merge and break work by registering handlers keyed
//! by category, not by concrete type.
//!
//! ## Lookup
//!
//! A handler is a candidate when every category in its key is satisfied by
//! the node type(s) at the edit. Each category has a rank in the type's
//! resolved list (own type name = 0, then declared categories in order) and
//! the candidate with the lowest rank sum wins. Among equally specific
//! candidates the first one registered wins.
//!
//! ```text
//! merge(list, list)          rank 0 + 0   ← wins for two lists
//! merge(textish, textish)    rank 1 + 1   ← wins for paragraph/heading
//! ```

use crate::{EditorError, Transaction};
use prose_model::{Category, Direction, Node, NodeId, PropertySelection, Schema, Selection};
use std::fmt;

/// Two adjacent nodes about to be joined
#[derive(Debug, Clone)]
pub struct MergeArgs {
    /// Node that survives the merge
    pub first: Node,

    /// Node whose content moves into `first`
    pub second: Node,

    pub container_id: NodeId,

    /// Selection that triggered the merge
    pub selection: Selection,

    pub direction: Direction,
}

/// A collapsed caret to split at
#[derive(Debug, Clone)]
pub struct BreakArgs {
    /// Display path of the caret, as seen from `container_id`
    pub selection: PropertySelection,

    pub container_id: NodeId,

    /// Node the handler was found for
    pub node: Node,
}

pub type MergeHandler = Box<dyn Fn(&mut Transaction, MergeArgs) -> Result<Selection, EditorError> + Send + Sync>;

pub type BreakHandler = Box<dyn Fn(&mut Transaction, BreakArgs) -> Result<Selection, EditorError> + Send + Sync>;

struct MergeEntry {
    first: Category,
    second: Category,
    handler: MergeHandler,
}

struct BreakEntry {
    category: Category,
    handler: BreakHandler,
}

/// A package of handlers for some node types
pub trait EditingBehavior {
    /// Name used to select the behavior from configuration
    fn name(&self) -> &'static str;

    fn register(&self, registry: &mut BehaviorRegistry);
}

#[derive(Default)]
pub struct BehaviorRegistry {
    merges: Vec<MergeEntry>,
    breaks: Vec<BreakEntry>,
}

impl BehaviorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every handler of `behavior`
    pub fn register(&mut self, behavior: &dyn EditingBehavior) -> &mut Self {
        tracing::debug!(behavior = behavior.name(), "registering editing behavior");
        behavior.register(self);
        self
    }

    pub fn define_merge<F>(&mut self, first: impl Into<Category>, second: impl Into<Category>, handler: F) -> &mut Self
    where
        F: Fn(&mut Transaction, MergeArgs) -> Result<Selection, EditorError> + Send + Sync + 'static,
    {
        let (first, second) = (first.into(), second.into());
        if self.merges.iter().any(|e| e.first == first && e.second == second) {
            tracing::warn!(%first, %second, "merge handler already defined, keeping the first one");
            return self;
        }
        self.merges.push(MergeEntry {
            first,
            second,
            handler: Box::new(handler),
        });
        self
    }

    pub fn define_break<F>(&mut self, category: impl Into<Category>, handler: F) -> &mut Self
    where
        F: Fn(&mut Transaction, BreakArgs) -> Result<Selection, EditorError> + Send + Sync + 'static,
    {
        let category = category.into();
        if self.breaks.iter().any(|e| e.category == category) {
            tracing::warn!(%category, "break handler already defined, keeping the first one");
            return self;
        }
        self.breaks.push(BreakEntry {
            category,
            handler: Box::new(handler),
        });
        self
    }

    /// Most specific merge handler for a `(first, second)` pair of node types
    pub fn find_merge(&self, schema: &Schema, first_type: &str, second_type: &str) -> Option<&MergeHandler> {
        let first = schema.node_type(first_type).ok()?;
        let second = schema.node_type(second_type).ok()?;

        // min_by_key keeps the first of equal minima, i.e. registration order
        self.merges
            .iter()
            .filter_map(|entry| Some((first.rank(&entry.first)? + second.rank(&entry.second)?, entry)))
            .min_by_key(|(score, _)| *score)
            .map(|(_, entry)| &entry.handler)
    }

    /// Most specific break handler for a node type
    pub fn find_break(&self, schema: &Schema, node_type: &str) -> Option<&BreakHandler> {
        let spec = schema.node_type(node_type).ok()?;
        self.breaks
            .iter()
            .filter_map(|entry| Some((spec.rank(&entry.category)?, entry)))
            .min_by_key(|(score, _)| *score)
            .map(|(_, entry)| &entry.handler)
    }

    pub fn merge_count(&self) -> usize {
        self.merges.len()
    }

    pub fn break_count(&self) -> usize {
        self.breaks.len()
    }
}

impl fmt::Debug for BehaviorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let merges: Vec<String> = self
            .merges
            .iter()
            .map(|e| format!("{}+{}", e.first, e.second))
            .collect();
        let breaks: Vec<&str> = self.breaks.iter().map(|e| e.category.as_str()).collect();
        f.debug_struct("BehaviorRegistry")
            .field("merges", &merges)
            .field("breaks", &breaks)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prose_model::{Document, NodeSpec, Path};

    fn run_merge(registry: &BehaviorRegistry, first: &str, second: &str) -> Option<Selection> {
        let mut doc = Document::new(Schema::prose());
        let a = doc.create(NodeSpec::text("paragraph", "")).unwrap();
        let b = doc.create(NodeSpec::text("paragraph", "")).unwrap();
        let body = doc.create(NodeSpec::children("container", vec![a.clone(), b.clone()])).unwrap();
        let mut tx = Transaction::new(doc, Selection::Null, None);

        let handler = registry.find_merge(tx.schema(), first, second)?;
        let args = MergeArgs {
            first: tx.get(&a).unwrap().clone(),
            second: tx.get(&b).unwrap().clone(),
            container_id: body,
            selection: Selection::Null,
            direction: Direction::Left,
        };
        Some(handler(&mut tx, args).unwrap())
    }

    fn marker(name: &str) -> Selection {
        Selection::caret(Path::text(name), 0)
    }

    #[test]
    fn test_category_dispatch() {
        let mut registry = BehaviorRegistry::new();
        registry.define_merge(Category::TEXTISH, Category::TEXTISH, |_, _| Ok(marker("textish")));

        assert_eq!(run_merge(&registry, "heading", "list-item"), Some(marker("textish")));
        assert_eq!(run_merge(&registry, "paragraph", "list"), None);
        assert_eq!(run_merge(&registry, "paragraph", "no-such-type"), None);
    }

    #[test]
    fn test_most_specific_wins() {
        let mut registry = BehaviorRegistry::new();
        registry.define_merge(Category::TEXTISH, Category::TEXTISH, |_, _| Ok(marker("textish")));
        registry.define_merge("heading", Category::TEXTISH, |_, _| Ok(marker("heading")));

        assert_eq!(run_merge(&registry, "heading", "paragraph"), Some(marker("heading")));
        assert_eq!(run_merge(&registry, "paragraph", "heading"), Some(marker("textish")));
    }

    #[test]
    fn test_first_registered_wins_ties() {
        let mut registry = BehaviorRegistry::new();
        registry.define_merge("heading", Category::TEXTISH, |_, _| Ok(marker("first")));
        registry.define_merge(Category::TEXTISH, "paragraph", |_, _| Ok(marker("second")));

        assert_eq!(run_merge(&registry, "heading", "paragraph"), Some(marker("first")));
    }

    #[test]
    fn test_duplicate_key_keeps_first() {
        let mut registry = BehaviorRegistry::new();
        registry.define_merge(Category::TEXTISH, Category::TEXTISH, |_, _| Ok(marker("first")));
        registry.define_merge(Category::TEXTISH, Category::TEXTISH, |_, _| Ok(marker("second")));
        registry.define_break("list", |_, _| Ok(Selection::Null));
        registry.define_break("list", |_, _| Ok(Selection::Null));

        assert_eq!(registry.merge_count(), 1);
        assert_eq!(registry.break_count(), 1);
        assert_eq!(run_merge(&registry, "paragraph", "paragraph"), Some(marker("first")));
    }

    #[test]
    fn test_find_break() {
        let mut registry = BehaviorRegistry::new();
        registry.define_break(Category::TEXTISH, |_, _| Ok(Selection::Null));
        let schema = Schema::prose();

        assert!(registry.find_break(&schema, "paragraph").is_some());
        assert!(registry.find_break(&schema, "list").is_none());
        assert!(registry.find_break(&schema, "image").is_none());
    }
}
