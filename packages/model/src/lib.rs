//! # Prose Model
//!
//! Document model for the prose editing engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ model: nodes, paths, selections             │
//! │  - Node arena keyed by id                   │
//! │  - Containers/lists hold ids, not nodes     │
//! │  - Annotations + their shift laws           │
//! │  - Invertible primitive operations          │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: transactions, delete/break/type,    │
//! │         behaviors per node category         │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use prose_model::{Document, NodeSpec, Path, Schema};
//!
//! let mut doc = Document::new(Schema::prose());
//! let item = doc.create(NodeSpec::text("list-item", "milk")).unwrap();
//! let list = doc.create(NodeSpec::children("list", vec![item.clone()])).unwrap();
//!
//! let display = Path::child_text(&list, 0);
//! assert_eq!(doc.real_path(&display).unwrap(), Path::text(&item));
//! assert_eq!(doc.text(&display).unwrap().text, "milk");
//! ```

pub mod annotation;
mod document;
mod error;
mod node;
mod operation;
mod path;
mod schema;
mod selection;

pub use annotation::Annotation;
pub use document::{Document, PathValue};
pub use error::{DocumentError, DocumentResult};
pub use node::{Node, NodeContent, NodeId, NodeSpec, TextContent};
pub use operation::Operation;
pub use path::Path;
pub use schema::{Category, NodeKind, NodeTypeSpec, Schema, SchemaBuilder};
pub use selection::{
    ContainerSelection, Coordinate, CustomSelection, Direction, NodeSelection, NodeSelectionMode,
    PropertySelection, Selection, SelectionPatch, SurfaceId,
};
