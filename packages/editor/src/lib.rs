//! # Prose Editor
//!
//! Editing engine for structured prose documents.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ model: nodes, paths, selections, operations │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: one edit = one transaction          │
//! │  - Session owns document + selection        │
//! │  - Editing dispatches delete/break/type     │
//! │  - Behaviors merge/split per node category  │
//! │  - Commits produce revertible changes       │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Atomic edits**: an edit commits completely or not at all
//! 2. **Ids, not ownership**: containers and lists reference nodes by id
//! 3. **No-ops are not errors**: a keystroke that does not apply changes nothing
//! 4. **Behaviors by category**: node types plug in merge/break handlers
//!
//! ## Usage
//!
//! ```rust
//! use prose_editor::{Editing, EditingSession, EditorSession};
//! use prose_model::{Direction, Document, NodeSpec, Path, PropertySelection, Schema};
//!
//! let mut doc = Document::new(Schema::prose());
//! let p = doc.create(NodeSpec::text("paragraph", "helo")).unwrap();
//! let body = doc.create(NodeSpec::children("container", vec![p.clone()])).unwrap();
//!
//! let mut session = EditorSession::new("client-1", doc);
//! session
//!     .set_selection(PropertySelection::collapsed(Path::text(&p), 3).in_container(&body).into())
//!     .unwrap();
//!
//! let editing = Editing::with_default_behaviors();
//! editing.type_text(&mut session, "l").unwrap();
//! assert_eq!(session.document().text(&Path::text(&p)).unwrap().text, "hello");
//!
//! let change = editing.delete(&mut session, Direction::Left).unwrap().unwrap();
//! session.revert(&change).unwrap();
//! assert_eq!(session.document().text(&Path::text(&p)).unwrap().text, "hello");
//! ```

pub mod behavior;
mod change;
mod config;
mod editing;
mod errors;
mod list_editing;
mod session;
mod text_editing;
pub mod text_ops;
mod transaction;

pub use behavior::{BehaviorRegistry, BreakArgs, BreakHandler, EditingBehavior, MergeArgs, MergeHandler};
pub use change::DocumentChange;
pub use config::{EditorConfig, DEFAULT_CONFIG_NAME};
pub use editing::Editing;
pub use errors::EditorError;
pub use list_editing::ListEditing;
pub use session::{EditingSession, EditorSession};
pub use text_editing::TextEditing;
pub use transaction::{Transaction, Update};
