//! # Edit Session
//!
//! Owns the committed document, the current selection and the focused
//! surface for one editor.
//!
//! Every edit runs inside [`EditingSession::transaction`]: the action works
//! on a staged copy and the session either commits all of it or nothing.
//! A committed edit is returned as a [`DocumentChange`] so the host can
//! keep its own history and revert it later.

use crate::{DocumentChange, EditorError, Transaction};
use prose_model::{Document, Selection, SurfaceId};

/// What the editing core needs from a session
pub trait EditingSession {
    /// Current selection, possibly null
    fn selection(&self) -> &Selection;

    /// Editable region currently focused, used to stamp transactions
    fn focused_surface(&self) -> Option<&str>;

    /// Run `action` on a transaction and commit it if it succeeds
    ///
    /// Returns `None` when the action left both document and selection as
    /// they were.
    fn transaction<F>(&mut self, action: &str, f: F) -> Result<Option<DocumentChange>, EditorError>
    where
        F: FnOnce(&mut Transaction) -> Result<(), EditorError>;
}

/// Single-user session over an in-memory document
pub struct EditorSession {
    /// Unique session identifier
    pub id: String,

    document: Document,
    selection: Selection,
    focused_surface: Option<SurfaceId>,

    /// Number of commits so far
    version: u64,
}

impl EditorSession {
    pub fn new(id: impl Into<String>, document: Document) -> Self {
        Self {
            id: id.into(),
            document,
            selection: Selection::Null,
            focused_surface: None,
            version: 0,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Move the selection; rejected if it does not resolve in the document
    pub fn set_selection(&mut self, selection: Selection) -> Result<(), EditorError> {
        self.document.validate_selection(&selection)?;
        self.selection = selection;
        Ok(())
    }

    /// Focus an editable region (or none)
    pub fn focus(&mut self, surface: Option<SurfaceId>) {
        self.focused_surface = surface;
    }

    /// Undo a committed change
    ///
    /// Applies the change's inverse atomically and restores the selection it
    /// started from. Returns the inverse so it can be reapplied.
    pub fn revert(&mut self, change: &DocumentChange) -> Result<DocumentChange, EditorError> {
        let inverse = change.inverse();
        self.reapply(&inverse)?;
        Ok(inverse)
    }

    /// Apply a previously recorded change again
    pub fn reapply(&mut self, change: &DocumentChange) -> Result<(), EditorError> {
        let mut staged = self.document.clone();
        change.apply_to(&mut staged)?;
        staged.validate_selection(&change.selection_after)?;

        self.document = staged;
        self.selection = change.selection_after.clone();
        self.version += 1;
        tracing::debug!(
            session = %self.id,
            operations = change.operations.len(),
            version = self.version,
            "applied recorded change"
        );
        Ok(())
    }
}

impl EditingSession for EditorSession {
    fn selection(&self) -> &Selection {
        &self.selection
    }

    fn focused_surface(&self) -> Option<&str> {
        self.focused_surface.as_deref()
    }

    fn transaction<F>(&mut self, action: &str, f: F) -> Result<Option<DocumentChange>, EditorError>
    where
        F: FnOnce(&mut Transaction) -> Result<(), EditorError>,
    {
        let mut tx = Transaction::new(
            self.document.clone(),
            self.selection.clone(),
            self.focused_surface.clone(),
        );
        f(&mut tx)?;

        let (staged, operations, selection) = tx.into_parts();
        if let Err(err) = staged.validate_selection(&selection) {
            tracing::error!(session = %self.id, action, error = %err, "edit produced an invalid selection");
            return Err(err.into());
        }

        if operations.is_empty() && selection == self.selection {
            return Ok(None);
        }

        let before = std::mem::replace(&mut self.selection, selection.clone());
        self.document = staged;
        self.version += 1;
        tracing::debug!(
            session = %self.id,
            action,
            operations = operations.len(),
            version = self.version,
            "committed transaction"
        );

        Ok(Some(
            DocumentChange::new(operations, before, selection).with_description(action),
        ))
    }
}
