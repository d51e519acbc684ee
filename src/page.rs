//! Notes page state container.
//!
//! Owns the note list, the selection, the search text and sidebar
//! visibility. Every mutation goes to the store first; only the row the store
//! returns is folded into local state, through the pure functions below, so a
//! failed call leaves the page exactly as it was.

use crate::auth::Session;
use crate::error::Result;
use crate::models::Note;
use crate::notes::search_notes;
use crate::store::Store;
use uuid::Uuid;

#[cfg(test)]
#[path = "page_test.rs"]
mod page_test;

// ============================================================================
// Reconciliation
// ============================================================================

/// A freshly created row goes to the top of the list.
pub fn with_created(notes: &[Note], row: Note) -> Vec<Note> {
    let mut next = Vec::with_capacity(notes.len() + 1);
    next.push(row);
    next.extend(notes.iter().cloned());
    next
}

/// Replace the row with the same id, keeping list position.
pub fn with_updated(notes: &[Note], row: &Note) -> Vec<Note> {
    notes
        .iter()
        .map(|n| if n.id == row.id { row.clone() } else { n.clone() })
        .collect()
}

pub fn without(notes: &[Note], id: Uuid) -> Vec<Note> {
    notes.iter().filter(|n| n.id != id).cloned().collect()
}

// ============================================================================
// Page State
// ============================================================================

/// Editing an existing note and composing a new one are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Nothing,
    Note(Uuid),
    CreatingNew,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageAction {
    Loaded(Vec<Note>),
    Select(Uuid),
    StartNew,
    ClearSelection,
    Search(String),
    ToggleSidebar,
    Created(Note),
    Updated(Note),
    Deleted(Uuid),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotesPage {
    notes: Vec<Note>,
    selection: Selection,
    search: String,
    sidebar_open: bool,
}

impl Default for NotesPage {
    fn default() -> Self {
        Self {
            notes: Vec::new(),
            selection: Selection::Nothing,
            search: String::new(),
            sidebar_open: true,
        }
    }
}

impl NotesPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the session owner's notes, newest first.
    pub fn mount(store: &Store, session: &Session) -> Result<Self> {
        let mut page = Self::new();
        page.apply(PageAction::Loaded(store.list_notes(session.user_id)?));
        Ok(page)
    }

    pub fn apply(&mut self, action: PageAction) {
        match action {
            PageAction::Loaded(notes) => self.notes = notes,
            PageAction::Select(id) => {
                // Selecting an id that isn't loaded leaves nothing selected.
                self.selection = if self.notes.iter().any(|n| n.id == id) {
                    Selection::Note(id)
                } else {
                    Selection::Nothing
                };
            }
            PageAction::StartNew => self.selection = Selection::CreatingNew,
            PageAction::ClearSelection => self.selection = Selection::Nothing,
            PageAction::Search(query) => self.search = query,
            PageAction::ToggleSidebar => self.sidebar_open = !self.sidebar_open,
            PageAction::Created(row) => {
                let id = row.id;
                self.notes = with_created(&self.notes, row);
                self.selection = Selection::Note(id);
            }
            PageAction::Updated(row) => {
                self.notes = with_updated(&self.notes, &row);
                self.selection = Selection::Note(row.id);
            }
            PageAction::Deleted(id) => {
                self.notes = without(&self.notes, id);
                if self.selection == Selection::Note(id) {
                    self.selection = Selection::Nothing;
                }
            }
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn selected(&self) -> Option<&Note> {
        match self.selection {
            Selection::Note(id) => self.notes.iter().find(|n| n.id == id),
            _ => None,
        }
    }

    pub fn is_creating_new(&self) -> bool {
        self.selection == Selection::CreatingNew
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    /// Notes whose title or plain text contains the search text, ignoring case.
    pub fn filtered_notes(&self) -> Vec<&Note> {
        search_notes(&self.notes, &self.search)
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    pub fn create_note(&mut self, store: &Store, session: &Session, title: &str, content: &str) -> Result<&Note> {
        let row = store.insert_note(session.user_id, title, content)?;
        tracing::info!(user_id = %session.user_id, note_id = %row.id, "note created");
        self.apply(PageAction::Created(row));
        Ok(&self.notes[0])
    }

    /// Save the selected note. Without a selection this does nothing.
    pub fn update_note(&mut self, store: &Store, session: &Session, title: &str, content: &str) -> Result<Option<&Note>> {
        let Some(id) = self.selected().map(|n| n.id) else {
            return Ok(None);
        };
        let row = store.update_note(session.user_id, id, title, content)?;
        tracing::info!(user_id = %session.user_id, note_id = %id, "note updated");
        self.apply(PageAction::Updated(row));
        Ok(self.selected())
    }

    pub fn delete_note(&mut self, store: &Store, session: &Session) -> Result<bool> {
        let Some(id) = self.selected().map(|n| n.id) else {
            return Ok(false);
        };
        store.delete_note(session.user_id, id)?;
        tracing::info!(user_id = %session.user_id, note_id = %id, "note deleted");
        self.apply(PageAction::Deleted(id));
        Ok(true)
    }

    /// Flip the favorite flag of the selected note, based on the cached row.
    pub fn toggle_favorite(&mut self, store: &Store, session: &Session) -> Result<Option<&Note>> {
        let Some((id, favorite)) = self.selected().map(|n| (n.id, n.is_favorite)) else {
            return Ok(None);
        };
        let row = store.set_favorite(session.user_id, id, !favorite)?;
        self.apply(PageAction::Updated(row));
        Ok(self.selected())
    }

    pub fn toggle_archived(&mut self, store: &Store, session: &Session) -> Result<Option<&Note>> {
        let Some((id, archived)) = self.selected().map(|n| (n.id, n.is_archived)) else {
            return Ok(None);
        };
        let row = store.set_archived(session.user_id, id, !archived)?;
        self.apply(PageAction::Updated(row));
        Ok(self.selected())
    }
}
