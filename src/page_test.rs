//! Tests for the notes page container.
//!
//! The pure reconciliation functions are tested on plain vectors; the
//! container operations run against a temporary sled store.

use super::*;
use crate::error::AppError;
use crate::models::User;
use chrono::{Duration, Utc};

// ============================================================================
// Helpers
// ============================================================================

fn session() -> Session {
    let user = User {
        id: Uuid::new_v4(),
        email: "ada@example.com".to_string(),
        password_hash: String::new(),
        created_at: Utc::now(),
    };
    Session::for_user(&user)
}

fn row(title: &str, plain: &str, minutes_ago: i64) -> Note {
    let at = Utc::now() - Duration::minutes(minutes_ago);
    Note {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        title: title.to_string(),
        content: format!("<p>{}</p>", plain),
        content_plain: plain.to_string(),
        created_at: at,
        updated_at: at,
        is_archived: false,
        is_favorite: false,
        tags: Vec::new(),
        collections: Vec::new(),
    }
}

fn mounted() -> (Store, Session, NotesPage) {
    let store = Store::temporary().unwrap();
    let session = session();
    let page = NotesPage::mount(&store, &session).unwrap();
    (store, session, page)
}

// ============================================================================
// Reconciliation
// ============================================================================

#[test]
fn created_row_is_prepended() {
    let existing = vec![row("a", "", 5), row("b", "", 10)];
    let new = row("c", "", 0);
    let next = with_created(&existing, new.clone());
    assert_eq!(next.len(), 3);
    assert_eq!(next[0], new);
    assert_eq!(existing.len(), 2);
}

#[test]
fn updated_row_replaces_in_place() {
    let existing = vec![row("a", "", 5), row("b", "", 10)];
    let mut changed = existing[1].clone();
    changed.title = "b2".to_string();
    let next = with_updated(&existing, &changed);
    assert_eq!(next[0], existing[0]);
    assert_eq!(next[1].title, "b2");
}

#[test]
fn updated_row_for_unknown_id_changes_nothing() {
    let existing = vec![row("a", "", 5)];
    let next = with_updated(&existing, &row("stranger", "", 0));
    assert_eq!(next, existing);
}

#[test]
fn without_removes_only_that_id() {
    let existing = vec![row("a", "", 5), row("b", "", 10)];
    let next = without(&existing, existing[0].id);
    assert_eq!(next.len(), 1);
    assert_eq!(next[0].id, existing[1].id);
}

// ============================================================================
// Reducer
// ============================================================================

#[test]
fn selection_and_creating_new_are_exclusive() {
    let mut page = NotesPage::new();
    let note = row("a", "", 0);
    page.apply(PageAction::Loaded(vec![note.clone()]));

    page.apply(PageAction::StartNew);
    assert!(page.is_creating_new());
    assert!(page.selected().is_none());

    page.apply(PageAction::Select(note.id));
    assert!(!page.is_creating_new());
    assert_eq!(page.selected().map(|n| n.id), Some(note.id));

    page.apply(PageAction::StartNew);
    assert!(page.selected().is_none());
}

#[test]
fn selecting_an_unknown_id_selects_nothing() {
    let mut page = NotesPage::new();
    page.apply(PageAction::Select(Uuid::new_v4()));
    assert_eq!(page.selection(), Selection::Nothing);
}

#[test]
fn sidebar_starts_open_and_toggles() {
    let mut page = NotesPage::new();
    assert!(page.sidebar_open());
    page.apply(PageAction::ToggleSidebar);
    assert!(!page.sidebar_open());
    page.apply(PageAction::ToggleSidebar);
    assert!(page.sidebar_open());
}

#[test]
fn deleting_another_note_keeps_selection() {
    let mut page = NotesPage::new();
    let a = row("a", "", 0);
    let b = row("b", "", 1);
    page.apply(PageAction::Loaded(vec![a.clone(), b.clone()]));
    page.apply(PageAction::Select(a.id));
    page.apply(PageAction::Deleted(b.id));
    assert_eq!(page.selected().map(|n| n.id), Some(a.id));
}

#[test]
fn filter_matches_title_or_plain_text_ignoring_case() {
    let mut page = NotesPage::new();
    page.apply(PageAction::Loaded(vec![
        row("Groceries", "Buy milk", 0),
        row("Work", "Quarterly report", 1),
    ]));

    assert_eq!(page.filtered_notes().len(), 2);

    page.apply(PageAction::Search("MILK".to_string()));
    let titles: Vec<&str> = page.filtered_notes().iter().map(|n| n.title.as_str()).collect();
    assert_eq!(titles, vec!["Groceries"]);

    page.apply(PageAction::Search("work".to_string()));
    assert_eq!(page.filtered_notes()[0].title, "Work");

    page.apply(PageAction::Search("bread".to_string()));
    assert!(page.filtered_notes().is_empty());

    page.apply(PageAction::Search(String::new()));
    assert_eq!(page.filtered_notes().len(), 2);
}

// ============================================================================
// Container Operations
// ============================================================================

#[test]
fn mount_loads_only_own_notes_newest_first() {
    let store = Store::temporary().unwrap();
    let session = session();
    let older = store.insert_note(session.user_id, "older", "").unwrap();
    let newer = store.insert_note(session.user_id, "newer", "").unwrap();
    store.insert_note(Uuid::new_v4(), "someone else", "").unwrap();

    let page = NotesPage::mount(&store, &session).unwrap();
    let ids: Vec<Uuid> = page.notes().iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![newer.id, older.id]);
}

#[test]
fn create_selects_the_new_note_and_derives_plain_text() {
    let (store, session, mut page) = mounted();
    page.apply(PageAction::StartNew);

    let created = page
        .create_note(&store, &session, "Groceries", "<p>Buy <b>milk</b></p>")
        .unwrap()
        .clone();

    assert_eq!(created.content_plain, "Buy milk");
    assert!(!page.is_creating_new());
    assert_eq!(page.selected().map(|n| n.id), Some(created.id));
    assert_eq!(page.notes()[0].id, created.id);

    page.apply(PageAction::Search("milk".to_string()));
    assert_eq!(page.filtered_notes().len(), 1);
    page.apply(PageAction::Search("bread".to_string()));
    assert!(page.filtered_notes().is_empty());
}

#[test]
fn update_leaves_exactly_one_matching_entry() {
    let (store, session, mut page) = mounted();
    let created = page.create_note(&store, &session, "t", "<p>a</p>").unwrap().clone();
    page.create_note(&store, &session, "other", "").unwrap();
    page.apply(PageAction::Select(created.id));

    page.update_note(&store, &session, "t2", "<h2>b</h2>").unwrap();

    let matching: Vec<&Note> = page.notes().iter().filter(|n| n.id == created.id).collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].title, "t2");
    assert_eq!(matching[0].content, "<h2>b</h2>");
    assert_eq!(matching[0].content_plain, "b");
    assert_eq!(page.notes().len(), 2);
    assert_eq!(page.selected().map(|n| n.id), Some(created.id));
}

#[test]
fn update_without_selection_is_a_no_op() {
    let (store, session, mut page) = mounted();
    page.create_note(&store, &session, "t", "").unwrap();
    page.apply(PageAction::ClearSelection);
    let before = page.clone();

    assert!(page.update_note(&store, &session, "x", "y").unwrap().is_none());
    assert_eq!(page, before);
}

#[test]
fn delete_removes_note_and_clears_selection() {
    let (store, session, mut page) = mounted();
    let created = page.create_note(&store, &session, "t", "").unwrap().clone();

    assert!(page.delete_note(&store, &session).unwrap());

    assert!(page.notes().iter().all(|n| n.id != created.id));
    assert_eq!(page.selection(), Selection::Nothing);
    assert!(store.list_notes(session.user_id).unwrap().is_empty());
}

#[test]
fn toggle_favorite_twice_restores_flag() {
    let (store, session, mut page) = mounted();
    page.create_note(&store, &session, "t", "").unwrap();

    let once = page.toggle_favorite(&store, &session).unwrap().unwrap().is_favorite;
    assert!(once);
    let twice = page.toggle_favorite(&store, &session).unwrap().unwrap().is_favorite;
    assert!(!twice);
}

#[test]
fn toggle_archived_leaves_favorite_alone() {
    let (store, session, mut page) = mounted();
    page.create_note(&store, &session, "t", "").unwrap();
    page.toggle_favorite(&store, &session).unwrap();

    let note = page.toggle_archived(&store, &session).unwrap().unwrap();
    assert!(note.is_archived);
    assert!(note.is_favorite);
}

#[test]
fn failed_store_call_leaves_state_unchanged() {
    let (store, session, mut page) = mounted();
    page.create_note(&store, &session, "t", "").unwrap();
    // Remove the row behind the page's back.
    let id = page.selected().unwrap().id;
    store.delete_note(session.user_id, id).unwrap();
    let before = page.clone();

    let err = page.update_note(&store, &session, "x", "y").unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(page, before);
}
