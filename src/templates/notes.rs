//! Notes page templates: the sidebar list and the page layout around the editor.

use crate::models::Note;
use crate::notes::{html_escape, preview, relative_time};
use crate::page::NotesPage;
use chrono::Utc;
use uuid::Uuid;

use super::components::notes_href;
use super::editor::{render_editor, EditorDraft};

// ============================================================================
// Notes List
// ============================================================================

pub fn render_notes_list(notes: &[&Note], selected: Option<Uuid>, search: &str, sidebar_open: bool) -> String {
    if notes.is_empty() {
        return r#"<ul class="note-list"><li class="empty">
            <p>No notes yet</p>
            <p><small>Create your first note to get started</small></p>
        </li></ul>"#
            .to_string();
    }

    let now = Utc::now();
    let mut html = String::from(r#"<ul class="note-list">"#);

    for note in notes {
        let class = if Some(note.id) == selected {
            "note-item selected"
        } else {
            "note-item"
        };
        let title = if note.title.is_empty() { "Untitled" } else { note.title.as_str() };
        let body = if note.content_plain.trim().is_empty() {
            "No content".to_string()
        } else {
            preview(&note.content_plain, 120)
        };

        let mut markers = String::new();
        if note.is_favorite {
            markers.push_str(r#"<span class="marker favorite" title="Favorite">&#9733;</span>"#);
        }
        if note.is_archived {
            markers.push_str(r#"<span class="marker archived" title="Archived">&#128451;</span>"#);
        }

        html.push_str(&format!(
            r#"<li class="{class}" data-search="{haystack}">
                <a href="{href}">
                    <span class="title"><span>{title}</span><span>{markers}</span></span>
                    <span class="preview">{body}</span>
                    <span class="meta">{updated}</span>
                </a>
            </li>"#,
            class = class,
            haystack = html_escape(&format!("{}\n{}", note.title, note.content_plain).to_lowercase()),
            href = html_escape(&notes_href(Some(note.id), false, search, sidebar_open, None)),
            title = html_escape(title),
            markers = markers,
            body = html_escape(&body),
            updated = relative_time(note.updated_at, now),
        ));
    }

    html.push_str("</ul>");
    html
}

// ============================================================================
// Notes Page
// ============================================================================

/// Live filtering of the rendered list on every keystroke; Enter submits the
/// search so it survives navigation.
const FILTER_JS: &str = r#"
<script>
function filterNotes(query) {
    var q = query.toLowerCase();
    document.querySelectorAll('.note-list .note-item').forEach(function(item) {
        item.style.display = item.dataset.search.indexOf(q) === -1 ? 'none' : '';
    });
}
</script>
"#;

pub fn render_notes_page(page: &NotesPage, draft: Option<EditorDraft<'_>>) -> String {
    let search = page.search();
    let sidebar_open = page.sidebar_open();
    let selected = page.selected();
    let selected_id = selected.map(|n| n.id);

    let heading = if selected.is_some() {
        "Edit Note"
    } else if page.is_creating_new() {
        "New Note"
    } else {
        "Select a note"
    };

    let main = if selected.is_some() || page.is_creating_new() {
        render_editor(selected, draft, search, sidebar_open)
    } else {
        r#"<div class="placeholder"><div>
            <p style="font-size: 1.2rem">No note selected</p>
            <p><small>Select a note from the sidebar or create a new one</small></p>
        </div></div>"#
            .to_string()
    };

    let sidebar_hidden_input = if sidebar_open {
        ""
    } else {
        r#"<input type="hidden" name="sidebar" value="closed">"#
    };
    let selected_hidden_input = selected_id
        .map(|id| format!(r#"<input type="hidden" name="selected" value="{}">"#, id))
        .unwrap_or_default();

    format!(
        r#"<div class="notes-layout">
            <aside class="sidebar{closed}">
                <div class="sidebar-header">
                    <div class="row">
                        <h1>My Notes</h1>
                        <a class="button primary" href="{new_href}" title="Create new note">+</a>
                    </div>
                    <form method="get" action="/notes">
                        {selected_hidden_input}
                        {sidebar_hidden_input}
                        <input type="text" name="q" placeholder="Search notes..." value="{search}"
                               oninput="filterNotes(this.value)">
                    </form>
                </div>
                {list}
            </aside>
            <section class="main">
                <div class="main-header">
                    <a class="button" href="{toggle_href}" title="Toggle sidebar">&#9776;</a>
                    <h2>{heading}</h2>
                </div>
                {main}
            </section>
        </div>
        {script}"#,
        script = FILTER_JS,
        closed = if sidebar_open { "" } else { " closed" },
        new_href = html_escape(&notes_href(None, true, search, sidebar_open, None)),
        selected_hidden_input = selected_hidden_input,
        sidebar_hidden_input = sidebar_hidden_input,
        search = html_escape(search),
        list = render_notes_list(&page.filtered_notes(), selected_id, search, sidebar_open),
        toggle_href = html_escape(&notes_href(
            selected_id,
            page.is_creating_new(),
            search,
            !sidebar_open,
            None
        )),
        heading = heading,
        main = main,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::PageAction;
    use chrono::Duration;

    fn note(title: &str, plain: &str) -> Note {
        Note {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: title.to_string(),
            content: format!("<p>{}</p>", plain),
            content_plain: plain.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now() - Duration::minutes(5),
            is_archived: true,
            is_favorite: true,
            tags: Vec::new(),
            collections: Vec::new(),
        }
    }

    #[test]
    fn test_list_empty_state() {
        assert!(render_notes_list(&[], None, "", true).contains("No notes yet"));
    }

    #[test]
    fn test_list_item_fallbacks_and_markers() {
        let n = note("", "");
        let html = render_notes_list(&[&n], Some(n.id), "", true);
        assert!(html.contains("Untitled"));
        assert!(html.contains("No content"));
        assert!(html.contains("note-item selected"));
        assert!(html.contains("Favorite"));
        assert!(html.contains("Archived"));
        assert!(html.contains("5 minutes ago"));
    }

    #[test]
    fn test_page_shows_placeholder_without_selection() {
        let mut page = NotesPage::new();
        page.apply(PageAction::Loaded(vec![note("Groceries", "Buy milk")]));
        let html = render_notes_page(&page, None);
        assert!(html.contains("No note selected"));
        assert!(html.contains("Groceries"));
    }

    #[test]
    fn test_page_filters_list_by_search() {
        let mut page = NotesPage::new();
        page.apply(PageAction::Loaded(vec![note("Groceries", "Buy milk"), note("Work", "report")]));
        page.apply(PageAction::Search("MILK".to_string()));
        let html = render_notes_page(&page, None);
        assert!(html.contains("Groceries"));
        assert!(!html.contains(">Work<"));
    }

    #[test]
    fn test_closed_sidebar() {
        let mut page = NotesPage::new();
        page.apply(PageAction::ToggleSidebar);
        let html = render_notes_page(&page, None);
        assert!(html.contains("sidebar closed"));
    }
}
