//! Note editor template.
//!
//! A `contenteditable` body with a small formatting bar. The title and the
//! body's HTML are only sent on Save; nothing is autosaved.

use crate::models::Note;
use crate::notes::{html_escape, sanitize_html};

use super::components::view_state_inputs;

/// Uncommitted editor contents to re-display after a failed save.
#[derive(Debug, Clone, Copy)]
pub struct EditorDraft<'a> {
    pub title: &'a str,
    pub content: &'a str,
}

const EDITOR_JS: &str = r#"
<script>
function submitNote(form) {
    var body = document.getElementById('rich-body');
    form.querySelector('input[name=content]').value = body.innerHTML;
    var button = form.querySelector('button[type=submit]');
    button.disabled = true;
    button.textContent = 'Saving...';
    return true;
}
function format(command, value) {
    document.execCommand(command, false, value || null);
    document.getElementById('rich-body').focus();
}
</script>
"#;

fn format_bar() -> &'static str {
    r#"<div class="format-bar">
        <button type="button" onclick="format('bold')"><b>B</b></button>
        <button type="button" onclick="format('italic')"><i>I</i></button>
        <button type="button" onclick="format('strikeThrough')"><s>S</s></button>
        <button type="button" onclick="format('formatBlock', 'h2')">H2</button>
        <button type="button" onclick="format('insertUnorderedList')">&bull; List</button>
        <button type="button" onclick="format('insertOrderedList')">1. List</button>
        <button type="button" onclick="format('formatBlock', 'blockquote')">&ldquo;</button>
        <button type="button" onclick="format('formatBlock', 'p')">&para;</button>
    </div>"#
}

/// Favorite, archive and delete controls for a saved note.
fn note_actions(note: &Note, view_state: &str) -> String {
    let (star, star_title) = if note.is_favorite {
        ("&#9733;", "Remove from favorites")
    } else {
        ("&#9734;", "Add to favorites")
    };
    let archive_title = if note.is_archived { "Unarchive" } else { "Archive" };

    format!(
        r#"<form method="post" action="/notes/{id}/favorite">{vs}
            <button type="submit" class="marker favorite" title="{star_title}">{star}</button>
        </form>
        <form method="post" action="/notes/{id}/archive">{vs}
            <button type="submit" title="{archive_title}">{archive_title}</button>
        </form>
        <form method="post" action="/notes/{id}/delete"
              onsubmit="return confirm('Are you sure you want to delete this note?')">{vs}
            <input type="hidden" name="confirm" value="true">
            <button type="submit" class="danger" title="Delete note">Delete</button>
        </form>"#,
        id = note.id,
        vs = view_state,
        star = star,
        star_title = star_title,
        archive_title = archive_title,
    )
}

/// Tags, collections and AI tools shown under a saved note.
fn note_footer(note: &Note, view_state: &str) -> String {
    let mut html = String::from(r#"<div class="editor-footer"><span>Tags:</span>"#);

    for tag in &note.tags {
        html.push_str(&format!(
            r#"<span class="chip">{name}
                <form method="post" action="/notes/{id}/tags/{tag_id}/remove">{vs}
                    <button type="submit" class="link" title="Remove tag">&times;</button>
                </form>
            </span>"#,
            name = html_escape(&tag.name),
            id = note.id,
            tag_id = tag.id,
            vs = view_state,
        ));
    }

    html.push_str(&format!(
        r#"<form method="post" action="/notes/{id}/tags" class="inline-form">{vs}
            <input type="text" name="name" placeholder="Add tag" required>
            <button type="submit">+</button>
        </form>"#,
        id = note.id,
        vs = view_state,
    ));

    if !note.collections.is_empty() {
        html.push_str("<span>Collections:</span>");
        for collection in &note.collections {
            html.push_str(&format!(
                r#"<span class="chip" style="border-left: 4px solid {color}">{name}</span>"#,
                color = html_escape(&collection.color),
                name = html_escape(&collection.name),
            ));
        }
    }

    html.push_str(&format!(
        r#"<span class="spacer"></span>
        <a href="/ai?note={id}">Ask AI</a>
        <form method="post" action="/notes/{id}/summary"><button type="submit">Summarize</button></form>
        <form method="post" action="/notes/{id}/key-points"><button type="submit">Key points</button></form>
        </div>"#,
        id = note.id,
    ));

    html
}

/// Render the editor for `note`, or for a new note when `note` is `None`.
pub fn render_editor(note: Option<&Note>, draft: Option<EditorDraft<'_>>, search: &str, sidebar_open: bool) -> String {
    let view_state = view_state_inputs(search, sidebar_open);

    let (title, body) = match (draft, note) {
        (Some(d), _) => (d.title.to_string(), sanitize_html(d.content)),
        (None, Some(n)) => (n.title.clone(), sanitize_html(&n.content)),
        (None, None) => (String::new(), String::new()),
    };

    let action = match note {
        Some(n) => format!("/notes/{}", n.id),
        None => "/notes".to_string(),
    };

    let actions = note.map(|n| note_actions(n, &view_state)).unwrap_or_default();
    let footer = note.map(|n| note_footer(n, &view_state)).unwrap_or_default();

    format!(
        r#"<div class="editor">
            <div class="editor-toolbar">
                <form id="note-form" method="post" action="{action}" onsubmit="return submitNote(this)" class="inline-form" style="flex: 1">
                    {view_state}
                    <input type="hidden" name="content" value="">
                    <input type="text" name="title" class="title-input" placeholder="Note title..." value="{title}">
                    <button type="submit" class="primary">Save</button>
                </form>
                {actions}
            </div>
            {format_bar}
            <div id="rich-body" class="rich-body" contenteditable="true"
                 data-placeholder="Start writing your thoughts...">{body}</div>
            {footer}
        </div>
        {script}"#,
        action = action,
        view_state = view_state,
        title = html_escape(&title),
        actions = actions,
        format_bar = format_bar(),
        body = body,
        footer = footer,
        script = EDITOR_JS,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn note() -> Note {
        Note {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Groceries".to_string(),
            content: "<p>Buy milk</p><script>x()</script>".to_string(),
            content_plain: "Buy milk".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            is_archived: false,
            is_favorite: true,
            tags: Vec::new(),
            collections: Vec::new(),
        }
    }

    #[test]
    fn test_existing_note_posts_to_its_url() {
        let n = note();
        let html = render_editor(Some(&n), None, "", true);
        assert!(html.contains(&format!(r#"action="/notes/{}""#, n.id)));
        assert!(html.contains("Remove from favorites"));
        assert!(html.contains("confirm('Are you sure you want to delete this note?')"));
        assert!(html.contains("<p>Buy milk</p>"));
        assert!(!html.contains("x()"));
    }

    #[test]
    fn test_new_note_has_no_delete_or_favorite() {
        let html = render_editor(None, None, "", true);
        assert!(html.contains(r#"action="/notes""#));
        assert!(!html.contains("/delete"));
        assert!(!html.contains("favorites"));
    }

    #[test]
    fn test_draft_wins_over_saved_row() {
        let n = note();
        let draft = EditorDraft {
            title: "Unsaved <title>",
            content: "<p>draft body</p>",
        };
        let html = render_editor(Some(&n), Some(draft), "", true);
        assert!(html.contains("Unsaved &lt;title&gt;"));
        assert!(html.contains("draft body"));
        assert!(!html.contains("Buy milk"));
    }
}
