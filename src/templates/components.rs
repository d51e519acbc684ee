//! Shared HTML components for the notes application.
//!
//! Contains the navigation bar, toast notifications, page links and the base
//! HTML template.

use crate::auth::Session;
use crate::notes::html_escape;
use uuid::Uuid;

use super::styles::STYLE;

// ============================================================================
// Toasts
// ============================================================================

/// One-shot notifications, carried across redirects as a short query code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toast {
    Saved,
    SaveFailed,
    Deleted,
    DeleteFailed,
    UpdateFailed,
    FetchFailed,
    AiFailed,
    SummaryFailed,
    CollectionCreated,
    CollectionFailed,
}

impl Toast {
    pub fn code(self) -> &'static str {
        match self {
            Toast::Saved => "saved",
            Toast::SaveFailed => "save_failed",
            Toast::Deleted => "deleted",
            Toast::DeleteFailed => "delete_failed",
            Toast::UpdateFailed => "update_failed",
            Toast::FetchFailed => "fetch_failed",
            Toast::AiFailed => "ai_failed",
            Toast::SummaryFailed => "summary_failed",
            Toast::CollectionCreated => "collection_created",
            Toast::CollectionFailed => "collection_failed",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Some(match code {
            "saved" => Toast::Saved,
            "save_failed" => Toast::SaveFailed,
            "deleted" => Toast::Deleted,
            "delete_failed" => Toast::DeleteFailed,
            "update_failed" => Toast::UpdateFailed,
            "fetch_failed" => Toast::FetchFailed,
            "ai_failed" => Toast::AiFailed,
            "summary_failed" => Toast::SummaryFailed,
            "collection_created" => Toast::CollectionCreated,
            "collection_failed" => Toast::CollectionFailed,
            _ => return None,
        })
    }

    pub fn message(self) -> &'static str {
        match self {
            Toast::Saved => "Note saved!",
            Toast::SaveFailed => "Failed to save note",
            Toast::Deleted => "Note deleted",
            Toast::DeleteFailed => "Failed to delete note",
            Toast::UpdateFailed => "Failed to update note",
            Toast::FetchFailed => "Failed to fetch notes",
            Toast::AiFailed => "Failed to get AI response",
            Toast::SummaryFailed => "Failed to generate summary",
            Toast::CollectionCreated => "Collection created",
            Toast::CollectionFailed => "Failed to update collection",
        }
    }

    pub fn is_error(self) -> bool {
        !matches!(self, Toast::Saved | Toast::Deleted | Toast::CollectionCreated)
    }
}

pub fn toast_html(toast: Option<Toast>) -> String {
    match toast {
        Some(t) => format!(
            r#"<div class="toast{}" role="status">{}</div>"#,
            if t.is_error() { " error" } else { "" },
            t.message()
        ),
        None => String::new(),
    }
}

// ============================================================================
// Links
// ============================================================================

/// The notes page URL for a given view state.
pub fn notes_href(
    selected: Option<Uuid>,
    creating_new: bool,
    search: &str,
    sidebar_open: bool,
    toast: Option<Toast>,
) -> String {
    let mut params = Vec::new();
    if let Some(id) = selected {
        params.push(format!("selected={}", id));
    } else if creating_new {
        params.push("new=1".to_string());
    }
    if !search.is_empty() {
        params.push(format!("q={}", urlencoding::encode(search)));
    }
    if !sidebar_open {
        params.push("sidebar=closed".to_string());
    }
    if let Some(t) = toast {
        params.push(format!("toast={}", t.code()));
    }

    if params.is_empty() {
        "/notes".to_string()
    } else {
        format!("/notes?{}", params.join("&"))
    }
}

/// Hidden inputs that carry search text and sidebar state through a form post.
pub fn view_state_inputs(search: &str, sidebar_open: bool) -> String {
    format!(
        r#"<input type="hidden" name="q" value="{}"><input type="hidden" name="sidebar" value="{}">"#,
        html_escape(search),
        if sidebar_open { "open" } else { "closed" }
    )
}

// ============================================================================
// Navigation Bar
// ============================================================================

pub fn nav_bar(session: Option<&Session>) -> String {
    let links = match session {
        Some(s) => format!(
            r#"<a href="/notes">Notes</a>
            <a href="/collections">Collections</a>
            <a href="/ai">AI Assistant</a>
            <span class="spacer"></span>
            <span class="who">{}</span>
            <a href="/logout">Logout</a>"#,
            html_escape(&s.email)
        ),
        None => r#"<span class="spacer"></span>
            <a href="/login">Sign In</a>
            <a href="/signup">Sign Up</a>"#
            .to_string(),
    };

    format!(
        r#"<nav class="nav-bar">
            <a href="/" class="brand">NodeArc</a>
            {}
        </nav>"#,
        links
    )
}

// ============================================================================
// Base HTML Template
// ============================================================================

pub fn base_html(title: &str, content: &str, session: Option<&Session>, toast: Option<Toast>) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - NodeArc</title>
    <style>{STYLE}</style>
</head>
<body>
    {nav}
    {toast}
    {content}
</body>
</html>"#,
        title = html_escape(title),
        nav = nav_bar(session),
        toast = toast_html(toast),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_codes_round_trip() {
        for toast in [Toast::Saved, Toast::DeleteFailed, Toast::AiFailed, Toast::CollectionCreated] {
            assert_eq!(Toast::from_code(toast.code()), Some(toast));
        }
        assert_eq!(Toast::from_code("nonsense"), None);
    }

    #[test]
    fn test_toast_messages() {
        assert_eq!(Toast::Saved.message(), "Note saved!");
        assert!(!Toast::Saved.is_error());
        assert!(toast_html(Some(Toast::SaveFailed)).contains("toast error"));
        assert!(toast_html(None).is_empty());
    }

    #[test]
    fn test_notes_href() {
        let id = Uuid::nil();
        assert_eq!(notes_href(None, false, "", true, None), "/notes");
        assert_eq!(
            notes_href(Some(id), true, "a b", false, Some(Toast::Saved)),
            format!("/notes?selected={}&q=a%20b&sidebar=closed&toast=saved", id)
        );
        assert_eq!(notes_href(None, true, "", true, None), "/notes?new=1");
    }

    #[test]
    fn test_nav_bar_escapes_email() {
        let user = crate::models::User {
            id: Uuid::new_v4(),
            email: "<b>@x".to_string(),
            password_hash: String::new(),
            created_at: chrono::Utc::now(),
        };
        let html = nav_bar(Some(&Session::for_user(&user)));
        assert!(html.contains("&lt;b&gt;@x"));
        assert!(html.contains("/logout"));
    }
}
