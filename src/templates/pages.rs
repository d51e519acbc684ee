//! Landing, sign-in, collections and AI assistant pages.

use crate::models::{AiInteraction, Collection, Note, DEFAULT_COLLECTION_COLOR};
use crate::notes::html_escape;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

// ============================================================================
// Landing
// ============================================================================

pub fn landing_html() -> &'static str {
    r#"<div class="landing">
        <h1>Welcome to <span>NodeArc</span></h1>
        <p>Your AI-powered second brain for capturing, organizing, and retrieving knowledge</p>
        <div class="actions">
            <a href="/signup" class="button primary">Get Started</a>
            <a href="/login" class="button">Sign In</a>
        </div>
    </div>"#
}

pub fn not_found_html() -> &'static str {
    r#"<div class="landing">
        <h1>404 - Page Not Found</h1>
        <p>Could not find the requested resource</p>
        <div class="actions">
            <a href="/" class="button primary">Return Home</a>
        </div>
    </div>"#
}

// ============================================================================
// Login / Signup
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Signup,
}

pub fn auth_form_html(mode: AuthMode, email: &str, error: Option<&str>) -> String {
    let (heading, action, button, alternate) = match mode {
        AuthMode::Login => (
            "Sign In",
            "/login",
            "Sign In",
            r#"No account yet? <a href="/signup">Sign up</a>"#,
        ),
        AuthMode::Signup => (
            "Create Account",
            "/signup",
            "Sign Up",
            r#"Already have an account? <a href="/login">Sign in</a>"#,
        ),
    };
    let message = error
        .map(|e| format!(r#"<div class="message error">{}</div>"#, html_escape(e)))
        .unwrap_or_default();

    format!(
        r#"<form class="auth-form" method="POST" action="{action}">
            <h1>{heading}</h1>
            {message}
            <input type="email" name="email" placeholder="Email" value="{email}" autofocus required>
            <input type="password" name="password" placeholder="Password" required>
            <button type="submit" class="primary">{button}</button>
            <small>{alternate}</small>
        </form>"#,
        action = action,
        heading = heading,
        message = message,
        email = html_escape(email),
        button = button,
        alternate = alternate,
    )
}

// ============================================================================
// Collections
// ============================================================================

pub fn collections_html(collections: &[Collection], notes: &[Note]) -> String {
    let titles: HashMap<Uuid, &str> = notes
        .iter()
        .map(|n| (n.id, if n.title.is_empty() { "Untitled" } else { n.title.as_str() }))
        .collect();

    let mut html = format!(
        r#"<div class="container">
        <h1>Collections</h1>
        <form class="new-collection" method="post" action="/collections">
            <input type="text" name="name" placeholder="Collection name" required>
            <input type="text" name="description" placeholder="Description (optional)">
            <input type="color" name="color" value="{}" title="Color">
            <button type="submit" class="primary">Create</button>
        </form>"#,
        DEFAULT_COLLECTION_COLOR
    );

    if collections.is_empty() {
        html.push_str(r#"<p class="context-note">No collections yet.</p>"#);
    }

    for collection in collections {
        let count = collection.note_ids.len();
        html.push_str(&format!(
            r#"<div class="collection">
                <div class="collection-header">
                    <span class="swatch" style="background: {color}"></span>
                    <h3>{name}</h3>
                    <small>{count} note{plural}</small>
                    <form method="post" action="/collections/{id}/delete"
                          onsubmit="return confirm('Delete this collection? Its notes are kept.')">
                        <button type="submit" class="danger">Delete</button>
                    </form>
                </div>"#,
            color = html_escape(&collection.color),
            name = html_escape(&collection.name),
            count = count,
            plural = if count == 1 { "" } else { "s" },
            id = collection.id,
        ));

        if let Some(description) = &collection.description {
            html.push_str(&format!(
                r#"<p class="description">{}</p>"#,
                html_escape(description)
            ));
        }

        html.push_str("<ul>");
        for note_id in &collection.note_ids {
            let Some(title) = titles.get(note_id) else { continue };
            html.push_str(&format!(
                r#"<li><a href="/notes?selected={note_id}">{title}</a>
                    <form method="post" action="/collections/{id}/notes/{note_id}/remove">
                        <button type="submit" class="link">Remove</button>
                    </form>
                </li>"#,
                note_id = note_id,
                title = html_escape(title),
                id = collection.id,
            ));
        }
        html.push_str("</ul>");

        let candidates: Vec<&Note> = notes
            .iter()
            .filter(|n| !collection.note_ids.contains(&n.id))
            .collect();
        if !candidates.is_empty() {
            html.push_str(&format!(
                r#"<form method="post" action="/collections/{}/notes" class="inline-form"><select name="note_id">"#,
                collection.id
            ));
            for note in candidates {
                html.push_str(&format!(
                    r#"<option value="{}">{}</option>"#,
                    note.id,
                    html_escape(titles.get(&note.id).copied().unwrap_or("Untitled"))
                ));
            }
            html.push_str(r#"</select><button type="submit">Add note</button></form>"#);
        }

        html.push_str("</div>");
    }

    html.push_str("</div>");
    html
}

// ============================================================================
// AI Assistant
// ============================================================================

const CHAT_JS: &str = r#"
<script>
function sendChat(form) {
    var input = form.querySelector('input[name=prompt]');
    if (!input.value.trim()) return false;
    form.querySelector('button[type=submit]').disabled = true;
    document.getElementById('pending').classList.add('active');
    var log = document.getElementById('chat-log');
    log.scrollTop = log.scrollHeight;
    return true;
}
function syncSend(input) {
    input.form.querySelector('button[type=submit]').disabled = !input.value.trim();
}
var log = document.getElementById('chat-log');
if (log) log.scrollTop = log.scrollHeight;
</script>
"#;

fn bubble(role: &str, content: &str, at: DateTime<Utc>) -> String {
    format!(
        r#"<div class="bubble {role}"><span class="stamp">{label} &middot; {time}</span>{content}</div>"#,
        role = role,
        label = if role == "user" { "You" } else { "Assistant" },
        time = at.format("%H:%M:%S"),
        content = html_escape(content),
    )
}

/// The conversation is the interaction log, oldest first.
pub fn ai_chat_html(interactions: &[AiInteraction], context_note: Option<&Note>, draft_prompt: &str) -> String {
    let mut log = String::new();

    if interactions.is_empty() {
        log.push_str(
            r#"<div class="chat-empty">
                <p>Ask me anything about your notes!</p>
                <p><small>I can help you organize, summarize, and find insights.</small></p>
            </div>"#,
        );
    }

    for interaction in interactions {
        log.push_str(&bubble("user", &interaction.query, interaction.created_at));
        log.push_str(&bubble("assistant", &interaction.response, interaction.created_at));
    }

    let (context_line, note_input) = match context_note {
        Some(note) => (
            format!(
                r#"<span class="context-note">Using note: <a href="/notes?selected={id}">{title}</a> &middot; <a href="/ai">clear</a></span>"#,
                id = note.id,
                title = html_escape(if note.title.is_empty() { "Untitled" } else { &note.title }),
            ),
            format!(r#"<input type="hidden" name="note_id" value="{}">"#, note.id),
        ),
        None => (String::new(), String::new()),
    };

    format!(
        r#"<div class="chat">
            <div class="chat-header">
                <h3>AI Assistant</h3>
                {context_line}
            </div>
            <div class="chat-log" id="chat-log">
                {log}
                <div class="pending" id="pending"><span></span><span></span><span></span></div>
            </div>
            <form class="chat-form" method="post" action="/ai" onsubmit="return sendChat(this)">
                {note_input}
                <input type="text" name="prompt" placeholder="Ask about your notes..." value="{draft}"
                       oninput="syncSend(this)" autofocus>
                <button type="submit" class="primary"{disabled}>Send</button>
            </form>
        </div>
        {script}"#,
        context_line = context_line,
        log = log,
        note_input = note_input,
        draft = html_escape(draft_prompt),
        disabled = if draft_prompt.trim().is_empty() { " disabled" } else { "" },
        script = CHAT_JS,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(title: &str) -> Note {
        Note {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: title.to_string(),
            content: String::new(),
            content_plain: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            is_archived: false,
            is_favorite: false,
            tags: Vec::new(),
            collections: Vec::new(),
        }
    }

    #[test]
    fn test_auth_form_shows_escaped_error() {
        let html = auth_form_html(AuthMode::Login, "a@b.c", Some("<bad>"));
        assert!(html.contains(r#"action="/login""#));
        assert!(html.contains("&lt;bad&gt;"));
        let html = auth_form_html(AuthMode::Signup, "", None);
        assert!(html.contains(r#"action="/signup""#));
        assert!(!html.contains("message error"));
    }

    #[test]
    fn test_collections_lists_members_and_candidates() {
        let a = note("Alpha");
        let b = note("Beta");
        let collection = Collection {
            id: Uuid::new_v4(),
            user_id: a.user_id,
            name: "Work".to_string(),
            description: Some("things".to_string()),
            color: DEFAULT_COLLECTION_COLOR.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            note_ids: vec![a.id],
        };
        let html = collections_html(&[collection], &[a.clone(), b.clone()]);
        assert!(html.contains("1 note<"));
        assert!(html.contains(&format!("/notes/{}/remove", a.id)));
        assert!(html.contains(&format!(r#"<option value="{}">Beta</option>"#, b.id)));
        assert!(!html.contains(&format!(r#"<option value="{}">"#, a.id)));
    }

    #[test]
    fn test_chat_empty_state_and_disabled_send() {
        let html = ai_chat_html(&[], None, "");
        assert!(html.contains("Ask me anything about your notes!"));
        assert!(html.contains(" disabled>Send"));
    }

    #[test]
    fn test_chat_renders_log_and_context() {
        let n = note("Groceries");
        let interaction = AiInteraction {
            id: Uuid::now_v7(),
            user_id: n.user_id,
            note_id: Some(n.id),
            query: "what to buy?".to_string(),
            response: "milk <3".to_string(),
            model: "m".to_string(),
            created_at: Utc::now(),
        };
        let html = ai_chat_html(&[interaction], Some(&n), "draft");
        assert!(html.contains("what to buy?"));
        assert!(html.contains("milk &lt;3"));
        assert!(html.contains("Using note:"));
        assert!(html.contains(&format!(r#"name="note_id" value="{}""#, n.id)));
        assert!(html.contains(r#"value="draft""#));
    }
}
