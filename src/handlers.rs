//! HTTP route handlers for the HTML interface.
//!
//! Notes page state lives in the query string (`selected`, `new`, `q`,
//! `sidebar`, `toast`). Mutations are form posts that redirect back to the
//! notes page with a toast code; a failed save re-renders the editor with the
//! submitted text instead so nothing typed is lost.

use crate::auth::{
    clear_session_cookie, hash_password, session_cookie, sign_session, validate_credentials,
    verify_password, Session,
};
use crate::error::AppError;
use crate::models::{NewCollection, Note};
use crate::page::{NotesPage, PageAction};
use crate::templates::{
    ai_chat_html, auth_form_html, base_html, collections_html, landing_html, not_found_html, notes_href,
    render_notes_page, AuthMode, EditorDraft, Toast,
};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{header::SET_COOKIE, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

const NO_KEY_POINTS: &str = "No key points found";

fn sidebar_is_open(sidebar: Option<&str>) -> bool {
    sidebar != Some("closed")
}

fn parse_id(raw: Option<&str>) -> Option<Uuid> {
    raw.and_then(|s| Uuid::parse_str(s.trim()).ok())
}

fn redirect_to_notes(selected: Option<Uuid>, search: &str, sidebar_open: bool, toast: Option<Toast>) -> Response {
    Redirect::to(&notes_href(selected, false, search, sidebar_open, toast)).into_response()
}

fn notes_response(session: &Session, page: &NotesPage, draft: Option<EditorDraft<'_>>, toast: Option<Toast>) -> Response {
    Html(base_html(
        "Notes",
        &render_notes_page(page, draft),
        Some(session),
        toast,
    ))
    .into_response()
}

/// Mount the page and apply the view state carried by the request. A failed
/// fetch leaves an empty list; the caller decides whether to report it.
fn load_page(state: &AppState, session: &Session, search: &str, sidebar_open: bool) -> (NotesPage, bool) {
    let (mut page, fetched) = match NotesPage::mount(&state.store, session) {
        Ok(page) => (page, true),
        Err(e) => {
            tracing::error!(error = %e, user_id = %session.user_id, "failed to fetch notes");
            (NotesPage::new(), false)
        }
    };
    page.apply(PageAction::Search(search.to_string()));
    if !sidebar_open {
        page.apply(PageAction::ToggleSidebar);
    }
    (page, fetched)
}

// ============================================================================
// Landing
// ============================================================================

pub async fn landing() -> Html<String> {
    Html(base_html("Welcome", landing_html(), None, None))
}

/// Router fallback for unknown paths.
pub async fn not_found(session: Option<Session>) -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(base_html("Not Found", not_found_html(), session.as_ref(), None)),
    )
        .into_response()
}

// ============================================================================
// Auth Handlers
// ============================================================================

#[derive(Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

fn auth_page(mode: AuthMode, email: &str, error: Option<&str>, status: StatusCode) -> Response {
    let title = match mode {
        AuthMode::Login => "Sign In",
        AuthMode::Signup => "Sign Up",
    };
    (status, Html(base_html(title, &auth_form_html(mode, email, error), None, None))).into_response()
}

/// Issue the session cookie and land on the notes page.
fn start_session(state: &AppState, session: &Session) -> Response {
    let Some(token) = sign_session(session, &state.config.secret) else {
        tracing::error!(user_id = %session.user_id, "failed to sign session");
        return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to create session").into_response();
    };
    let cookie = session_cookie(&token, state.config.secure_cookies);
    ([(SET_COOKIE, cookie)], Redirect::to("/notes")).into_response()
}

pub async fn login_page() -> Response {
    auth_page(AuthMode::Login, "", None, StatusCode::OK)
}

pub async fn login_submit(State(state): State<Arc<AppState>>, Form(form): Form<CredentialsForm>) -> Response {
    let email = form.email.trim().to_lowercase();

    if state.is_login_locked(&email) {
        tracing::warn!(email = %email, "login attempt while locked out");
        return auth_page(
            AuthMode::Login,
            &email,
            Some("Too many failed attempts. Please wait and try again."),
            StatusCode::TOO_MANY_REQUESTS,
        );
    }

    let user = match state.store.user_by_email(&email) {
        Ok(user) => user,
        Err(e) => {
            tracing::error!(error = %e, "user lookup failed");
            return auth_page(AuthMode::Login, &email, Some("Sign in failed. Please try again."), StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    // Argon2 verification is CPU-bound.
    let verified = match user {
        Some(user) => {
            let password = form.password;
            let hash = user.password_hash.clone();
            let ok = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
                .await
                .unwrap_or(false);
            ok.then_some(user)
        }
        None => None,
    };

    let Some(user) = verified else {
        state.record_login_failure(&email);
        tracing::info!(email = %email, "login failed");
        return auth_page(AuthMode::Login, &email, Some("Invalid email or password."), StatusCode::UNAUTHORIZED);
    };

    state.reset_login_failures(&email);
    tracing::info!(user_id = %user.id, "user logged in");
    start_session(&state, &Session::for_user(&user))
}

pub async fn signup_page() -> Response {
    auth_page(AuthMode::Signup, "", None, StatusCode::OK)
}

pub async fn signup_submit(State(state): State<Arc<AppState>>, Form(form): Form<CredentialsForm>) -> Response {
    let email = form.email.trim().to_lowercase();

    if let Err(e) = validate_credentials(&email, &form.password) {
        return auth_page(AuthMode::Signup, &email, Some(&e.to_string()), StatusCode::BAD_REQUEST);
    }

    let password = form.password;
    let hashed = match tokio::task::spawn_blocking(move || hash_password(&password)).await {
        Ok(result) => result,
        Err(e) => Err(AppError::Auth(e.to_string())),
    };
    let created = hashed.and_then(|hash| state.store.create_user(&email, hash));

    match created {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "user signed up");
            start_session(&state, &Session::for_user(&user))
        }
        Err(AppError::BadRequest(msg)) => auth_page(AuthMode::Signup, &email, Some(&msg), StatusCode::CONFLICT),
        Err(e) => {
            tracing::error!(error = %e, "signup failed");
            auth_page(
                AuthMode::Signup,
                &email,
                Some("Sign up failed. Please try again."),
                StatusCode::INTERNAL_SERVER_ERROR,
            )
        }
    }
}

pub async fn logout(State(state): State<Arc<AppState>>, session: Option<Session>) -> Response {
    if let Some(session) = session {
        tracing::info!(user_id = %session.user_id, "user logged out");
    }
    let cookie = clear_session_cookie(state.config.secure_cookies);
    ([(SET_COOKIE, cookie)], Redirect::to("/")).into_response()
}

// ============================================================================
// Notes Page
// ============================================================================

#[derive(Deserialize)]
pub struct NotesQuery {
    pub selected: Option<String>,
    pub new: Option<String>,
    pub q: Option<String>,
    pub sidebar: Option<String>,
    pub toast: Option<String>,
}

pub async fn notes_page(
    State(state): State<Arc<AppState>>,
    session: Session,
    Query(query): Query<NotesQuery>,
) -> Response {
    let search = query.q.unwrap_or_default();
    let (mut page, fetched) = load_page(&state, &session, &search, sidebar_is_open(query.sidebar.as_deref()));

    if query.new.is_some() {
        page.apply(PageAction::StartNew);
    } else if let Some(id) = parse_id(query.selected.as_deref()) {
        page.apply(PageAction::Select(id));
    }

    let toast = if fetched {
        query.toast.as_deref().and_then(Toast::from_code)
    } else {
        Some(Toast::FetchFailed)
    };

    notes_response(&session, &page, None, toast)
}

// ============================================================================
// Note Mutations
// ============================================================================

#[derive(Deserialize)]
pub struct NoteForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub q: String,
    pub sidebar: Option<String>,
}

pub async fn create_note(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<NoteForm>,
) -> Response {
    let sidebar_open = sidebar_is_open(form.sidebar.as_deref());
    let (mut page, _) = load_page(&state, &session, &form.q, sidebar_open);
    page.apply(PageAction::StartNew);

    match page.create_note(&state.store, &session, &form.title, &form.content) {
        Ok(note) => redirect_to_notes(Some(note.id), &form.q, sidebar_open, Some(Toast::Saved)),
        Err(e) => {
            tracing::error!(error = %e, user_id = %session.user_id, "failed to create note");
            let draft = EditorDraft { title: &form.title, content: &form.content };
            notes_response(&session, &page, Some(draft), Some(Toast::SaveFailed))
        }
    }
}

pub async fn update_note(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<Uuid>,
    Form(form): Form<NoteForm>,
) -> Response {
    let sidebar_open = sidebar_is_open(form.sidebar.as_deref());
    let (mut page, _) = load_page(&state, &session, &form.q, sidebar_open);
    page.apply(PageAction::Select(id));

    match page.update_note(&state.store, &session, &form.title, &form.content) {
        Ok(Some(note)) => redirect_to_notes(Some(note.id), &form.q, sidebar_open, Some(Toast::Saved)),
        Ok(None) => {
            tracing::warn!(user_id = %session.user_id, note_id = %id, "update for a note that is not loaded");
            // The row is gone; offer the text back as a new note.
            page.apply(PageAction::StartNew);
            let draft = EditorDraft { title: &form.title, content: &form.content };
            notes_response(&session, &page, Some(draft), Some(Toast::SaveFailed))
        }
        Err(e) => {
            tracing::error!(error = %e, user_id = %session.user_id, note_id = %id, "failed to update note");
            let draft = EditorDraft { title: &form.title, content: &form.content };
            notes_response(&session, &page, Some(draft), Some(Toast::SaveFailed))
        }
    }
}

#[derive(Deserialize)]
pub struct DeleteNoteForm {
    #[serde(default)]
    pub confirm: bool,
    #[serde(default)]
    pub q: String,
    pub sidebar: Option<String>,
}

pub async fn delete_note(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<Uuid>,
    Form(form): Form<DeleteNoteForm>,
) -> Response {
    if !form.confirm {
        return (StatusCode::BAD_REQUEST, "Deletion requires confirmation").into_response();
    }

    let sidebar_open = sidebar_is_open(form.sidebar.as_deref());
    let (mut page, _) = load_page(&state, &session, &form.q, sidebar_open);
    page.apply(PageAction::Select(id));

    match page.delete_note(&state.store, &session) {
        Ok(true) => redirect_to_notes(None, &form.q, sidebar_open, Some(Toast::Deleted)),
        Ok(false) => redirect_to_notes(None, &form.q, sidebar_open, Some(Toast::DeleteFailed)),
        Err(e) => {
            tracing::error!(error = %e, user_id = %session.user_id, note_id = %id, "failed to delete note");
            redirect_to_notes(Some(id), &form.q, sidebar_open, Some(Toast::DeleteFailed))
        }
    }
}

#[derive(Deserialize)]
pub struct ViewStateForm {
    #[serde(default)]
    pub q: String,
    pub sidebar: Option<String>,
}

pub async fn toggle_favorite(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<Uuid>,
    Form(form): Form<ViewStateForm>,
) -> Response {
    let sidebar_open = sidebar_is_open(form.sidebar.as_deref());
    let (mut page, _) = load_page(&state, &session, &form.q, sidebar_open);
    page.apply(PageAction::Select(id));

    match page.toggle_favorite(&state.store, &session) {
        Ok(Some(_)) => redirect_to_notes(Some(id), &form.q, sidebar_open, None),
        Ok(None) => redirect_to_notes(None, &form.q, sidebar_open, Some(Toast::UpdateFailed)),
        Err(e) => {
            tracing::error!(error = %e, user_id = %session.user_id, note_id = %id, "failed to toggle favorite");
            redirect_to_notes(Some(id), &form.q, sidebar_open, Some(Toast::UpdateFailed))
        }
    }
}

pub async fn toggle_archive(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<Uuid>,
    Form(form): Form<ViewStateForm>,
) -> Response {
    let sidebar_open = sidebar_is_open(form.sidebar.as_deref());
    let (mut page, _) = load_page(&state, &session, &form.q, sidebar_open);
    page.apply(PageAction::Select(id));

    match page.toggle_archived(&state.store, &session) {
        Ok(Some(_)) => redirect_to_notes(Some(id), &form.q, sidebar_open, None),
        Ok(None) => redirect_to_notes(None, &form.q, sidebar_open, Some(Toast::UpdateFailed)),
        Err(e) => {
            tracing::error!(error = %e, user_id = %session.user_id, note_id = %id, "failed to toggle archive");
            redirect_to_notes(Some(id), &form.q, sidebar_open, Some(Toast::UpdateFailed))
        }
    }
}

// ============================================================================
// Tags
// ============================================================================

#[derive(Deserialize)]
pub struct TagForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub q: String,
    pub sidebar: Option<String>,
}

pub async fn add_tag(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<Uuid>,
    Form(form): Form<TagForm>,
) -> Response {
    let sidebar_open = sidebar_is_open(form.sidebar.as_deref());
    let toast = match state.store.attach_tag(session.user_id, id, &form.name) {
        Ok(_) => None,
        Err(e) => {
            tracing::warn!(error = %e, user_id = %session.user_id, note_id = %id, "failed to add tag");
            Some(Toast::UpdateFailed)
        }
    };
    redirect_to_notes(Some(id), &form.q, sidebar_open, toast)
}

pub async fn remove_tag(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path((id, tag_id)): Path<(Uuid, Uuid)>,
    Form(form): Form<ViewStateForm>,
) -> Response {
    let sidebar_open = sidebar_is_open(form.sidebar.as_deref());
    let toast = match state.store.detach_tag(session.user_id, id, tag_id) {
        Ok(_) => None,
        Err(e) => {
            tracing::warn!(error = %e, user_id = %session.user_id, note_id = %id, "failed to remove tag");
            Some(Toast::UpdateFailed)
        }
    };
    redirect_to_notes(Some(id), &form.q, sidebar_open, toast)
}

// ============================================================================
// Collections
// ============================================================================

#[derive(Deserialize)]
pub struct ToastQuery {
    pub toast: Option<String>,
}

fn redirect_to_collections(toast: Option<Toast>) -> Response {
    match toast {
        Some(t) => Redirect::to(&format!("/collections?toast={}", t.code())).into_response(),
        None => Redirect::to("/collections").into_response(),
    }
}

pub async fn collections_page(
    State(state): State<Arc<AppState>>,
    session: Session,
    Query(query): Query<ToastQuery>,
) -> Response {
    let loaded = state
        .store
        .list_collections(session.user_id)
        .and_then(|collections| Ok((collections, state.store.list_notes(session.user_id)?)));

    let (collections, notes, toast) = match loaded {
        Ok((collections, notes)) => (collections, notes, query.toast.as_deref().and_then(Toast::from_code)),
        Err(e) => {
            tracing::error!(error = %e, user_id = %session.user_id, "failed to load collections");
            (Vec::new(), Vec::new(), Some(Toast::FetchFailed))
        }
    };

    Html(base_html(
        "Collections",
        &collections_html(&collections, &notes),
        Some(&session),
        toast,
    ))
    .into_response()
}

#[derive(Deserialize)]
pub struct CollectionForm {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
}

pub async fn create_collection(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<CollectionForm>,
) -> Response {
    // Blank optional inputs arrive as empty strings.
    let input = NewCollection {
        name: form.name,
        description: form.description.filter(|d| !d.trim().is_empty()),
        color: form.color.filter(|c| !c.trim().is_empty()),
    };

    match state.store.insert_collection(session.user_id, &input) {
        Ok(collection) => {
            tracing::info!(user_id = %session.user_id, collection_id = %collection.id, "collection created");
            redirect_to_collections(Some(Toast::CollectionCreated))
        }
        Err(e) => {
            tracing::warn!(error = %e, user_id = %session.user_id, "failed to create collection");
            redirect_to_collections(Some(Toast::CollectionFailed))
        }
    }
}

pub async fn delete_collection(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Response {
    match state.store.delete_collection(session.user_id, id) {
        Ok(()) => {
            tracing::info!(user_id = %session.user_id, collection_id = %id, "collection deleted");
            redirect_to_collections(None)
        }
        Err(e) => {
            tracing::warn!(error = %e, user_id = %session.user_id, collection_id = %id, "failed to delete collection");
            redirect_to_collections(Some(Toast::CollectionFailed))
        }
    }
}

#[derive(Deserialize)]
pub struct CollectionNoteForm {
    pub note_id: Uuid,
}

pub async fn add_note_to_collection(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<Uuid>,
    Form(form): Form<CollectionNoteForm>,
) -> Response {
    match state.store.add_note_to_collection(session.user_id, id, form.note_id) {
        Ok(_) => redirect_to_collections(None),
        Err(e) => {
            tracing::warn!(error = %e, user_id = %session.user_id, collection_id = %id, "failed to add note to collection");
            redirect_to_collections(Some(Toast::CollectionFailed))
        }
    }
}

pub async fn remove_note_from_collection(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path((id, note_id)): Path<(Uuid, Uuid)>,
) -> Response {
    match state.store.remove_note_from_collection(session.user_id, id, note_id) {
        Ok(_) => redirect_to_collections(None),
        Err(e) => {
            tracing::warn!(error = %e, user_id = %session.user_id, collection_id = %id, "failed to remove note from collection");
            redirect_to_collections(Some(Toast::CollectionFailed))
        }
    }
}

// ============================================================================
// AI Assistant
// ============================================================================

#[derive(Deserialize)]
pub struct AiQuery {
    pub note: Option<String>,
    pub toast: Option<String>,
}

fn ai_href(note_id: Option<Uuid>, toast: Option<Toast>) -> String {
    match (note_id, toast) {
        (Some(id), Some(t)) => format!("/ai?note={}&toast={}", id, t.code()),
        (Some(id), None) => format!("/ai?note={}", id),
        (None, Some(t)) => format!("/ai?toast={}", t.code()),
        (None, None) => "/ai".to_string(),
    }
}

/// The context note, if the id names one of the session owner's notes.
fn context_note(state: &AppState, session: &Session, note_id: Option<Uuid>) -> Option<Note> {
    let id = note_id?;
    match state.store.get_note(session.user_id, id) {
        Ok(note) => Some(note),
        Err(e) => {
            tracing::debug!(error = %e, note_id = %id, "context note unavailable");
            None
        }
    }
}

fn ai_response(state: &AppState, session: &Session, note: Option<&Note>, draft: &str, toast: Option<Toast>) -> Response {
    let (interactions, toast) = match state.store.list_interactions(session.user_id) {
        Ok(interactions) => (interactions, toast),
        Err(e) => {
            tracing::error!(error = %e, user_id = %session.user_id, "failed to load AI interactions");
            (Vec::new(), toast.or(Some(Toast::FetchFailed)))
        }
    };

    Html(base_html(
        "AI Assistant",
        &ai_chat_html(&interactions, note, draft),
        Some(session),
        toast,
    ))
    .into_response()
}

pub async fn ai_page(
    State(state): State<Arc<AppState>>,
    session: Session,
    Query(query): Query<AiQuery>,
) -> Response {
    let note = context_note(&state, &session, parse_id(query.note.as_deref()));
    let toast = query.toast.as_deref().and_then(Toast::from_code);
    ai_response(&state, &session, note.as_ref(), "", toast)
}

#[derive(Deserialize)]
pub struct AiForm {
    #[serde(default)]
    pub prompt: String,
    pub note_id: Option<String>,
}

pub async fn ai_send(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<AiForm>,
) -> Response {
    let note = context_note(&state, &session, parse_id(form.note_id.as_deref()));
    let note_id = note.as_ref().map(|n| n.id);
    let prompt = form.prompt.trim();

    if prompt.is_empty() {
        return Redirect::to(&ai_href(note_id, None)).into_response();
    }

    let context = note.as_ref().map(|n| n.content_plain.as_str());
    match state.ai.ask_ai(prompt, context).await {
        Ok(answer) => {
            if let Err(e) = state
                .store
                .append_interaction(session.user_id, note_id, prompt, &answer, state.ai.model())
            {
                tracing::error!(error = %e, user_id = %session.user_id, "failed to record AI interaction");
                return ai_response(&state, &session, note.as_ref(), prompt, Some(Toast::AiFailed));
            }
            Redirect::to(&ai_href(note_id, None)).into_response()
        }
        Err(_) => ai_response(&state, &session, note.as_ref(), prompt, Some(Toast::AiFailed)),
    }
}

pub async fn summarize_note(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Response {
    let note = match state.store.get_note(session.user_id, id) {
        Ok(note) => note,
        Err(e) => {
            tracing::warn!(error = %e, note_id = %id, "summary for unavailable note");
            return redirect_to_notes(None, "", true, Some(Toast::SummaryFailed));
        }
    };

    let summary = match state.ai.generate_summary(&note.content_plain).await {
        Ok(summary) => summary,
        Err(_) => return redirect_to_notes(Some(id), "", true, Some(Toast::SummaryFailed)),
    };

    match state.store.append_interaction(
        session.user_id,
        Some(id),
        &format!("Summarize: {}", display_title(&note)),
        &summary,
        state.ai.model(),
    ) {
        Ok(_) => Redirect::to(&ai_href(Some(id), None)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, user_id = %session.user_id, "failed to record summary");
            redirect_to_notes(Some(id), "", true, Some(Toast::SummaryFailed))
        }
    }
}

pub async fn key_points_note(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Response {
    let note = match state.store.get_note(session.user_id, id) {
        Ok(note) => note,
        Err(e) => {
            tracing::warn!(error = %e, note_id = %id, "key points for unavailable note");
            return redirect_to_notes(None, "", true, Some(Toast::FetchFailed));
        }
    };

    let points = state.ai.extract_key_points(&note.content_plain).await;
    let response = if points.is_empty() {
        NO_KEY_POINTS.to_string()
    } else {
        points
            .iter()
            .map(|p| format!("- {}", p))
            .collect::<Vec<_>>()
            .join("\n")
    };

    match state.store.append_interaction(
        session.user_id,
        Some(id),
        &format!("Key points: {}", display_title(&note)),
        &response,
        state.ai.model(),
    ) {
        Ok(_) => Redirect::to(&ai_href(Some(id), None)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, user_id = %session.user_id, "failed to record key points");
            Redirect::to(&ai_href(Some(id), Some(Toast::AiFailed))).into_response()
        }
    }
}

fn display_title(note: &Note) -> &str {
    if note.title.is_empty() {
        "Untitled"
    } else {
        &note.title
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sidebar_state_defaults_open() {
        assert!(sidebar_is_open(None));
        assert!(sidebar_is_open(Some("open")));
        assert!(!sidebar_is_open(Some("closed")));
    }

    #[test]
    fn test_parse_id_is_lenient() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(Some(&id.to_string())), Some(id));
        assert_eq!(parse_id(Some("not-a-uuid")), None);
        assert_eq!(parse_id(None), None);
    }

    #[test]
    fn test_ai_href() {
        let id = Uuid::nil();
        assert_eq!(ai_href(None, None), "/ai");
        assert_eq!(ai_href(Some(id), None), format!("/ai?note={}", id));
        assert_eq!(ai_href(None, Some(Toast::AiFailed)), "/ai?toast=ai_failed");
    }
}
