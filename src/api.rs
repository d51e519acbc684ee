//! JSON API handlers.
//!
//! Every route needs a session cookie; without one the `Session` extractor
//! answers 401 with a JSON error body. Failures go through `AppError`.

use crate::auth::Session;
use crate::error::{AppError, Result};
use crate::models::{
    AiInteraction, AskRequest, KeyPointsResponse, Note, NoteInput, TextRequest, TextResponse,
};
use crate::notes::preview;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

// ============================================================================
// Notes
// ============================================================================

pub async fn list_notes(State(state): State<Arc<AppState>>, session: Session) -> Result<Json<Vec<Note>>> {
    Ok(Json(state.store.list_notes(session.user_id)?))
}

pub async fn create_note(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(input): Json<NoteInput>,
) -> Result<(StatusCode, Json<Note>)> {
    let note = state.store.insert_note(session.user_id, &input.title, &input.content)?;
    tracing::info!(user_id = %session.user_id, note_id = %note.id, "note created");
    Ok((StatusCode::CREATED, Json(note)))
}

pub async fn update_note(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(input): Json<NoteInput>,
) -> Result<Json<Note>> {
    let note = state
        .store
        .update_note(session.user_id, id, &input.title, &input.content)?;
    tracing::info!(user_id = %session.user_id, note_id = %id, "note updated");
    Ok(Json(note))
}

pub async fn delete_note(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.store.delete_note(session.user_id, id)?;
    tracing::info!(user_id = %session.user_id, note_id = %id, "note deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Flip the stored favorite flag and return the updated row.
pub async fn toggle_favorite(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<Json<Note>> {
    let current = state.store.get_note(session.user_id, id)?;
    let note = state
        .store
        .set_favorite(session.user_id, id, !current.is_favorite)?;
    Ok(Json(note))
}

// ============================================================================
// AI
// ============================================================================

pub async fn ask(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(request): Json<AskRequest>,
) -> Result<Json<TextResponse>> {
    if request.prompt.trim().is_empty() {
        return Err(AppError::BadRequest("Prompt is required".to_string()));
    }

    // The note must belong to the caller even when an explicit context
    // replaces its text.
    let note = match request.note_id {
        Some(id) => Some(state.store.get_note(session.user_id, id)?),
        None => None,
    };
    let context = request
        .context
        .as_deref()
        .or(note.as_ref().map(|n| n.content_plain.as_str()));

    let answer = state.ai.ask_ai(&request.prompt, context).await?;
    state.store.append_interaction(
        session.user_id,
        request.note_id,
        &request.prompt,
        &answer,
        state.ai.model(),
    )?;
    Ok(Json(TextResponse { text: answer }))
}

pub async fn summary(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(request): Json<TextRequest>,
) -> Result<Json<TextResponse>> {
    let summary = state.ai.generate_summary(&request.text).await?;
    state.store.append_interaction(
        session.user_id,
        None,
        &format!("Summarize: {}", preview(&request.text, 80)),
        &summary,
        state.ai.model(),
    )?;
    Ok(Json(TextResponse { text: summary }))
}

/// Always 200: provider failures and malformed output yield an empty list.
pub async fn key_points(
    State(state): State<Arc<AppState>>,
    _session: Session,
    Json(request): Json<TextRequest>,
) -> Json<KeyPointsResponse> {
    Json(KeyPointsResponse {
        key_points: state.ai.extract_key_points(&request.text).await,
    })
}

pub async fn interactions(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<Vec<AiInteraction>>> {
    Ok(Json(state.store.list_interactions(session.user_id)?))
}
