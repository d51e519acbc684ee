//! Data models for the notes application.
//!
//! Row shapes for notes, collections, tags, AI interactions and users, plus the
//! request payloads the handlers accept.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Core Note Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    /// Rich HTML body as produced by the editor widget.
    pub content: String,
    /// Tag-stripped copy of `content`, recomputed on every save.
    pub content_plain: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_archived: bool,
    pub is_favorite: bool,
    /// Joined from the tag link tree on read; never persisted with the row.
    #[serde(default)]
    pub tags: Vec<Tag>,
    /// Joined from the collection link tree on read.
    #[serde(default)]
    pub collections: Vec<CollectionRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
}

/// The slice of a collection shown alongside a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionRef {
    pub id: Uuid,
    pub name: String,
    pub color: String,
}

// ============================================================================
// Collections
// ============================================================================

pub const DEFAULT_COLLECTION_COLOR: &str = "#6366f1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub note_ids: Vec<Uuid>,
}

impl Collection {
    pub fn to_ref(&self) -> CollectionRef {
        CollectionRef {
            id: self.id,
            name: self.name.clone(),
            color: self.color.clone(),
        }
    }
}

// ============================================================================
// AI Interactions
// ============================================================================

/// One assistant exchange. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiInteraction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub note_id: Option<Uuid>,
    pub query: String,
    pub response: String,
    pub model: String,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Users
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Request Payloads
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct NoteInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCollection {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AskRequest {
    pub prompt: String,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub note_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TextResponse {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct KeyPointsResponse {
    pub key_points: Vec<String>,
}
