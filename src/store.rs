//! Sled-backed persistence client.
//!
//! Every row lives in its own tree, keyed so that a prefix scan on the owner
//! id yields exactly that user's rows:
//! - `users`: lowercased email → User
//! - `notes`: owner ‖ note id → Note (without joined tags/collections)
//! - `collections`: owner ‖ collection id → Collection (without note ids)
//! - `tags`: tag id → Tag, `tag_names`: lowercased name → tag id
//! - `note_tags`: note id ‖ tag id → ()
//! - `note_collections` / `collection_notes`: both directions of membership
//! - `ai_interactions`: owner ‖ v7 id → AiInteraction (chronological)
//!
//! Owner scoping is enforced here: a row that belongs to another user is
//! reported as not found.

use crate::error::{AppError, Result};
use crate::models::{
    AiInteraction, Collection, CollectionRef, NewCollection, Note, Tag, User,
    DEFAULT_COLLECTION_COLOR,
};
use crate::notes::strip_tags;
use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;
use uuid::Uuid;

const USERS_TREE: &str = "users";
const NOTES_TREE: &str = "notes";
const COLLECTIONS_TREE: &str = "collections";
const TAGS_TREE: &str = "tags";
const TAG_NAMES_TREE: &str = "tag_names";
const NOTE_TAGS_TREE: &str = "note_tags";
const NOTE_COLLECTIONS_TREE: &str = "note_collections";
const COLLECTION_NOTES_TREE: &str = "collection_notes";
const AI_INTERACTIONS_TREE: &str = "ai_interactions";

// ============================================================================
// Key Encoding
// ============================================================================

fn pair_key(a: Uuid, b: Uuid) -> Vec<u8> {
    let mut key = Vec::with_capacity(32);
    key.extend_from_slice(a.as_bytes());
    key.extend_from_slice(b.as_bytes());
    key
}

/// The second id of a `pair_key`.
fn second_id(key: &[u8]) -> Option<Uuid> {
    key.get(16..32).and_then(|b| Uuid::from_slice(b).ok())
}

fn encode<T: Serialize>(row: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(row)?)
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(bytes)?)
}

// ============================================================================
// Store
// ============================================================================

#[derive(Clone)]
pub struct Store {
    db: sled::Db,
    users: sled::Tree,
    notes: sled::Tree,
    collections: sled::Tree,
    tags: sled::Tree,
    tag_names: sled::Tree,
    note_tags: sled::Tree,
    note_collections: sled::Tree,
    collection_notes: sled::Tree,
    interactions: sled::Tree,
}

impl Store {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_db(sled::open(path)?)
    }

    /// An in-memory store that disappears on drop.
    pub fn temporary() -> Result<Self> {
        Self::from_db(sled::Config::new().temporary(true).open()?)
    }

    fn from_db(db: sled::Db) -> Result<Self> {
        Ok(Self {
            users: db.open_tree(USERS_TREE)?,
            notes: db.open_tree(NOTES_TREE)?,
            collections: db.open_tree(COLLECTIONS_TREE)?,
            tags: db.open_tree(TAGS_TREE)?,
            tag_names: db.open_tree(TAG_NAMES_TREE)?,
            note_tags: db.open_tree(NOTE_TAGS_TREE)?,
            note_collections: db.open_tree(NOTE_COLLECTIONS_TREE)?,
            collection_notes: db.open_tree(COLLECTION_NOTES_TREE)?,
            interactions: db.open_tree(AI_INTERACTIONS_TREE)?,
            db,
        })
    }

    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }

    // ========================================================================
    // Users
    // ========================================================================

    pub fn create_user(&self, email: &str, password_hash: String) -> Result<User> {
        let user = User {
            id: Uuid::new_v4(),
            email: email.trim().to_string(),
            password_hash,
            created_at: Utc::now(),
        };
        let key = email.trim().to_lowercase();
        let swapped = self
            .users
            .compare_and_swap(key.as_bytes(), None as Option<&[u8]>, Some(encode(&user)?))?;
        if swapped.is_err() {
            return Err(AppError::BadRequest(
                "An account with that email already exists".to_string(),
            ));
        }
        Ok(user)
    }

    pub fn user_by_email(&self, email: &str) -> Result<Option<User>> {
        let key = email.trim().to_lowercase();
        match self.users.get(key.as_bytes())? {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => Ok(None),
        }
    }

    // ========================================================================
    // Notes
    // ========================================================================

    /// All of the owner's notes, most recently updated first.
    pub fn list_notes(&self, owner: Uuid) -> Result<Vec<Note>> {
        let mut notes = Vec::new();
        for entry in self.notes.scan_prefix(owner.as_bytes()) {
            let (_, bytes) = entry?;
            let note: Note = decode(&bytes)?;
            notes.push(self.join_note(note)?);
        }
        notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(notes)
    }

    pub fn get_note(&self, owner: Uuid, id: Uuid) -> Result<Note> {
        let note = self.note_row(owner, id)?;
        self.join_note(note)
    }

    pub fn insert_note(&self, owner: Uuid, title: &str, content: &str) -> Result<Note> {
        let now = Utc::now();
        let note = Note {
            id: Uuid::new_v4(),
            user_id: owner,
            title: title.to_string(),
            content: content.to_string(),
            content_plain: strip_tags(content),
            created_at: now,
            updated_at: now,
            is_archived: false,
            is_favorite: false,
            tags: Vec::new(),
            collections: Vec::new(),
        };
        self.put_note(&note)?;
        tracing::debug!(user_id = %owner, note_id = %note.id, "note inserted");
        Ok(note)
    }

    /// Replace title and content, recomputing the plain-text cache.
    pub fn update_note(&self, owner: Uuid, id: Uuid, title: &str, content: &str) -> Result<Note> {
        let mut note = self.note_row(owner, id)?;
        note.title = title.to_string();
        note.content = content.to_string();
        note.content_plain = strip_tags(content);
        note.updated_at = Utc::now();
        self.put_note(&note)?;
        self.join_note(note)
    }

    pub fn set_favorite(&self, owner: Uuid, id: Uuid, is_favorite: bool) -> Result<Note> {
        let mut note = self.note_row(owner, id)?;
        note.is_favorite = is_favorite;
        self.put_note(&note)?;
        self.join_note(note)
    }

    pub fn set_archived(&self, owner: Uuid, id: Uuid, is_archived: bool) -> Result<Note> {
        let mut note = self.note_row(owner, id)?;
        note.is_archived = is_archived;
        self.put_note(&note)?;
        self.join_note(note)
    }

    /// Delete a note and every link pointing at it. Irreversible.
    pub fn delete_note(&self, owner: Uuid, id: Uuid) -> Result<()> {
        if self.notes.remove(pair_key(owner, id))?.is_none() {
            return Err(AppError::NotFound("note"));
        }

        let tag_links: Vec<sled::IVec> = self
            .note_tags
            .scan_prefix(id.as_bytes())
            .keys()
            .collect::<std::result::Result<_, _>>()?;
        for key in tag_links {
            self.note_tags.remove(key)?;
        }

        let collection_links: Vec<sled::IVec> = self
            .note_collections
            .scan_prefix(id.as_bytes())
            .keys()
            .collect::<std::result::Result<_, _>>()?;
        for key in collection_links {
            if let Some(collection_id) = second_id(&key) {
                self.collection_notes.remove(pair_key(collection_id, id))?;
            }
            self.note_collections.remove(key)?;
        }

        tracing::debug!(user_id = %owner, note_id = %id, "note deleted");
        Ok(())
    }

    fn note_row(&self, owner: Uuid, id: Uuid) -> Result<Note> {
        match self.notes.get(pair_key(owner, id))? {
            Some(bytes) => decode(&bytes),
            None => Err(AppError::NotFound("note")),
        }
    }

    fn put_note(&self, note: &Note) -> Result<()> {
        let mut row = note.clone();
        row.tags.clear();
        row.collections.clear();
        self.notes.insert(pair_key(note.user_id, note.id), encode(&row)?)?;
        Ok(())
    }

    fn join_note(&self, mut note: Note) -> Result<Note> {
        note.tags = self.tags_for_note(note.id)?;
        note.collections = self.collections_for_note(note.user_id, note.id)?;
        Ok(note)
    }

    // ========================================================================
    // Tags
    // ========================================================================

    /// Find a tag by case-insensitive name, creating it on first use.
    pub fn tag_by_name(&self, name: &str) -> Result<Tag> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::BadRequest("Tag name is required".to_string()));
        }
        let lookup = name.to_lowercase();

        if let Some(id_bytes) = self.tag_names.get(lookup.as_bytes())? {
            if let Some(bytes) = self.tags.get(&id_bytes)? {
                return decode(&bytes);
            }
        }

        let tag = Tag {
            id: Uuid::new_v4(),
            name: name.to_string(),
        };
        // The row is written before the name is claimed, so a claimed name
        // always resolves.
        self.tags.insert(tag.id.as_bytes(), encode(&tag)?)?;
        let claimed = self.tag_names.compare_and_swap(
            lookup.as_bytes(),
            None as Option<&[u8]>,
            Some(tag.id.as_bytes().as_slice()),
        )?;
        match claimed {
            Ok(()) => Ok(tag),
            // Lost a race with a concurrent creator; use theirs.
            Err(current) => {
                self.tags.remove(tag.id.as_bytes())?;
                let id_bytes = current.current.ok_or(AppError::NotFound("tag"))?;
                match self.tags.get(&id_bytes)? {
                    Some(bytes) => decode(&bytes),
                    None => Err(AppError::NotFound("tag")),
                }
            }
        }
    }

    pub fn attach_tag(&self, owner: Uuid, note_id: Uuid, name: &str) -> Result<Note> {
        let note = self.note_row(owner, note_id)?;
        let tag = self.tag_by_name(name)?;
        self.note_tags.insert(pair_key(note_id, tag.id), Vec::<u8>::new())?;
        self.join_note(note)
    }

    pub fn detach_tag(&self, owner: Uuid, note_id: Uuid, tag_id: Uuid) -> Result<Note> {
        let note = self.note_row(owner, note_id)?;
        self.note_tags.remove(pair_key(note_id, tag_id))?;
        self.join_note(note)
    }

    fn tags_for_note(&self, note_id: Uuid) -> Result<Vec<Tag>> {
        let mut tags = Vec::new();
        for key in self.note_tags.scan_prefix(note_id.as_bytes()).keys() {
            let Some(tag_id) = second_id(&key?) else { continue };
            if let Some(bytes) = self.tags.get(tag_id.as_bytes())? {
                tags.push(decode::<Tag>(&bytes)?);
            }
        }
        tags.sort_by_key(|t| t.name.to_lowercase());
        Ok(tags)
    }

    // ========================================================================
    // Collections
    // ========================================================================

    /// The owner's collections by name, each with its note ids joined.
    pub fn list_collections(&self, owner: Uuid) -> Result<Vec<Collection>> {
        let mut collections = Vec::new();
        for entry in self.collections.scan_prefix(owner.as_bytes()) {
            let (_, bytes) = entry?;
            let collection: Collection = decode(&bytes)?;
            collections.push(self.join_collection(collection)?);
        }
        collections.sort_by_key(|c| c.name.to_lowercase());
        Ok(collections)
    }

    pub fn get_collection(&self, owner: Uuid, id: Uuid) -> Result<Collection> {
        let collection = self.collection_row(owner, id)?;
        self.join_collection(collection)
    }

    pub fn insert_collection(&self, owner: Uuid, input: &NewCollection) -> Result<Collection> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(AppError::BadRequest("Collection name is required".to_string()));
        }
        let now = Utc::now();
        let collection = Collection {
            id: Uuid::new_v4(),
            user_id: owner,
            name: name.to_string(),
            description: input
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
            color: input
                .color
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .unwrap_or(DEFAULT_COLLECTION_COLOR)
                .to_string(),
            created_at: now,
            updated_at: now,
            note_ids: Vec::new(),
        };
        self.collections
            .insert(pair_key(owner, collection.id), encode(&collection)?)?;
        Ok(collection)
    }

    /// Delete a collection. Its notes are untouched.
    pub fn delete_collection(&self, owner: Uuid, id: Uuid) -> Result<()> {
        if self.collections.remove(pair_key(owner, id))?.is_none() {
            return Err(AppError::NotFound("collection"));
        }
        let links: Vec<sled::IVec> = self
            .collection_notes
            .scan_prefix(id.as_bytes())
            .keys()
            .collect::<std::result::Result<_, _>>()?;
        for key in links {
            if let Some(note_id) = second_id(&key) {
                self.note_collections.remove(pair_key(note_id, id))?;
            }
            self.collection_notes.remove(key)?;
        }
        Ok(())
    }

    pub fn add_note_to_collection(&self, owner: Uuid, collection_id: Uuid, note_id: Uuid) -> Result<Collection> {
        let collection = self.collection_row(owner, collection_id)?;
        self.note_row(owner, note_id)?;
        self.collection_notes.insert(pair_key(collection_id, note_id), Vec::<u8>::new())?;
        self.note_collections.insert(pair_key(note_id, collection_id), Vec::<u8>::new())?;
        self.touch_collection(collection)
    }

    pub fn remove_note_from_collection(&self, owner: Uuid, collection_id: Uuid, note_id: Uuid) -> Result<Collection> {
        let collection = self.collection_row(owner, collection_id)?;
        self.collection_notes.remove(pair_key(collection_id, note_id))?;
        self.note_collections.remove(pair_key(note_id, collection_id))?;
        self.touch_collection(collection)
    }

    fn touch_collection(&self, mut collection: Collection) -> Result<Collection> {
        collection.updated_at = Utc::now();
        collection.note_ids.clear();
        self.collections
            .insert(pair_key(collection.user_id, collection.id), encode(&collection)?)?;
        self.join_collection(collection)
    }

    fn collection_row(&self, owner: Uuid, id: Uuid) -> Result<Collection> {
        match self.collections.get(pair_key(owner, id))? {
            Some(bytes) => decode(&bytes),
            None => Err(AppError::NotFound("collection")),
        }
    }

    fn join_collection(&self, mut collection: Collection) -> Result<Collection> {
        let mut note_ids = Vec::new();
        for key in self.collection_notes.scan_prefix(collection.id.as_bytes()).keys() {
            if let Some(id) = second_id(&key?) {
                note_ids.push(id);
            }
        }
        collection.note_ids = note_ids;
        Ok(collection)
    }

    fn collections_for_note(&self, owner: Uuid, note_id: Uuid) -> Result<Vec<CollectionRef>> {
        let mut refs = Vec::new();
        for key in self.note_collections.scan_prefix(note_id.as_bytes()).keys() {
            let Some(collection_id) = second_id(&key?) else { continue };
            if let Some(bytes) = self.collections.get(pair_key(owner, collection_id))? {
                refs.push(decode::<Collection>(&bytes)?.to_ref());
            }
        }
        refs.sort_by_key(|c| c.name.to_lowercase());
        Ok(refs)
    }

    // ========================================================================
    // AI Interactions
    // ========================================================================

    pub fn append_interaction(
        &self,
        owner: Uuid,
        note_id: Option<Uuid>,
        query: &str,
        response: &str,
        model: &str,
    ) -> Result<AiInteraction> {
        let interaction = AiInteraction {
            id: Uuid::now_v7(),
            user_id: owner,
            note_id,
            query: query.to_string(),
            response: response.to_string(),
            model: model.to_string(),
            created_at: Utc::now(),
        };
        self.interactions
            .insert(pair_key(owner, interaction.id), encode(&interaction)?)?;
        Ok(interaction)
    }

    /// The owner's interactions, oldest first.
    pub fn list_interactions(&self, owner: Uuid) -> Result<Vec<AiInteraction>> {
        self.interactions
            .scan_prefix(owner.as_bytes())
            .values()
            .map(|bytes| -> Result<AiInteraction> { decode(&bytes?) })
            .collect()
    }
}
