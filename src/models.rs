use super::store::Store;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub description: String,
}

/// Notes in insertion order, exactly as they sit in the notes file.
pub type NoteCollection = Vec<Note>;

/// Request body for create and update. Decoding is lenient: unknown keys
/// are dropped and missing (or `null`) text fields read as empty. A
/// client-supplied `id` still has to be an integer, but the store always
/// decides the id.
#[derive(Debug, Default, Deserialize)]
pub struct NoteForm {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Body returned by every mutating route.
#[derive(Debug, Serialize)]
pub struct Mutation {
    pub message: &'static str,
    /// Rendered as a string, e.g. `"id": "3"`
    pub id: String,
}

#[derive(Clone, Debug)]
pub struct AppState {
    pub store: Arc<Store>,
}
