//! Remote notes API.
//!
//! `NotesApi` is the seam the note list talks through; `GraphqlNotesApi`
//! is the managed GraphQL backend implementation.

mod graphql;

use std::future::Future;

use crate::models::{Note, NoteDraft, NoteId};
use crate::Result;

pub use graphql::GraphqlNotesApi;

/// Query and mutations offered by the notes backend.
pub trait NotesApi {
    /// List every note, in the order the backend returns them.
    fn list_notes(&self) -> impl Future<Output = Result<Vec<Note>>> + Send;

    /// Create a note from `draft` and return the stored record.
    fn create_note(&self, draft: &NoteDraft) -> impl Future<Output = Result<Note>> + Send;

    /// Delete the note with `id`.
    fn delete_note(&self, id: &NoteId) -> impl Future<Output = Result<()>> + Send;
}
