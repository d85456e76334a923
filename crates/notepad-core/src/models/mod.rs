//! Data models for notepad

mod note;

pub use note::{DisplayedNote, Note, NoteDraft, NoteId};
