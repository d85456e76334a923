//! notepad-core - Core library for notepad
//!
//! This crate contains the note models, the remote notes API client, the
//! object storage client and the `NoteListController` that keeps local view
//! state in step with both.

pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod models;
pub mod storage;
pub mod util;

pub use controller::{ImageFile, NoteListController};
pub use error::{Error, Result};
pub use models::{DisplayedNote, Note, NoteDraft, NoteId};
