//! Note list view state and its synchronization with the remote services.
//!
//! `NoteListController` owns the displayed notes and the pending create form.
//! Every operation is a single linear async sequence; local state changes are
//! applied optimistically and never rolled back.

use std::path::Path;

use futures::future::try_join_all;

use crate::api::NotesApi;
use crate::models::{DisplayedNote, NoteDraft, NoteId};
use crate::storage::{guess_content_type, ObjectStorage};
use crate::{Error, Result};

/// A file picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    /// Trimmed file name, also used as the storage key
    pub name: String,
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into().trim().to_string();
        let content_type = guess_content_type(&name);
        Self {
            name,
            bytes,
            content_type,
        }
    }

    /// Read a file from disk, keyed by its file name.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                Error::InvalidInput(format!("{} has no usable file name", path.display()))
            })?
            .to_string();
        let bytes = tokio::fs::read(path).await?;
        Ok(Self::new(name, bytes))
    }
}

/// Displayed notes plus the pending form, kept in step with a notes API and
/// an object store.
#[derive(Debug)]
pub struct NoteListController<A, S> {
    api: A,
    storage: S,
    notes: Vec<DisplayedNote>,
    form: NoteDraft,
}

impl<A: NotesApi, S: ObjectStorage> NoteListController<A, S> {
    pub fn new(api: A, storage: S) -> Self {
        Self {
            api,
            storage,
            notes: Vec::new(),
            form: NoteDraft::default(),
        }
    }

    pub fn notes(&self) -> &[DisplayedNote] {
        &self.notes
    }

    pub const fn form(&self) -> &NoteDraft {
        &self.form
    }

    pub const fn api(&self) -> &A {
        &self.api
    }

    pub const fn storage(&self) -> &S {
        &self.storage
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.form.name = name.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.form.description = description.into();
    }

    /// Replace the displayed list with every note from the API.
    ///
    /// Image keys are resolved concurrently and all resolutions finish before
    /// the list is committed. On failure the displayed list is unchanged.
    pub async fn fetch_notes(&mut self) -> Result<()> {
        let notes = self.api.list_notes().await?;
        let storage = &self.storage;

        let resolved = try_join_all(notes.into_iter().map(|note| async move {
            let image_url = match note.image_key() {
                Some(key) => Some(storage.get_url(key).await?),
                None => None,
            };
            Ok::<_, Error>(DisplayedNote::new(note, image_url))
        }))
        .await?;

        tracing::debug!("Fetched {} notes", resolved.len());
        self.notes = resolved;
        Ok(())
    }

    /// Submit the form as a new note and append it to the displayed list.
    ///
    /// Returns `Ok(None)` without contacting the API when the name or the
    /// description is empty. The appended entry is the form data, carrying the
    /// id from the create response when one is returned.
    pub async fn create_note(&mut self) -> Result<Option<DisplayedNote>> {
        if !self.form.is_complete() {
            tracing::debug!("Skipping create: name and description are required");
            return Ok(None);
        }

        let created = self.api.create_note(&self.form).await?;

        let image_url = match self.form.image_key() {
            Some(key) => Some(self.storage.get_url(key).await?),
            None => None,
        };

        let draft = std::mem::take(&mut self.form);
        let entry = DisplayedNote::new(draft.into_note(created.id), image_url);
        tracing::info!("Created note {}", entry.display_key());

        self.notes.push(entry.clone());
        Ok(Some(entry))
    }

    /// Remove the note locally, then delete it remotely.
    ///
    /// The local removal stands even when the remote delete fails.
    pub async fn delete_note(&mut self, id: &NoteId) -> Result<()> {
        self.notes.retain(|entry| entry.id() != Some(id));

        if let Err(error) = self.api.delete_note(id).await {
            tracing::warn!("Remote delete of note {} failed: {}", id, error);
            return Err(error);
        }

        tracing::info!("Deleted note {}", id);
        Ok(())
    }

    /// Store `file` under its name, stamp the name into the form and refresh.
    ///
    /// Returns the storage key, or `Ok(None)` when no file was given.
    pub async fn upload_image(&mut self, file: Option<ImageFile>) -> Result<Option<String>> {
        let Some(file) = file else {
            return Ok(None);
        };

        self.form.image = Some(file.name.clone());
        self.storage
            .put(&file.name, &file.bytes, file.content_type.as_deref())
            .await?;
        tracing::info!("Uploaded image {} ({} bytes)", file.name, file.bytes.len());

        self.fetch_notes().await?;
        Ok(Some(file.name))
    }
}
