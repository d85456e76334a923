//! Note model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Opaque note identifier assigned by the notes API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Wrap an identifier returned by the API.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for NoteId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidInput("Note ID cannot be empty".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

/// A note as stored by the notes API.
///
/// `image` always holds the storage key, never a resolved URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Identifier, `None` until the API has assigned one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<NoteId>,
    pub name: String,
    pub description: String,
    /// Storage key of the attached image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Note {
    /// Storage key of the attached image, ignoring empty values.
    #[must_use]
    pub fn image_key(&self) -> Option<&str> {
        self.image.as_deref().filter(|key| !key.is_empty())
    }
}

/// The pending, not yet submitted note held by the create form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDraft {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl NoteDraft {
    /// Both required fields are filled in.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.description.is_empty()
    }

    #[must_use]
    pub fn image_key(&self) -> Option<&str> {
        self.image.as_deref().filter(|key| !key.is_empty())
    }

    /// Turn the draft into a note carrying `id`.
    #[must_use]
    pub fn into_note(self, id: Option<NoteId>) -> Note {
        Note {
            id,
            name: self.name,
            description: self.description,
            image: self.image,
        }
    }
}

/// A note in the displayed list, with its image key resolved for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayedNote {
    #[serde(flatten)]
    pub note: Note,
    /// Fetchable URL for `note.image`, present only while displayed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl DisplayedNote {
    #[must_use]
    pub const fn new(note: Note, image_url: Option<String>) -> Self {
        Self { note, image_url }
    }

    #[must_use]
    pub const fn id(&self) -> Option<&NoteId> {
        self.note.id.as_ref()
    }

    /// Stable key for rendering: the id when known, otherwise the name.
    #[must_use]
    pub fn display_key(&self) -> &str {
        self.note
            .id
            .as_ref()
            .map_or(self.note.name.as_str(), NoteId::as_str)
    }
}
