use std::env;

use notepad_core::api::GraphqlNotesApi;
use notepad_core::config::{BackendConfig, ENV_API_KEY, ENV_API_TOKEN};
use notepad_core::storage::S3Storage;
use notepad_core::{DisplayedNote, NoteId, NoteListController};
use serde::Serialize;

use crate::config_profiles::{normalize_text_option, CliProfile, CliProfilesConfig};
use crate::credentials::{load_credentials, StoredCredentials};
use crate::error::CliError;

pub type CliController = NoteListController<GraphqlNotesApi, S3Storage>;

#[derive(Debug, Serialize)]
pub struct NoteListItem {
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub image_url: Option<String>,
}

/// Build a controller from env vars, the resolved profile and stored credentials.
pub fn open_controller(global_profile: Option<&str>) -> Result<CliController, CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(global_profile);
    let profile = config.profile(&profile_name).cloned();
    let credentials = load_credentials(&profile_name)?;

    let lookup = layered_lookup(|key| env::var(key).ok(), profile, credentials);
    let backend = BackendConfig::from_lookup(lookup)?;
    tracing::debug!(
        "Using profile '{}' with endpoint {}",
        profile_name,
        backend.api.endpoint
    );

    let api = GraphqlNotesApi::new(backend.api)?;
    let storage = S3Storage::new(backend.storage);
    Ok(NoteListController::new(api, storage))
}

/// Layer configuration sources: environment first, then profile, then keychain.
///
/// API credentials are taken as a unit: when the environment sets either the
/// key or the token, stored API credentials are ignored.
pub fn layered_lookup(
    env_lookup: impl Fn(&str) -> Option<String>,
    profile: Option<CliProfile>,
    credentials: Option<StoredCredentials>,
) -> impl Fn(&str) -> Option<String> {
    move |key: &str| {
        if let Some(value) = normalize_text_option(env_lookup(key)) {
            return Some(value);
        }
        let is_api_credential = key == ENV_API_KEY || key == ENV_API_TOKEN;
        if is_api_credential
            && (normalize_text_option(env_lookup(ENV_API_KEY)).is_some()
                || normalize_text_option(env_lookup(ENV_API_TOKEN)).is_some())
        {
            return None;
        }
        profile
            .as_ref()
            .and_then(|profile| profile.value(key))
            .or_else(|| {
                credentials
                    .as_ref()
                    .and_then(|credentials| credentials.value(key))
            })
    }
}

pub fn normalize_note_identifier(id: &str) -> Result<NoteId, CliError> {
    id.parse::<NoteId>().map_err(|_| CliError::EmptyNoteId)
}

pub fn format_note_lines(notes: &[DisplayedNote]) -> Vec<String> {
    notes
        .iter()
        .map(|entry| {
            let id = entry
                .id()
                .map_or_else(|| "(pending)".to_string(), ToString::to_string);
            let short_id = id.chars().take(13).collect::<String>();
            let name = truncate_text(&entry.note.name, 24);
            let description = truncate_text(&entry.note.description, 40);

            match &entry.image_url {
                Some(url) => format!("{short_id:<13}  {name:<24}  {description:<40}  {url}"),
                None => format!("{short_id:<13}  {name:<24}  {description}"),
            }
        })
        .collect()
}

pub fn note_to_list_item(entry: &DisplayedNote) -> NoteListItem {
    NoteListItem {
        id: entry.id().map(ToString::to_string),
        name: entry.note.name.clone(),
        description: entry.note.description.clone(),
        image: entry.note.image.clone(),
        image_url: entry.image_url.clone(),
    }
}

/// Collapse whitespace of the first line and truncate with an ellipsis.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    let first_line = text.lines().next().unwrap_or("").trim();
    let collapsed = first_line.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}
