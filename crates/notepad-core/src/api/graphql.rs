//! GraphQL client for the managed notes backend.

use std::future::Future;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::NotesApi;
use crate::config::{ApiAuth, ApiConfig};
use crate::models::{Note, NoteDraft, NoteId};
use crate::util::{compact_text, normalize_http_url};
use crate::{Error, Result};

const API_KEY_HEADER: &str = "x-api-key";

const LIST_NOTES: &str = "query ListNotes($nextToken: String) {
  listNotes(nextToken: $nextToken) {
    items { id name description image }
    nextToken
  }
}";

const CREATE_NOTE: &str = "mutation CreateNote($input: CreateNoteInput!) {
  createNote(input: $input) { id name description image }
}";

const DELETE_NOTE: &str = "mutation DeleteNote($input: DeleteNoteInput!) {
  deleteNote(input: $input) { id }
}";

/// Notes API client speaking GraphQL over HTTP.
#[derive(Debug, Clone)]
pub struct GraphqlNotesApi {
    endpoint: String,
    auth: ApiAuth,
    client: reqwest::Client,
}

impl GraphqlNotesApi {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let endpoint = normalize_http_url(&config.endpoint, "API endpoint").map_err(Error::Config)?;
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            endpoint,
            auth: config.auth,
            client,
        })
    }

    fn request(&self, query: &str, variables: Value) -> reqwest::RequestBuilder {
        let request = self
            .client
            .post(&self.endpoint)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .json(&GraphqlRequest { query, variables });
        match &self.auth {
            ApiAuth::ApiKey(key) => request.header(API_KEY_HEADER, key),
            ApiAuth::BearerToken(token) => request.bearer_auth(token),
        }
    }

    async fn execute<T: DeserializeOwned>(&self, query: &str, variables: Value) -> Result<T> {
        let response = self.request(query, variables).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(Error::Api(format!(
                "Notes API returned HTTP {}: {}",
                status.as_u16(),
                compact_text(&body)
            )));
        }

        parse_graphql_response(&body)
    }
}

/// Follow `nextToken` until the backend reports no further page.
///
/// Null items are dropped; order is kept across pages.
async fn collect_pages<F, Fut>(mut fetch_page: F) -> Result<Vec<Note>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<NoteConnection>>,
{
    let mut notes = Vec::new();
    let mut next_token = None;

    loop {
        let page = fetch_page(next_token.take()).await?;
        notes.extend(page.items.into_iter().flatten());

        match page.next_token {
            Some(token) if !token.is_empty() => next_token = Some(token),
            _ => return Ok(notes),
        }
    }
}

impl NotesApi for GraphqlNotesApi {
    async fn list_notes(&self) -> Result<Vec<Note>> {
        let notes = collect_pages(|next_token| async move {
            let data: ListNotesData = self
                .execute(LIST_NOTES, json!({ "nextToken": next_token }))
                .await?;
            Ok(data.list_notes)
        })
        .await?;

        tracing::debug!("listNotes returned {} notes", notes.len());
        Ok(notes)
    }

    async fn create_note(&self, draft: &NoteDraft) -> Result<Note> {
        let data: CreateNoteData = self
            .execute(CREATE_NOTE, json!({ "input": draft }))
            .await?;
        Ok(data.create_note)
    }

    async fn delete_note(&self, id: &NoteId) -> Result<()> {
        let data: DeleteNoteData = self
            .execute(DELETE_NOTE, json!({ "input": { "id": id } }))
            .await?;
        if data.delete_note.is_none() {
            tracing::debug!("deleteNote found no note {}", id);
        }
        Ok(())
    }
}

/// Decode a GraphQL response body, surfacing the `errors` array as `Error::Api`.
fn parse_graphql_response<T: DeserializeOwned>(body: &str) -> Result<T> {
    let response: GraphqlResponse<T> = serde_json::from_str(body)?;

    if let Some(errors) = response.errors.filter(|errors| !errors.is_empty()) {
        let messages = errors
            .into_iter()
            .map(|error| error.message)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(Error::Api(messages));
    }

    response
        .data
        .ok_or_else(|| Error::Api("GraphQL response did not include data".to_string()))
}

#[derive(Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
    variables: Value,
}

#[derive(Deserialize)]
struct GraphqlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphqlError>>,
}

#[derive(Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListNotesData {
    list_notes: NoteConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NoteConnection {
    #[serde(default)]
    items: Vec<Option<Note>>,
    #[serde(default)]
    next_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateNoteData {
    create_note: Note,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteNoteData {
    delete_note: Option<IgnoredAny>,
}
