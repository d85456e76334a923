use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use clap::{CommandFactory, Parser};
use notepad_core::config::{
    BackendConfig, ApiAuth, ENV_API_KEY, ENV_API_TOKEN, ENV_API_URL, ENV_STORAGE_ACCESS_KEY_ID,
    ENV_STORAGE_BUCKET, ENV_STORAGE_REGION, ENV_STORAGE_SECRET_ACCESS_KEY,
};
use notepad_core::api::NotesApi;
use notepad_core::storage::ObjectStorage;
use notepad_core::{DisplayedNote, Note, NoteDraft, NoteId, NoteListController};
use pretty_assertions::assert_eq;

use crate::cli::{AuthCommands, Cli, Commands, CompletionShell};
use crate::commands::common::{
    format_note_lines, layered_lookup, normalize_note_identifier, note_to_list_item, truncate_text,
};
use crate::commands::completions::render_completions;
use crate::commands::create::create_with_image;
use crate::commands::config::{apply_profile_update, missing_profile_fields, ProfileUpdate};
use crate::config_profiles::CliProfile;
use crate::credentials::StoredCredentials;
use crate::error::CliError;

fn env_from(map: HashMap<&'static str, &'static str>) -> impl Fn(&str) -> Option<String> {
    move |key: &str| map.get(key).map(|value| (*value).to_string())
}

fn displayed(id: Option<&str>, name: &str, description: &str, url: Option<&str>) -> DisplayedNote {
    DisplayedNote::new(
        Note {
            id: id.map(NoteId::new),
            name: name.to_string(),
            description: description.to_string(),
            image: url.map(|_| "cat.png".to_string()),
        },
        url.map(ToOwned::to_owned),
    )
}

#[derive(Default)]
struct RecordingApi {
    calls: AtomicUsize,
    created: Mutex<Vec<NoteDraft>>,
}

impl NotesApi for RecordingApi {
    async fn list_notes(&self) -> notepad_core::Result<Vec<Note>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Vec::new())
    }

    async fn create_note(&self, draft: &NoteDraft) -> notepad_core::Result<Note> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.created.lock().unwrap().push(draft.clone());
        Ok(draft.clone().into_note(Some(NoteId::new("srv-1"))))
    }

    async fn delete_note(&self, _id: &NoteId) -> notepad_core::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Default)]
struct RecordingStorage {
    stored: Mutex<Vec<String>>,
}

impl ObjectStorage for RecordingStorage {
    async fn get_url(&self, key: &str) -> notepad_core::Result<String> {
        Ok(format!("https://cdn.example.com/public/{key}"))
    }

    async fn put(
        &self,
        key: &str,
        _bytes: &[u8],
        _content_type: Option<&str>,
    ) -> notepad_core::Result<()> {
        self.stored.lock().unwrap().push(key.to_string());
        Ok(())
    }
}

#[test]
fn cli_definition_is_valid() {
    Cli::command().debug_assert();
}

#[test]
fn create_defaults_to_empty_fields() {
    let cli = Cli::try_parse_from(["notepad", "create", "--name", "A"]).unwrap();
    match cli.command {
        Commands::Create {
            name,
            description,
            image,
            json,
        } => {
            assert_eq!(name, "A");
            assert_eq!(description, "");
            assert_eq!(image, None);
            assert!(!json);
        }
        _ => panic!("expected create command"),
    }
}

#[test]
fn auth_login_rejects_key_and_token_together() {
    let result = Cli::try_parse_from([
        "notepad", "auth", "login", "--api-key", "k", "--token", "t",
    ]);
    assert!(result.is_err());
}

#[test]
fn auth_login_accepts_storage_key_pair() {
    let cli = Cli::try_parse_from([
        "notepad",
        "--profile",
        "work",
        "auth",
        "login",
        "--storage-access-key-id",
        "AKID",
        "--storage-secret-access-key",
        "SECRET",
    ])
    .unwrap();
    assert_eq!(cli.profile.as_deref(), Some("work"));
    assert!(matches!(
        cli.command,
        Commands::Auth {
            command: AuthCommands::Login { .. }
        }
    ));
}

#[test]
fn normalize_note_identifier_rejects_empty() {
    assert!(matches!(
        normalize_note_identifier("  "),
        Err(CliError::EmptyNoteId)
    ));
    assert_eq!(
        normalize_note_identifier(" n-1 ").unwrap(),
        NoteId::new("n-1")
    );
}

#[test]
fn truncate_text_collapses_and_truncates() {
    assert_eq!(truncate_text("  hello   world \nsecond", 40), "hello world");
    assert_eq!(
        truncate_text("This is a very long sentence that should be shortened", 20),
        "This is a very lo..."
    );
}

#[test]
fn format_note_lines_include_image_url_when_resolved() {
    let notes = vec![
        displayed(
            Some("n-1"),
            "Cat",
            "A cat",
            Some("https://cdn.example.com/public/cat.png"),
        ),
        displayed(None, "Draft", "Pending", None),
    ];

    let lines = format_note_lines(&notes);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("n-1"));
    assert!(lines[0].ends_with("https://cdn.example.com/public/cat.png"));
    assert!(lines[1].starts_with("(pending)"));
    assert!(lines[1].ends_with("Pending"));
}

#[test]
fn note_to_list_item_keeps_key_and_url_apart() {
    let item = note_to_list_item(&displayed(
        Some("n-1"),
        "Cat",
        "A cat",
        Some("https://cdn.example.com/public/cat.png"),
    ));
    assert_eq!(item.id.as_deref(), Some("n-1"));
    assert_eq!(item.image.as_deref(), Some("cat.png"));
    assert_eq!(
        item.image_url.as_deref(),
        Some("https://cdn.example.com/public/cat.png")
    );
}

#[test]
fn layered_lookup_prefers_env_then_profile_then_credentials() {
    let profile = CliProfile {
        api_url: Some("https://profile.example.com/graphql".to_string()),
        storage_bucket: Some("profile-bucket".to_string()),
        storage_region: Some("eu-west-1".to_string()),
        ..CliProfile::default()
    };
    let credentials = StoredCredentials {
        api_key: Some("stored-key".to_string()),
        storage_access_key_id: Some("AKID".to_string()),
        storage_secret_access_key: Some("SECRET".to_string()),
        ..StoredCredentials::default()
    };
    let env = env_from(HashMap::from([(ENV_STORAGE_BUCKET, "env-bucket")]));

    let lookup = layered_lookup(env, Some(profile), Some(credentials));
    assert_eq!(
        lookup(ENV_API_URL).as_deref(),
        Some("https://profile.example.com/graphql")
    );
    assert_eq!(lookup(ENV_STORAGE_BUCKET).as_deref(), Some("env-bucket"));
    assert_eq!(lookup(ENV_API_KEY).as_deref(), Some("stored-key"));
    assert_eq!(lookup(ENV_STORAGE_SECRET_ACCESS_KEY).as_deref(), Some("SECRET"));

    let backend = BackendConfig::from_lookup(&lookup).unwrap();
    assert_eq!(backend.api.auth, ApiAuth::ApiKey("stored-key".to_string()));
    assert_eq!(backend.storage.bucket, "env-bucket");
    assert_eq!(backend.storage.region, "eu-west-1");
}

#[test]
fn layered_lookup_takes_api_credentials_from_env_as_a_unit() {
    let credentials = StoredCredentials {
        api_key: Some("stored-key".to_string()),
        ..StoredCredentials::default()
    };
    let env = env_from(HashMap::from([(ENV_API_TOKEN, "env-token")]));

    let lookup = layered_lookup(env, None, Some(credentials));
    assert_eq!(lookup(ENV_API_TOKEN).as_deref(), Some("env-token"));
    assert_eq!(lookup(ENV_API_KEY), None);
}

#[test]
fn apply_profile_update_merges_explicit_env_and_existing() {
    let mut profile = CliProfile {
        storage_region: Some("us-east-1".to_string()),
        ..CliProfile::default()
    };
    let env = env_from(HashMap::from([
        (ENV_STORAGE_BUCKET, "env-bucket"),
        (ENV_STORAGE_REGION, "eu-west-1"),
        (ENV_STORAGE_ACCESS_KEY_ID, "ignored-secret-material"),
    ]));

    apply_profile_update(
        &mut profile,
        ProfileUpdate {
            api_url: Some("https://api.example.com/graphql/".to_string()),
            key_prefix: Some(" protected/ ".to_string()),
            url_ttl_secs: Some(300),
            ..ProfileUpdate::default()
        },
        env,
    )
    .unwrap();

    assert_eq!(
        profile,
        CliProfile {
            api_url: Some("https://api.example.com/graphql".to_string()),
            storage_bucket: Some("env-bucket".to_string()),
            storage_region: Some("eu-west-1".to_string()),
            storage_endpoint: None,
            storage_key_prefix: Some("protected/".to_string()),
            storage_public_base_url: None,
            storage_url_ttl_secs: Some(300),
        }
    );
    assert!(missing_profile_fields(&profile).is_empty());
}

#[test]
fn apply_profile_update_rejects_invalid_urls_and_ttl() {
    let mut profile = CliProfile::default();
    let err = apply_profile_update(
        &mut profile,
        ProfileUpdate {
            api_url: Some("api.example.com".to_string()),
            ..ProfileUpdate::default()
        },
        env_from(HashMap::new()),
    )
    .unwrap_err();
    assert!(err.to_string().contains("api_url"));

    let err = apply_profile_update(
        &mut CliProfile::default(),
        ProfileUpdate {
            url_ttl_secs: Some(0),
            ..ProfileUpdate::default()
        },
        env_from(HashMap::new()),
    )
    .unwrap_err();
    assert!(err.to_string().contains("url_ttl_secs"));
}

#[test]
fn missing_profile_fields_lists_required_values() {
    assert_eq!(
        missing_profile_fields(&CliProfile::default()),
        vec!["api_url", "bucket", "region"]
    );
}

#[test]
fn render_completions_mentions_binary_name() {
    let script = String::from_utf8(render_completions(CompletionShell::Bash)).unwrap();
    assert!(script.contains("notepad"));
}

#[tokio::test]
async fn create_with_empty_field_skips_upload_and_api() {
    let mut controller =
        NoteListController::new(RecordingApi::default(), RecordingStorage::default());

    let created = create_with_image(
        &mut controller,
        "",
        "y",
        Some(Path::new("/nonexistent/cat.png")),
    )
    .await
    .unwrap();

    assert_eq!(created, None);
    assert_eq!(controller.api().calls.load(Ordering::SeqCst), 0);
    assert!(controller.storage().stored.lock().unwrap().is_empty());
    assert!(controller.notes().is_empty());
}

#[tokio::test]
async fn create_with_image_uploads_then_submits_key() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cat.png");
    std::fs::write(&path, [1_u8, 2, 3]).unwrap();
    let mut controller =
        NoteListController::new(RecordingApi::default(), RecordingStorage::default());

    let created = create_with_image(&mut controller, "A", "x", Some(&path))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(created.id(), Some(&NoteId::new("srv-1")));
    assert_eq!(
        created.image_url.as_deref(),
        Some("https://cdn.example.com/public/cat.png")
    );
    assert_eq!(*controller.storage().stored.lock().unwrap(), vec!["cat.png"]);
    assert_eq!(
        controller.api().created.lock().unwrap()[0].image.as_deref(),
        Some("cat.png")
    );
}
