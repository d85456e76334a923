use std::env;

use notepad_core::config::{
    ENV_API_URL, ENV_STORAGE_BUCKET, ENV_STORAGE_ENDPOINT, ENV_STORAGE_PUBLIC_BASE_URL,
    ENV_STORAGE_REGION,
};
use notepad_core::util::normalize_http_url;

use crate::cli::ConfigCommands;
use crate::config_profiles::{normalize_text_option, CliProfile, CliProfilesConfig};
use crate::credentials::load_credentials;
use crate::error::CliError;

/// Values passed to `config init`.
#[derive(Debug, Default)]
pub struct ProfileUpdate {
    pub api_url: Option<String>,
    pub bucket: Option<String>,
    pub region: Option<String>,
    pub storage_endpoint: Option<String>,
    pub key_prefix: Option<String>,
    pub public_base_url: Option<String>,
    pub url_ttl_secs: Option<u64>,
}

pub fn run_config(command: ConfigCommands, global_profile: Option<&str>) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init {
            api_url,
            bucket,
            region,
            storage_endpoint,
            key_prefix,
            public_base_url,
            url_ttl_secs,
            no_activate,
        } => run_config_init(
            global_profile,
            ProfileUpdate {
                api_url,
                bucket,
                region,
                storage_endpoint,
                key_prefix,
                public_base_url,
                url_ttl_secs,
            },
            no_activate,
        ),
        ConfigCommands::Show => run_config_show(global_profile),
    }
}

pub fn run_config_init(
    profile_name: Option<&str>,
    update: ProfileUpdate,
    no_activate: bool,
) -> Result<(), CliError> {
    let mut config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(profile_name);

    let profile = config.profile_mut_or_default(&profile_name);
    apply_profile_update(profile, update, |key| env::var(key).ok())?;

    if !no_activate {
        config.active_profile = Some(profile_name.clone());
    }

    let path = config.save().map_err(CliError::Config)?;
    println!(
        "Profile '{}' initialized at {}",
        profile_name,
        path.display()
    );

    let profile = config
        .profile(&profile_name)
        .ok_or_else(|| CliError::Config("Failed to persist profile".to_string()))?;
    let missing_fields = missing_profile_fields(profile);
    if missing_fields.is_empty() {
        println!(
            "Profile '{profile_name}' is ready. Run `notepad auth login --api-key <key> --storage-access-key-id <id> --storage-secret-access-key <secret>`."
        );
    } else {
        println!(
            "Profile '{}' is missing: {}",
            profile_name,
            missing_fields.join(", ")
        );
    }

    Ok(())
}

fn run_config_show(profile_name: Option<&str>) -> Result<(), CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(profile_name);
    let Some(profile) = config.profile(&profile_name) else {
        println!("Profile '{profile_name}' is not configured.");
        return Ok(());
    };

    println!("Profile '{profile_name}'");
    for line in profile.describe() {
        println!("  {line}");
    }
    let stored = load_credentials(&profile_name)?
        .map(|credentials| credentials.summary().join(", "))
        .filter(|summary| !summary.is_empty())
        .unwrap_or_else(|| "(none)".to_string());
    println!("  credentials: {stored}");
    Ok(())
}

/// Merge explicit values, then environment values, over the existing profile.
pub fn apply_profile_update(
    profile: &mut CliProfile,
    update: ProfileUpdate,
    env_lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), CliError> {
    let merged = |explicit: Option<String>, env_key: &str, existing: Option<String>| {
        normalize_text_option(explicit)
            .or_else(|| normalize_text_option(env_lookup(env_key)))
            .or(existing)
    };

    profile.api_url = merged(update.api_url, ENV_API_URL, profile.api_url.take())
        .map(|url| normalize_http_url(&url, "api_url"))
        .transpose()
        .map_err(CliError::Config)?;
    profile.storage_bucket = merged(
        update.bucket,
        ENV_STORAGE_BUCKET,
        profile.storage_bucket.take(),
    );
    profile.storage_region = merged(
        update.region,
        ENV_STORAGE_REGION,
        profile.storage_region.take(),
    );
    profile.storage_endpoint = merged(
        update.storage_endpoint,
        ENV_STORAGE_ENDPOINT,
        profile.storage_endpoint.take(),
    )
    .map(|url| normalize_http_url(&url, "storage_endpoint"))
    .transpose()
    .map_err(CliError::Config)?;
    profile.storage_public_base_url = merged(
        update.public_base_url,
        ENV_STORAGE_PUBLIC_BASE_URL,
        profile.storage_public_base_url.take(),
    )
    .map(|url| normalize_http_url(&url, "public_base_url"))
    .transpose()
    .map_err(CliError::Config)?;

    if let Some(prefix) = update.key_prefix {
        profile.storage_key_prefix = Some(prefix.trim().to_string());
    }
    if let Some(secs) = update.url_ttl_secs {
        if secs == 0 {
            return Err(CliError::Config(
                "url_ttl_secs must be greater than zero".to_string(),
            ));
        }
        profile.storage_url_ttl_secs = Some(secs);
    }

    Ok(())
}

pub fn missing_profile_fields(profile: &CliProfile) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if profile.api_url.is_none() {
        missing.push("api_url");
    }
    if profile.storage_bucket.is_none() {
        missing.push("bucket");
    }
    if profile.storage_region.is_none() {
        missing.push("region");
    }
    missing
}
