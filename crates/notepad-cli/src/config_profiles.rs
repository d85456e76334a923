//! Persistent CLI profile configuration.
//!
//! Profiles hold non-secret backend values only; credentials live in the
//! keychain (see `credentials`).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use notepad_core::config::{
    ENV_API_URL, ENV_STORAGE_BUCKET, ENV_STORAGE_ENDPOINT, ENV_STORAGE_PREFIX,
    ENV_STORAGE_PUBLIC_BASE_URL, ENV_STORAGE_REGION, ENV_STORAGE_URL_TTL_SECS,
};
use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "cli-config.json";
const PROFILE_ENV_VAR: &str = "NOTEPAD_PROFILE";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliProfilesConfig {
    #[serde(default = "default_config_version")]
    pub version: u32,
    #[serde(default)]
    pub active_profile: Option<String>,
    #[serde(default)]
    pub profiles: BTreeMap<String, CliProfile>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliProfile {
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub storage_bucket: Option<String>,
    #[serde(default)]
    pub storage_region: Option<String>,
    #[serde(default)]
    pub storage_endpoint: Option<String>,
    /// Kept verbatim so an explicitly empty prefix survives normalization
    #[serde(default)]
    pub storage_key_prefix: Option<String>,
    #[serde(default)]
    pub storage_public_base_url: Option<String>,
    #[serde(default)]
    pub storage_url_ttl_secs: Option<u64>,
}

const fn default_config_version() -> u32 {
    1
}

pub fn default_config_path() -> Result<PathBuf, String> {
    dirs::config_dir()
        .map(|dir| dir.join("notepad").join(CONFIG_FILE_NAME))
        .ok_or_else(|| "Failed to resolve CLI config directory".to_string())
}

pub fn normalize_text_option(value: Option<String>) -> Option<String> {
    notepad_core::util::normalize_text_option(value)
}

pub fn normalize_profile_name(value: Option<&str>) -> Option<String> {
    let value = value?;
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

impl CliProfilesConfig {
    pub fn load() -> Result<Self, String> {
        Self::load_from_path(&default_config_path()?)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|error| format!("Failed to read config at {}: {}", path.display(), error))?;
        let mut config = serde_json::from_str::<Self>(&raw)
            .map_err(|error| format!("Failed to parse config at {}: {}", path.display(), error))?;
        config.normalize();
        Ok(config)
    }

    pub fn save(&self) -> Result<PathBuf, String> {
        let path = default_config_path()?;
        self.save_to_path(&path)?;
        Ok(path)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| {
                format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    error
                )
            })?;
        }

        let mut normalized = self.clone();
        normalized.normalize();
        let serialized = serde_json::to_string_pretty(&normalized)
            .map_err(|error| format!("Failed to serialize config: {error}"))?;
        std::fs::write(path, serialized)
            .map_err(|error| format!("Failed to write config at {}: {}", path.display(), error))
    }

    /// Resolve the profile name: explicit flag, then `NOTEPAD_PROFILE`, then
    /// the active profile, then `default`.
    pub fn resolve_profile_name(&self, explicit: Option<&str>) -> String {
        if let Some(profile) = normalize_profile_name(explicit) {
            return profile;
        }
        if let Some(profile) = normalize_profile_name(std::env::var(PROFILE_ENV_VAR).ok().as_deref())
        {
            return profile;
        }
        if let Some(profile) = normalize_profile_name(self.active_profile.as_deref()) {
            return profile;
        }
        "default".to_string()
    }

    pub fn profile(&self, name: &str) -> Option<&CliProfile> {
        self.profiles.get(name)
    }

    pub fn profile_mut_or_default(&mut self, name: &str) -> &mut CliProfile {
        self.profiles.entry(name.to_string()).or_default()
    }

    fn normalize(&mut self) {
        self.active_profile = normalize_profile_name(self.active_profile.as_deref());
        for profile in self.profiles.values_mut() {
            profile.normalize();
        }
    }
}

impl CliProfile {
    /// Value for a backend configuration variable, keyed by its env name.
    pub fn value(&self, key: &str) -> Option<String> {
        match key {
            ENV_API_URL => self.api_url.clone(),
            ENV_STORAGE_BUCKET => self.storage_bucket.clone(),
            ENV_STORAGE_REGION => self.storage_region.clone(),
            ENV_STORAGE_ENDPOINT => self.storage_endpoint.clone(),
            ENV_STORAGE_PREFIX => self.storage_key_prefix.clone(),
            ENV_STORAGE_PUBLIC_BASE_URL => self.storage_public_base_url.clone(),
            ENV_STORAGE_URL_TTL_SECS => self.storage_url_ttl_secs.map(|secs| secs.to_string()),
            _ => None,
        }
    }

    /// Lines describing the profile, in a stable order.
    pub fn describe(&self) -> Vec<String> {
        let show = |value: Option<&str>| value.unwrap_or("(not set)").to_string();
        vec![
            format!("api_url: {}", show(self.api_url.as_deref())),
            format!("storage_bucket: {}", show(self.storage_bucket.as_deref())),
            format!("storage_region: {}", show(self.storage_region.as_deref())),
            format!("storage_endpoint: {}", show(self.storage_endpoint.as_deref())),
            format!(
                "storage_key_prefix: {}",
                show(self.storage_key_prefix.as_deref())
            ),
            format!(
                "storage_public_base_url: {}",
                show(self.storage_public_base_url.as_deref())
            ),
            format!(
                "storage_url_ttl_secs: {}",
                self.storage_url_ttl_secs
                    .map_or_else(|| "(not set)".to_string(), |secs| secs.to_string())
            ),
        ]
    }

    fn normalize(&mut self) {
        self.api_url = normalize_text_option(self.api_url.clone());
        self.storage_bucket = normalize_text_option(self.storage_bucket.clone());
        self.storage_region = normalize_text_option(self.storage_region.clone());
        self.storage_endpoint = normalize_text_option(self.storage_endpoint.clone());
        self.storage_public_base_url = normalize_text_option(self.storage_public_base_url.clone());
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn normalize_profile_name_rejects_empty() {
        assert_eq!(normalize_profile_name(None), None);
        assert_eq!(normalize_profile_name(Some(" ")), None);
    }

    #[test]
    fn config_roundtrip_preserves_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        let mut config = CliProfilesConfig {
            version: 1,
            active_profile: Some(" default ".to_string()),
            profiles: BTreeMap::new(),
        };
        config.profiles.insert(
            "default".to_string(),
            CliProfile {
                api_url: Some(" https://api.example.com/graphql ".to_string()),
                storage_bucket: Some(" notes-bucket ".to_string()),
                storage_region: Some("us-east-1".to_string()),
                storage_endpoint: Some("   ".to_string()),
                storage_key_prefix: Some(String::new()),
                storage_public_base_url: None,
                storage_url_ttl_secs: Some(60),
            },
        );

        config.save_to_path(&path).unwrap();
        let loaded = CliProfilesConfig::load_from_path(&path).unwrap();
        assert_eq!(loaded.active_profile.as_deref(), Some("default"));
        assert_eq!(
            loaded.profiles.get("default").unwrap(),
            &CliProfile {
                api_url: Some("https://api.example.com/graphql".to_string()),
                storage_bucket: Some("notes-bucket".to_string()),
                storage_region: Some("us-east-1".to_string()),
                storage_endpoint: None,
                storage_key_prefix: Some(String::new()),
                storage_public_base_url: None,
                storage_url_ttl_secs: Some(60),
            }
        );
    }

    #[test]
    fn load_missing_file_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = CliProfilesConfig::load_from_path(&dir.path().join("missing.json")).unwrap();
        assert_eq!(loaded, CliProfilesConfig::default());
    }

    #[test]
    fn resolve_profile_name_prefers_explicit_then_active() {
        let config = CliProfilesConfig {
            version: 1,
            active_profile: Some("work".to_string()),
            profiles: BTreeMap::new(),
        };
        assert_eq!(config.resolve_profile_name(Some("mobile")), "mobile");
        if std::env::var(PROFILE_ENV_VAR).is_err() {
            assert_eq!(config.resolve_profile_name(None), "work");
        }
    }

    #[test]
    fn profile_value_maps_env_names() {
        let profile = CliProfile {
            api_url: Some("https://api.example.com/graphql".to_string()),
            storage_url_ttl_secs: Some(120),
            ..CliProfile::default()
        };
        assert_eq!(
            profile.value(ENV_API_URL).as_deref(),
            Some("https://api.example.com/graphql")
        );
        assert_eq!(profile.value(ENV_STORAGE_URL_TTL_SECS).as_deref(), Some("120"));
        assert_eq!(profile.value(ENV_STORAGE_BUCKET), None);
        assert_eq!(profile.value("UNRELATED"), None);
    }
}
