//! Backend configuration for the notes API and object storage.
//!
//! Values are read through a lookup function so callers can layer
//! environment variables over profile files and stored credentials.

use std::env;
use std::fmt;
use std::time::Duration;

use crate::util::{normalize_http_url, normalize_text_option};
use crate::{Error, Result};

pub const ENV_API_URL: &str = "NOTEPAD_API_URL";
pub const ENV_API_KEY: &str = "NOTEPAD_API_KEY";
pub const ENV_API_TOKEN: &str = "NOTEPAD_API_TOKEN";
pub const ENV_STORAGE_BUCKET: &str = "NOTEPAD_STORAGE_BUCKET";
pub const ENV_STORAGE_REGION: &str = "NOTEPAD_STORAGE_REGION";
pub const ENV_STORAGE_ENDPOINT: &str = "NOTEPAD_STORAGE_ENDPOINT";
pub const ENV_STORAGE_ACCESS_KEY_ID: &str = "NOTEPAD_STORAGE_ACCESS_KEY_ID";
pub const ENV_STORAGE_SECRET_ACCESS_KEY: &str = "NOTEPAD_STORAGE_SECRET_ACCESS_KEY";
pub const ENV_STORAGE_SESSION_TOKEN: &str = "NOTEPAD_STORAGE_SESSION_TOKEN";
pub const ENV_STORAGE_PREFIX: &str = "NOTEPAD_STORAGE_PREFIX";
pub const ENV_STORAGE_PUBLIC_BASE_URL: &str = "NOTEPAD_STORAGE_PUBLIC_BASE_URL";
pub const ENV_STORAGE_URL_TTL_SECS: &str = "NOTEPAD_STORAGE_URL_TTL_SECS";

/// Access-level prefix applied to object keys when none is configured.
pub const DEFAULT_KEY_PREFIX: &str = "public/";
pub const DEFAULT_URL_TTL: Duration = Duration::from_secs(900);

/// How requests to the notes API are authenticated.
#[derive(Clone, PartialEq, Eq)]
pub enum ApiAuth {
    /// Static API key sent as `x-api-key`
    ApiKey(String),
    /// User session token sent as a bearer token
    BearerToken(String),
}

impl fmt::Debug for ApiAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApiKey(_) => f.write_str("ApiKey([REDACTED])"),
            Self::BearerToken(_) => f.write_str("BearerToken([REDACTED])"),
        }
    }
}

/// Notes API endpoint and credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// GraphQL endpoint URL
    pub endpoint: String,
    pub auth: ApiAuth,
}

impl ApiConfig {
    /// Load API configuration from environment variables.
    ///
    /// Returns `Ok(None)` when no API variables are set.
    pub fn from_env() -> Result<Option<Self>> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load API configuration through `lookup`.
    ///
    /// Returns an error when only a partial configuration is provided.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Option<Self>> {
        let endpoint = normalize_text_option(lookup(ENV_API_URL));
        let api_key = normalize_text_option(lookup(ENV_API_KEY));
        let token = normalize_text_option(lookup(ENV_API_TOKEN));

        if endpoint.is_none() && api_key.is_none() && token.is_none() {
            return Ok(None);
        }

        let Some(endpoint) = endpoint else {
            return Err(Error::Config(format!(
                "API configuration is incomplete. Missing: {ENV_API_URL}"
            )));
        };
        let endpoint = normalize_http_url(&endpoint, ENV_API_URL).map_err(Error::Config)?;

        let auth = match (api_key, token) {
            (Some(_), Some(_)) => {
                return Err(Error::Config(format!(
                    "Set only one of {ENV_API_KEY} or {ENV_API_TOKEN}"
                )));
            }
            (Some(key), None) => ApiAuth::ApiKey(key),
            (None, Some(token)) => ApiAuth::BearerToken(token),
            (None, None) => {
                return Err(Error::Config(format!(
                    "API configuration is incomplete. Missing: {ENV_API_KEY} or {ENV_API_TOKEN}"
                )));
            }
        };

        Ok(Some(Self { endpoint, auth }))
    }
}

/// S3-compatible object storage configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub bucket: String,
    pub region: String,
    /// Custom S3-compatible endpoint; AWS is used when absent
    pub endpoint_url: Option<String>,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
    /// Prefix prepended to every object key
    pub key_prefix: String,
    /// Public URL base for serving objects without signing
    pub public_base_url: Option<String>,
    /// Lifetime of presigned download URLs
    pub url_ttl: Duration,
}

impl fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageConfig")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("endpoint_url", &self.endpoint_url)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"[REDACTED]")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("key_prefix", &self.key_prefix)
            .field("public_base_url", &self.public_base_url)
            .field("url_ttl", &self.url_ttl)
            .finish()
    }
}

impl StorageConfig {
    /// Load storage configuration from environment variables.
    ///
    /// Returns `Ok(None)` when no storage variables are set.
    pub fn from_env() -> Result<Option<Self>> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load storage configuration through `lookup`.
    ///
    /// Returns an error when only a partial configuration is provided.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Option<Self>> {
        let bucket = normalize_text_option(lookup(ENV_STORAGE_BUCKET));
        let region = normalize_text_option(lookup(ENV_STORAGE_REGION));
        let endpoint_url = normalize_text_option(lookup(ENV_STORAGE_ENDPOINT));
        let access_key_id = normalize_text_option(lookup(ENV_STORAGE_ACCESS_KEY_ID));
        let secret_access_key = normalize_text_option(lookup(ENV_STORAGE_SECRET_ACCESS_KEY));
        let session_token = normalize_text_option(lookup(ENV_STORAGE_SESSION_TOKEN));
        let key_prefix = lookup(ENV_STORAGE_PREFIX);
        let public_base_url = normalize_text_option(lookup(ENV_STORAGE_PUBLIC_BASE_URL));
        let url_ttl = normalize_text_option(lookup(ENV_STORAGE_URL_TTL_SECS));

        let any_present = bucket.is_some()
            || region.is_some()
            || endpoint_url.is_some()
            || access_key_id.is_some()
            || secret_access_key.is_some()
            || session_token.is_some()
            || public_base_url.is_some();

        if !any_present {
            return Ok(None);
        }

        let mut missing = Vec::new();
        if bucket.is_none() {
            missing.push(ENV_STORAGE_BUCKET);
        }
        if region.is_none() {
            missing.push(ENV_STORAGE_REGION);
        }
        if access_key_id.is_none() {
            missing.push(ENV_STORAGE_ACCESS_KEY_ID);
        }
        if secret_access_key.is_none() {
            missing.push(ENV_STORAGE_SECRET_ACCESS_KEY);
        }

        let (Some(bucket), Some(region), Some(access_key_id), Some(secret_access_key)) =
            (bucket, region, access_key_id, secret_access_key)
        else {
            return Err(Error::Config(format!(
                "Storage configuration is incomplete. Missing: {}",
                missing.join(", ")
            )));
        };

        let endpoint_url = endpoint_url
            .map(|url| normalize_http_url(&url, ENV_STORAGE_ENDPOINT))
            .transpose()
            .map_err(Error::Config)?;
        let public_base_url = public_base_url
            .map(|url| normalize_http_url(&url, ENV_STORAGE_PUBLIC_BASE_URL))
            .transpose()
            .map_err(Error::Config)?;

        Ok(Some(Self {
            bucket,
            region,
            endpoint_url,
            access_key_id,
            secret_access_key,
            session_token,
            key_prefix: normalize_key_prefix(key_prefix),
            public_base_url,
            url_ttl: parse_url_ttl(url_ttl)?,
        }))
    }
}

/// Full backend configuration required by the note list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub api: ApiConfig,
    pub storage: StorageConfig,
}

impl BackendConfig {
    /// Load both API and storage configuration, requiring each to be present.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api = ApiConfig::from_lookup(&lookup)?.ok_or_else(|| {
            Error::Config(format!(
                "Notes API is not configured. Set {ENV_API_URL} and {ENV_API_KEY} or {ENV_API_TOKEN}."
            ))
        })?;
        let storage = StorageConfig::from_lookup(&lookup)?.ok_or_else(|| {
            Error::Config(format!(
                "Object storage is not configured. Set {ENV_STORAGE_BUCKET} and related variables."
            ))
        })?;
        Ok(Self { api, storage })
    }
}

/// Normalize a key prefix to either empty or a single trailing slash.
fn normalize_key_prefix(raw: Option<String>) -> String {
    let Some(raw) = raw else {
        return DEFAULT_KEY_PREFIX.to_string();
    };
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}/")
    }
}

fn parse_url_ttl(raw: Option<String>) -> Result<Duration> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_URL_TTL);
    };
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(Error::Config(format!(
            "{ENV_STORAGE_URL_TTL_SECS} must be a positive number of seconds"
        ))),
    }
}
