//! Backend credentials persisted in the OS keychain, one entry per profile.

use std::fmt;

#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::sync::{Mutex, OnceLock};

#[cfg(not(test))]
use keyring::Entry;
use notepad_core::config::{
    ENV_API_KEY, ENV_API_TOKEN, ENV_STORAGE_ACCESS_KEY_ID, ENV_STORAGE_SECRET_ACCESS_KEY,
    ENV_STORAGE_SESSION_TOKEN,
};
use serde::{Deserialize, Serialize};

use crate::error::CliError;

#[cfg(not(test))]
const KEYRING_SERVICE_NAME: &str = "notepad-cli";

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCredentials {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default)]
    pub storage_access_key_id: Option<String>,
    #[serde(default)]
    pub storage_secret_access_key: Option<String>,
    #[serde(default)]
    pub storage_session_token: Option<String>,
}

impl StoredCredentials {
    /// Value for a credential variable, keyed by its env name.
    pub fn value(&self, key: &str) -> Option<String> {
        match key {
            ENV_API_KEY => self.api_key.clone(),
            ENV_API_TOKEN => self.api_token.clone(),
            ENV_STORAGE_ACCESS_KEY_ID => self.storage_access_key_id.clone(),
            ENV_STORAGE_SECRET_ACCESS_KEY => self.storage_secret_access_key.clone(),
            ENV_STORAGE_SESSION_TOKEN => self.storage_session_token.clone(),
            _ => None,
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.api_key.is_none()
            && self.api_token.is_none()
            && self.storage_access_key_id.is_none()
            && self.storage_secret_access_key.is_none()
            && self.storage_session_token.is_none()
    }

    /// Overlay the values present in `other`; API key and token replace each other.
    pub fn merge(&mut self, other: Self) {
        if other.api_key.is_some() || other.api_token.is_some() {
            self.api_key = other.api_key;
            self.api_token = other.api_token;
        }
        if other.storage_access_key_id.is_some() {
            self.storage_access_key_id = other.storage_access_key_id;
            self.storage_secret_access_key = other.storage_secret_access_key;
            self.storage_session_token = other.storage_session_token;
        } else if other.storage_session_token.is_some() {
            self.storage_session_token = other.storage_session_token;
        }
    }

    /// Names of the stored credentials, never their values.
    pub fn summary(&self) -> Vec<&'static str> {
        let mut present = Vec::new();
        if self.api_key.is_some() {
            present.push("api_key");
        }
        if self.api_token.is_some() {
            present.push("api_token");
        }
        if self.storage_access_key_id.is_some() && self.storage_secret_access_key.is_some() {
            present.push("storage_keys");
        }
        if self.storage_session_token.is_some() {
            present.push("storage_session_token");
        }
        present
    }
}

impl fmt::Debug for StoredCredentials {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |value: &Option<String>| value.as_ref().map(|_| "[REDACTED]");
        formatter
            .debug_struct("StoredCredentials")
            .field("api_key", &redact(&self.api_key))
            .field("api_token", &redact(&self.api_token))
            .field("storage_access_key_id", &self.storage_access_key_id)
            .field(
                "storage_secret_access_key",
                &redact(&self.storage_secret_access_key),
            )
            .field(
                "storage_session_token",
                &redact(&self.storage_session_token),
            )
            .finish()
    }
}

#[derive(Clone)]
struct CredentialStore {
    username: String,
}

impl CredentialStore {
    fn new(profile_name: &str) -> Self {
        Self {
            username: format!("backend_credentials:{profile_name}"),
        }
    }

    #[cfg(test)]
    fn test_store() -> &'static Mutex<HashMap<String, String>> {
        static STORE: OnceLock<Mutex<HashMap<String, String>>> = OnceLock::new();
        STORE.get_or_init(|| Mutex::new(HashMap::new()))
    }

    #[cfg(not(test))]
    fn entry(&self) -> Result<Entry, CliError> {
        Entry::new(KEYRING_SERVICE_NAME, &self.username)
            .map_err(|error| CliError::Credentials(error.to_string()))
    }

    #[cfg(not(test))]
    fn load(&self) -> Result<Option<StoredCredentials>, CliError> {
        let entry = self.entry()?;
        match entry.get_password() {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(CliError::Credentials(error.to_string())),
        }
    }

    #[cfg(test)]
    fn load(&self) -> Result<Option<StoredCredentials>, CliError> {
        let guard = Self::test_store()
            .lock()
            .map_err(|error| CliError::Credentials(error.to_string()))?;
        match guard.get(&self.username) {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    #[cfg(not(test))]
    fn save(&self, credentials: &StoredCredentials) -> Result<(), CliError> {
        let raw = serde_json::to_string(credentials)?;
        self.entry()?
            .set_password(&raw)
            .map_err(|error| CliError::Credentials(error.to_string()))
    }

    #[cfg(test)]
    fn save(&self, credentials: &StoredCredentials) -> Result<(), CliError> {
        let raw = serde_json::to_string(credentials)?;
        let mut guard = Self::test_store()
            .lock()
            .map_err(|error| CliError::Credentials(error.to_string()))?;
        guard.insert(self.username.clone(), raw);
        Ok(())
    }

    #[cfg(not(test))]
    fn clear(&self) -> Result<(), CliError> {
        let entry = self.entry()?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(error) => Err(CliError::Credentials(error.to_string())),
        }
    }

    #[cfg(test)]
    fn clear(&self) -> Result<(), CliError> {
        let mut guard = Self::test_store()
            .lock()
            .map_err(|error| CliError::Credentials(error.to_string()))?;
        guard.remove(&self.username);
        Ok(())
    }
}

pub fn load_credentials(profile_name: &str) -> Result<Option<StoredCredentials>, CliError> {
    CredentialStore::new(profile_name).load()
}

/// Merge `credentials` into whatever is already stored for the profile.
pub fn store_credentials(
    profile_name: &str,
    credentials: StoredCredentials,
) -> Result<StoredCredentials, CliError> {
    let store = CredentialStore::new(profile_name);
    let mut merged = store.load()?.unwrap_or_default();
    merged.merge(credentials);
    store.save(&merged)?;
    Ok(merged)
}

pub fn clear_credentials(profile_name: &str) -> Result<(), CliError> {
    CredentialStore::new(profile_name).clear()
}
