//! Credential storage and Basic-Auth handling
//!
//! The backend has no token issuance: the client keeps the username/password
//! pair in a local JSON file (unencrypted, like the browser localStorage it
//! replaces) and sends `Authorization: Basic ...` with every request.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::api::FitnessApi;
use crate::error::ApiError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredCredentials {
    pub username: String,
    pub password: String,
}

pub fn basic_auth_header(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

/// File-backed credential store, the localStorage equivalent
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Stored credentials, or None if missing or unreadable
    pub fn load(&self) -> Option<StoredCredentials> {
        let raw = fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&raw).ok()
    }

    pub fn store(&self, credentials: &StoredCredentials) -> Result<()> {
        let raw = serde_json::to_string(credentials)?;
        fs::write(&self.path, raw)
            .with_context(|| format!("Konnte {} nicht schreiben", self.path.display()))
    }

    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("Konnte {} nicht löschen", self.path.display()))?;
        }
        Ok(())
    }

    pub fn is_logged_in(&self) -> bool {
        self.load().is_some()
    }

    pub fn username(&self) -> Option<String> {
        self.load().map(|c| c.username)
    }

    /// `Basic base64(user:pass)` for the request interceptor
    pub fn basic_header(&self) -> Option<String> {
        self.load()
            .map(|c| basic_auth_header(&c.username, &c.password))
    }
}

/// Validate the pair against the backend, persist it only on success
pub async fn login(
    api: &dyn FitnessApi,
    store: &CredentialStore,
    username: &str,
    password: &str,
) -> Result<(), ApiError> {
    let header = basic_auth_header(username, password);
    api.validate_credentials(&header).await?;

    store
        .store(&StoredCredentials {
            username: username.to_string(),
            password: password.to_string(),
        })
        .map_err(|e| ApiError::Request(format!("Anmeldedaten nicht gespeichert: {e}")))?;
    Ok(())
}

pub fn logout(store: &CredentialStore) -> Result<()> {
    store.clear()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_header_encoding() {
        // base64("max:geheim")
        assert_eq!(basic_auth_header("max", "geheim"), "Basic bWF4OmdlaGVpbQ==");
    }

    #[test]
    fn test_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("auth.json"));

        assert!(!store.is_logged_in());
        assert!(store.basic_header().is_none());

        store
            .store(&StoredCredentials {
                username: "max".to_string(),
                password: "geheim".to_string(),
            })
            .unwrap();

        assert!(store.is_logged_in());
        assert_eq!(store.username().as_deref(), Some("max"));
        assert_eq!(
            store.basic_header().as_deref(),
            Some("Basic bWF4OmdlaGVpbQ==")
        );

        store.clear().unwrap();
        assert!(!store.is_logged_in());
    }

    #[test]
    fn test_corrupt_file_reads_as_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("auth.json");
        fs::write(&path, "not json").unwrap();

        let store = CredentialStore::new(path);
        assert!(store.load().is_none());
        assert!(!store.is_logged_in());
    }
}
