//! Testing utilities for code that consumes a [`SecretStore`].
//!
//! Available when running tests or when the `test-utils` feature is enabled.
//!
//! # Example
//! ```ignore
//! use keyvault_client::testing::MemorySecretStore;
//!
//! let store = MemorySecretStore::new("https://test.vault.azure.net")
//!     .with_secret("db-password", "hunter2");
//! ```

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use secrecy::SecretString;

use crate::error::{Result, VaultError};
use crate::models::KeyVaultSecret;
use crate::store::SecretStore;

/// In-memory vault keyed by secret name.
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    vault_url: String,
    secrets: HashMap<String, String>,
    failures: HashMap<String, u16>,
    lookups: AtomicUsize,
    requested: Mutex<Vec<String>>,
}

impl MemorySecretStore {
    pub fn new(vault_url: impl Into<String>) -> Self {
        Self {
            vault_url: vault_url.into(),
            ..Self::default()
        }
    }

    /// Add a secret.
    pub fn with_secret(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.secrets.insert(name.into(), value.into());
        self
    }

    /// Make lookups of `name` fail with an API error carrying `status`.
    pub fn with_failure(mut self, name: impl Into<String>, status: u16) -> Self {
        self.failures.insert(name.into(), status);
        self
    }

    /// Number of `get_secret` calls served so far.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Secret names requested so far, in order.
    pub fn requested_names(&self) -> Vec<String> {
        self.requested
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl SecretStore for MemorySecretStore {
    fn vault_url(&self) -> &str {
        &self.vault_url
    }

    fn get_secret(&self, name: &str) -> Result<KeyVaultSecret> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.requested
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(name.to_string());

        if let Some(status) = self.failures.get(name) {
            return Err(VaultError::ApiError {
                status: *status,
                url: format!("{}/secrets/{}", self.vault_url, name),
                message: "injected failure".to_string(),
            });
        }

        match self.secrets.get(name) {
            Some(value) => Ok(KeyVaultSecret {
                value: SecretString::new(value.clone().into()),
                id: Some(format!("{}/secrets/{}", self.vault_url, name)),
                content_type: None,
                attributes: None,
            }),
            None => Err(VaultError::NotFound(name.to_string())),
        }
    }
}
