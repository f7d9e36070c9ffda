//! Blocking Key Vault secret client.
//!
//! # Submodules
//! - [`builder`]: Client construction and configuration
//!
//! # What this module does NOT handle:
//! - Retrying failed requests (callers decide what is recoverable)
//! - Caching secret values across client handles
//!
//! # Invariants
//! - A bearer token is requested at most once per client handle and reused
//!   for every subsequent lookup through that handle.
//! - HTTP 404 is always reported as [`VaultError::NotFound`].

pub mod builder;

use std::sync::Mutex;

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::credential::{KEY_VAULT_SCOPE, TokenCredential};
use crate::error::{Result, VaultError};
use crate::models::{KeyVaultSecret, VaultErrorBody};
use crate::url_encoding::encode_path_segment;

pub use builder::SecretClientBuilder;

/// Read-only client for the secrets collection of one vault.
#[derive(Debug)]
pub struct SecretClient {
    pub(crate) http: reqwest::blocking::Client,
    pub(crate) vault_url: String,
    pub(crate) api_version: String,
    pub(crate) credential: Box<dyn TokenCredential>,
    pub(crate) token: Mutex<Option<SecretString>>,
}

impl SecretClient {
    /// Create a new client builder.
    pub fn builder() -> SecretClientBuilder {
        SecretClientBuilder::new()
    }

    /// Bind a client to `vault_url` using `credential`.
    pub fn new(vault_url: &str, credential: Box<dyn TokenCredential>) -> Result<Self> {
        Self::builder()
            .vault_url(vault_url)
            .credential(credential)
            .build()
    }

    /// The normalized vault endpoint this client talks to.
    pub fn vault_url(&self) -> &str {
        &self.vault_url
    }

    fn bearer_token(&self) -> Result<SecretString> {
        let mut slot = self.token.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(token) = slot.as_ref() {
            return Ok(token.clone());
        }
        let token = self.credential.get_token(KEY_VAULT_SCOPE)?;
        *slot = Some(token.clone());
        Ok(token)
    }

    /// Fetch the latest version of the secret called `name`.
    pub fn get_secret(&self, name: &str) -> Result<KeyVaultSecret> {
        let url = format!("{}/secrets/{}", self.vault_url, encode_path_segment(name));
        debug!(secret = %name, vault = %self.vault_url, "Fetching secret");

        let token = self.bearer_token()?;
        let response = self
            .http
            .get(&url)
            .query(&[("api-version", self.api_version.as_str())])
            .bearer_auth(token.expose_secret())
            .send()?;

        let status = response.status().as_u16();
        match status {
            200..=299 => response.json::<KeyVaultSecret>().map_err(|e| {
                VaultError::InvalidResponse(format!("malformed secret bundle for {name}: {e}"))
            }),
            404 => Err(VaultError::NotFound(name.to_string())),
            401 | 403 => Err(VaultError::Unauthorized { status, url }),
            _ => {
                let message = response
                    .json::<VaultErrorBody>()
                    .ok()
                    .and_then(|body| body.error.message.or(body.error.code))
                    .unwrap_or_default();
                Err(VaultError::ApiError {
                    status,
                    url,
                    message,
                })
            }
        }
    }
}
