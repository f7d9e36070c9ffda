//! Client builder for constructing [`SecretClient`] instances.
//!
//! This module is responsible for:
//! - Providing a fluent builder API for client configuration
//! - Validating the vault URL (absolute http(s) URL with a host)
//! - Normalizing the vault URL (removing trailing slashes)
//! - Configuring the underlying blocking HTTP client (timeouts)
//!
//! # What this module does NOT handle:
//! - Actual secret lookups (handled by [`SecretClient`] in `mod.rs`)
//! - Token acquisition (handled by the [`TokenCredential`] implementations)
//!
//! # Invariants
//! - `vault_url` and `credential` must be provided before calling `build()`
//! - The vault URL is always normalized to have no trailing slashes

use std::sync::Mutex;
use std::time::Duration;

use crate::client::SecretClient;
use crate::credential::TokenCredential;
use crate::error::{Result, VaultError};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Key Vault REST API version used for secret reads.
pub const DEFAULT_API_VERSION: &str = "7.4";

/// Builder for creating a new [`SecretClient`].
///
/// # Example
///
/// ```rust,ignore
/// use keyvault_client::{DefaultCredential, SecretClient};
///
/// let client = SecretClient::builder()
///     .vault_url("https://myvault.vault.azure.net/")
///     .credential(Box::new(DefaultCredential::new()))
///     .build()?;
/// ```
pub struct SecretClientBuilder {
    vault_url: Option<String>,
    credential: Option<Box<dyn TokenCredential>>,
    timeout: Duration,
    api_version: String,
}

impl Default for SecretClientBuilder {
    fn default() -> Self {
        Self {
            vault_url: None,
            credential: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }
}

impl SecretClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the vault endpoint, e.g. `https://myvault.vault.azure.net/`.
    pub fn vault_url(mut self, url: impl Into<String>) -> Self {
        self.vault_url = Some(url.into());
        self
    }

    /// Set the credential used to obtain bearer tokens.
    pub fn credential(mut self, credential: Box<dyn TokenCredential>) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the REST API version.
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<SecretClient> {
        let vault_url = self
            .vault_url
            .ok_or_else(|| VaultError::InvalidUrl("vault_url is required".to_string()))?;
        let vault_url = validate_and_normalize_vault_url(&vault_url)?;

        let credential = self
            .credential
            .ok_or_else(|| VaultError::Credential("credential is required".to_string()))?;

        let http = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(SecretClient {
            http,
            vault_url,
            api_version: self.api_version,
            credential,
            token: Mutex::new(None),
        })
    }
}

/// Validates and normalizes a vault URL string.
///
/// - Trim surrounding whitespace
/// - Parse as an absolute URL with an http or https scheme and a host
/// - Strip trailing slashes
fn validate_and_normalize_vault_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(VaultError::InvalidUrl("vault_url is empty".to_string()));
    }

    let parsed = url::Url::parse(trimmed)
        .map_err(|e| VaultError::InvalidUrl(format!("{trimmed}: {e}")))?;

    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(VaultError::InvalidUrl(format!(
            "scheme must be http or https, got: {scheme}"
        )));
    }

    if parsed.host_str().is_none() {
        return Err(VaultError::InvalidUrl(format!("{trimmed}: host is required")));
    }

    Ok(parsed.as_str().trim_end_matches('/').to_string())
}
