//! Credential providers used to authenticate against the vault.
//!
//! Responsibilities:
//! - Define the `TokenCredential` seam the secret client authenticates through.
//! - Provide a static bearer token, an OAuth2 client-credentials flow, and an
//!   ambient `DefaultCredential` that discovers its inputs from the environment.
//!
//! Does NOT handle:
//! - Token caching beyond a single client handle (see `client.rs`).
//! - Retrying failed token requests.
//!
//! Invariants:
//! - Every token and client secret is held in `secrecy::SecretString`.
//! - Errors never include token or secret material.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, VaultError};

/// OAuth2 scope granting access to Key Vault data-plane operations.
pub const KEY_VAULT_SCOPE: &str = "https://vault.azure.net/.default";

/// Authority used when `AZURE_AUTHORITY_HOST` is not set.
pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";

/// Environment variables read by [`DefaultCredential`].
pub const ENV_TENANT_ID: &str = "AZURE_TENANT_ID";
pub const ENV_CLIENT_ID: &str = "AZURE_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "AZURE_CLIENT_SECRET";
pub const ENV_AUTHORITY_HOST: &str = "AZURE_AUTHORITY_HOST";

const TOKEN_TIMEOUT_SECS: u64 = 30;

/// A source of bearer tokens for a given OAuth2 scope.
pub trait TokenCredential: Send + Sync + std::fmt::Debug {
    /// Acquire an access token for `scope`.
    fn get_token(&self, scope: &str) -> Result<SecretString>;
}

/// A pre-issued bearer token.
#[derive(Debug, Clone)]
pub struct StaticTokenCredential {
    token: SecretString,
}

impl StaticTokenCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: SecretString::new(token.into().into()),
        }
    }
}

impl TokenCredential for StaticTokenCredential {
    fn get_token(&self, _scope: &str) -> Result<SecretString> {
        Ok(self.token.clone())
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: Option<String>,
}

/// Service principal credential using the OAuth2 client-credentials grant.
#[derive(Debug)]
pub struct ClientSecretCredential {
    tenant_id: String,
    client_id: String,
    client_secret: SecretString,
    authority_host: String,
}

impl ClientSecretCredential {
    pub fn new(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: SecretString,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret,
            authority_host: DEFAULT_AUTHORITY_HOST.to_string(),
        }
    }

    /// Override the identity authority (sovereign clouds, tests).
    pub fn with_authority_host(mut self, host: impl Into<String>) -> Self {
        self.authority_host = host.into().trim_end_matches('/').to_string();
        self
    }

    fn token_url(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.authority_host, self.tenant_id
        )
    }
}

impl TokenCredential for ClientSecretCredential {
    fn get_token(&self, scope: &str) -> Result<SecretString> {
        let url = self.token_url();
        debug!(tenant = %self.tenant_id, client_id = %self.client_id, "Requesting vault access token");

        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(TOKEN_TIMEOUT_SECS))
            .build()?;

        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.expose_secret()),
            ("scope", scope),
        ];

        let response = http
            .post(&url)
            .form(&form)
            .send()
            .map_err(|e| VaultError::Credential(format!("token request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let code = response
                .json::<TokenErrorResponse>()
                .ok()
                .and_then(|body| body.error)
                .unwrap_or_else(|| "unknown_error".to_string());
            return Err(VaultError::Credential(format!(
                "token endpoint returned {} ({code})",
                status.as_u16()
            )));
        }

        let body: TokenResponse = response
            .json()
            .map_err(|e| VaultError::InvalidResponse(format!("malformed token response: {e}")))?;

        Ok(SecretString::new(body.access_token.into()))
    }
}

/// Ambient credential resolved from the process environment at token time.
///
/// Reads `AZURE_TENANT_ID`, `AZURE_CLIENT_ID` and `AZURE_CLIENT_SECRET`
/// (plus the optional `AZURE_AUTHORITY_HOST`) and delegates to
/// [`ClientSecretCredential`].
#[derive(Debug, Default)]
pub struct DefaultCredential {
    _private: (),
}

impl DefaultCredential {
    pub fn new() -> Self {
        Self { _private: () }
    }

    fn from_env() -> Result<ClientSecretCredential> {
        let (Some(tenant), Some(client), Some(secret)) = (
            env_var_or_none(ENV_TENANT_ID),
            env_var_or_none(ENV_CLIENT_ID),
            env_var_or_none(ENV_CLIENT_SECRET),
        ) else {
            return Err(VaultError::Credential(format!(
                "DefaultCredential requires {ENV_TENANT_ID}, {ENV_CLIENT_ID} and {ENV_CLIENT_SECRET}"
            )));
        };

        let mut credential =
            ClientSecretCredential::new(tenant, client, SecretString::new(secret.into()));
        if let Some(host) = env_var_or_none(ENV_AUTHORITY_HOST) {
            credential = credential.with_authority_host(host);
        }
        Ok(credential)
    }
}

impl TokenCredential for DefaultCredential {
    fn get_token(&self, scope: &str) -> Result<SecretString> {
        Self::from_env()?.get_token(scope)
    }
}

fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
