//! Error types for the Key Vault client.

use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, VaultError>;

/// Errors that can occur while talking to a secret vault.
#[derive(Error, Debug)]
pub enum VaultError {
    /// The requested secret does not exist in the vault.
    #[error("Secret not found: {0}")]
    NotFound(String),

    /// Acquiring an access token failed.
    #[error("Credential unavailable: {0}")]
    Credential(String),

    /// HTTP request error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The vault rejected the access token.
    #[error("Unauthorized ({status}) at {url}")]
    Unauthorized { status: u16, url: String },

    /// API error response from the vault.
    #[error("API error ({status}) at {url}: {message}")]
    ApiError {
        status: u16,
        url: String,
        message: String,
    },

    /// Invalid response format from the vault or token endpoint.
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    /// Invalid vault URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl VaultError {
    /// Check if this error means the secret is simply absent.
    ///
    /// This is the only vault condition callers are expected to recover from.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this error indicates an authentication problem.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::Credential(_) | Self::Unauthorized { .. })
    }
}
