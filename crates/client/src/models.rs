//! Data models for Key Vault responses.

use secrecy::SecretString;
use serde::Deserialize;

/// Module for deserializing SecretString from plain JSON strings.
mod secret_string {
    use secrecy::SecretString;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(SecretString::new(s.into()))
    }
}

/// Secret bundle returned by `GET /secrets/{name}`.
#[derive(Debug, Clone, Deserialize)]
pub struct KeyVaultSecret {
    /// The secret value.
    #[serde(deserialize_with = "secret_string::deserialize")]
    pub value: SecretString,
    /// Fully qualified secret identifier, including version.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "contentType")]
    pub content_type: Option<String>,
    #[serde(default)]
    pub attributes: Option<SecretAttributes>,
}

/// Management attributes attached to a secret.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecretAttributes {
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub created: Option<i64>,
    #[serde(default)]
    pub updated: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VaultErrorBody {
    pub error: VaultErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VaultErrorDetail {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
