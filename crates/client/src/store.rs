//! The secret-store seam consumed by settings resolution.

use crate::client::SecretClient;
use crate::error::Result;
use crate::models::KeyVaultSecret;

/// A read-only key/value secret store addressed by secret name.
///
/// Implementations must report a missing secret as
/// [`VaultError::NotFound`](crate::VaultError::NotFound) so callers can tell
/// it apart from transport or credential failures.
pub trait SecretStore: Send + Sync {
    /// Endpoint this store is bound to, used in log messages.
    fn vault_url(&self) -> &str;

    /// Fetch the current version of the secret called `name`.
    fn get_secret(&self, name: &str) -> Result<KeyVaultSecret>;
}

impl<T: SecretStore + ?Sized> SecretStore for std::sync::Arc<T> {
    fn vault_url(&self) -> &str {
        (**self).vault_url()
    }

    fn get_secret(&self, name: &str) -> Result<KeyVaultSecret> {
        (**self).get_secret(name)
    }
}

impl SecretStore for SecretClient {
    fn vault_url(&self) -> &str {
        SecretClient::vault_url(self)
    }

    fn get_secret(&self, name: &str) -> Result<KeyVaultSecret> {
        SecretClient::get_secret(self, name)
    }
}
