//! Vault candidates and client construction policy.
//!
//! Responsibilities:
//! - Construct a vault client handle for an endpoint (once per resolution).
//! - Look up one secret per field per external name and build the candidate map.
//!
//! Does NOT handle:
//! - HTTP or credential details (see the `keyvault-client` crate).
//! - Caching lookups across resolutions.
//!
//! Invariants:
//! - Secret names are external names with `_` replaced by `-`.
//! - A not-found secret logs a warning and leaves the field absent.
//! - Every other vault or credential error propagates unchanged.
//! - Lookups are sequential; when several external names of one field are
//!   found, the last one wins.

use std::sync::Arc;

use keyvault_client::{DefaultCredential, SecretClient, SecretStore, VaultError};
use secrecy::ExposeSecret;
use tracing::{debug, warn};

use super::candidate::{CandidateMap, parse_candidate};
use super::error::{CandidateSource, SettingsError};
use crate::constants::{EXTERNAL_NAME_SEPARATOR, VAULT_NAME_SEPARATOR};
use crate::schema::Schema;

/// Builds a client handle bound to one vault endpoint.
pub type ClientFactory =
    Arc<dyn Fn(&str) -> Result<Box<dyn SecretStore>, VaultError> + Send + Sync>;

/// Default client construction: a [`SecretClient`] authenticated with the
/// ambient [`DefaultCredential`].
pub fn connect_vault(vault_url: &str) -> Result<Box<dyn SecretStore>, VaultError> {
    let client = SecretClient::new(vault_url, Box::new(DefaultCredential::new()))?;
    Ok(Box::new(client))
}

pub(crate) fn default_client_factory() -> ClientFactory {
    Arc::new(connect_vault)
}

/// Map an external name onto the vault's naming convention.
pub fn vault_secret_name(external_name: &str) -> String {
    external_name.replace(EXTERNAL_NAME_SEPARATOR, &VAULT_NAME_SEPARATOR.to_string())
}

/// Build the vault candidate map for `schema` using `store`.
pub(crate) fn vault_candidates(
    schema: &Schema,
    store: &dyn SecretStore,
) -> Result<CandidateMap, SettingsError> {
    let mut candidates = CandidateMap::new();

    for field in schema.fields() {
        for name in field.external_names(schema.config()) {
            let secret_name = vault_secret_name(&name);
            match store.get_secret(&secret_name) {
                Ok(secret) => {
                    let value = parse_candidate(
                        field,
                        secret.value.expose_secret().to_string(),
                        CandidateSource::Vault,
                        &secret_name,
                    )?;
                    candidates.insert(field.name().to_string(), value);
                }
                Err(e) if e.is_not_found() => {
                    warn!(
                        field = field.name(),
                        vault = store.vault_url(),
                        "{} was not found in: {}",
                        field.name(),
                        store.vault_url()
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    debug!(
        settings = schema.name(),
        vault = store.vault_url(),
        fields = candidates.len(),
        "Resolved vault candidates"
    );
    Ok(candidates)
}
