//! Key Vault secret client.
//!
//! This crate provides a small blocking client for reading secrets from an
//! Azure Key Vault style REST endpoint, the credential providers it
//! authenticates with, and the [`SecretStore`] trait that settings
//! resolution consumes.

pub mod client;
pub mod credential;
pub mod error;
pub mod models;
mod store;
mod url_encoding;

#[cfg(any(feature = "test-utils", test))]
pub mod testing;

pub use client::{SecretClient, SecretClientBuilder};
pub use credential::{
    ClientSecretCredential, DefaultCredential, KEY_VAULT_SCOPE, StaticTokenCredential,
    TokenCredential,
};
pub use error::{Result, VaultError};
pub use models::{KeyVaultSecret, SecretAttributes};
pub use store::SecretStore;
