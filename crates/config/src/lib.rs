//! Layered application settings backed by a remote secret vault.
//!
//! This crate assembles a typed settings object from constructor values,
//! environment variables, a dotenv file, a secrets directory and a Key Vault
//! style secret store, merged in a fixed precedence order and validated
//! against a declared schema.

pub mod constants;
mod loader;
pub mod schema;

pub use loader::{
    CandidateMap, CandidateSource, ClientFactory, FieldError, FieldErrorKind, SettingsError,
    SettingsResolver, ValidationError, connect_vault, deep_update, vault_secret_name,
};
pub use schema::{FieldDescriptor, FieldKind, Schema, Settings, SourceConfig};
