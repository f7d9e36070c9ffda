//! Layered settings resolution.
//!
//! Responsibilities:
//! - Read candidate values from the vault, a secrets directory, dotenv files
//!   and the process environment.
//! - Deep-merge candidates in fixed precedence order and validate the result.
//! - Provide the builder-pattern `SettingsResolver` for per-call overrides.
//!
//! Does NOT handle:
//! - Declaring schemas (see `schema` module).
//! - Vault transport and credentials (see the `keyvault-client` crate).
//!
//! Invariants / Assumptions:
//! - Constructor values > environment > dotenv > secrets dir > vault > defaults.
//! - The `DOTENV_DISABLED` variable is checked before any dotenv file is read.
//! - Only a missing vault secret is recovered; every other failure propagates.

mod builder;
mod candidate;
mod dotenv;
mod env;
mod error;
mod merge;
mod path;
mod secrets_dir;
mod validate;
mod vault;

#[cfg(test)]
mod tests;

pub use builder::SettingsResolver;
pub use candidate::CandidateMap;
pub use error::{CandidateSource, FieldError, FieldErrorKind, SettingsError, ValidationError};
pub use merge::deep_update;
pub use vault::{ClientFactory, connect_vault, vault_secret_name};
