//! Error types for settings resolution.
//!
//! Responsibilities:
//! - Define error variants for every resolution and validation failure.
//! - Aggregate per-field validation problems into one `ValidationError`.
//!
//! Does NOT handle:
//! - Vault transport errors beyond wrapping them (see `keyvault_client::VaultError`).
//!
//! Invariants:
//! - A missing vault secret is never an error here; it is logged by the vault source.
//! - Dotenv errors NEVER include raw .env line contents to prevent secret leakage.
//! - Validation errors name fields, never values.

use std::fmt;
use std::io::ErrorKind;
use std::path::PathBuf;

use keyvault_client::VaultError;
use thiserror::Error;

/// Source a string candidate was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateSource {
    Vault,
    SecretsDir,
    Environment,
}

impl fmt::Display for CandidateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Vault => "vault",
            Self::SecretsDir => "secrets directory",
            Self::Environment => "environment",
        };
        write!(f, "{}", s)
    }
}

/// Errors that can occur while resolving settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// One or more fields failed validation after merging.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A vault or credential failure other than a missing secret.
    #[error("Vault error: {0}")]
    Vault(#[from] VaultError),

    /// A structured field's string value is not valid JSON.
    #[error("error parsing JSON for \"{name}\" from {origin}: {message}")]
    ParseValue {
        origin: CandidateSource,
        name: String,
        message: String,
    },

    #[error("secrets_dir must reference a directory: {}", .path.display())]
    SecretsDirNotADirectory { path: PathBuf },

    #[error("Failed to read secret file {}: {kind}", .path.display())]
    SecretsDirRead { path: PathBuf, kind: ErrorKind },

    /// Failed to parse the `.env` file due to invalid syntax.
    ///
    /// SAFETY: This error only includes the byte index of the parse failure,
    /// NOT the offending line content, to prevent leaking secrets.
    #[error(
        "Failed to parse .env file at position {error_index}. Hint: set DOTENV_DISABLED=1 to skip .env loading"
    )]
    DotenvParse { error_index: usize },

    /// Failed to read the `.env` file due to an I/O error.
    #[error("Failed to read .env file: {kind}")]
    DotenvIo { kind: ErrorKind },

    /// The `.env` bytes are not valid in the requested encoding.
    #[error("Failed to decode .env file as {encoding}")]
    DotenvDecode { encoding: String },

    #[error("Unsupported .env file encoding: {0}")]
    UnsupportedEncoding(String),

    /// Unknown dotenv error (future variants from dotenvy crate).
    ///
    /// SAFETY: This error does not include any raw dotenv content.
    #[error("Failed to load .env file. Hint: set DOTENV_DISABLED=1 to skip .env loading")]
    DotenvUnknown,
}

/// What went wrong with one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldErrorKind {
    /// Required field absent from every source and without a default.
    Missing,
    /// Key not declared in the schema.
    ExtraForbidden,
    /// Explicit null for a field that does not accept it.
    NoneNotAllowed,
    /// Value cannot be coerced to the declared kind.
    InvalidType { expected: &'static str },
    /// Structured value supplied as a string that is not JSON.
    InvalidJson,
    /// The coerced map did not deserialize into the settings type.
    Deserialize(String),
}

impl fmt::Display for FieldErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "field required"),
            Self::ExtraForbidden => write!(f, "extra fields not permitted"),
            Self::NoneNotAllowed => write!(f, "none is not an allowed value"),
            Self::InvalidType { expected } => write!(f, "value is not {}", expected),
            Self::InvalidJson => write!(f, "value is not valid JSON"),
            Self::Deserialize(message) => write!(f, "{}", message),
        }
    }
}

/// A validation problem attached to one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub kind: FieldErrorKind,
}

impl FieldError {
    pub fn new(field: impl Into<String>, kind: FieldErrorKind) -> Self {
        Self {
            field: field.into(),
            kind,
        }
    }
}

/// Every validation problem found for one settings type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    settings: String,
    errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn new(settings: impl Into<String>, errors: Vec<FieldError>) -> Self {
        Self {
            settings: settings.into(),
            errors,
        }
    }

    /// Name of the settings type that failed validation.
    pub fn settings(&self) -> &str {
        &self.settings
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Names of required fields that no source supplied.
    pub fn missing_fields(&self) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|e| e.kind == FieldErrorKind::Missing)
            .map(|e| e.field.as_str())
            .collect()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.errors.len();
        write!(
            f,
            "{} validation error{} for {}",
            count,
            if count == 1 { "" } else { "s" },
            self.settings
        )?;
        for error in &self.errors {
            write!(f, "\n{}\n  {}", error.field, error.kind)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}
