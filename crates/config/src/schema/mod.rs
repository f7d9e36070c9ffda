//! Settings schema definitions.
//!
//! Responsibilities:
//! - Define `Schema`: the settings type name, its ordered field descriptors,
//!   and the schema-level `SourceConfig`.
//! - Define the `Settings` trait that ties a deserializable type to its schema.
//!
//! Does NOT handle:
//! - Reading sources or merging candidates (see `loader` module).
//!
//! Invariants:
//! - Field names are unique within a schema; adding a field with an existing
//!   name replaces the earlier descriptor in place.
//! - Field order is declaration order and is the order sources are queried in.

mod field;
mod source;

use std::path::PathBuf;

use serde::de::DeserializeOwned;

pub use field::{FieldDescriptor, FieldKind};
pub use source::SourceConfig;

use crate::loader::{SettingsError, SettingsResolver};

/// Ordered field descriptors plus source configuration for one settings type.
#[derive(Debug, Clone)]
pub struct Schema {
    name: String,
    fields: Vec<FieldDescriptor>,
    config: SourceConfig,
}

impl Schema {
    /// Create an empty schema named after the settings type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            config: SourceConfig::default(),
        }
    }

    /// Add a field.
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        match self.fields.iter_mut().find(|f| f.name() == field.name()) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
        self
    }

    /// Set the prefix used to derive external names.
    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.env_prefix = prefix.into();
        self
    }

    /// Match external names case-sensitively.
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.config.case_sensitive = case_sensitive;
        self
    }

    /// Set the default dotenv file.
    pub fn env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.env_file = Some(path.into());
        self
    }

    /// Do not read any dotenv file by default.
    pub fn without_env_file(mut self) -> Self {
        self.config.env_file = None;
        self
    }

    /// Set the default dotenv encoding label.
    pub fn env_file_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.config.env_file_encoding = Some(encoding.into());
        self
    }

    /// Set the default secrets directory.
    pub fn secrets_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.secrets_dir = Some(path.into());
        self
    }

    /// Set the default vault endpoint.
    pub fn vault_url(mut self, url: impl Into<String>) -> Self {
        self.config.vault_url = Some(url.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    /// Look up a field descriptor by field name.
    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name() == name)
    }
}

/// A settings type assembled from layered sources.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Deserialize)]
/// struct GitHub {
///     url: String,
///     username: String,
///     token: SecretString,
/// }
///
/// impl Settings for GitHub {
///     fn schema() -> Schema {
///         Schema::new("GitHub")
///             .env_prefix("github_")
///             .vault_url("https://my-kv.vault.azure.net/")
///             .field(FieldDescriptor::string("url").with_default("https://api.github.com/user"))
///             .field(FieldDescriptor::string("username"))
///             .field(FieldDescriptor::secret("token"))
///     }
/// }
///
/// let github = GitHub::load()?;
/// ```
pub trait Settings: DeserializeOwned + Sized {
    /// The schema describing this type's fields and default sources.
    fn schema() -> Schema;

    /// A resolver for this type, for per-call overrides and constructor values.
    fn resolver() -> SettingsResolver<Self> {
        SettingsResolver::new()
    }

    /// Resolve every source with the schema defaults and validate.
    fn load() -> Result<Self, SettingsError> {
        Self::resolver().build()
    }
}
