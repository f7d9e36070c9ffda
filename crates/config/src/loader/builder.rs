//! Settings resolver builder implementation.
//!
//! Responsibilities:
//! - Provide a builder-pattern `SettingsResolver` carrying constructor values
//!   and per-call source overrides.
//! - Query the vault, secrets directory and environment sources and deep-merge
//!   their candidates in precedence order.
//! - Validate the merged map into the settings type.
//!
//! Does NOT handle:
//! - Reading any individual source (delegated to vault.rs, secrets_dir.rs, env.rs).
//! - Coercion rules (delegated to validate.rs).
//!
//! Invariants / Assumptions:
//! - Precedence: constructor values > environment > dotenv > secrets dir > vault > defaults.
//! - Sources are always queried in the order vault, secrets dir, environment.
//! - The client factory runs at most once per `resolve()` and only when a
//!   vault endpoint is effective.
//! - Nothing is cached between calls; every `resolve()` starts from scratch.

use std::fmt;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use keyvault_client::{SecretStore, VaultError};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use super::candidate::CandidateMap;
use super::env::{capture_process_env, environment_candidates};
use super::error::SettingsError;
use super::merge::deep_update;
use super::secrets_dir::secrets_dir_candidates;
use super::validate::validate;
use super::vault::{ClientFactory, default_client_factory, vault_candidates};
use crate::schema::{Schema, Settings};

/// Resolves one settings type from its layered sources.
pub struct SettingsResolver<S> {
    schema: Schema,
    init_values: Map<String, Value>,
    /// `None` inherits the schema default, `Some(None)` disables dotenv.
    env_file: Option<Option<PathBuf>>,
    env_file_encoding: Option<String>,
    secrets_dir: Option<PathBuf>,
    vault_url: Option<String>,
    client_factory: ClientFactory,
    _settings: PhantomData<fn() -> S>,
}

impl<S: Settings> Default for SettingsResolver<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Settings> SettingsResolver<S> {
    /// Create a resolver for `S` using its declared schema.
    pub fn new() -> Self {
        Self::with_schema(S::schema())
    }
}

impl<S> SettingsResolver<S> {
    /// Create a resolver for an explicit schema.
    pub fn with_schema(schema: Schema) -> Self {
        Self {
            schema,
            init_values: Map::new(),
            env_file: None,
            env_file_encoding: None,
            secrets_dir: None,
            vault_url: None,
            client_factory: default_client_factory(),
            _settings: PhantomData,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Supply a constructor value. Constructor values outrank every source.
    pub fn with_value(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.init_values.insert(field.into(), value.into());
        self
    }

    /// Supply several constructor values at once.
    pub fn with_values<K, V>(mut self, values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.init_values
            .extend(values.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Read this dotenv file instead of the schema default.
    pub fn with_env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file = Some(Some(path.into()));
        self
    }

    /// Skip dotenv reading for this resolution.
    pub fn without_env_file(mut self) -> Self {
        self.env_file = Some(None);
        self
    }

    pub fn with_env_file_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.env_file_encoding = Some(encoding.into());
        self
    }

    /// Read secret files from this directory instead of the schema default.
    pub fn with_secrets_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.secrets_dir = Some(path.into());
        self
    }

    /// Query this vault endpoint instead of the schema default.
    ///
    /// An empty URL is treated as no override.
    pub fn with_vault_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.vault_url = (!url.trim().is_empty()).then_some(url);
        self
    }

    /// Replace how vault client handles are constructed (primarily for testing).
    pub fn with_client_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(&str) -> Result<Box<dyn SecretStore>, VaultError> + Send + Sync + 'static,
    {
        self.client_factory = Arc::new(factory);
        self
    }

    fn effective_vault_url(&self) -> Option<&str> {
        self.vault_url
            .as_deref()
            .or(self.schema.config().vault_url.as_deref())
            .filter(|url| !url.trim().is_empty())
    }

    fn effective_secrets_dir(&self) -> Option<&Path> {
        self.secrets_dir
            .as_deref()
            .or(self.schema.config().secrets_dir.as_deref())
    }

    fn effective_env_file(&self) -> Option<&Path> {
        match &self.env_file {
            Some(choice) => choice.as_deref(),
            None => self.schema.config().env_file.as_deref(),
        }
    }

    fn effective_env_file_encoding(&self) -> Option<&str> {
        self.env_file_encoding
            .as_deref()
            .or(self.schema.config().env_file_encoding.as_deref())
    }

    fn vault_source(&self) -> Result<CandidateMap, SettingsError> {
        let Some(url) = self.effective_vault_url() else {
            debug!(settings = self.schema.name(), "Vault disabled");
            return Ok(CandidateMap::new());
        };
        let store = (self.client_factory)(url)?;
        vault_candidates(&self.schema, store.as_ref())
    }

    fn secrets_dir_source(&self) -> Result<CandidateMap, SettingsError> {
        match self.effective_secrets_dir() {
            Some(dir) => secrets_dir_candidates(&self.schema, dir),
            None => Ok(CandidateMap::new()),
        }
    }

    /// Query every source and return the merged value map, before validation.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The vault client cannot be constructed or a lookup fails for any
    ///   reason other than the secret not existing (`SettingsError::Vault`).
    /// - The secrets directory path is not a directory or a file is unreadable.
    /// - The dotenv file exists but cannot be read, decoded or parsed.
    /// - A structured field's string value is not valid JSON.
    pub fn resolve(&self) -> Result<Map<String, Value>, SettingsError> {
        let vault = self.vault_source()?;
        let secrets = self.secrets_dir_source()?;
        let environ = environment_candidates(
            &self.schema,
            capture_process_env(),
            self.effective_env_file(),
            self.effective_env_file_encoding(),
        )?;

        let merged = deep_update(vault, [secrets, environ, self.init_values.clone()]);
        debug!(
            settings = self.schema.name(),
            fields = merged.len(),
            "Merged settings sources"
        );
        Ok(merged)
    }

    /// Resolve every source and validate the result into `S`.
    ///
    /// # Errors
    ///
    /// Any error from [`resolve`](Self::resolve), or
    /// `SettingsError::Validation` listing every field that is missing,
    /// undeclared or of the wrong type.
    pub fn build(&self) -> Result<S, SettingsError>
    where
        S: DeserializeOwned,
    {
        let merged = self.resolve()?;
        validate(&self.schema, merged)
    }
}

impl<S> fmt::Debug for SettingsResolver<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Constructor values may hold secrets; only their keys are shown.
        f.debug_struct("SettingsResolver")
            .field("schema", &self.schema.name())
            .field("init_values", &self.init_values.keys().collect::<Vec<_>>())
            .field("env_file", &self.env_file)
            .field("env_file_encoding", &self.env_file_encoding)
            .field("secrets_dir", &self.secrets_dir)
            .field("vault_url", &self.vault_url)
            .finish_non_exhaustive()
    }
}
