//! Schema-level source configuration.

use std::path::PathBuf;

use crate::constants::DEFAULT_ENV_FILE;

/// Where a settings type looks for values when no per-call override is given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// Prefix prepended to field names to form external names.
    pub env_prefix: String,
    /// Match external names case-sensitively.
    pub case_sensitive: bool,
    /// Dotenv file, `None` disables dotenv reading.
    pub env_file: Option<PathBuf>,
    /// Dotenv encoding label, `None` means UTF-8.
    pub env_file_encoding: Option<String>,
    /// Directory holding one file per external name, `None` disables it.
    pub secrets_dir: Option<PathBuf>,
    /// Vault endpoint, `None` disables vault lookups.
    pub vault_url: Option<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            env_prefix: String::new(),
            case_sensitive: false,
            env_file: Some(PathBuf::from(DEFAULT_ENV_FILE)),
            env_file_encoding: None,
            secrets_dir: None,
            vault_url: None,
        }
    }
}
