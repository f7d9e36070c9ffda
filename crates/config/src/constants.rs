//! Centralized constants for settings resolution.

// =============================================================================
// Source Defaults
// =============================================================================

/// Dotenv file consulted when a schema does not configure one.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Environment variable that disables dotenv reading when set to `1` or `true`.
pub const DOTENV_DISABLED_VAR: &str = "DOTENV_DISABLED";

// =============================================================================
// Vault Naming
// =============================================================================

/// Separator used in external (environment-style) names.
pub const EXTERNAL_NAME_SEPARATOR: char = '_';

/// Separator vault secret names use in place of [`EXTERNAL_NAME_SEPARATOR`].
pub const VAULT_NAME_SEPARATOR: char = '-';

// =============================================================================
// Validation
// =============================================================================

/// Pseudo field name attached to errors that are not tied to one field.
pub const ROOT_FIELD: &str = "__root__";
