//! Field descriptors for settings schemas.
//!
//! Responsibilities:
//! - Describe one settings field: name, declared kind, default, required flag.
//! - Derive the external names (environment-style keys) a field may be supplied under.
//!
//! Does NOT handle:
//! - Reading any source (see `loader`).
//! - Coercing values to the declared kind (see `loader::validate`).
//!
//! Invariants:
//! - Without explicit `env` aliases the only external name is `env_prefix + name`.
//! - External names are lower-cased unless the schema is case-sensitive.
//! - A field with a default is never reported as missing.

use serde_json::Value;

use super::source::SourceConfig;

/// Declared type of a settings field, used for coercion of string sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Plain string.
    String,
    /// String that the settings type holds as a `SecretString`.
    Secret,
    /// Signed integer.
    Integer,
    /// Floating point number.
    Float,
    /// Boolean, accepting the usual textual spellings.
    Boolean,
    /// Nested object or array; string sources are parsed as JSON.
    Structured,
    /// Passed through unchanged.
    Any,
}

impl FieldKind {
    /// Whether string sources must be parsed as JSON for this kind.
    pub fn is_structured(self) -> bool {
        matches!(self, Self::Structured)
    }

    /// Human-readable name used in validation messages.
    pub fn expected(self) -> &'static str {
        match self {
            Self::String | Self::Secret => "a string",
            Self::Integer => "an integer",
            Self::Float => "a number",
            Self::Boolean => "a boolean",
            Self::Structured => "an object or array",
            Self::Any => "any value",
        }
    }
}

/// One named, typed entry of a settings schema.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    name: String,
    kind: FieldKind,
    default: Option<Value>,
    required: bool,
    env: Vec<String>,
}

impl FieldDescriptor {
    /// Create a required field with no default.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: None,
            required: true,
            env: Vec::new(),
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::String)
    }

    pub fn secret(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Secret)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Float)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    pub fn structured(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Structured)
    }

    pub fn any(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Any)
    }

    /// Set the schema default used when no source supplies the field.
    ///
    /// Defaults are not coerced or validated against the field kind; they
    /// reach deserialization exactly as given.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Mark the field optional: absent means unset, and `null` is accepted.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Add an explicit external name. Replaces the prefixed default name.
    pub fn with_env(mut self, name: impl Into<String>) -> Self {
        self.env.push(name.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// True when validation fails if no source and no default supply a value.
    pub fn is_required(&self) -> bool {
        self.required && self.default.is_none()
    }

    /// True when an explicit `null` is a valid value.
    pub fn allows_null(&self) -> bool {
        !self.required || matches!(self.default, Some(Value::Null))
    }

    /// External names this field may be supplied under, in lookup order.
    pub fn external_names(&self, config: &SourceConfig) -> Vec<String> {
        let names = if self.env.is_empty() {
            vec![format!("{}{}", config.env_prefix, self.name)]
        } else {
            self.env.clone()
        };

        if config.case_sensitive {
            names
        } else {
            names.into_iter().map(|n| n.to_lowercase()).collect()
        }
    }
}
