//! Coercion and validation of the merged value map.
//!
//! Responsibilities:
//! - Fill absent fields from schema defaults, which are taken as declared.
//! - Coerce string candidates to each field's declared kind.
//! - Collect every problem into one `ValidationError` before deserializing.
//!
//! Does NOT handle:
//! - Deciding which source a value came from; only the merged map is seen,
//!   so a disabled vault and a vault without the secret look the same here.
//!
//! Invariants:
//! - Keys not declared in the schema are rejected.
//! - Errors are reported in field declaration order, extra keys last.

use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value};

use super::error::{FieldError, FieldErrorKind, SettingsError, ValidationError};
use crate::constants::ROOT_FIELD;
use crate::schema::{FieldDescriptor, FieldKind, Schema};

const TRUE_WORDS: [&str; 6] = ["1", "on", "t", "true", "y", "yes"];
const FALSE_WORDS: [&str; 6] = ["0", "off", "f", "false", "n", "no"];

/// Validate `merged` against `schema` and deserialize it into `S`.
pub(crate) fn validate<S: DeserializeOwned>(
    schema: &Schema,
    merged: Map<String, Value>,
) -> Result<S, SettingsError> {
    let values = coerce_all(schema, merged)?;
    serde_json::from_value(Value::Object(values)).map_err(|e| {
        ValidationError::new(
            schema.name(),
            vec![FieldError::new(
                ROOT_FIELD,
                FieldErrorKind::Deserialize(e.to_string()),
            )],
        )
        .into()
    })
}

/// Apply defaults and coercion to every declared field.
pub(crate) fn coerce_all(
    schema: &Schema,
    mut merged: Map<String, Value>,
) -> Result<Map<String, Value>, ValidationError> {
    let mut errors = Vec::new();
    let mut values = Map::new();

    for field in schema.fields() {
        let Some(raw) = merged.remove(field.name()) else {
            match field.default() {
                Some(default) => {
                    values.insert(field.name().to_string(), default.clone());
                }
                None if field.is_required() => {
                    errors.push(FieldError::new(field.name(), FieldErrorKind::Missing));
                }
                None => {}
            }
            continue;
        };

        match coerce(field, raw) {
            Ok(value) => {
                values.insert(field.name().to_string(), value);
            }
            Err(kind) => errors.push(FieldError::new(field.name(), kind)),
        }
    }

    errors.extend(
        merged
            .into_iter()
            .map(|(key, _)| FieldError::new(key, FieldErrorKind::ExtraForbidden)),
    );

    if errors.is_empty() {
        Ok(values)
    } else {
        Err(ValidationError::new(schema.name(), errors))
    }
}

fn coerce(field: &FieldDescriptor, value: Value) -> Result<Value, FieldErrorKind> {
    if value.is_null() {
        return if field.allows_null() {
            Ok(Value::Null)
        } else {
            Err(FieldErrorKind::NoneNotAllowed)
        };
    }

    let kind = field.kind();
    let invalid = || FieldErrorKind::InvalidType {
        expected: kind.expected(),
    };

    match kind {
        FieldKind::Any => Ok(value),
        FieldKind::String | FieldKind::Secret => match value {
            Value::String(_) => Ok(value),
            Value::Number(n) => Ok(Value::String(n.to_string())),
            _ => Err(invalid()),
        },
        FieldKind::Integer => match &value {
            Value::Number(n) if n.is_i64() || n.is_u64() => Ok(value),
            Value::Number(n) => n
                .as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                .map(|f| Value::from(f as i64))
                .ok_or_else(invalid),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .map(Value::from)
                    .or_else(|_| s.parse::<u64>().map(Value::from))
                    .map_err(|_| invalid())
            }
            _ => Err(invalid()),
        },
        FieldKind::Float => match &value {
            Value::Number(_) => Ok(value),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(invalid),
            _ => Err(invalid()),
        },
        FieldKind::Boolean => match &value {
            Value::Bool(_) => Ok(value),
            Value::Number(n) => match n.as_i64() {
                Some(0) => Ok(Value::Bool(false)),
                Some(1) => Ok(Value::Bool(true)),
                _ => Err(invalid()),
            },
            Value::String(s) => {
                let word = s.trim().to_lowercase();
                if TRUE_WORDS.contains(&word.as_str()) {
                    Ok(Value::Bool(true))
                } else if FALSE_WORDS.contains(&word.as_str()) {
                    Ok(Value::Bool(false))
                } else {
                    Err(invalid())
                }
            }
            _ => Err(invalid()),
        },
        FieldKind::Structured => match value {
            Value::Object(_) | Value::Array(_) => Ok(value),
            Value::String(s) => match serde_json::from_str::<Value>(&s) {
                Ok(parsed @ (Value::Object(_) | Value::Array(_))) => Ok(parsed),
                Ok(_) => Err(invalid()),
                Err(_) => Err(FieldErrorKind::InvalidJson),
            },
            _ => Err(invalid()),
        },
    }
}
