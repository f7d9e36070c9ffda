//! Conversion of raw source strings into candidate values.

use serde_json::{Map, Value};

use super::error::{CandidateSource, SettingsError};
use crate::schema::FieldDescriptor;

/// Field name to value, contributed by exactly one source.
pub type CandidateMap = Map<String, Value>;

/// Turn a raw string read from `origin` under `external_name` into a candidate.
///
/// Structured fields are parsed as JSON so nested objects can deep-merge
/// with other sources; every other kind stays a string until validation.
pub(crate) fn parse_candidate(
    field: &FieldDescriptor,
    raw: String,
    origin: CandidateSource,
    external_name: &str,
) -> Result<Value, SettingsError> {
    if !field.kind().is_structured() {
        return Ok(Value::String(raw));
    }

    serde_json::from_str(&raw).map_err(|e| SettingsError::ParseValue {
        origin,
        name: external_name.to_string(),
        message: e.to_string(),
    })
}
