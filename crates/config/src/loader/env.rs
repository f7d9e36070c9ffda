//! Environment and dotenv candidates.
//!
//! Responsibilities:
//! - Capture the process environment at resolution time.
//! - Layer process environment variables over dotenv file values.
//! - Produce the environment candidate map keyed by field name.
//!
//! Does NOT handle:
//! - Decoding or parsing the dotenv file itself (see dotenv.rs).
//! - Merging with other sources (see merge.rs).
//!
//! Invariants:
//! - Process environment variables take precedence over dotenv values.
//! - A missing dotenv file contributes nothing and is not an error.
//! - A leading `~` in the dotenv path is expanded like the secrets directory.
//! - An empty environment variable is still a value (absence, not emptiness, masks).
//! - For each field the first external name that has a value wins.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use super::candidate::{CandidateMap, parse_candidate};
use super::dotenv::{dotenv_disabled, read_env_file};
use super::error::{CandidateSource, SettingsError};
use super::path::expand_home;
use crate::schema::Schema;

/// Snapshot of the process environment, skipping non-UTF-8 entries.
pub(crate) fn capture_process_env() -> Vec<(String, String)> {
    std::env::vars_os()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
        .collect()
}

/// Build the environment candidate map for `schema`.
pub(crate) fn environment_candidates(
    schema: &Schema,
    process_env: impl IntoIterator<Item = (String, String)>,
    env_file: Option<&Path>,
    encoding: Option<&str>,
) -> Result<CandidateMap, SettingsError> {
    let config = schema.config();
    let mut env_vars: HashMap<String, String> = HashMap::new();

    if let Some(path) = env_file.map(expand_home)
        && !dotenv_disabled()
        && path.is_file()
    {
        let values = read_env_file(&path, encoding, config.case_sensitive)?;
        debug!(path = %path.display(), entries = values.len(), "Read dotenv file");
        env_vars.extend(values);
    }

    env_vars.extend(process_env.into_iter().map(|(key, value)| {
        if config.case_sensitive {
            (key, value)
        } else {
            (key.to_lowercase(), value)
        }
    }));

    let mut candidates = CandidateMap::new();
    for field in schema.fields() {
        let found = field
            .external_names(config)
            .into_iter()
            .find_map(|name| env_vars.get(&name).cloned().map(|value| (name, value)));

        if let Some((name, value)) = found {
            let value = parse_candidate(field, value, CandidateSource::Environment, &name)?;
            candidates.insert(field.name().to_string(), value);
        }
    }

    debug!(
        settings = schema.name(),
        fields = candidates.len(),
        "Resolved environment candidates"
    );
    Ok(candidates)
}
