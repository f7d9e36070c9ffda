//! Secrets directory candidates.
//!
//! Responsibilities:
//! - Read one file per external name from a secrets directory (e.g. Docker or
//!   Kubernetes mounted secrets) and produce the candidate map.
//!
//! Does NOT handle:
//! - Watching the directory for changes.
//!
//! Invariants:
//! - A directory that does not exist contributes nothing and logs a warning.
//! - A path that exists but is not a directory is an error.
//! - File contents are trimmed of surrounding whitespace.
//! - When several external names of one field have files, the last one wins.

use std::path::Path;

use tracing::{debug, warn};

use super::candidate::{CandidateMap, parse_candidate};
use super::error::{CandidateSource, SettingsError};
use super::path::expand_home;
use crate::schema::Schema;

/// Build the secrets-directory candidate map for `schema`.
pub(crate) fn secrets_dir_candidates(
    schema: &Schema,
    secrets_dir: &Path,
) -> Result<CandidateMap, SettingsError> {
    let dir = expand_home(secrets_dir);
    let mut candidates = CandidateMap::new();

    if !dir.exists() {
        warn!(path = %dir.display(), "Secrets directory does not exist");
        return Ok(candidates);
    }
    if !dir.is_dir() {
        return Err(SettingsError::SecretsDirNotADirectory { path: dir });
    }

    for field in schema.fields() {
        for name in field.external_names(schema.config()) {
            let path = dir.join(&name);
            if path.is_file() {
                let contents =
                    std::fs::read_to_string(&path).map_err(|e| SettingsError::SecretsDirRead {
                        path: path.clone(),
                        kind: e.kind(),
                    })?;
                let value = parse_candidate(
                    field,
                    contents.trim().to_string(),
                    CandidateSource::SecretsDir,
                    &name,
                )?;
                candidates.insert(field.name().to_string(), value);
            } else if path.exists() {
                warn!(path = %path.display(), "Expected a secret file but found a directory");
            }
        }
    }

    debug!(
        settings = schema.name(),
        path = %dir.display(),
        fields = candidates.len(),
        "Resolved secrets directory candidates"
    );
    Ok(candidates)
}
