//! Dotenv file reading.
//!
//! Responsibilities:
//! - Decode a dotenv file in the requested encoding and parse it with `dotenvy`.
//! - Enforce the `DOTENV_DISABLED` gate.
//!
//! Does NOT handle:
//! - Layering dotenv values under process environment variables (see env.rs).
//!
//! Invariants:
//! - Reading a dotenv file never modifies the process environment.
//! - Errors never include raw .env line contents.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

use super::error::SettingsError;
use crate::constants::DOTENV_DISABLED_VAR;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Check if dotenv loading is disabled via environment variable.
pub(crate) fn dotenv_disabled() -> bool {
    matches!(
        std::env::var(DOTENV_DISABLED_VAR).ok().as_deref(),
        Some("true") | Some("1")
    )
}

/// Read `path` as a dotenv file, lower-casing keys unless `case_sensitive`.
pub(crate) fn read_env_file(
    path: &Path,
    encoding: Option<&str>,
    case_sensitive: bool,
) -> Result<HashMap<String, String>, SettingsError> {
    let bytes = std::fs::read(path).map_err(|e| SettingsError::DotenvIo { kind: e.kind() })?;
    let text = decode(&bytes, encoding)?;

    let mut values = HashMap::new();
    for item in dotenvy::from_read_iter(Cursor::new(text.into_bytes())) {
        let (key, value) = item.map_err(map_dotenv_error)?;
        let key = if case_sensitive {
            key
        } else {
            key.to_lowercase()
        };
        values.insert(key, value);
    }
    Ok(values)
}

fn map_dotenv_error(err: dotenvy::Error) -> SettingsError {
    match err {
        dotenvy::Error::LineParse(_, idx) => SettingsError::DotenvParse { error_index: idx },
        dotenvy::Error::Io(io_err) => SettingsError::DotenvIo {
            kind: io_err.kind(),
        },
        _ => SettingsError::DotenvUnknown,
    }
}

/// Decode dotenv bytes according to an encoding label.
fn decode(bytes: &[u8], encoding: Option<&str>) -> Result<String, SettingsError> {
    let label = encoding.map(|e| e.trim().to_ascii_lowercase().replace('_', "-"));
    let decode_error = |name: &str| SettingsError::DotenvDecode {
        encoding: name.to_string(),
    };

    match label.as_deref() {
        None | Some("utf-8") | Some("utf8") => {
            String::from_utf8(bytes.to_vec()).map_err(|_| decode_error("utf-8"))
        }
        Some("utf-8-sig") => {
            let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
            String::from_utf8(bytes.to_vec()).map_err(|_| decode_error("utf-8-sig"))
        }
        Some("latin-1") | Some("latin1") | Some("iso-8859-1") => {
            Ok(bytes.iter().map(|&b| char::from(b)).collect())
        }
        Some("ascii") | Some("us-ascii") => {
            if bytes.is_ascii() {
                String::from_utf8(bytes.to_vec()).map_err(|_| decode_error("ascii"))
            } else {
                Err(decode_error("ascii"))
            }
        }
        Some(other) => Err(SettingsError::UnsupportedEncoding(other.to_string())),
    }
}
