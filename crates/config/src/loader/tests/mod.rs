//! Tests for the settings resolver.
//!
//! Responsibilities:
//! - Test source precedence across vault, secrets dir, dotenv, environment
//!   and constructor values.
//! - Test per-call overrides and client factory call counts.
//! - Test validation of the merged map.
//!
//! Does NOT handle:
//! - Reading individual sources in isolation (tested next to each source).
//! - HTTP behaviour of the vault client (tested in `keyvault-client`).
//!
//! Invariants:
//! - Tests that touch the environment use `serial_test` and `env_lock()`.
//! - Fixture files live in `tempfile` directories cleaned up on drop.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use keyvault_client::testing::MemorySecretStore;
use keyvault_client::{SecretStore, VaultError};
use serde::Deserialize;
use tempfile::TempDir;

use crate::loader::builder::SettingsResolver;
use crate::schema::{FieldDescriptor, Schema};

pub mod validation_tests;

/// Returns the global test lock for environment variable isolation.
pub fn env_lock() -> &'static Mutex<()> {
    crate::test_util::global_test_lock()
}

/// Variables the fixtures use, cleared for every test unless set explicitly.
const FIXTURE_VARS: [&str; 7] = [
    "DOTENV_DISABLED",
    "test_prefix_field1",
    "test_prefix_field2",
    "TEST_PREFIX_FIELD1",
    "TEST_PREFIX_FIELD2",
    "field_missing",
    "FIELD_MISSING",
];

/// Run `f` with the fixture variables cleared and `vars` set.
pub fn with_clean_env<R>(vars: &[(&str, &str)], f: impl FnOnce() -> R) -> R {
    let mut all: Vec<(&str, Option<&str>)> = FIXTURE_VARS
        .iter()
        .filter(|name| !vars.iter().any(|(k, _)| k == *name))
        .map(|name| (*name, None))
        .collect();
    all.extend(vars.iter().map(|(k, v)| (*k, Some(*v))));
    temp_env::with_vars(all, f)
}

pub const DEFAULT_VAULT: &str = "https://pydenticlib-test.vault.azure.net/";
pub const INIT_VAULT: &str = "https://pydantictestinit.vault.azure.net/";

/// Settings with two defaulted string fields.
#[derive(Debug, Deserialize)]
pub struct TwoFields {
    pub field1: String,
    pub field2: String,
}

pub fn two_field_schema(name: &str) -> Schema {
    Schema::new(name)
        .env_prefix("test_prefix_")
        .field(FieldDescriptor::string("field1").with_default("default_value1"))
        .field(FieldDescriptor::string("field2").with_default("default_value2"))
}

pub fn resolver(schema: Schema) -> SettingsResolver<TwoFields> {
    SettingsResolver::with_schema(schema)
}

/// On-disk fixtures: two dotenv files and two secrets directories.
pub struct Fixtures {
    _dir: TempDir,
    pub test_env: PathBuf,
    pub dotenvfile: PathBuf,
    pub secret_dir: PathBuf,
    pub secret_dir_init: PathBuf,
    pub missing_env: PathBuf,
}

impl Fixtures {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let root = dir.path();

        let test_env = root.join("test.env");
        fs::write(
            &test_env,
            "test_prefix_field1=value1_from_test.env-file\n\
             test_prefix_field2=value2_from_test.env-file\n",
        )
        .unwrap();

        let dotenvfile = root.join(".dotenvfile");
        fs::write(
            &dotenvfile,
            "TEST_PREFIX_FIELD1=value1_from_.dotenvfile\n\
             TEST_PREFIX_FIELD2=value2_from_.dotenvfile\n",
        )
        .unwrap();

        let secret_dir = root.join("secret_dir");
        write_secrets(&secret_dir, "file_inside_secret_directory");
        let secret_dir_init = root.join(".secret_dir_init");
        write_secrets(&secret_dir_init, ".secret_dir_init");

        let missing_env = root.join("test_not_existed.env");

        Self {
            _dir: dir,
            test_env,
            dotenvfile,
            secret_dir,
            secret_dir_init,
            missing_env,
        }
    }
}

fn write_secrets(dir: &Path, suffix: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(
        dir.join("test_prefix_field1"),
        format!("value1_from_{}", suffix),
    )
    .unwrap();
    fs::write(
        dir.join("test_prefix_field2"),
        format!("value2_from_{}\n", suffix),
    )
    .unwrap();
}

/// Formatted log output collected from a scoped `tracing` subscriber.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` with WARN and above written into this capture.
    pub fn capture<R>(&self, f: impl FnOnce() -> R) -> R {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .without_time()
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f)
    }

    pub fn contents(&self) -> String {
        let bytes = self.0.lock().unwrap_or_else(|e| e.into_inner());
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl std::io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// A client factory backed by in-memory stores, one per endpoint.
///
/// Endpoints without a registered store resolve to an empty vault, so every
/// lookup is a not-found.
#[derive(Clone, Default)]
pub struct FakeVault {
    stores: Arc<HashMap<String, Arc<MemorySecretStore>>>,
    connects: Arc<AtomicUsize>,
    urls: Arc<Mutex<Vec<String>>>,
}

impl FakeVault {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store(mut self, store: MemorySecretStore) -> Self {
        let url = store.vault_url().to_string();
        Arc::make_mut(&mut self.stores).insert(url, Arc::new(store));
        self
    }

    /// The default vault seeded with both test fields.
    pub fn seeded() -> Self {
        Self::new()
            .with_store(
                MemorySecretStore::new(DEFAULT_VAULT)
                    .with_secret("test-prefix-field1", "value1_inside_default_azureKV")
                    .with_secret("test-prefix-field2", "value2_inside_default_azureKV"),
            )
            .with_store(
                MemorySecretStore::new(INIT_VAULT)
                    .with_secret("test-prefix-field1", "value1_inside_azureKV_from_init")
                    .with_secret("test-prefix-field2", "value2_inside_azureKV_from_init"),
            )
    }

    pub fn factory(
        &self,
    ) -> impl Fn(&str) -> Result<Box<dyn SecretStore>, VaultError> + Send + Sync + 'static {
        let fake = self.clone();
        move |url: &str| {
            fake.connects.fetch_add(1, Ordering::SeqCst);
            fake.urls
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(url.to_string());
            let store = fake
                .stores
                .get(url)
                .cloned()
                .unwrap_or_else(|| Arc::new(MemorySecretStore::new(url)));
            Ok(Box::new(store) as Box<dyn SecretStore>)
        }
    }

    /// Number of client handles constructed so far.
    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    /// Endpoints handles were constructed for, in order.
    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Lookups served by the store registered for `url`.
    pub fn lookups(&self, url: &str) -> usize {
        self.stores.get(url).map_or(0, |s| s.lookup_count())
    }
}
