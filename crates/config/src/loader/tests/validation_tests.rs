//! Validation tests for the settings resolver.
//!
//! Responsibilities:
//! - Test coercion of string sources into typed settings.
//! - Test aggregated missing-field and extra-field errors.
//! - Test structured fields merging across sources.
//! - Test the `Settings` trait entry points.

use std::collections::BTreeMap;

use keyvault_client::testing::MemorySecretStore;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use serial_test::serial;

use super::{
    DEFAULT_VAULT, FakeVault, Fixtures, env_lock, resolver, two_field_schema, with_clean_env,
};
use crate::loader::builder::SettingsResolver;
use crate::loader::error::{FieldErrorKind, SettingsError};
use crate::schema::{FieldDescriptor, Schema, Settings};

#[derive(Debug, Deserialize)]
struct Service {
    host: String,
    port: u16,
    debug: bool,
    ratio: f64,
    api_key: SecretString,
    labels: BTreeMap<String, String>,
    nickname: Option<String>,
}

impl Settings for Service {
    fn schema() -> Schema {
        Schema::new("Service")
            .env_prefix("svc_test_")
            .without_env_file()
            .field(FieldDescriptor::string("host").with_default("localhost"))
            .field(FieldDescriptor::integer("port").with_default(8080))
            .field(FieldDescriptor::boolean("debug").with_default(false))
            .field(FieldDescriptor::float("ratio").with_default(0.5))
            .field(FieldDescriptor::secret("api_key"))
            .field(FieldDescriptor::structured("labels").with_default(json!({})))
            .field(FieldDescriptor::string("nickname").optional())
    }
}

const SERVICE_VARS: [&str; 7] = [
    "SVC_TEST_HOST",
    "SVC_TEST_PORT",
    "SVC_TEST_DEBUG",
    "SVC_TEST_RATIO",
    "SVC_TEST_API_KEY",
    "SVC_TEST_LABELS",
    "SVC_TEST_NICKNAME",
];

fn with_service_env<R>(vars: &[(&str, &str)], f: impl FnOnce() -> R) -> R {
    let mut all: Vec<(&str, Option<&str>)> = SERVICE_VARS
        .iter()
        .filter(|name| !vars.iter().any(|(k, _)| k == *name))
        .map(|name| (*name, None))
        .collect();
    all.extend(vars.iter().map(|(k, v)| (*k, Some(*v))));
    temp_env::with_vars(all, f)
}

#[test]
#[serial]
fn test_load_coerces_environment_strings() {
    let _lock = env_lock().lock().unwrap();

    with_service_env(
        &[
            ("SVC_TEST_PORT", "9443"),
            ("SVC_TEST_DEBUG", "yes"),
            ("SVC_TEST_RATIO", "0.75"),
            ("SVC_TEST_API_KEY", "k-123"),
            ("SVC_TEST_LABELS", r#"{"team": "platform"}"#),
        ],
        || {
            let service = Service::load().unwrap();
            assert_eq!(service.host, "localhost");
            assert_eq!(service.port, 9443);
            assert!(service.debug);
            assert_eq!(service.ratio, 0.75);
            assert_eq!(service.api_key.expose_secret(), "k-123");
            assert_eq!(service.labels.get("team").map(String::as_str), Some("platform"));
            assert!(service.nickname.is_none());
        },
    );
}

#[test]
#[serial]
fn test_invalid_values_are_reported_together() {
    let _lock = env_lock().lock().unwrap();

    with_service_env(
        &[("SVC_TEST_PORT", "not-a-port"), ("SVC_TEST_DEBUG", "maybe")],
        || {
            let v = match Service::load() {
                Err(SettingsError::Validation(v)) => v,
                other => panic!("Expected validation error, got {:?}", other.err()),
            };

            let fields: Vec<(&str, &FieldErrorKind)> = v
                .errors()
                .iter()
                .map(|e| (e.field.as_str(), &e.kind))
                .collect();
            assert_eq!(
                fields,
                vec![
                    (
                        "port",
                        &FieldErrorKind::InvalidType {
                            expected: "an integer"
                        }
                    ),
                    (
                        "debug",
                        &FieldErrorKind::InvalidType {
                            expected: "a boolean"
                        }
                    ),
                    ("api_key", &FieldErrorKind::Missing),
                ]
            );
            assert!(v.to_string().starts_with("3 validation errors for Service\n"));
        },
    );
}

#[test]
#[serial]
fn test_validation_error_does_not_echo_values() {
    let _lock = env_lock().lock().unwrap();

    with_service_env(&[("SVC_TEST_PORT", "hunter2-port")], || {
        let err = Service::load().unwrap_err();
        assert!(!err.to_string().contains("hunter2"));
    });
}

#[test]
#[serial]
fn test_invalid_json_for_structured_field_names_source() {
    let _lock = env_lock().lock().unwrap();

    with_service_env(
        &[("SVC_TEST_API_KEY", "k"), ("SVC_TEST_LABELS", "{team: platform")],
        || {
            let err = Service::load().unwrap_err();
            assert!(matches!(
                err,
                SettingsError::ParseValue { ref name, .. } if name == "svc_test_labels"
            ));
        },
    );
}

#[test]
#[serial]
fn test_resolver_overrides_through_settings_trait() {
    let _lock = env_lock().lock().unwrap();

    with_service_env(&[("SVC_TEST_API_KEY", "from-env")], || {
        let service = Service::resolver()
            .with_value("api_key", "from-init")
            .with_value("nickname", json!(null))
            .build()
            .unwrap();
        assert_eq!(service.api_key.expose_secret(), "from-init");
        assert!(service.nickname.is_none());
    });
}

#[test]
#[serial]
fn test_undeclared_constructor_value_is_rejected() {
    let _lock = env_lock().lock().unwrap();
    let fixtures = Fixtures::new();

    with_clean_env(&[], || {
        let err = resolver(two_field_schema("SettingsENVs").env_file(&fixtures.missing_env))
            .with_values([("field1", "x"), ("field3", "y")])
            .build()
            .unwrap_err();

        let SettingsError::Validation(v) = err else {
            panic!("Expected validation error");
        };
        assert_eq!(v.errors().len(), 1);
        assert_eq!(v.errors()[0].field, "field3");
        assert_eq!(v.errors()[0].kind, FieldErrorKind::ExtraForbidden);
        assert!(v.to_string().contains("extra fields not permitted"));
    });
}

#[test]
#[serial]
fn test_missing_fields_with_dotenv() {
    let _lock = env_lock().lock().unwrap();
    let fixtures = Fixtures::new();

    #[derive(Debug, Deserialize)]
    struct DotEnvMissingFields {
        test_prefix_field1: String,
        field_missing: String,
    }

    let schema = Schema::new("SettingsDotEnvMissingFields")
        .env_file(&fixtures.test_env)
        .field(FieldDescriptor::string("test_prefix_field1"))
        .field(FieldDescriptor::string("field_missing"));

    with_clean_env(&[], || {
        let err = SettingsResolver::<DotEnvMissingFields>::with_schema(schema.clone())
            .build()
            .unwrap_err();
        let SettingsError::Validation(v) = err else {
            panic!("Expected validation error");
        };
        assert_eq!(v.missing_fields(), vec!["field_missing"]);
    });

    with_clean_env(&[("FIELD_MISSING", "value_from_environment")], || {
        let settings = SettingsResolver::<DotEnvMissingFields>::with_schema(schema.clone())
            .build()
            .unwrap();
        assert_eq!(settings.test_prefix_field1, "value1_from_test.env-file");
        assert_eq!(settings.field_missing, "value_from_environment");
    });
}

#[test]
#[serial]
fn test_structured_field_deep_merges_across_sources() {
    let _lock = env_lock().lock().unwrap();
    let fixtures = Fixtures::new();
    let vault = FakeVault::new().with_store(MemorySecretStore::new(DEFAULT_VAULT).with_secret(
        "app-database",
        r#"{"host": "vault-db", "port": 5432, "tls": {"verify": true}}"#,
    ));

    #[derive(Debug, Deserialize, PartialEq)]
    struct Tls {
        verify: bool,
        ca: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    struct Database {
        host: String,
        port: u16,
        tls: Tls,
    }

    #[derive(Debug, Deserialize)]
    struct App {
        database: Database,
    }

    with_clean_env(&[], || {
        temp_env::with_var(
            "APP_DATABASE",
            Some(r#"{"host": "env-db", "tls": {"ca": "/etc/ca.pem"}}"#),
            || {
                let app = SettingsResolver::<App>::with_schema(
                    Schema::new("App")
                        .env_prefix("app_")
                        .env_file(&fixtures.missing_env)
                        .vault_url(DEFAULT_VAULT)
                        .field(FieldDescriptor::structured("database")),
                )
                .with_client_factory(vault.factory())
                .build()
                .unwrap();

                assert_eq!(app.database.host, "env-db");
                assert_eq!(app.database.port, 5432);
                assert_eq!(
                    app.database.tls,
                    Tls {
                        verify: true,
                        ca: Some("/etc/ca.pem".to_string())
                    }
                );
            },
        );
    });
}
