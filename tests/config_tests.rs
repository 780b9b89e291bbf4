//! Integration tests for configuration loading and runtime reconfiguration

mod common;

use formsift::prelude::*;
use serde_json::json;
use std::io::Write;
use std::sync::Arc;
use std::thread;

fn write_yaml(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_config_from_yaml_file() {
    let file = write_yaml(
        r#"
raiseOnMissingRequired: false
passwordCost: 2
passwordAlgorithm: argon2id
activeLocale: CA
"#,
    );

    let config = Config::from_yaml_file(file.path().to_str().unwrap()).unwrap();
    assert!(!config.raise_on_missing_required);
    assert_eq!(config.password_cost, 2);
    assert_eq!(config.password_algorithm, PasswordAlgorithm::Argon2id);

    let sift = FormSift::with_config(config).unwrap();
    assert_eq!(sift.snapshot().registry().locale_code(), "CA");

    let hash = sift.apply("password_hash", json!("secret")).unwrap();
    assert!(hash.as_str().unwrap().starts_with("$argon2id$"));
}

#[test]
fn test_missing_yaml_file() {
    assert!(Config::from_yaml_file("/nonexistent/formsift.yaml").is_err());
}

#[test]
fn test_yaml_file_with_unknown_key() {
    let file = write_yaml("strictMode: true\n");
    let err = Config::from_yaml_file(file.path().to_str().unwrap()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "'strictMode' is not a valid configuration option"
    );
    assert_eq!(
        err.downcast_ref::<ConfigError>(),
        Some(&ConfigError::UnknownConfigKey {
            key: "strictMode".to_string()
        })
    );
}

#[test]
fn test_with_config_rejects_unknown_locale() {
    let config = Config {
        active_locale: "DE".to_string(),
        ..Config::default()
    };
    assert_eq!(
        FormSift::with_config(config).unwrap_err(),
        ConfigError::UnknownLocale {
            code: "DE".to_string()
        }
    );
}

#[test]
fn test_with_config_rejects_invalid_cost() {
    let config = Config {
        password_cost: 40,
        ..Config::default()
    };
    let err = FormSift::with_config(config).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "passwordCost"));
}

#[test]
fn test_configure_all_is_atomic() {
    let sift = FormSift::new();

    let err = sift
        .configure_all(
            json!({ "raiseOnMissingRequired": false, "passwordAlgorithm": "md5" })
                .as_object()
                .unwrap(),
        )
        .unwrap_err();

    assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "passwordAlgorithm"));
    assert!(sift.config().raise_on_missing_required);
}

#[test]
fn test_config_error_codes() {
    let sift = FormSift::new();
    let err: FormError = sift.configure("locale", json!("US")).unwrap_err().into();

    assert_eq!(err.error_code(), "UNKNOWN_CONFIG_KEY");
    assert_eq!(err.to_string(), "'locale' is not a valid configuration option");
}

#[test]
fn test_concurrent_reconfiguration_and_filtering() {
    common::init_tracing();
    let sift = Arc::new(FormSift::new());

    let writers: Vec<_> = (0..4)
        .map(|i| {
            let sift = Arc::clone(&sift);
            thread::spawn(move || {
                let code = if i % 2 == 0 { "CA" } else { "US" };
                for _ in 0..50 {
                    sift.configure("activeLocale", json!(code)).unwrap();
                }
            })
        })
        .collect();

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let sift = Arc::clone(&sift);
            thread::spawn(move || {
                for _ in 0..50 {
                    // a snapshot is either wholly US or wholly CA
                    let snapshot = sift.snapshot();
                    let executor = snapshot.executor();
                    match snapshot.registry().locale_code() {
                        "US" => {
                            assert!(executor.apply_one("us_state_abbr", json!("ny")).is_ok());
                            assert!(executor.apply_one("ca_province_abbr", json!("ON")).is_err());
                        }
                        "CA" => {
                            assert!(executor.apply_one("ca_province_abbr", json!("on")).is_ok());
                            assert!(executor.apply_one("us_state_abbr", json!("NY")).is_err());
                        }
                        other => panic!("unexpected locale {other}"),
                    }
                }
            })
        })
        .collect();

    for handle in writers.into_iter().chain(readers) {
        handle.join().unwrap();
    }
}
