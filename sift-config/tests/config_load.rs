use serial_test::serial;
use sift_common::SiftError;
use sift_common::observability::LogFormat;
use sift_config::SiftConfigLoader;
use std::{fs, path::PathBuf};
use tempfile::TempDir;

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

#[test]
#[serial]
fn test_config_load() {
    let tmp = TempDir::new().unwrap();

    let file_yaml = r#"
version: 0.1
browser:
  webdriver_url: "http://${SIFT_TEST_DRIVER_HOST}:9515"
  headless: false
  page_load_timeout_secs: 45
  extra_args:
    - "--lang=en-US"
chunking:
  max_length: 2048
logging:
  level: debug
  format: json
  stderr: false
  "#;
    let p = write_yaml(&tmp, "sift.yaml", file_yaml);

    let config = temp_env::with_var("SIFT_TEST_DRIVER_HOST", Some("chrome"), || {
        SiftConfigLoader::new()
            .with_file(&p)
            .load()
            .expect("load sift config")
    });

    assert_eq!(config.version.as_deref(), Some("0.1"));
    assert_eq!(config.browser.webdriver_url, "http://chrome:9515");
    assert!(!config.browser.headless);
    assert_eq!(config.browser.page_load_timeout_secs, 45);
    assert_eq!(config.browser.extra_args, vec!["--lang=en-US".to_string()]);
    assert_eq!(config.chunking.max_length, 2048);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, LogFormat::Json);
    assert!(!config.logging.stderr);
}

#[test]
#[serial]
fn environment_overrides_file_values() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(
        &tmp,
        "sift.yaml",
        "chunking:\n  max_length: 2048\nbrowser:\n  headless: true\n",
    );

    let config = temp_env::with_vars(
        [
            ("SIFT_CHUNKING__MAX_LENGTH", Some("512")),
            ("SIFT_BROWSER__HEADLESS", Some("false")),
        ],
        || SiftConfigLoader::new().with_file(&p).load(),
    )
    .expect("load with env overlay");

    assert_eq!(config.chunking.max_length, 512);
    assert!(!config.browser.headless);
}

#[test]
#[serial]
fn missing_optional_file_falls_back_to_defaults() {
    let tmp = TempDir::new().unwrap();
    let config = SiftConfigLoader::new()
        .with_optional_file(tmp.path().join("absent.yaml"))
        .load()
        .expect("optional file may be absent");

    assert_eq!(config.chunking.max_length, 6000);
    assert_eq!(config.browser.webdriver_url, "http://localhost:9515");
    assert_eq!(config.logging.format, LogFormat::Text);
}

#[test]
#[serial]
fn missing_required_file_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let result = SiftConfigLoader::new()
        .with_file(tmp.path().join("absent.yaml"))
        .load();
    assert!(matches!(result, Err(SiftError::Config(ref msg)) if msg.contains("absent")));
}

#[test]
#[serial]
fn zero_max_length_fails_to_load() {
    let err = SiftConfigLoader::new()
        .with_yaml_str("chunking:\n  max_length: 0\n")
        .load()
        .expect_err("max_length 0 is invalid");
    assert!(matches!(err, SiftError::Config(_)));
    assert!(err.to_string().contains("max_length"));
}

#[test]
#[serial]
fn malformed_yaml_is_a_config_error() {
    let err = SiftConfigLoader::new()
        .with_yaml_str("chunking: [unterminated\n")
        .load()
        .expect_err("broken yaml");
    assert!(matches!(err, SiftError::Config(_)));
}

#[test]
#[serial]
fn unparseable_env_value_is_a_config_error() {
    let result = temp_env::with_var("SIFT_CHUNKING__MAX_LENGTH", Some("lots"), || {
        SiftConfigLoader::new().load()
    });
    assert!(matches!(result, Err(SiftError::Config(_))));
}
