//! Loader for Sift configuration with YAML + environment overlays.
//!
//! Sources are merged in the order they are attached, and the `SIFT_`
//! environment overlay is applied last so it wins over any file. Nested keys
//! use `__` as separator: `SIFT_CHUNKING__MAX_LENGTH=4000` overrides
//! `chunking.max_length`. After merging, `${VAR}` placeholders inside string
//! values are expanded from the process environment.
//!
//! ```yaml
//! version: "1"
//! browser:
//!   webdriver_url: "http://localhost:9515"
//!   headless: true
//!   page_load_timeout_secs: 30
//!   extra_args: ["--lang=en-US"]
//! chunking:
//!   max_length: 6000
//! logging:
//!   level: info
//!   format: text
//!   stderr: true
//! ```
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use sift_common::observability::{LogConfig, LogFormat};
use sift_common::{DEFAULT_MAX_LENGTH, SiftError};
use std::path::{Path, PathBuf};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const ENV_PREFIX: &str = "SIFT";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SiftConfig {
    #[serde(default, deserialize_with = "version_string")]
    pub version: Option<String>,
    #[serde(default)]
    pub browser: BrowserSettings,
    #[serde(default)]
    pub chunking: ChunkingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// How the retrieval collaborator reaches and launches the browser.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    pub webdriver_url: String,
    pub headless: bool,
    pub page_load_timeout_secs: u64,
    pub extra_args: Vec<String>,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".into(),
            headless: true,
            page_load_timeout_secs: 30,
            extra_args: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChunkingSettings {
    /// Maximum number of characters per chunk.
    pub max_length: usize,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub format: LogFormat,
    pub dir: Option<PathBuf>,
    pub stderr: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Text,
            dir: None,
            stderr: true,
        }
    }
}

impl LoggingSettings {
    /// Translate into the observability layer's settings for `app_name`.
    pub fn to_log_config(&self, app_name: &'static str) -> LogConfig {
        LogConfig {
            app_name,
            log_dir: self.dir.clone(),
            emit_stderr: self.stderr,
            format: self.format,
            default_filter: self.level.clone(),
        }
    }
}

impl SiftConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.chunking.max_length == 0 {
            return Err(ConfigError::Message(
                "chunking.max_length must be a positive integer".into(),
            ));
        }
        if self.browser.webdriver_url.trim().is_empty() {
            return Err(ConfigError::Message(
                "browser.webdriver_url must not be empty".into(),
            ));
        }
        if self.browser.page_load_timeout_secs == 0 {
            return Err(ConfigError::Message(
                "browser.page_load_timeout_secs must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

// YAML `version: 1` arrives as a number; keep it as text.
fn version_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => break,
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct SiftConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for SiftConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SiftConfigLoader {
    /// Start from built-in defaults; the environment overlay is added by [`load`](Self::load).
    ///
    /// ```
    /// use sift_config::SiftConfigLoader;
    ///
    /// let config = SiftConfigLoader::new().load().expect("defaults are valid");
    /// assert_eq!(config.chunking.max_length, 6000);
    /// assert!(config.browser.headless);
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a file that must exist; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that is skipped when absent, so environment-only setups still load.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet.
    ///
    /// ```
    /// use sift_config::SiftConfigLoader;
    ///
    /// let cfg = SiftConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// version: "test"
    /// chunking:
    ///   max_length: 1200
    /// browser:
    ///   headless: false
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.version.as_deref(), Some("test"));
    /// assert_eq!(cfg.chunking.max_length, 1200);
    /// assert!(!cfg.browser.headless);
    /// assert_eq!(cfg.browser.webdriver_url, "http://localhost:9515");
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Apply the `SIFT_` environment overlay, expand `${VAR}` placeholders and
    /// deserialize into a validated [`SiftConfig`].
    ///
    /// Every failure (missing file, bad YAML, invalid values) is reported as
    /// [`SiftError::Config`].
    pub fn load(self) -> sift_common::Result<SiftConfig> {
        self.build().map_err(|e| SiftError::Config(e.to_string()))
    }

    fn build(self) -> Result<SiftConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: SiftConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;
        typed.validate()?;

        Ok(typed)
    }
}
