//! Loader for docsearch configuration with YAML + environment overlays.
//!
//! Precedence, lowest to highest: built-in defaults, YAML files in the order
//! they were attached, then `DOCSEARCH__`-prefixed environment variables
//! (`DOCSEARCH__ENDPOINT`, `DOCSEARCH__SELECTORS__RESULT`, ...). Command-line
//! flags are applied on top by the binary. String values may reference
//! `${VAR}` placeholders, which are expanded after merging.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const ENV_PREFIX: &str = "DOCSEARCH";

/// The search endpoint used when nothing else is configured. Every fixed
/// query parameter is already present; the term is appended after `query=`.
pub const DEFAULT_ENDPOINT: &str =
    "https://search.usa.gov/search?affiliate=cloud.gov&utf8=%E2%9C%93&query=";
/// Marker for one search-result block on the results page.
pub const DEFAULT_RESULT_SELECTOR: &str = ".content-block-item.result";
/// The link inside a result block.
pub const DEFAULT_LINK_SELECTOR: &str = "a";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DocSearchConfig {
    pub endpoint: String,
    /// Kept as text so an unknown value is reported as a format error by the
    /// caller rather than as a config parse failure.
    pub format: String,
    pub timeout_secs: u64,
    pub selectors: SelectorsConfig,
    /// Platform identifier -> argv prefix; the URL is appended as the last
    /// argument. Merged over the built-in launch table.
    pub launchers: HashMap<String, Vec<String>>,
    pub logging: LoggingConfig,
}

impl Default for DocSearchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            format: "human".to_string(),
            timeout_secs: 30,
            selectors: SelectorsConfig::default(),
            launchers: HashMap::new(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SelectorsConfig {
    pub result: String,
    pub link: String,
}

impl Default for SelectorsConfig {
    fn default() -> Self {
        Self {
            result: DEFAULT_RESULT_SELECTOR.to_string(),
            link: DEFAULT_LINK_SELECTOR.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub dir: Option<String>,
    pub filter: String,
    pub stderr: bool,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: None,
            filter: "info".to_string(),
            stderr: false,
            json: false,
        }
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
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
pub struct DocSearchConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for DocSearchConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DocSearchConfigLoader {
    /// Start from the built-in defaults; environment overrides are applied
    /// last, at [`load`](Self::load) time.
    ///
    /// ```
    /// use docsearch_config::{DocSearchConfigLoader, DEFAULT_ENDPOINT};
    ///
    /// let config = DocSearchConfigLoader::new()
    ///     .with_yaml_str("format: json")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.format, "json");
    /// assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a YAML/TOML/JSON file that must exist; the `config` crate
    /// infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that is silently skipped when absent.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources into strongly typed config.
    pub fn load(self) -> Result<DocSearchConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))
    }
}
