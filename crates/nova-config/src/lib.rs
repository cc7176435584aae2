//! Configuration for Nova's reflection engine, loaded from TOML.
//!
//! ```toml
//! [logging]
//! level = "debug"   # or any `EnvFilter` directive string
//! json = false
//!
//! [store]
//! preload = ["java.lang.String"]
//! max_array_dimensions = 255
//! ```

use std::path::{Path, PathBuf};
use std::sync::Once;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::prelude::*;

mod schema;

pub use schema::json_schema;

/// Hard JVM limit on the number of dimensions of an array type (JVMS 4.3.2).
pub const JVM_MAX_ARRAY_DIMENSIONS: u8 = 255;

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
#[schemars(deny_unknown_fields)]
pub struct ReflectConfig {
    /// Global logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Type descriptor store settings.
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
#[schemars(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level for all Nova crates.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Emit logs in JSON format.
    #[serde(default)]
    pub json: bool,

    /// Mirror logs to stderr.
    #[serde(default = "LoggingConfig::default_stderr")]
    pub stderr: bool,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_owned()
    }

    fn default_stderr() -> bool {
        true
    }

    pub(crate) fn normalize_level_directives(input: &str) -> String {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::default_level();
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "trace" => "trace".to_owned(),
            "debug" => "debug".to_owned(),
            "info" => "info".to_owned(),
            "warn" | "warning" => "warn".to_owned(),
            "error" => "error".to_owned(),
            // Anything else is treated as an `EnvFilter` directive string.
            _ => trimmed.to_owned(),
        }
    }

    fn config_env_filter(&self) -> tracing_subscriber::EnvFilter {
        let directives = Self::normalize_level_directives(&self.level);
        tracing_subscriber::EnvFilter::try_new(directives).unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::default()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
        })
    }

    /// Create the effective `EnvFilter`.
    ///
    /// If `RUST_LOG` is set, it is merged into the configured directives.
    pub fn env_filter(&self) -> tracing_subscriber::EnvFilter {
        let env_directives = std::env::var("RUST_LOG")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        let config_directives = Self::normalize_level_directives(&self.level);

        match env_directives {
            Some(env_directives) => {
                let combined = format!("{config_directives},{env_directives}");
                tracing_subscriber::EnvFilter::try_new(combined)
                    .or_else(|_| tracing_subscriber::EnvFilter::try_new(env_directives))
                    .unwrap_or_else(|_| self.config_env_filter())
            }
            None => self.config_env_filter(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
            stderr: Self::default_stderr(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
#[schemars(deny_unknown_fields)]
pub struct StoreConfig {
    /// Classes resolved eagerly when a store is built (binary names).
    #[serde(default)]
    pub preload: Vec<String>,

    /// Largest array dimension count the store will synthesize.
    #[serde(default = "StoreConfig::default_max_array_dimensions")]
    #[schemars(range(min = 1, max = 255))]
    pub max_array_dimensions: u8,
}

impl StoreConfig {
    fn default_max_array_dimensions() -> u8 {
        JVM_MAX_ARRAY_DIMENSIONS
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            preload: Vec::new(),
            max_array_dimensions: Self::default_max_array_dimensions(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl ReflectConfig {
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load_from_str(&text)
    }

    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.store.max_array_dimensions == 0 {
            return Err(ConfigError::Invalid(
                "store.max_array_dimensions must be at least 1".to_owned(),
            ));
        }
        if let Some(bad) = self
            .store
            .preload
            .iter()
            .find(|name| name.trim().is_empty())
        {
            return Err(ConfigError::Invalid(format!(
                "store.preload contains an empty class name: {bad:?}"
            )));
        }
        Ok(())
    }
}

static TRACING_INIT: Once = Once::new();

/// Initializes structured `tracing` logging on stderr.
///
/// Safe to call multiple times; only the first call installs a global subscriber. Nothing is
/// installed when `config.stderr` is off.
pub fn init_tracing(config: &LoggingConfig) {
    TRACING_INIT.call_once(|| {
        if !config.stderr {
            return;
        }
        let filter = config.env_filter();

        let layer: Box<dyn tracing_subscriber::Layer<_> + Send + Sync> = if config.json {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .boxed()
        } else {
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .boxed()
        };

        let subscriber = tracing_subscriber::registry().with(filter).with(layer);
        if tracing::subscriber::set_global_default(subscriber).is_err() {
            tracing::debug!("global tracing subscriber already installed");
        }
    });
}
