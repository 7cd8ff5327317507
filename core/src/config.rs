//! Configuration
//!
//! Sources, lowest priority first:
//! 1. built-in defaults
//! 2. a TOML file: `CCO_CONFIG_PATH` if set, else `cco.toml` in the working
//!    directory when present
//! 3. `CCO_*` environment variables (`CCO_MISUSE`, `CCO_LOG_FILTER`), after
//!    a `.env` file is loaded if one exists

use serde::Deserialize;
use std::path::Path;

/// Default config file name, searched in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "cco";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "CCO";

/// What a handle does when its caller breaks the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MisusePolicy {
    /// Fail fast with the usage error's message
    Panic,
    /// Return the usage error to the caller
    Report,
}

impl MisusePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            MisusePolicy::Panic => "panic",
            MisusePolicy::Report => "report",
        }
    }
}

impl Default for MisusePolicy {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            MisusePolicy::Panic
        } else {
            MisusePolicy::Report
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Policy applied to handles created without an explicit one
    pub misuse: MisusePolicy,

    /// `tracing_subscriber::EnvFilter` directives used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            misuse: MisusePolicy::default(),
            log_filter: "warn".to_string(),
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder {
            config: Config::default(),
        }
    }

    /// Load from the default file and environment
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let _ = dotenvy::dotenv();
        let path = std::env::var(format!("{ENV_PREFIX}_CONFIG_PATH")).ok();
        Self::load_from(path.as_deref().map(Path::new))
    }

    /// Load with an explicit config file, which must exist
    pub fn load_from(path: Option<&Path>) -> Result<Self, ::config::ConfigError> {
        let defaults = Config::default();
        let file = match path {
            Some(path) => ::config::File::from(path).required(true),
            None => ::config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        ::config::Config::builder()
            .set_default("misuse", defaults.misuse.as_str())?
            .set_default("log_filter", defaults.log_filter)?
            .add_source(file)
            .add_source(::config::Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()
    }

    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }
}

/// Programmatic overrides on top of the defaults
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn misuse(mut self, policy: MisusePolicy) -> Self {
        self.config.misuse = policy;
        self
    }

    pub fn log_filter(mut self, filter: impl Into<String>) -> Self {
        self.config.log_filter = filter.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
