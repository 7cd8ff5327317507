//! Initialization
//!
//! Optional process-wide setup: loads configuration, installs a `tracing`
//! subscriber, and records the configuration that new handles consult for
//! their misuse policy. Handles work without it, falling back to
//! [`Config::default`].
//!
//! # Example
//!
//! ```no_run
//! use cco_core::config::MisusePolicy;
//! use cco_core::init::InitBuilder;
//!
//! InitBuilder::new()
//!     .config_path("cco.toml")
//!     .misuse(MisusePolicy::Report)
//!     .init()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, MisusePolicy};

/// Global initialization state
static INIT_STATE: OnceLock<InitState> = OnceLock::new();

#[derive(Debug)]
struct InitState {
    config: Config,
}

/// Options for [`initialize`]
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Config file path (overrides `CCO_CONFIG_PATH` and the default search)
    pub config_path: Option<PathBuf>,

    /// Misuse policy (overrides every config source)
    pub misuse: Option<MisusePolicy>,

    /// Whether to install a global `tracing` subscriber
    pub install_logging: bool,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            config_path: None,
            misuse: None,
            install_logging: true,
        }
    }
}

/// Builder for constructing InitOptions
pub struct InitBuilder {
    options: InitOptions,
}

impl InitBuilder {
    pub fn new() -> Self {
        Self {
            options: InitOptions::default(),
        }
    }

    pub fn config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn misuse(mut self, policy: MisusePolicy) -> Self {
        self.options.misuse = Some(policy);
        self
    }

    pub fn install_logging(mut self, install: bool) -> Self {
        self.options.install_logging = install;
        self
    }

    pub fn init(self) -> Result<()> {
        initialize(self.options)
    }
}

impl Default for InitBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Initialize with the given options
///
/// Calling this function multiple times is safe - subsequent calls are no-ops.
pub fn initialize(options: InitOptions) -> Result<()> {
    if INIT_STATE.get().is_some() {
        return Ok(());
    }

    let mut config = match &options.config_path {
        Some(path) => Config::load_from(Some(path.as_path()))
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::load().context("Failed to load configuration")?,
    };
    if let Some(policy) = options.misuse {
        config.misuse = policy;
    }

    if options.install_logging {
        install_logging(&config.log_filter)?;
    }

    tracing::debug!(misuse = config.misuse.as_str(), "coroutine runtime initialized");

    INIT_STATE
        .set(InitState { config })
        .map_err(|_| anyhow!("Initialization already completed"))?;

    Ok(())
}

/// Install a fmt subscriber; `RUST_LOG` wins over `default_filter`
fn install_logging(default_filter: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => parse_filter(default_filter)?,
    };

    // Another subscriber may already own the global slot (e.g. the host app).
    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_err()
    {
        tracing::debug!("global tracing subscriber already installed");
    }
    Ok(())
}

fn parse_filter(directives: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directives).with_context(|| format!("Invalid log filter `{directives}`"))
}

pub fn is_initialized() -> bool {
    INIT_STATE.get().is_some()
}

/// The initialized configuration, or the defaults before [`initialize`]
pub fn current_config() -> Config {
    INIT_STATE
        .get()
        .map(|state| state.config.clone())
        .unwrap_or_default()
}
