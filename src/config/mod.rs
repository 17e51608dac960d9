//! Configuration module for ledgerpack
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (LEDGERPACK_*)
//! 3. Project config (./ledgerpack.toml)
//! 4. User config (<config dir>/ledgerpack/config.toml)
//! 5. Built-in defaults (lowest priority)

mod env_validator;
mod loader;
mod types;

pub use env_validator::{levenshtein, EnvVarValidator};
pub use loader::{
    with_env_overrides, ConfigError, ConfigWarning, LoadedConfig, ENV_ALLOW_DRAFTS,
    ENV_LOG_FORMAT, ENV_SETS_ROOT, PROJECT_CONFIG_FILE,
};
pub use types::{
    Config, GuardsConfig, LogFormat, LoggingConfig, SetsConfig, DEFAULT_SETS_ROOT,
};
