//! Configuration type definitions

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::guard::GuardVocabulary;

use super::loader::{self, ConfigError, ConfigWarning, LoadedConfig};

/// Default directory holding configuration sets, relative to the working
/// directory.
pub const DEFAULT_SETS_ROOT: &str = "sets";

/// Where configuration sets live and which statuses may be selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SetsConfig {
    #[serde(default)]
    pub root: Option<PathBuf>,

    /// Let DRAFT sets be selected as active (development only).
    #[serde(default)]
    pub allow_drafts: bool,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Pretty on a terminal, JSON otherwise.
    #[default]
    Auto,
    Pretty,
    Json,
}

impl LogFormat {
    pub const VALUES: [&'static str; 3] = ["auto", "pretty", "json"];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Auto => "auto",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(LogFormat::Auto),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,

    /// `EnvFilter` directives used when `LEDGERPACK_LOG` is unset.
    #[serde(default)]
    pub filter: Option<String>,
}

/// Extra identifiers guards may reference, on top of the built-in event
/// attributes. An entry ending in `.*` allows one member level below it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GuardsConfig {
    #[serde(default)]
    pub identifiers: Vec<String>,
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub sets: SetsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub guards: GuardsConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> Result<(Self, Vec<ConfigWarning>), ConfigError> {
        loader::load_with_warnings(path)
    }

    /// Project config, then user config, then defaults; env overrides last.
    pub fn discover(project_root: &Path) -> Result<LoadedConfig, ConfigError> {
        loader::discover(project_root)
    }

    /// Apply environment variable overrides (LEDGERPACK_* prefix)
    pub fn with_env_overrides(self) -> Self {
        loader::with_env_overrides(self, |name| std::env::var(name).ok())
    }

    /// Directory holding configuration sets.
    pub fn sets_root(&self) -> PathBuf {
        self.sets
            .root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETS_ROOT))
    }

    /// Identifiers guards may reference.
    pub fn guard_vocabulary(&self) -> GuardVocabulary {
        GuardVocabulary::default().with_identifiers(self.guards.identifiers.iter().map(String::as_str))
    }
}
