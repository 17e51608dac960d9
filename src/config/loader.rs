//! Configuration loading

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use super::env_validator::{levenshtein, EnvVarValidator};
use super::types::{Config, LogFormat};

/// Project configuration file, looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "ledgerpack.toml";

pub const ENV_SETS_ROOT: &str = "LEDGERPACK_SETS_ROOT";
pub const ENV_ALLOW_DRAFTS: &str = "LEDGERPACK_ALLOW_DRAFTS";
pub const ENV_LOG_FORMAT: &str = "LEDGERPACK_LOG_FORMAT";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration in {path}: {message}\n  → Fix: see `ledgerpack.toml` keys [sets], [logging], [guards]")]
    Parse { path: PathBuf, message: String },
}

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown key '{}' in {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{}'?)", suggestion)?;
        }
        Ok(())
    }
}

/// Result of configuration discovery.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub config: Config,
    /// File the configuration came from; `None` for built-in defaults.
    pub source: Option<PathBuf>,
    pub warnings: Vec<ConfigWarning>,
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> Result<(Config, Vec<ConfigWarning>), ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
                file: path.to_path_buf(),
                key,
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Project config first, then the user config directory, then defaults.
/// A file that exists but does not parse is an error, not a fallback.
pub fn discover(project_root: &Path) -> Result<LoadedConfig, ConfigError> {
    let candidates = [
        Some(project_root.join(PROJECT_CONFIG_FILE)),
        dirs::config_dir().map(|d| d.join("ledgerpack").join("config.toml")),
    ];

    for path in candidates.into_iter().flatten() {
        if !path.is_file() {
            continue;
        }
        let (config, warnings) = load_with_warnings(&path)?;
        tracing::debug!(path = %path.display(), warnings = warnings.len(), "loaded configuration");
        return Ok(LoadedConfig {
            config: with_env_overrides(config, |name| std::env::var(name).ok()),
            source: Some(path),
            warnings,
        });
    }

    Ok(LoadedConfig {
        config: with_env_overrides(Config::default(), |name| std::env::var(name).ok()),
        ..LoadedConfig::default()
    })
}

/// Apply `LEDGERPACK_*` overrides read through `lookup`.
pub fn with_env_overrides<F>(mut config: Config, lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(root) = lookup(ENV_SETS_ROOT).filter(|v| !v.trim().is_empty()) {
        config.sets.root = Some(PathBuf::from(root.trim()));
    }

    if let Some(value) = lookup(ENV_ALLOW_DRAFTS) {
        config.sets.allow_drafts = EnvVarValidator::new(ENV_ALLOW_DRAFTS, &["true", "false"]).parse(
            &value,
            parse_bool,
            config.sets.allow_drafts,
        );
    }

    if let Some(value) = lookup(ENV_LOG_FORMAT) {
        config.logging.format = EnvVarValidator::new(ENV_LOG_FORMAT, &LogFormat::VALUES).parse(
            &value,
            |s| s.parse().ok(),
            config.logging.format,
        );
    }

    config
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.contains(needle))
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "sets",
        "root",
        "allow_drafts",
        "logging",
        "format",
        "filter",
        "guards",
        "identifiers",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}
