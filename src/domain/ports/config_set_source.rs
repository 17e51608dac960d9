//! ConfigSetSource port
//!
//! Lists configuration sets under a root and assembles one of them.

use std::path::{Path, PathBuf};

use crate::domain::entities::{ConfigurationSet, SetDescriptor};

pub trait ConfigSetSource: Send + Sync {
    /// Headers of every readable set under `root`.
    fn descriptors(&self, root: &Path) -> Result<Vec<SetDescriptor>, AssembleError>;

    /// Parse and merge every fragment of the set in `dir`.
    fn assemble(&self, dir: &Path) -> Result<ConfigurationSet, AssembleError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AssembleError {
    #[error("not found: {path}\n  → Fix: check the configuration directory")]
    NotFound { path: PathBuf },

    #[error("{file}:{}: {message}", .line.map(|l| l.to_string()).unwrap_or_else(|| "?".into()))]
    Structural {
        file: PathBuf,
        line: Option<usize>,
        message: String,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AssembleError {
    pub fn structural(file: impl Into<PathBuf>, line: Option<usize>, message: impl Into<String>) -> Self {
        AssembleError::Structural {
            file: file.into(),
            line,
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AssembleError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_error_names_file_and_line() {
        let err = AssembleError::structural("sets/acme/root.yaml", Some(7), "invalid type");
        assert_eq!(err.to_string(), "sets/acme/root.yaml:7: invalid type");

        let err = AssembleError::structural("root.yaml", None, "duplicate key");
        assert_eq!(err.to_string(), "root.yaml:?: duplicate key");
    }

    #[test]
    fn not_found_is_recognised() {
        let err = AssembleError::NotFound {
            path: PathBuf::from("sets"),
        };
        assert!(err.is_not_found());
        assert!(err.to_string().starts_with("not found: sets"));
    }
}
