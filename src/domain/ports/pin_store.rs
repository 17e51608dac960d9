//! PinStore port
//!
//! Reads and writes the approved fingerprint of a configuration set.

use std::path::{Path, PathBuf};

use crate::domain::value_objects::Fingerprint;

/// Name of the pin file, next to the set's root descriptor.
pub const PIN_FILE_NAME: &str = "APPROVED_FINGERPRINT";

pub trait PinStore: Send + Sync {
    fn pin_path(&self, set_dir: &Path) -> PathBuf {
        set_dir.join(PIN_FILE_NAME)
    }

    /// Pinned value, or `None` when the set is not pinned.
    fn read_pin(&self, set_dir: &Path) -> Result<Option<String>, PinStoreError>;

    fn write_pin(&self, set_dir: &Path, fingerprint: &Fingerprint) -> Result<PathBuf, PinStoreError>;

    /// Returns whether a pin existed.
    fn remove_pin(&self, set_dir: &Path) -> Result<bool, PinStoreError>;
}

#[derive(Debug, thiserror::Error)]
#[error("pin file {path}: {source}")]
pub struct PinStoreError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}
