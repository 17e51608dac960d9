//! Pin File Store
//!
//! Implements the PinStore port with an `APPROVED_FINGERPRINT` file next to
//! the set's root descriptor. The file holds the hex digest and a newline.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::domain::ports::{PinStore, PinStoreError};
use crate::domain::value_objects::Fingerprint;

#[derive(Debug, Clone, Copy, Default)]
pub struct FsPinStore;

impl FsPinStore {
    pub fn new() -> Self {
        Self
    }
}

impl PinStore for FsPinStore {
    fn read_pin(&self, set_dir: &Path) -> Result<Option<String>, PinStoreError> {
        let path = self.pin_path(set_dir);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(PinStoreError { path, source }),
        }
    }

    fn write_pin(&self, set_dir: &Path, fingerprint: &Fingerprint) -> Result<PathBuf, PinStoreError> {
        let path = self.pin_path(set_dir);
        fs::write(&path, format!("{}\n", fingerprint)).map_err(|source| PinStoreError {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), fingerprint = fingerprint.short(), "wrote pin file");
        Ok(path)
    }

    fn remove_pin(&self, set_dir: &Path) -> Result<bool, PinStoreError> {
        let path = self.pin_path(set_dir);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(PinStoreError { path, source }),
        }
    }
}
