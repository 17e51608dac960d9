//! Integrity guard
//!
//! A set with an `APPROVED_FINGERPRINT` file is pinned: its compiled
//! fingerprint must equal the pinned value exactly. A set without one is
//! unchecked (draft mode).

use std::path::{Path, PathBuf};

use crate::domain::ports::{PinStore, PinStoreError};
use crate::domain::value_objects::{preview, Fingerprint};

/// Pinned and computed fingerprints disagree. The full values are kept;
/// only the message shortens them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "integrity mismatch for '{config_id}': pinned {} but compiled {} ({pin_path})\n  → Fix: review the change, then re-pin with `ledgerpack pin`",
    preview(.expected),
    preview(.actual)
)]
pub struct IntegrityMismatch {
    pub config_id: String,
    pub expected: String,
    pub actual: String,
    pub pin_path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum IntegrityError {
    #[error(transparent)]
    Mismatch(#[from] IntegrityMismatch),

    #[error(transparent)]
    Store(#[from] PinStoreError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PinStatus {
    /// No pin file; nothing was checked.
    Unpinned,
    Verified { pin_path: PathBuf },
}

pub struct IntegrityGuard<'a> {
    store: &'a dyn PinStore,
}

impl<'a> IntegrityGuard<'a> {
    pub fn new(store: &'a dyn PinStore) -> Self {
        Self { store }
    }

    pub fn verify(
        &self,
        config_id: &str,
        fingerprint: &Fingerprint,
        set_dir: &Path,
    ) -> Result<PinStatus, IntegrityError> {
        let pin_path = self.store.pin_path(set_dir);
        let Some(pinned) = self.store.read_pin(set_dir)? else {
            tracing::debug!(config_id, "no pin file, skipping integrity check");
            return Ok(PinStatus::Unpinned);
        };

        let pinned = pinned.trim_end_matches(|c: char| c == '\n' || c == '\r');
        if fingerprint.matches_str(pinned) {
            tracing::debug!(config_id, fingerprint = fingerprint.short(), "pinned fingerprint verified");
            return Ok(PinStatus::Verified { pin_path });
        }

        let mismatch = IntegrityMismatch {
            config_id: config_id.to_string(),
            expected: pinned.to_string(),
            actual: fingerprint.to_string(),
            pin_path,
        };
        tracing::warn!(
            config_id,
            expected = preview(&mismatch.expected),
            actual = preview(&mismatch.actual),
            "pinned fingerprint mismatch"
        );
        Err(mismatch.into())
    }
}
