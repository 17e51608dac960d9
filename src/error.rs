//! Error types for ledgerpack
//!
//! Each layer has its own `thiserror` enum; [`LedgerPackError`] unifies them
//! at the entry point. Only the binary uses `anyhow`.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

use crate::config::ConfigError;
use crate::domain::ports::{AssembleError, PinStoreError};
use crate::domain::services::{CompileError, IntegrityError, IntegrityMismatch, ValidationFailure};

/// Result type alias for ledgerpack operations
pub type PackResult<T> = Result<T, LedgerPackError>;

#[derive(Error, Debug)]
pub enum LedgerPackError {
    /// No set governs the requested entity and date.
    #[error("no configuration set for legal entity '{legal_entity}' on {as_of} under {root}\n  → Fix: publish a set whose scope and dates cover the request")]
    NoActiveSet {
        legal_entity: String,
        as_of: NaiveDate,
        root: PathBuf,
    },

    #[error(transparent)]
    Assemble(#[from] AssembleError),

    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    /// Internal consistency failure while compiling.
    #[error("compilation failed: {0}")]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Integrity(#[from] IntegrityMismatch),

    #[error(transparent)]
    PinStore(#[from] PinStoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<IntegrityError> for LedgerPackError {
    fn from(err: IntegrityError) -> Self {
        match err {
            IntegrityError::Mismatch(mismatch) => LedgerPackError::Integrity(mismatch),
            IntegrityError::Store(store) => LedgerPackError::PinStore(store),
        }
    }
}

impl LedgerPackError {
    /// Recoverable by adding or publishing configuration.
    pub fn is_not_found(&self) -> bool {
        match self {
            LedgerPackError::NoActiveSet { .. } => true,
            LedgerPackError::Assemble(err) => err.is_not_found(),
            _ => false,
        }
    }

    /// Stable machine-readable category, used in JSON output.
    pub fn kind(&self) -> &'static str {
        match self {
            LedgerPackError::NoActiveSet { .. } => "not_found",
            LedgerPackError::Assemble(AssembleError::NotFound { .. }) => "not_found",
            LedgerPackError::Assemble(AssembleError::Structural { .. }) => "structural",
            LedgerPackError::Assemble(AssembleError::Io { .. }) => "io",
            LedgerPackError::Validation(_) => "validation",
            LedgerPackError::Compile(_) => "compile",
            LedgerPackError::Integrity(_) => "integrity",
            LedgerPackError::PinStore(_) => "io",
            LedgerPackError::Config(_) => "config",
        }
    }

    /// Individual validation errors, when this is a validation failure.
    pub fn validation_errors(&self) -> &[String] {
        match self {
            LedgerPackError::Validation(failure) => &failure.errors,
            _ => &[],
        }
    }
}
