//! File System Set Catalog
//!
//! Implements the ConfigSetSource port over a root directory that holds one
//! subdirectory per configuration set.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::entities::{ConfigurationSet, SetDescriptor};
use crate::domain::ports::{AssembleError, ConfigSetSource};
use crate::domain::value_objects::{parse_date, ConfigStatus, Dimension, EffectiveWindow};
use crate::parser::Fragment;

use super::fs_assembler::{FsAssembler, ROOT_DESCRIPTOR};

#[derive(Debug, Clone, Copy, Default)]
pub struct FsSetCatalog {
    assembler: FsAssembler,
}

impl FsSetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn set_dirs(&self, root: &Path) -> Result<Vec<PathBuf>, AssembleError> {
        if !root.is_dir() {
            return Err(AssembleError::NotFound {
                path: root.to_path_buf(),
            });
        }
        let entries = fs::read_dir(root).map_err(|source| AssembleError::Io {
            path: root.to_path_buf(),
            source,
        })?;
        let mut dirs = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| AssembleError::Io {
                path: root.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            let hidden = path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with('.'))
                .unwrap_or(false);
            if !hidden && path.is_dir() && path.join(ROOT_DESCRIPTOR).is_file() {
                dirs.push(path);
            }
        }
        dirs.sort();
        Ok(dirs)
    }
}

impl ConfigSetSource for FsSetCatalog {
    fn descriptors(&self, root: &Path) -> Result<Vec<SetDescriptor>, AssembleError> {
        let mut descriptors = Vec::new();
        for dir in self.set_dirs(root)? {
            let header = match self.assembler.read_root(&dir) {
                Ok(header) => header,
                Err(err) => {
                    tracing::warn!(dir = %dir.display(), error = %err, "skipping unreadable configuration set");
                    continue;
                }
            };
            match describe(&header, &dir) {
                Ok(descriptor) => descriptors.push(descriptor),
                Err(reason) => {
                    tracing::warn!(dir = %dir.display(), %reason, "skipping configuration set with an invalid header");
                }
            }
        }
        tracing::debug!(root = %root.display(), sets = descriptors.len(), "listed configuration sets");
        Ok(descriptors)
    }

    fn assemble(&self, dir: &Path) -> Result<ConfigurationSet, AssembleError> {
        self.assembler.assemble(dir)
    }
}

/// Build a descriptor from a root header. The full validator runs later;
/// this only needs enough to rank the set.
fn describe(header: &Fragment, dir: &Path) -> Result<SetDescriptor, String> {
    let config_id = header
        .config_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or("config_id is missing")?;
    let version = header
        .version
        .and_then(|v| u32::try_from(v).ok())
        .filter(|v| *v >= 1)
        .ok_or("version must be a positive integer")?;
    let status: ConfigStatus = header
        .status
        .as_deref()
        .ok_or("status is missing")?
        .parse()?;

    let scope = header.scope.clone().unwrap_or_default();
    let date = |raw: Option<&str>| -> Result<Option<_>, String> {
        raw.map(|r| parse_date(r).ok_or_else(|| format!("'{}' is not a YYYY-MM-DD date", r)))
            .transpose()
    };
    let window = EffectiveWindow::new(
        date(scope.effective_from.as_deref())?,
        date(scope.effective_to.as_deref())?,
    )
    .ok_or("effective_from is after effective_to")?;

    let mut descriptor = SetDescriptor::new(config_id, version, status, dir).with_window(window);
    descriptor.legal_entity = Dimension::parse(scope.legal_entity.as_deref());
    Ok(descriptor)
}
