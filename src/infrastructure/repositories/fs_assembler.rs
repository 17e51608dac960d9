//! File System Assembler
//!
//! Reads a configuration set directory: the root descriptor first, then
//! every other `*.yaml` / `*.yml` file in lexical order of its relative
//! path. The checksum covers the raw bytes of those files in that order.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::domain::entities::ConfigurationSet;
use crate::domain::ports::AssembleError;
use crate::domain::value_objects::Checksum;
use crate::parser::{parse_fragment, Fragment};

/// File name of the root descriptor of a set.
pub const ROOT_DESCRIPTOR: &str = "root.yaml";

const FRAGMENT_EXTENSIONS: [&str; 2] = ["yaml", "yml"];

#[derive(Debug, Clone, Copy, Default)]
pub struct FsAssembler;

impl FsAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Files of the set, relative to `dir`, in assembly order.
    pub fn fragment_files(&self, dir: &Path) -> Result<Vec<PathBuf>, AssembleError> {
        if !dir.is_dir() {
            return Err(AssembleError::NotFound {
                path: dir.to_path_buf(),
            });
        }
        let root = dir.join(ROOT_DESCRIPTOR);
        if !root.is_file() {
            return Err(AssembleError::NotFound { path: root });
        }

        let mut others = Vec::new();
        collect_fragments(dir, dir, &mut others)?;
        others.retain(|rel| rel != Path::new(ROOT_DESCRIPTOR));
        others.sort_by_key(|rel| sort_key(rel));

        let mut files = Vec::with_capacity(others.len() + 1);
        files.push(PathBuf::from(ROOT_DESCRIPTOR));
        files.extend(others);
        Ok(files)
    }

    /// Parse the root descriptor alone.
    pub fn read_root(&self, dir: &Path) -> Result<Fragment, AssembleError> {
        let path = dir.join(ROOT_DESCRIPTOR);
        let content = read(&path)?;
        let text = utf8(&path, &content)?;
        Ok(parse_fragment(text, &path)?.fragment)
    }

    pub fn assemble(&self, dir: &Path) -> Result<ConfigurationSet, AssembleError> {
        let files = self.fragment_files(dir)?;
        let mut raw = Vec::new();
        let mut merger = Merger::new(dir);

        for rel in &files {
            let path = dir.join(rel);
            let content = read(&path)?;
            raw.extend_from_slice(&content);
            let parsed = parse_fragment(utf8(&path, &content)?, &path)?;
            merger.absorb(rel, &path, parsed.fragment)?;
            merger.set.unknown_fields.extend(parsed.unknown_fields);
        }

        let mut set = merger.set;
        set.checksum = Checksum::of_bytes(&raw);
        set.files = files;

        tracing::debug!(
            dir = %dir.display(),
            config_id = set.display_id(),
            files = set.files.len(),
            policies = set.policies.len(),
            checksum = set.checksum.short(),
            "assembled configuration set"
        );
        Ok(set)
    }
}

/// Lexical order on `/`-joined relative paths, independent of platform.
fn sort_key(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(false)
}

fn collect_fragments(root: &Path, current: &Path, out: &mut Vec<PathBuf>) -> Result<(), AssembleError> {
    let entries = fs::read_dir(current).map_err(|source| AssembleError::Io {
        path: current.to_path_buf(),
        source,
    })?;
    for entry in entries {
        let entry = entry.map_err(|source| AssembleError::Io {
            path: current.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if is_hidden(&path) {
            continue;
        }
        if path.is_dir() {
            collect_fragments(root, &path, out)?;
        } else if path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| FRAGMENT_EXTENSIONS.contains(&e))
            .unwrap_or(false)
        {
            if let Ok(relative) = path.strip_prefix(root) {
                out.push(relative.to_path_buf());
            }
        }
    }
    Ok(())
}

fn read(path: &Path) -> Result<Vec<u8>, AssembleError> {
    fs::read(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => AssembleError::NotFound {
            path: path.to_path_buf(),
        },
        _ => AssembleError::Io {
            path: path.to_path_buf(),
            source,
        },
    })
}

fn utf8<'a>(path: &Path, bytes: &'a [u8]) -> Result<&'a str, AssembleError> {
    std::str::from_utf8(bytes)
        .map_err(|e| AssembleError::structural(path, None, format!("not valid UTF-8: {}", e)))
}

/// Concatenates lists and unions maps across fragments.
struct Merger {
    set: ConfigurationSet,
    /// (section, key) -> file that defined it.
    defined_in: BTreeMap<(&'static str, String), PathBuf>,
}

impl Merger {
    fn new(dir: &Path) -> Self {
        Self {
            set: ConfigurationSet {
                source_dir: dir.to_path_buf(),
                ..ConfigurationSet::default()
            },
            defined_in: BTreeMap::new(),
        }
    }

    fn absorb(&mut self, rel: &Path, path: &Path, fragment: Fragment) -> Result<(), AssembleError> {
        if rel == Path::new(ROOT_DESCRIPTOR) {
            self.set.config_id = fragment.config_id;
            self.set.version = fragment.version;
            self.set.status = fragment.status;
            self.set.scope = fragment.scope.unwrap_or_default();
        } else if let Some(key) = fragment.header_keys().first() {
            return Err(AssembleError::structural(
                path,
                None,
                format!(
                    "'{}' may only be set in {}\n  → Fix: move it to the root descriptor",
                    key, ROOT_DESCRIPTOR
                ),
            ));
        }

        for mut policy in fragment.policies {
            policy.origin = Some(rel.to_path_buf());
            self.set.policies.push(policy);
        }
        self.set.role_bindings.extend(fragment.role_bindings);

        for (name, bundle) in fragment.engine_parameters {
            self.claim("engine_parameters", &name, rel, path)?;
            self.set.engine_parameters.insert(name, bundle);
        }
        for (name, value) in fragment.controls {
            self.claim("controls", &name, rel, path)?;
            self.set.controls.insert(name, value);
        }
        for (name, enabled) in fragment.capabilities {
            self.claim("capabilities", &name, rel, path)?;
            self.set.capabilities.insert(name, enabled);
        }
        Ok(())
    }

    fn claim(&mut self, section: &'static str, key: &str, rel: &Path, path: &Path) -> Result<(), AssembleError> {
        match self.defined_in.get(&(section, key.to_string())) {
            Some(first) => Err(AssembleError::structural(
                path,
                None,
                format!(
                    "{} '{}' is already defined in {}",
                    section,
                    key,
                    first.display()
                ),
            )),
            None => {
                self.defined_in
                    .insert((section, key.to_string()), rel.to_path_buf());
                Ok(())
            }
        }
    }
}
