//! Configuration set (raw schema)
//!
//! One versioned, scoped bundle of policy fragments as produced by the
//! assembler. It is a plain data structure; I/O lives in the infrastructure
//! layer and checking lives in the validator.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use super::policy::PolicyDefinition;
use crate::domain::value_objects::{AttrValue, Checksum};

/// Scope and effective window of a configuration set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SetScopeDef {
    #[serde(default)]
    pub legal_entity: Option<String>,
    #[serde(default)]
    pub jurisdiction: Option<String>,
    #[serde(default)]
    pub regulatory_regime: Option<String>,
    #[serde(default)]
    pub effective_from: Option<String>,
    #[serde(default)]
    pub effective_to: Option<String>,
}

/// Binds a symbolic role to a ledger (and optionally an account code).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RoleBinding {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub ledger: Option<String>,
    #[serde(default)]
    pub account_code: Option<String>,
}

impl RoleBinding {
    pub fn new(role: &str, ledger: &str) -> Self {
        Self {
            role: Some(role.to_string()),
            ledger: Some(ledger.to_string()),
            account_code: None,
        }
    }

    pub fn with_account_code(mut self, code: &str) -> Self {
        self.account_code = Some(code.to_string());
        self
    }

    /// `(role, ledger)` when both are present and non-blank.
    pub fn key(&self) -> Option<(&str, &str)> {
        let role = self.role.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        let ledger = self.ledger.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        Some((role, ledger))
    }
}

/// A named parameter bundle for one calculation engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EngineParameterBundle {
    #[serde(default)]
    pub engine: Option<String>,
    #[serde(default)]
    pub parameters: BTreeMap<String, AttrValue>,
}

/// A key the parser did not recognise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownField {
    pub file: PathBuf,
    pub path: String,
    pub suggestion: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigurationSet {
    pub config_id: Option<String>,
    pub version: Option<i64>,
    pub status: Option<String>,
    pub scope: SetScopeDef,
    pub policies: Vec<PolicyDefinition>,
    pub role_bindings: Vec<RoleBinding>,
    pub engine_parameters: BTreeMap<String, EngineParameterBundle>,
    pub controls: BTreeMap<String, AttrValue>,
    pub capabilities: BTreeMap<String, bool>,
    /// SHA-256 over the raw bytes of every file, in assembly order.
    pub checksum: Checksum,
    /// Directory the set was assembled from.
    pub source_dir: PathBuf,
    /// Files in assembly order, relative to `source_dir`.
    pub files: Vec<PathBuf>,
    pub unknown_fields: Vec<UnknownField>,
}

impl ConfigurationSet {
    /// Identity for diagnostics, even when `config_id` is missing.
    pub fn display_id(&self) -> &str {
        self.config_id
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or("<unnamed>")
    }

    pub fn policy(&self, name: &str) -> Option<&PolicyDefinition> {
        self.policies
            .iter()
            .find(|p| p.name.as_deref() == Some(name))
    }
}
