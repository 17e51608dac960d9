//! Fragment parser
//!
//! Parses one YAML file of a configuration set. The root descriptor and
//! ordinary fragments share one shape; the assembler decides which header
//! keys a file may carry. Unknown keys do not fail the parse: they are
//! collected so the validator can report all of them together.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::config::levenshtein;
use crate::domain::entities::{
    EngineParameterBundle, PolicyDefinition, RoleBinding, SetScopeDef, UnknownField,
};
use crate::domain::ports::AssembleError;
use crate::domain::value_objects::AttrValue;

/// Keys that only the root descriptor may set.
pub const HEADER_KEYS: [&str; 4] = ["config_id", "version", "status", "scope"];

/// Every key the fragment schema knows, for "did you mean" hints.
const KNOWN_KEYS: &[&str] = &[
    "config_id",
    "version",
    "status",
    "scope",
    "legal_entity",
    "jurisdiction",
    "regulatory_regime",
    "effective_from",
    "effective_to",
    "policies",
    "name",
    "trigger",
    "event_type",
    "meaning",
    "economic_type",
    "ledger_effects",
    "ledger",
    "debit_role",
    "credit_role",
    "valuation_model",
    "guards",
    "precedence",
    "required_engines",
    "engine_parameters_ref",
    "capability_tags",
    "role_bindings",
    "role",
    "account_code",
    "engine_parameters",
    "engine",
    "parameters",
    "controls",
    "capabilities",
];

/// One parsed file, before merging.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Fragment {
    #[serde(default)]
    pub config_id: Option<String>,
    #[serde(default)]
    pub version: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub scope: Option<SetScopeDef>,
    #[serde(default)]
    pub policies: Vec<PolicyDefinition>,
    #[serde(default)]
    pub role_bindings: Vec<RoleBinding>,
    #[serde(default)]
    pub engine_parameters: BTreeMap<String, EngineParameterBundle>,
    #[serde(default)]
    pub controls: BTreeMap<String, AttrValue>,
    #[serde(default)]
    pub capabilities: BTreeMap<String, bool>,
}

impl Fragment {
    /// Header keys present in this fragment.
    pub fn header_keys(&self) -> Vec<&'static str> {
        let present = [
            self.config_id.is_some(),
            self.version.is_some(),
            self.status.is_some(),
            self.scope.is_some(),
        ];
        HEADER_KEYS
            .iter()
            .zip(present)
            .filter_map(|(key, set)| set.then_some(*key))
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedFragment {
    pub fragment: Fragment,
    pub unknown_fields: Vec<UnknownField>,
}

/// Parse the text of one fragment. `file` is only used in diagnostics.
pub fn parse_fragment(content: &str, file: &Path) -> Result<ParsedFragment, AssembleError> {
    if is_blank_document(content) {
        return Ok(ParsedFragment::default());
    }

    let mut ignored: Vec<String> = Vec::new();
    let deserializer = serde_yaml_ng::Deserializer::from_str(content);
    let fragment: Fragment = serde_ignored::deserialize(deserializer, |path| {
        ignored.push(path.to_string());
    })
    .map_err(|e| yaml_error(file, content, &e))?;

    let unknown_fields = ignored
        .into_iter()
        .map(|path| {
            let key = path.rsplit('.').next().unwrap_or(path.as_str());
            UnknownField {
                file: file.to_path_buf(),
                suggestion: suggest_key(key),
                path,
            }
        })
        .collect();

    Ok(ParsedFragment {
        fragment,
        unknown_fields,
    })
}

/// Comments, blank lines and document markers only.
fn is_blank_document(content: &str) -> bool {
    content.lines().map(str::trim).all(|line| {
        line.is_empty() || line.starts_with('#') || line == "---" || line == "..."
    })
}

fn yaml_error(file: &Path, content: &str, err: &serde_yaml_ng::Error) -> AssembleError {
    let line = yaml_error_location(err).map(|(line, _)| line);
    let mut message = err.to_string();
    if should_hint_wildcard_quotes(content, &message) {
        message.push_str("\n  → Fix: quote the wildcard, e.g. legal_entity: \"*\"");
    }
    AssembleError::structural(file, line, message)
}

fn yaml_error_location(err: &serde_yaml_ng::Error) -> Option<(usize, usize)> {
    err.location()
        .map(|loc| (loc.line(), loc.column()))
        .or_else(|| {
            let s = err.to_string();
            let marker = "at line ";
            let start = s.find(marker)? + marker.len();
            let rest = &s[start..];
            let line_end = rest.find(' ')?;
            let line: usize = rest[..line_end].parse().ok()?;
            Some((line, 0))
        })
}

/// An unquoted `*` is a YAML alias, the most common scope typo.
fn should_hint_wildcard_quotes(content: &str, err_str: &str) -> bool {
    (err_str.contains("alias") || err_str.contains("unknown anchor"))
        && content.lines().any(|l| l.trim_end().ends_with(": *"))
}

fn suggest_key(unknown: &str) -> Option<String> {
    let mut best: Option<(&str, usize)> = None;
    for candidate in KNOWN_KEYS {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 && dist > 0 => Some(candidate.to_string()),
        _ => None,
    }
}
