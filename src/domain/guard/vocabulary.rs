//! Identifier whitelist for guards

use std::collections::BTreeSet;

/// Event attributes every posting event may carry.
pub const BUILTIN_ATTRIBUTES: &[&str] = &[
    "amount",
    "currency",
    "quantity",
    "unit_price",
    "event_type",
    "effective_date",
    "legal_entity",
    "jurisdiction",
    "regulatory_regime",
    "counterparty",
    "counterparty_type",
    "cost_center",
    "project_id",
    "contract_type",
    "fund",
    "fiscal_period",
    "source_system",
    "is_reversal",
    "is_adjustment",
];

/// Roots under which any single member is allowed (`payload.anything`).
const BUILTIN_PREFIXES: &[&str] = &["payload"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardVocabulary {
    names: BTreeSet<String>,
    prefixes: BTreeSet<String>,
}

impl Default for GuardVocabulary {
    fn default() -> Self {
        Self {
            names: BUILTIN_ATTRIBUTES.iter().map(|s| s.to_string()).collect(),
            prefixes: BUILTIN_PREFIXES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl GuardVocabulary {
    pub fn empty() -> Self {
        Self {
            names: BTreeSet::new(),
            prefixes: BTreeSet::new(),
        }
    }

    /// Add identifiers. An entry `root.*` allows any member of `root`.
    pub fn with_identifiers<I, S>(mut self, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for ident in identifiers {
            let ident = ident.as_ref().trim();
            if ident.is_empty() {
                continue;
            }
            match ident.strip_suffix(".*") {
                Some(root) => self.prefixes.insert(root.to_string()),
                None => self.names.insert(ident.to_string()),
            };
        }
        self
    }

    pub fn allows(&self, path: &str) -> bool {
        if self.names.contains(path) {
            return true;
        }
        match path.split_once('.') {
            Some((root, member)) => !member.contains('.') && self.prefixes.contains(root),
            None => false,
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_allows_builtins_and_payload_members() {
        let vocab = GuardVocabulary::default();
        assert!(vocab.allows("amount"));
        assert!(vocab.allows("payload.grant_id"));
        assert!(!vocab.allows("payload"));
        assert!(!vocab.allows("payload.a.b"));
        assert!(!vocab.allows("secret"));
    }

    #[test]
    fn extra_identifiers_and_prefixes() {
        let vocab = GuardVocabulary::empty().with_identifiers(["grant_id", "award.*", " "]);
        assert!(vocab.allows("grant_id"));
        assert!(vocab.allows("award.number"));
        assert!(!vocab.allows("amount"));
        assert_eq!(vocab.names().collect::<Vec<_>>(), vec!["grant_id"]);
    }
}
