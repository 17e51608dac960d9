//! Policy definition (raw schema)
//!
//! This is the shape of one policy as written in a fragment file. Required
//! fields are optional here so that the validator can report every missing
//! field at once instead of the parser stopping at the first one.

use std::path::PathBuf;

use serde::Deserialize;

use crate::domain::value_objects::Scope;

/// Event that activates a policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Trigger {
    #[serde(default)]
    pub event_type: Option<String>,
}

/// Economic meaning of the postings a policy produces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Meaning {
    #[serde(default)]
    pub economic_type: Option<String>,
}

/// One debit/credit pair against a ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LedgerEffect {
    #[serde(default)]
    pub ledger: Option<String>,
    #[serde(default)]
    pub debit_role: Option<String>,
    #[serde(default)]
    pub credit_role: Option<String>,
    #[serde(default)]
    pub valuation_model: Option<String>,
}

impl LedgerEffect {
    pub fn new(ledger: &str, debit_role: &str, credit_role: &str) -> Self {
        Self {
            ledger: Some(ledger.to_string()),
            debit_role: Some(debit_role.to_string()),
            credit_role: Some(credit_role.to_string()),
            valuation_model: None,
        }
    }

    /// Roles referenced by this effect, paired with the field they came from.
    pub fn roles(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("debit_role", self.debit_role.as_deref()),
            ("credit_role", self.credit_role.as_deref()),
        ]
        .into_iter()
        .filter_map(|(field, role)| role.map(|r| (field, r)))
    }
}

/// Raw scope dimensions; absent or `*` means wildcard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ScopeDef {
    #[serde(default)]
    pub legal_entity: Option<String>,
    #[serde(default)]
    pub jurisdiction: Option<String>,
    #[serde(default)]
    pub regulatory_regime: Option<String>,
}

impl ScopeDef {
    pub fn to_scope(&self) -> Scope {
        Scope::from_raw(
            self.legal_entity.as_deref(),
            self.jurisdiction.as_deref(),
            self.regulatory_regime.as_deref(),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PolicyDefinition {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<i64>,
    #[serde(default)]
    pub trigger: Option<Trigger>,
    #[serde(default)]
    pub meaning: Option<Meaning>,
    #[serde(default)]
    pub ledger_effects: Vec<LedgerEffect>,
    #[serde(default)]
    pub guards: Vec<String>,
    #[serde(default)]
    pub effective_from: Option<String>,
    #[serde(default)]
    pub effective_to: Option<String>,
    #[serde(default)]
    pub scope: ScopeDef,
    /// Higher wins. Defaults to 0 when omitted.
    #[serde(default)]
    pub precedence: Option<i64>,
    #[serde(default)]
    pub required_engines: Vec<String>,
    #[serde(default)]
    pub engine_parameters_ref: Option<String>,
    #[serde(default)]
    pub capability_tags: Vec<String>,
    /// Fragment file this policy was read from (set by the assembler).
    #[serde(skip)]
    pub origin: Option<PathBuf>,
}

impl PolicyDefinition {
    /// Minimal policy used by builders and tests.
    pub fn new(name: &str, event_type: &str, economic_type: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            version: Some(1),
            trigger: Some(Trigger {
                event_type: Some(event_type.to_string()),
            }),
            meaning: Some(Meaning {
                economic_type: Some(economic_type.to_string()),
            }),
            ..Self::default()
        }
    }

    pub fn with_effect(mut self, effect: LedgerEffect) -> Self {
        self.ledger_effects.push(effect);
        self
    }

    pub fn with_guard(mut self, guard: &str) -> Self {
        self.guards.push(guard.to_string());
        self
    }

    pub fn with_precedence(mut self, precedence: i64) -> Self {
        self.precedence = Some(precedence);
        self
    }

    pub fn with_window(mut self, from: Option<&str>, to: Option<&str>) -> Self {
        self.effective_from = from.map(str::to_string);
        self.effective_to = to.map(str::to_string);
        self
    }

    pub fn with_scope(mut self, scope: ScopeDef) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_engine(mut self, engine: &str, parameters_ref: Option<&str>) -> Self {
        self.required_engines.push(engine.to_string());
        self.engine_parameters_ref = parameters_ref.map(str::to_string);
        self
    }

    pub fn with_capability_tag(mut self, tag: &str) -> Self {
        self.capability_tags.push(tag.to_string());
        self
    }

    /// Name for diagnostics; falls back to the position in the set.
    pub fn label(&self, index: usize) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => format!("policy '{}'", name),
            _ => format!("policies[{}]", index),
        }
    }

    pub fn event_type(&self) -> Option<&str> {
        self.trigger
            .as_ref()
            .and_then(|t| t.event_type.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn economic_type(&self) -> Option<&str> {
        self.meaning
            .as_ref()
            .and_then(|m| m.economic_type.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
