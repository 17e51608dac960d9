//! Compiled artifact
//!
//! `CompiledPolicyPack` is the only thing the posting pipeline ever sees.
//! It is built once by the compiler and has no mutation path: fields are
//! private and only read through accessors.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::entities::engine::{EngineContract, ResolvedEngineParams};
use crate::domain::guard::CompiledGuard;
use crate::domain::value_objects::{
    AttrValue, Checksum, ConfigStatus, EffectiveWindow, Fingerprint, Scope,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledLedgerEffect {
    pub ledger: String,
    pub debit_role: String,
    pub credit_role: String,
    pub valuation_model: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CompiledRoleBinding {
    pub role: String,
    pub ledger: String,
    pub account_code: Option<String>,
}

/// Raised when a policy would be compiled without an effect, trigger or
/// meaning.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("policy '{name}' cannot be compiled: {reason}")]
pub struct DeadPolicy {
    pub name: String,
    pub reason: &'static str,
}

/// Validated, engine-bound projection of one policy definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPolicy {
    name: String,
    version: u32,
    event_type: String,
    economic_type: String,
    effects: Vec<CompiledLedgerEffect>,
    guards: Vec<CompiledGuard>,
    window: EffectiveWindow,
    scope: Scope,
    precedence: u32,
    required_engines: BTreeSet<String>,
    engine_parameters: Option<ResolvedEngineParams>,
    capability_tags: BTreeSet<String>,
    specificity: usize,
}

impl CompiledPolicy {
    pub fn builder(name: &str, event_type: &str, economic_type: &str) -> CompiledPolicyBuilder {
        CompiledPolicyBuilder {
            name: name.to_string(),
            version: 1,
            event_type: event_type.to_string(),
            economic_type: economic_type.to_string(),
            effects: Vec::new(),
            guards: Vec::new(),
            window: EffectiveWindow::unbounded(),
            scope: Scope::any(),
            precedence: 0,
            required_engines: BTreeSet::new(),
            engine_parameters: None,
            capability_tags: BTreeSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn economic_type(&self) -> &str {
        &self.economic_type
    }

    pub fn effects(&self) -> &[CompiledLedgerEffect] {
        &self.effects
    }

    pub fn guards(&self) -> &[CompiledGuard] {
        &self.guards
    }

    pub fn window(&self) -> &EffectiveWindow {
        &self.window
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn precedence(&self) -> u32 {
        self.precedence
    }

    pub fn required_engines(&self) -> &BTreeSet<String> {
        &self.required_engines
    }

    pub fn engine_parameters(&self) -> Option<&ResolvedEngineParams> {
        self.engine_parameters.as_ref()
    }

    pub fn capability_tags(&self) -> &BTreeSet<String> {
        &self.capability_tags
    }

    /// Number of concrete scope dimensions (0..=3).
    pub fn specificity(&self) -> usize {
        self.specificity
    }
}

#[derive(Debug, Clone)]
pub struct CompiledPolicyBuilder {
    name: String,
    version: u32,
    event_type: String,
    economic_type: String,
    effects: Vec<CompiledLedgerEffect>,
    guards: Vec<CompiledGuard>,
    window: EffectiveWindow,
    scope: Scope,
    precedence: u32,
    required_engines: BTreeSet<String>,
    engine_parameters: Option<ResolvedEngineParams>,
    capability_tags: BTreeSet<String>,
}

impl CompiledPolicyBuilder {
    pub fn version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn effect(mut self, effect: CompiledLedgerEffect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn guard(mut self, guard: CompiledGuard) -> Self {
        self.guards.push(guard);
        self
    }

    pub fn window(mut self, window: EffectiveWindow) -> Self {
        self.window = window;
        self
    }

    pub fn scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn precedence(mut self, precedence: u32) -> Self {
        self.precedence = precedence;
        self
    }

    pub fn required_engine(mut self, engine: &str) -> Self {
        self.required_engines.insert(engine.to_string());
        self
    }

    pub fn engine_parameters(mut self, params: Option<ResolvedEngineParams>) -> Self {
        self.engine_parameters = params;
        self
    }

    pub fn capability_tag(mut self, tag: &str) -> Self {
        self.capability_tags.insert(tag.to_string());
        self
    }

    /// Finish the policy. Derived fields are computed here and only here.
    pub fn build(self) -> Result<CompiledPolicy, DeadPolicy> {
        let dead = |reason| DeadPolicy {
            name: self.name.clone(),
            reason,
        };
        if self.event_type.trim().is_empty() {
            return Err(dead("empty trigger event type"));
        }
        if self.economic_type.trim().is_empty() {
            return Err(dead("empty economic meaning"));
        }
        if self.effects.is_empty() {
            return Err(dead("no ledger effects"));
        }

        let specificity = self.scope.specificity();
        Ok(CompiledPolicy {
            name: self.name,
            version: self.version,
            event_type: self.event_type,
            economic_type: self.economic_type,
            effects: self.effects,
            guards: self.guards,
            window: self.window,
            scope: self.scope,
            precedence: self.precedence,
            required_engines: self.required_engines,
            engine_parameters: self.engine_parameters,
            capability_tags: self.capability_tags,
            specificity,
        })
    }
}

/// Event type to ordered candidate positions in `CompiledPolicyPack::policies`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchIndex {
    entries: BTreeMap<String, Vec<usize>>,
}

impl MatchIndex {
    pub fn new(entries: BTreeMap<String, Vec<usize>>) -> Self {
        Self { entries }
    }

    pub fn candidates(&self, event_type: &str) -> &[usize] {
        self.entries
            .get(event_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn event_types(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEntry {
    pub subject: String,
    pub note: String,
}

/// Build-time record of index decisions. Never read at dispatch time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecisionTrace {
    entries: Vec<TraceEntry>,
}

impl DecisionTrace {
    pub fn record(&mut self, subject: impl Into<String>, note: impl Into<String>) {
        self.entries.push(TraceEntry {
            subject: subject.into(),
            note: note.into(),
        });
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn about<'a>(&'a self, subject: &'a str) -> impl Iterator<Item = &'a TraceEntry> + 'a {
        self.entries.iter().filter(move |e| e.subject == subject)
    }
}

/// All parts of a pack. Assembled by the compiler and sealed by
/// [`CompiledPolicyPack::seal`] together with the fingerprint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackContents {
    pub config_id: String,
    pub config_version: u32,
    pub status: Option<ConfigStatus>,
    pub checksum: Checksum,
    pub scope: Scope,
    pub window: EffectiveWindow,
    pub policies: Vec<CompiledPolicy>,
    pub role_bindings: Vec<CompiledRoleBinding>,
    pub engine_contracts: BTreeMap<String, EngineContract>,
    pub resolved_engine_params: BTreeMap<String, ResolvedEngineParams>,
    pub controls: BTreeMap<String, AttrValue>,
    pub capabilities: BTreeMap<String, bool>,
    pub match_index: MatchIndex,
    pub decision_trace: DecisionTrace,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPolicyPack {
    contents: PackContents,
    canonical_fingerprint: Fingerprint,
}

impl CompiledPolicyPack {
    pub(crate) fn seal(contents: PackContents, canonical_fingerprint: Fingerprint) -> Self {
        Self {
            contents,
            canonical_fingerprint,
        }
    }

    pub fn config_id(&self) -> &str {
        &self.contents.config_id
    }

    pub fn config_version(&self) -> u32 {
        self.contents.config_version
    }

    pub fn status(&self) -> Option<ConfigStatus> {
        self.contents.status
    }

    pub fn checksum(&self) -> &Checksum {
        &self.contents.checksum
    }

    pub fn scope(&self) -> &Scope {
        &self.contents.scope
    }

    pub fn window(&self) -> &EffectiveWindow {
        &self.contents.window
    }

    pub fn policies(&self) -> &[CompiledPolicy] {
        &self.contents.policies
    }

    pub fn policy(&self, name: &str) -> Option<&CompiledPolicy> {
        self.contents.policies.iter().find(|p| p.name() == name)
    }

    pub fn role_bindings(&self) -> &[CompiledRoleBinding] {
        &self.contents.role_bindings
    }

    pub fn engine_contracts(&self) -> &BTreeMap<String, EngineContract> {
        &self.contents.engine_contracts
    }

    pub fn resolved_engine_params(&self) -> &BTreeMap<String, ResolvedEngineParams> {
        &self.contents.resolved_engine_params
    }

    pub fn controls(&self) -> &BTreeMap<String, AttrValue> {
        &self.contents.controls
    }

    pub fn capabilities(&self) -> &BTreeMap<String, bool> {
        &self.contents.capabilities
    }

    pub fn match_index(&self) -> &MatchIndex {
        &self.contents.match_index
    }

    /// Candidates for an event type, best first.
    pub fn candidates(&self, event_type: &str) -> impl Iterator<Item = &CompiledPolicy> {
        self.contents
            .match_index
            .candidates(event_type)
            .iter()
            .filter_map(|&i| self.contents.policies.get(i))
    }

    pub fn canonical_fingerprint(&self) -> &Fingerprint {
        &self.canonical_fingerprint
    }

    pub fn decision_trace(&self) -> &DecisionTrace {
        &self.contents.decision_trace
    }

    pub fn contents(&self) -> &PackContents {
        &self.contents
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn effect() -> CompiledLedgerEffect {
        CompiledLedgerEffect {
            ledger: "GL".into(),
            debit_role: "EXPENSE".into(),
            credit_role: "CASH".into(),
            valuation_model: None,
        }
    }

    #[test]
    fn builder_derives_specificity() {
        let policy = CompiledPolicy::builder("p", "invoice.posted", "EXPENSE")
            .effect(effect())
            .scope(Scope::any().with_legal_entity("ACME").with_jurisdiction("US"))
            .build()
            .unwrap();
        assert_eq!(policy.specificity(), 2);
        assert_eq!(policy.precedence(), 0);
    }

    #[test]
    fn builder_rejects_dead_policies() {
        let err = CompiledPolicy::builder("p", "invoice.posted", "EXPENSE")
            .build()
            .unwrap_err();
        assert_eq!(err.reason, "no ledger effects");

        let err = CompiledPolicy::builder("p", " ", "EXPENSE")
            .effect(effect())
            .build()
            .unwrap_err();
        assert_eq!(err.reason, "empty trigger event type");

        let err = CompiledPolicy::builder("p", "x", "")
            .effect(effect())
            .build()
            .unwrap_err();
        assert_eq!(err.reason, "empty economic meaning");
    }

    #[test]
    fn match_index_missing_event_is_empty() {
        let index = MatchIndex::new(BTreeMap::from([("a".to_string(), vec![1, 0])]));
        assert_eq!(index.candidates("a"), &[1, 0]);
        assert!(index.candidates("b").is_empty());
        assert_eq!(index.event_types().collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn pack_candidates_follow_index_order() {
        let first = CompiledPolicy::builder("first", "a", "X")
            .effect(effect())
            .build()
            .unwrap();
        let second = CompiledPolicy::builder("second", "a", "X")
            .effect(effect())
            .build()
            .unwrap();
        let contents = PackContents {
            policies: vec![first, second],
            match_index: MatchIndex::new(BTreeMap::from([("a".to_string(), vec![1, 0])])),
            ..PackContents::default()
        };
        let pack = CompiledPolicyPack::seal(contents, Fingerprint::of_bytes(b""));
        let names: Vec<_> = pack.candidates("a").map(|p| p.name()).collect();
        assert_eq!(names, vec!["second", "first"]);
        assert!(pack.policy("first").is_some());
    }
}
