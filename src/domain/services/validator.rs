//! Configuration set validation
//!
//! Four checks run over an assembled set: schema, guard syntax, dispatch
//! ambiguity and role coverage. They are independent and all of them always
//! run, so one call reports every defect. A [`ValidatedSet`] is only handed
//! out when no issue was found; it is the sole input the compiler accepts.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::domain::entities::{
    CompiledLedgerEffect, ConfigurationSet, LedgerEffect, PolicyDefinition,
};
use crate::domain::guard::{parse_guard, CompiledGuard, GuardVocabulary};
use crate::domain::value_objects::{parse_date, ConfigStatus, EffectiveWindow, Scope};

/// Which of the four checks produced an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Check {
    Schema,
    Guard,
    Ambiguity,
    RoleCoverage,
}

impl Check {
    pub fn as_str(&self) -> &'static str {
        match self {
            Check::Schema => "schema",
            Check::Guard => "guard",
            Check::Ambiguity => "ambiguity",
            Check::RoleCoverage => "role-coverage",
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub check: Check,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.check, self.message)
    }
}

/// Outcome of one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    fn from_issues(issues: Vec<ValidationIssue>) -> Self {
        Self {
            is_valid: issues.is_empty(),
            errors: issues.iter().map(ToString::to_string).collect(),
            issues,
        }
    }

    pub fn count(&self, check: Check) -> usize {
        self.issues.iter().filter(|i| i.check == check).count()
    }
}

/// Rejected set, carrying every error found.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("configuration set '{config_id}' failed validation with {} error(s)", .errors.len())]
pub struct ValidationFailure {
    pub config_id: String,
    pub errors: Vec<String>,
}

/// One policy after every check passed, with its guards already parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPolicy {
    pub name: String,
    pub version: u32,
    pub event_type: String,
    pub economic_type: String,
    pub effects: Vec<CompiledLedgerEffect>,
    pub guards: Vec<CompiledGuard>,
    pub window: EffectiveWindow,
    pub scope: Scope,
    pub precedence: u32,
    pub required_engines: BTreeSet<String>,
    pub engine_parameters_ref: Option<String>,
    pub capability_tags: BTreeSet<String>,
}

/// A configuration set that passed all four checks.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSet {
    set: ConfigurationSet,
    config_id: String,
    version: u32,
    status: ConfigStatus,
    scope: Scope,
    window: EffectiveWindow,
    policies: Vec<ValidatedPolicy>,
}

impl ValidatedSet {
    pub fn config_id(&self) -> &str {
        &self.config_id
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn status(&self) -> ConfigStatus {
        self.status
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn window(&self) -> &EffectiveWindow {
        &self.window
    }

    pub fn policies(&self) -> &[ValidatedPolicy] {
        &self.policies
    }

    pub fn source(&self) -> &ConfigurationSet {
        &self.set
    }
}

pub struct Validator<'a> {
    vocabulary: &'a GuardVocabulary,
}

impl<'a> Validator<'a> {
    pub fn new(vocabulary: &'a GuardVocabulary) -> Self {
        Self { vocabulary }
    }

    pub fn validate(&self, set: &ConfigurationSet) -> ValidationResult {
        let (issues, _) = self.run(set);
        ValidationResult::from_issues(issues)
    }

    pub fn validate_into(&self, set: ConfigurationSet) -> Result<ValidatedSet, ValidationFailure> {
        let (issues, lowered) = self.run(&set);
        let failure = |errors: Vec<String>| ValidationFailure {
            config_id: set.display_id().to_string(),
            errors,
        };
        if !issues.is_empty() {
            return Err(failure(issues.iter().map(ToString::to_string).collect()));
        }
        let Some(parts) = lowered else {
            return Err(failure(vec![
                "schema: configuration set could not be lowered".to_string()
            ]));
        };
        Ok(ValidatedSet {
            set,
            config_id: parts.config_id,
            version: parts.version,
            status: parts.status,
            scope: parts.scope,
            window: parts.window,
            policies: parts.policies,
        })
    }

    fn run(&self, set: &ConfigurationSet) -> (Vec<ValidationIssue>, Option<Lowered>) {
        let mut pass = Pass {
            set,
            issues: Vec::new(),
        };

        let header = pass.check_set_header();
        let facts = pass.check_policies();
        pass.check_role_bindings();
        pass.check_parameter_bundles();
        let guards = pass.check_guards(self.vocabulary);
        pass.check_ambiguity();
        pass.check_role_coverage();

        tracing::debug!(
            config_id = set.display_id(),
            issues = pass.issues.len(),
            "validated configuration set"
        );

        let lowered = header.and_then(|header| {
            let policies = facts
                .into_iter()
                .zip(guards)
                .map(|(facts, guards)| Some(facts?.into_policy(guards?)))
                .collect::<Option<Vec<_>>>()?;
            Some(Lowered {
                config_id: header.config_id,
                version: header.version,
                status: header.status,
                scope: header.scope,
                window: header.window,
                policies,
            })
        });
        (pass.issues, lowered)
    }
}

struct Lowered {
    config_id: String,
    version: u32,
    status: ConfigStatus,
    scope: Scope,
    window: EffectiveWindow,
    policies: Vec<ValidatedPolicy>,
}

struct SetHeader {
    config_id: String,
    version: u32,
    status: ConfigStatus,
    scope: Scope,
    window: EffectiveWindow,
}

struct PolicyFacts {
    name: String,
    version: u32,
    event_type: String,
    economic_type: String,
    effects: Vec<CompiledLedgerEffect>,
    window: EffectiveWindow,
    scope: Scope,
    precedence: u32,
    required_engines: BTreeSet<String>,
    engine_parameters_ref: Option<String>,
    capability_tags: BTreeSet<String>,
}

impl PolicyFacts {
    fn into_policy(self, guards: Vec<CompiledGuard>) -> ValidatedPolicy {
        ValidatedPolicy {
            name: self.name,
            version: self.version,
            event_type: self.event_type,
            economic_type: self.economic_type,
            effects: self.effects,
            guards,
            window: self.window,
            scope: self.scope,
            precedence: self.precedence,
            required_engines: self.required_engines,
            engine_parameters_ref: self.engine_parameters_ref,
            capability_tags: self.capability_tags,
        }
    }
}

struct Pass<'s> {
    set: &'s ConfigurationSet,
    issues: Vec<ValidationIssue>,
}

impl<'s> Pass<'s> {
    fn push(&mut self, check: Check, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            check,
            message: message.into(),
        });
    }

    fn schema(&mut self, message: impl Into<String>) {
        self.push(Check::Schema, message);
    }

    fn set_scope(&self) -> Scope {
        let scope = &self.set.scope;
        Scope::from_raw(
            scope.legal_entity.as_deref(),
            scope.jurisdiction.as_deref(),
            scope.regulatory_regime.as_deref(),
        )
    }

    /// Set window for narrowing policies. Unreadable set dates are the
    /// header check's to report, so they fall back to unbounded here.
    fn set_window(&self) -> EffectiveWindow {
        let scope = &self.set.scope;
        lenient_window(scope.effective_from.as_deref(), scope.effective_to.as_deref())
            .unwrap_or_default()
    }

    fn check_set_header(&mut self) -> Option<SetHeader> {
        let before = self.issues.len();
        let set = self.set;

        for unknown in &set.unknown_fields {
            let hint = unknown
                .suggestion
                .as_deref()
                .map(|s| format!(" (did you mean '{}'?)", s))
                .unwrap_or_default();
            self.schema(format!(
                "unknown field '{}' in {}{}",
                unknown.path,
                unknown.file.display(),
                hint
            ));
        }

        let config_id = non_blank(set.config_id.as_deref());
        if config_id.is_none() {
            self.schema("config_id is required");
        }

        let version = match set.version {
            None => {
                self.schema("version is required");
                None
            }
            Some(v) => self.positive_u32("version", v, "configuration set"),
        };

        let status = match set.status.as_deref() {
            None => {
                self.schema("status is required");
                None
            }
            Some(raw) => match raw.parse::<ConfigStatus>() {
                Ok(status) => Some(status),
                Err(_) => {
                    self.schema(format!(
                        "status '{}' is not one of DRAFT, PUBLISHED, ARCHIVED",
                        raw
                    ));
                    None
                }
            },
        };

        let window = self.window(
            "configuration set",
            set.scope.effective_from.as_deref(),
            set.scope.effective_to.as_deref(),
        );

        if self.issues.len() != before {
            return None;
        }
        Some(SetHeader {
            config_id: config_id?.to_string(),
            version: version?,
            status: status?,
            scope: self.set_scope(),
            window: window?,
        })
    }

    fn check_policies(&mut self) -> Vec<Option<PolicyFacts>> {
        let set = self.set;
        let set_scope = self.set_scope();
        let set_window = self.set_window();
        let mut seen: BTreeMap<&str, usize> = BTreeMap::new();
        let mut facts = Vec::with_capacity(set.policies.len());

        for (index, policy) in set.policies.iter().enumerate() {
            let label = policy.label(index);
            if let Some(name) = non_blank(policy.name.as_deref()) {
                if let Some(first) = seen.insert(name, index) {
                    self.schema(format!(
                        "{} is defined more than once (policies[{}] and policies[{}])",
                        label, first, index
                    ));
                }
            }
            facts.push(self.check_policy(index, &label, policy, &set_scope, &set_window));
        }
        facts
    }

    fn check_policy(
        &mut self,
        index: usize,
        label: &str,
        policy: &PolicyDefinition,
        set_scope: &Scope,
        set_window: &EffectiveWindow,
    ) -> Option<PolicyFacts> {
        let before = self.issues.len();

        let name = non_blank(policy.name.as_deref());
        if name.is_none() {
            self.schema(format!("policies[{}] is missing name", index));
        }

        let version = match policy.version {
            Some(v) => self.positive_u32("version", v, label),
            None => Some(1),
        };

        let event_type = policy.event_type();
        if event_type.is_none() {
            self.schema(format!("{} is missing trigger.event_type", label));
        }
        let economic_type = policy.economic_type();
        if economic_type.is_none() {
            self.schema(format!("{} is missing meaning.economic_type", label));
        }

        if policy.ledger_effects.is_empty() {
            self.schema(format!("{} has no ledger_effects", label));
        }
        let effects: Vec<_> = policy
            .ledger_effects
            .iter()
            .enumerate()
            .filter_map(|(i, effect)| self.check_effect(label, i, effect))
            .collect();

        let window = self
            .window(
                label,
                policy.effective_from.as_deref(),
                policy.effective_to.as_deref(),
            )
            .and_then(|own| {
                let effective = own.intersect(set_window);
                if effective.is_none() {
                    self.schema(format!(
                        "{} window {} lies outside the configuration set window {}",
                        label, own, set_window
                    ));
                }
                effective
            });

        let precedence = match policy.precedence.unwrap_or(0) {
            p if p < 0 => {
                self.schema(format!("{} has negative precedence {}", label, p));
                None
            }
            p => match u32::try_from(p) {
                Ok(p) => Some(p),
                Err(_) => {
                    self.schema(format!("{} precedence {} is out of range", label, p));
                    None
                }
            },
        };

        let own_scope = policy.scope.to_scope();
        for dimension in own_scope.conflicts_with(set_scope) {
            self.schema(format!(
                "{} scope {} contradicts the configuration set scope ({})",
                label, dimension, set_scope
            ));
        }
        let scope = own_scope.narrowed_by(set_scope);

        let mut required_engines = BTreeSet::new();
        for engine in &policy.required_engines {
            match non_blank(Some(engine)) {
                Some(engine) => {
                    required_engines.insert(engine.to_string());
                }
                None => self.schema(format!("{} has a blank required_engines entry", label)),
            }
        }
        let engine_parameters_ref = non_blank(policy.engine_parameters_ref.as_deref());
        if engine_parameters_ref.is_some() && policy.required_engines.is_empty() {
            self.schema(format!(
                "{} sets engine_parameters_ref without required_engines",
                label
            ));
        }

        let mut capability_tags = BTreeSet::new();
        for tag in &policy.capability_tags {
            match non_blank(Some(tag)) {
                Some(tag) => {
                    capability_tags.insert(tag.to_string());
                }
                None => self.schema(format!("{} has a blank capability tag", label)),
            }
        }

        if self.issues.len() != before {
            return None;
        }
        Some(PolicyFacts {
            name: name?.to_string(),
            version: version?,
            event_type: event_type?.to_string(),
            economic_type: economic_type?.to_string(),
            effects,
            window: window?,
            scope,
            precedence: precedence?,
            required_engines,
            engine_parameters_ref: engine_parameters_ref.map(str::to_string),
            capability_tags,
        })
    }

    fn check_effect(
        &mut self,
        label: &str,
        index: usize,
        effect: &LedgerEffect,
    ) -> Option<CompiledLedgerEffect> {
        let ledger = non_blank(effect.ledger.as_deref());
        let debit = non_blank(effect.debit_role.as_deref());
        let credit = non_blank(effect.credit_role.as_deref());

        for (field, value) in [
            ("ledger", ledger),
            ("debit_role", debit),
            ("credit_role", credit),
        ] {
            if value.is_none() {
                self.schema(format!(
                    "{} ledger_effects[{}] is missing {}",
                    label, index, field
                ));
            }
        }
        if let (Some(d), Some(c)) = (debit, credit) {
            if d == c {
                self.schema(format!(
                    "{} ledger_effects[{}] debits and credits the same role '{}'",
                    label, index, d
                ));
                return None;
            }
        }

        Some(CompiledLedgerEffect {
            ledger: ledger?.to_string(),
            debit_role: debit?.to_string(),
            credit_role: credit?.to_string(),
            valuation_model: non_blank(effect.valuation_model.as_deref()).map(str::to_string),
        })
    }

    fn check_role_bindings(&mut self) {
        let set = self.set;
        let mut seen = BTreeSet::new();
        for (index, binding) in set.role_bindings.iter().enumerate() {
            match binding.key() {
                None => self.schema(format!(
                    "role_bindings[{}] needs a non-empty role and ledger",
                    index
                )),
                Some(key) => {
                    if !seen.insert(key) {
                        self.schema(format!(
                            "role_bindings[{}] binds role '{}' on ledger '{}' twice",
                            index, key.0, key.1
                        ));
                    }
                }
            }
        }
    }

    fn check_parameter_bundles(&mut self) {
        let set = self.set;
        for (name, bundle) in &set.engine_parameters {
            if non_blank(bundle.engine.as_deref()).is_none() {
                self.schema(format!("engine_parameters '{}' is missing engine", name));
            }
        }
    }

    /// Parse every guard. Returns the parsed guards of each policy, or
    /// `None` for a policy with at least one bad guard.
    fn check_guards(&mut self, vocabulary: &GuardVocabulary) -> Vec<Option<Vec<CompiledGuard>>> {
        let set = self.set;
        let mut out = Vec::with_capacity(set.policies.len());
        for (index, policy) in set.policies.iter().enumerate() {
            let label = policy.label(index);
            let mut parsed = Vec::with_capacity(policy.guards.len());
            let mut ok = true;
            for (g, source) in policy.guards.iter().enumerate() {
                match parse_guard(source, vocabulary) {
                    Ok(expr) => parsed.push(CompiledGuard::new(source.trim(), expr)),
                    Err(err) => {
                        ok = false;
                        self.push(Check::Guard, format!("{} guards[{}]: {}", label, g, err));
                    }
                }
            }
            out.push(ok.then_some(parsed));
        }
        out
    }

    /// Pairwise over all policies with the same event type.
    fn check_ambiguity(&mut self) {
        let set = self.set;
        let set_scope = self.set_scope();
        let set_window = self.set_window();
        let mut by_event: BTreeMap<&str, Vec<(usize, &PolicyDefinition)>> = BTreeMap::new();
        for (index, policy) in set.policies.iter().enumerate() {
            if let Some(event_type) = policy.event_type() {
                by_event.entry(event_type).or_default().push((index, policy));
            }
        }

        for (event_type, policies) in by_event {
            for (i, (ia, a)) in policies.iter().enumerate() {
                for (ib, b) in &policies[i + 1..] {
                    if !could_both_match(a, b, &set_scope, &set_window) {
                        continue;
                    }
                    let precedence = a.precedence.unwrap_or(0);
                    self.push(
                        Check::Ambiguity,
                        format!(
                            "{} and {} both handle '{}' with precedence {} over overlapping scope and dates",
                            a.label(*ia),
                            b.label(*ib),
                            event_type,
                            precedence
                        ),
                    );
                }
            }
        }
    }

    fn check_role_coverage(&mut self) {
        let set = self.set;
        let bound: BTreeSet<(&str, &str)> = set
            .role_bindings
            .iter()
            .filter_map(|b| b.key())
            .collect();

        let mut missing = Vec::new();
        for (index, policy) in set.policies.iter().enumerate() {
            for (e, effect) in policy.ledger_effects.iter().enumerate() {
                let Some(ledger) = non_blank(effect.ledger.as_deref()) else {
                    continue;
                };
                for (field, role) in effect.roles() {
                    let role = role.trim();
                    if !role.is_empty() && !bound.contains(&(role, ledger)) {
                        missing.push(format!(
                            "{} ledger_effects[{}] {} '{}' has no binding on ledger '{}'",
                            policy.label(index),
                            e,
                            field,
                            role,
                            ledger
                        ));
                    }
                }
            }
        }
        for message in missing {
            self.push(Check::RoleCoverage, message);
        }
    }

    fn positive_u32(&mut self, field: &str, value: i64, owner: &str) -> Option<u32> {
        match u32::try_from(value) {
            Ok(v) if v >= 1 => Some(v),
            _ => {
                self.schema(format!("{} {} must be >= 1, got {}", owner, field, value));
                None
            }
        }
    }

    fn window(&mut self, owner: &str, from: Option<&str>, to: Option<&str>) -> Option<EffectiveWindow> {
        let from = self.date(owner, "effective_from", from);
        let to = self.date(owner, "effective_to", to);
        let (from, to) = (from?, to?);
        let window = EffectiveWindow::new(from, to);
        if window.is_none() {
            self.schema(format!("{} effective_from is after effective_to", owner));
        }
        window
    }

    fn date(
        &mut self,
        owner: &str,
        field: &str,
        raw: Option<&str>,
    ) -> Option<Option<chrono::NaiveDate>> {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Some(None);
        };
        match parse_date(raw) {
            Some(date) => Some(Some(date)),
            None => {
                self.schema(format!(
                    "{} {} '{}' is not a YYYY-MM-DD date",
                    owner, field, raw
                ));
                None
            }
        }
    }
}

/// Same precedence, overlapping scopes and overlapping windows, both taken
/// after narrowing by the set. Policies with unreadable dates are left to the
/// schema check.
fn could_both_match(
    a: &PolicyDefinition,
    b: &PolicyDefinition,
    set_scope: &Scope,
    set_window: &EffectiveWindow,
) -> bool {
    if a.precedence.unwrap_or(0) != b.precedence.unwrap_or(0) {
        return false;
    }
    let scope = |p: &PolicyDefinition| p.scope.to_scope().narrowed_by(set_scope);
    if !scope(a).overlaps(&scope(b)) {
        return false;
    }
    let window = |p: &PolicyDefinition| {
        lenient_window(p.effective_from.as_deref(), p.effective_to.as_deref())?
            .intersect(set_window)
    };
    match (window(a), window(b)) {
        (Some(wa), Some(wb)) => wa.overlaps(&wb),
        _ => false,
    }
}

fn lenient_window(from: Option<&str>, to: Option<&str>) -> Option<EffectiveWindow> {
    let date = |raw: Option<&str>| match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Some(None),
        Some(raw) => parse_date(raw).map(Some),
    };
    EffectiveWindow::new(date(from)?, date(to)?)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
