//! Policy compiler
//!
//! Lowers a [`ValidatedSet`] into a sealed [`CompiledPolicyPack`]:
//! resolves engine contracts and parameter bundles, builds the match index
//! and computes the canonical fingerprint. Failures here point at the build
//! pipeline (an engine the registry does not know, a dangling bundle) rather
//! than at the author of the configuration, and are fatal.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};

use crate::domain::entities::{
    CompiledPolicy, CompiledPolicyPack, CompiledRoleBinding, DeadPolicy, DecisionTrace,
    EngineContract, EngineRegistry, MatchIndex, PackContents, ParamBindError,
    ResolvedEngineParams,
};
use crate::domain::services::fingerprint;
use crate::domain::services::validator::{ValidatedPolicy, ValidatedSet};
use crate::domain::value_objects::Checksum;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error("policy '{policy}' requires engine '{engine}', which has no registered contract")]
    UnknownEngineContract { policy: String, engine: String },

    #[error("policy '{policy}' references unknown engine parameter bundle '{bundle}'")]
    UnknownParameterBundle { policy: String, bundle: String },

    #[error("policy '{policy}' uses bundle '{bundle}' for engine '{engine}', which it does not require")]
    BundleEngineNotRequired {
        policy: String,
        bundle: String,
        engine: String,
    },

    #[error("parameter bundle '{bundle}' does not fit engine '{engine}': {}", join_problems(.problems))]
    ParameterMismatch {
        bundle: String,
        engine: String,
        problems: Vec<ParamBindError>,
    },

    #[error(transparent)]
    DeadPolicy(#[from] DeadPolicy),

    /// Internal consistency failure. Never a configuration mistake.
    #[error("checksum drift while compiling '{config_id}': source {expected}, pack {actual}")]
    ChecksumDrift {
        config_id: String,
        expected: String,
        actual: String,
    },
}

fn join_problems(problems: &[ParamBindError]) -> String {
    problems
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub struct PolicyCompiler<'a> {
    registry: &'a EngineRegistry,
}

impl<'a> PolicyCompiler<'a> {
    pub fn new(registry: &'a EngineRegistry) -> Self {
        Self { registry }
    }

    pub fn compile(&self, validated: ValidatedSet) -> Result<CompiledPolicyPack, CompileError> {
        let mut trace = DecisionTrace::default();
        let source = validated.source();

        let engine_contracts = self.resolve_contracts(validated.policies())?;
        let resolved_engine_params = self.resolve_bundles(&validated, &mut trace)?;

        let mut policies = Vec::with_capacity(validated.policies().len());
        for policy in validated.policies() {
            let params = policy
                .engine_parameters_ref
                .as_ref()
                .and_then(|name| resolved_engine_params.get(name))
                .cloned();
            policies.push(lower_policy(policy, params)?);
        }

        let match_index = build_index(&policies, &source.capabilities, &mut trace);

        let role_bindings = source
            .role_bindings
            .iter()
            .filter_map(|binding| {
                let (role, ledger) = binding.key()?;
                Some(CompiledRoleBinding {
                    role: role.to_string(),
                    ledger: ledger.to_string(),
                    account_code: binding.account_code.clone(),
                })
            })
            .collect();

        let contents = PackContents {
            config_id: validated.config_id().to_string(),
            config_version: validated.version(),
            status: Some(validated.status()),
            checksum: source.checksum.clone(),
            scope: validated.scope().clone(),
            window: *validated.window(),
            policies,
            role_bindings,
            engine_contracts,
            resolved_engine_params,
            controls: source.controls.clone(),
            capabilities: source.capabilities.clone(),
            match_index,
            decision_trace: trace,
        };

        let fingerprint = fingerprint::compute(&contents);
        let pack = CompiledPolicyPack::seal(contents, fingerprint);
        ensure_checksum(&source.checksum, &pack)?;

        tracing::debug!(
            config_id = pack.config_id(),
            version = pack.config_version(),
            policies = pack.policies().len(),
            event_types = pack.match_index().len(),
            fingerprint = pack.canonical_fingerprint().short(),
            "compiled policy pack"
        );
        Ok(pack)
    }

    fn resolve_contracts(
        &self,
        policies: &[ValidatedPolicy],
    ) -> Result<BTreeMap<String, EngineContract>, CompileError> {
        let mut contracts = BTreeMap::new();
        for policy in policies {
            for engine in &policy.required_engines {
                if contracts.contains_key(engine) {
                    continue;
                }
                let contract =
                    self.registry
                        .get(engine)
                        .ok_or_else(|| CompileError::UnknownEngineContract {
                            policy: policy.name.clone(),
                            engine: engine.clone(),
                        })?;
                contracts.insert(engine.clone(), contract.clone());
            }
        }
        Ok(contracts)
    }

    /// Resolve each referenced bundle once, however many policies share it.
    fn resolve_bundles(
        &self,
        validated: &ValidatedSet,
        trace: &mut DecisionTrace,
    ) -> Result<BTreeMap<String, ResolvedEngineParams>, CompileError> {
        let bundles = &validated.source().engine_parameters;
        let mut resolved: BTreeMap<String, ResolvedEngineParams> = BTreeMap::new();

        for policy in validated.policies() {
            let Some(name) = policy.engine_parameters_ref.as_deref() else {
                continue;
            };
            let bundle = bundles
                .get(name)
                .ok_or_else(|| CompileError::UnknownParameterBundle {
                    policy: policy.name.clone(),
                    bundle: name.to_string(),
                })?;
            let engine = bundle.engine.as_deref().map(str::trim).unwrap_or_default();
            if !policy.required_engines.contains(engine) {
                return Err(CompileError::BundleEngineNotRequired {
                    policy: policy.name.clone(),
                    bundle: name.to_string(),
                    engine: engine.to_string(),
                });
            }
            if resolved.contains_key(name) {
                continue;
            }

            let contract =
                self.registry
                    .get(engine)
                    .ok_or_else(|| CompileError::UnknownEngineContract {
                        policy: policy.name.clone(),
                        engine: engine.to_string(),
                    })?;
            let values = contract.bind(&bundle.parameters).map_err(|problems| {
                CompileError::ParameterMismatch {
                    bundle: name.to_string(),
                    engine: engine.to_string(),
                    problems,
                }
            })?;
            trace.record(
                format!("bundle:{}", name),
                format!("bound to {} v{}", contract.name, contract.version),
            );
            resolved.insert(
                name.to_string(),
                ResolvedEngineParams {
                    bundle: name.to_string(),
                    engine: contract.name.clone(),
                    engine_version: contract.version,
                    values,
                },
            );
        }

        for name in bundles.keys().filter(|n| !resolved.contains_key(*n)) {
            trace.record(format!("bundle:{}", name), "not referenced by any policy");
        }
        Ok(resolved)
    }
}

fn lower_policy(
    policy: &ValidatedPolicy,
    params: Option<ResolvedEngineParams>,
) -> Result<CompiledPolicy, DeadPolicy> {
    let mut builder = CompiledPolicy::builder(&policy.name, &policy.event_type, &policy.economic_type)
        .version(policy.version)
        .window(policy.window)
        .scope(policy.scope.clone())
        .precedence(policy.precedence)
        .engine_parameters(params);
    for effect in &policy.effects {
        builder = builder.effect(effect.clone());
    }
    for guard in &policy.guards {
        builder = builder.guard(guard.clone());
    }
    for engine in &policy.required_engines {
        builder = builder.required_engine(engine);
    }
    for tag in &policy.capability_tags {
        builder = builder.capability_tag(tag);
    }
    builder.build()
}

/// Order: precedence desc, concrete dimension count desc, then per-dimension
/// concreteness (legal entity first), then name.
fn build_index(
    policies: &[CompiledPolicy],
    capabilities: &BTreeMap<String, bool>,
    trace: &mut DecisionTrace,
) -> MatchIndex {
    let mut entries: BTreeMap<String, Vec<usize>> = BTreeMap::new();

    for (i, policy) in policies.iter().enumerate() {
        let disabled: BTreeSet<&str> = policy
            .capability_tags()
            .iter()
            .filter(|tag| capabilities.get(tag.as_str()) == Some(&false))
            .map(String::as_str)
            .collect();
        if !disabled.is_empty() {
            let names: Vec<_> = disabled.into_iter().collect();
            trace.record(
                format!("policy:{}", policy.name()),
                format!("left out of index: capability disabled ({})", names.join(", ")),
            );
            continue;
        }
        entries
            .entry(policy.event_type().to_string())
            .or_default()
            .push(i);
    }

    for (event_type, candidates) in entries.iter_mut() {
        candidates.sort_by_key(|&i| {
            let p = &policies[i];
            (
                Reverse(p.precedence()),
                Reverse(p.specificity()),
                Reverse(p.scope().concrete_flags()),
                p.name().to_string(),
            )
        });
        let order: Vec<String> = candidates
            .iter()
            .map(|&i| {
                let p = &policies[i];
                format!("{} (precedence {}, scope {})", p.name(), p.precedence(), p.scope())
            })
            .collect();
        trace.record(format!("event:{}", event_type), order.join(" > "));
    }

    MatchIndex::new(entries)
}

fn ensure_checksum(source: &Checksum, pack: &CompiledPolicyPack) -> Result<(), CompileError> {
    if pack.checksum() == source {
        return Ok(());
    }
    tracing::error!(
        config_id = pack.config_id(),
        expected = source.as_str(),
        actual = pack.checksum().as_str(),
        "pack checksum does not match its source"
    );
    Err(CompileError::ChecksumDrift {
        config_id: pack.config_id().to_string(),
        expected: source.to_string(),
        actual: pack.checksum().to_string(),
    })
}
