//! Canonical fingerprint
//!
//! The fingerprint is a SHA-256 over a canonical JSON rendering of the
//! semantic content of a pack:
//!
//! 1. Build a `serde_json::Value` from policies, role bindings, engine
//!    bindings, scope, controls and capabilities
//! 2. Render it with object keys sorted and no insignificant whitespace
//! 3. Hash `FINGERPRINT_DOMAIN`, a newline, then the rendering
//!
//! Identity and build metadata (config id, version, status, checksum, match
//! index, decision trace) are not part of it. Numbers are written as decimal
//! strings, dates as `YYYY-MM-DD`, guards in their canonical rendering, and
//! collections whose order carries no meaning are sorted.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde_json::{json, Value};

use crate::domain::entities::{
    CompiledPolicy, EngineContract, PackContents, ResolvedEngineParams,
};
use crate::domain::value_objects::{format_date, AttrValue, EffectiveWindow, Fingerprint, Scope};

/// Version tag mixed into every fingerprint. Changing the canonical layout
/// requires bumping it.
pub const FINGERPRINT_DOMAIN: &str = "ledgerpack.pack.v1";

pub fn compute(contents: &PackContents) -> Fingerprint {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(FINGERPRINT_DOMAIN.as_bytes());
    bytes.push(b'\n');
    bytes.extend_from_slice(render(&canonical_form(contents), None).as_bytes());
    Fingerprint::of_bytes(&bytes)
}

/// Indented canonical rendering, for humans and semantic diffs.
pub fn canonical_text(contents: &PackContents) -> String {
    let mut text = render(&canonical_form(contents), Some(0));
    text.push('\n');
    text
}

pub fn canonical_form(contents: &PackContents) -> Value {
    let mut policies: Vec<&CompiledPolicy> = contents.policies.iter().collect();
    policies.sort_by(|a, b| a.name().cmp(b.name()));

    let mut role_bindings: Vec<_> = contents.role_bindings.iter().collect();
    role_bindings.sort();

    json!({
        "scope": scope_json(&contents.scope, &contents.window),
        "policies": policies.into_iter().map(policy_json).collect::<Vec<_>>(),
        "role_bindings": role_bindings
            .into_iter()
            .map(|b| json!({
                "role": b.role,
                "ledger": b.ledger,
                "account_code": b.account_code,
            }))
            .collect::<Vec<_>>(),
        "engine_contracts": contents
            .engine_contracts
            .values()
            .map(|c| (c.name.clone(), contract_json(c)))
            .collect::<serde_json::Map<_, _>>(),
        "engine_parameters": contents
            .resolved_engine_params
            .iter()
            .map(|(name, params)| (name.clone(), params_json(params)))
            .collect::<serde_json::Map<_, _>>(),
        "controls": attr_map(&contents.controls),
        "capabilities": contents
            .capabilities
            .iter()
            .map(|(k, v)| (k.clone(), Value::Bool(*v)))
            .collect::<serde_json::Map<_, _>>(),
    })
}

fn scope_json(scope: &Scope, window: &EffectiveWindow) -> Value {
    json!({
        "legal_entity": scope.legal_entity.as_str(),
        "jurisdiction": scope.jurisdiction.as_str(),
        "regulatory_regime": scope.regulatory_regime.as_str(),
        "effective_from": window.from().map(format_date),
        "effective_to": window.to().map(format_date),
    })
}

fn policy_json(policy: &CompiledPolicy) -> Value {
    json!({
        "name": policy.name(),
        "version": policy.version().to_string(),
        "event_type": policy.event_type(),
        "economic_type": policy.economic_type(),
        "ledger_effects": policy
            .effects()
            .iter()
            .map(|e| json!({
                "ledger": e.ledger,
                "debit_role": e.debit_role,
                "credit_role": e.credit_role,
                "valuation_model": e.valuation_model,
            }))
            .collect::<Vec<_>>(),
        "guards": policy.guards().iter().map(|g| g.canonical()).collect::<Vec<_>>(),
        "scope": scope_json(policy.scope(), policy.window()),
        "precedence": policy.precedence().to_string(),
        "required_engines": policy.required_engines().iter().collect::<Vec<_>>(),
        "engine_parameters_ref": policy.engine_parameters().map(|p| p.bundle.as_str()),
        "capability_tags": policy.capability_tags().iter().collect::<Vec<_>>(),
    })
}

fn contract_json(contract: &EngineContract) -> Value {
    let mut parameters: Vec<_> = contract.parameters.iter().collect();
    parameters.sort_by(|a, b| a.name.cmp(&b.name));
    json!({
        "version": contract.version.to_string(),
        "parameters": parameters
            .into_iter()
            .map(|p| json!({
                "name": p.name,
                "kind": p.kind.as_str(),
                "required": p.required,
                "default": p.default.as_ref().map(AttrValue::canonical_json),
            }))
            .collect::<Vec<_>>(),
    })
}

fn params_json(params: &ResolvedEngineParams) -> Value {
    json!({
        "engine": params.engine,
        "engine_version": params.engine_version.to_string(),
        "values": attr_map(&params.values),
    })
}

fn attr_map(values: &BTreeMap<String, AttrValue>) -> Value {
    Value::Object(
        values
            .iter()
            .map(|(k, v)| (k.clone(), v.canonical_json()))
            .collect(),
    )
}

/// Render with object keys sorted regardless of how the map stores them.
/// `indent` of `None` renders compactly.
fn render(value: &Value, indent: Option<usize>) -> String {
    let mut out = String::new();
    write_value(&mut out, value, indent);
    out
}

fn write_value(out: &mut String, value: &Value, indent: Option<usize>) {
    let inner = indent.map(|n| n + 2);
    match value {
        Value::Array(items) if !items.is_empty() => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                newline(out, inner);
                write_value(out, item, inner);
            }
            newline(out, indent);
            out.push(']');
        }
        Value::Object(map) if !map.is_empty() => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                newline(out, inner);
                let _ = write!(out, "{}", Value::String(key.clone()));
                out.push(':');
                if indent.is_some() {
                    out.push(' ');
                }
                if let Some(v) = map.get(key) {
                    write_value(out, v, inner);
                }
            }
            newline(out, indent);
            out.push('}');
        }
        scalar => {
            let _ = write!(out, "{}", scalar);
        }
    }
}

fn newline(out: &mut String, indent: Option<usize>) {
    if let Some(n) = indent {
        out.push('\n');
        out.extend(std::iter::repeat(' ').take(n));
    }
}
