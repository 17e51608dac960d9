//! Engine contracts
//!
//! Calculation engines (variance, allocation, ...) compute amounts for the
//! policies that require them. Each engine publishes a contract: a version
//! and a parameter schema. The registry is an explicit value built once and
//! passed by reference; there is no process-wide default.

use std::collections::BTreeMap;
use std::fmt;

use crate::domain::value_objects::{AttrValue, Number};

/// Kind of value a parameter accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    Decimal,
    Integer,
    Text,
    Boolean,
}

impl ParamKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamKind::Decimal => "decimal",
            ParamKind::Integer => "integer",
            ParamKind::Text => "text",
            ParamKind::Boolean => "boolean",
        }
    }

    pub fn accepts(&self, value: &AttrValue) -> bool {
        match (self, value) {
            (ParamKind::Decimal, AttrValue::Number(_)) => true,
            (ParamKind::Integer, AttrValue::Number(n)) => n.is_integer(),
            (ParamKind::Text, AttrValue::Text(_)) => true,
            (ParamKind::Boolean, AttrValue::Bool(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSpec {
    pub name: String,
    pub kind: ParamKind,
    pub required: bool,
    pub default: Option<AttrValue>,
}

impl ParameterSpec {
    pub fn required(name: &str, kind: ParamKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            required: true,
            default: None,
        }
    }

    pub fn optional(name: &str, kind: ParamKind, default: Option<AttrValue>) -> Self {
        Self {
            name: name.to_string(),
            kind,
            required: false,
            default,
        }
    }
}

/// Why a parameter bundle does not satisfy a contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParamBindError {
    #[error("missing required parameter '{0}'")]
    Missing(String),
    #[error("unknown parameter '{0}'")]
    Unknown(String),
    #[error("parameter '{name}' expects {expected}, got {actual}")]
    WrongKind {
        name: String,
        expected: ParamKind,
        actual: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineContract {
    pub name: String,
    pub version: u32,
    pub parameters: Vec<ParameterSpec>,
}

impl EngineContract {
    pub fn new(name: &str, version: u32) -> Self {
        Self {
            name: name.to_string(),
            version,
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, spec: ParameterSpec) -> Self {
        self.parameters.push(spec);
        self
    }

    pub fn parameter(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Check supplied values against the schema and fill in defaults.
    pub fn bind(
        &self,
        supplied: &BTreeMap<String, AttrValue>,
    ) -> Result<BTreeMap<String, AttrValue>, Vec<ParamBindError>> {
        let mut errors = Vec::new();
        let mut bound = BTreeMap::new();

        for name in supplied.keys() {
            if self.parameter(name).is_none() {
                errors.push(ParamBindError::Unknown(name.clone()));
            }
        }

        for spec in &self.parameters {
            match supplied.get(&spec.name) {
                Some(value) if spec.kind.accepts(value) => {
                    bound.insert(spec.name.clone(), value.clone());
                }
                Some(value) => errors.push(ParamBindError::WrongKind {
                    name: spec.name.clone(),
                    expected: spec.kind,
                    actual: value.kind(),
                }),
                None if spec.required => errors.push(ParamBindError::Missing(spec.name.clone())),
                None => {
                    if let Some(default) = &spec.default {
                        bound.insert(spec.name.clone(), default.clone());
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(bound)
        } else {
            Err(errors)
        }
    }
}

/// Parameter values resolved for one bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEngineParams {
    pub bundle: String,
    pub engine: String,
    pub engine_version: u32,
    pub values: BTreeMap<String, AttrValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineRegistry {
    contracts: BTreeMap<String, EngineContract>,
}

impl EngineRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry with the contracts of the engines shipped with the posting
    /// pipeline.
    pub fn builtin() -> Self {
        let pct = |n: i64| Some(AttrValue::Number(Number::integer(n)));
        Self::empty()
            .with(
                EngineContract::new("variance", 2)
                    .with_parameter(ParameterSpec::optional(
                        "tolerance_percent",
                        ParamKind::Decimal,
                        pct(0),
                    ))
                    .with_parameter(ParameterSpec::optional(
                        "basis",
                        ParamKind::Text,
                        Some(AttrValue::from("budget")),
                    ))
                    .with_parameter(ParameterSpec::optional(
                        "split_price_quantity",
                        ParamKind::Boolean,
                        Some(AttrValue::Bool(false)),
                    )),
            )
            .with(
                EngineContract::new("allocation", 1)
                    .with_parameter(ParameterSpec::required("method", ParamKind::Text))
                    .with_parameter(ParameterSpec::optional(
                        "rounding_places",
                        ParamKind::Integer,
                        Some(AttrValue::from(2_i64)),
                    ))
                    .with_parameter(ParameterSpec::optional("pool", ParamKind::Text, None)),
            )
            .with(
                EngineContract::new("matching", 1)
                    .with_parameter(ParameterSpec::optional(
                        "tolerance_amount",
                        ParamKind::Decimal,
                        pct(0),
                    ))
                    .with_parameter(ParameterSpec::optional(
                        "three_way",
                        ParamKind::Boolean,
                        Some(AttrValue::Bool(true)),
                    )),
            )
            .with(
                EngineContract::new("valuation", 1)
                    .with_parameter(ParameterSpec::required("model", ParamKind::Text))
                    .with_parameter(ParameterSpec::optional("discount_rate", ParamKind::Decimal, None)),
            )
            .with(
                EngineContract::new("tax", 1)
                    .with_parameter(ParameterSpec::required("rate_table", ParamKind::Text))
                    .with_parameter(ParameterSpec::optional(
                        "inclusive",
                        ParamKind::Boolean,
                        Some(AttrValue::Bool(false)),
                    )),
            )
            .with(
                EngineContract::new("billing", 1)
                    .with_parameter(ParameterSpec::optional(
                        "fee_percent",
                        ParamKind::Decimal,
                        pct(0),
                    ))
                    .with_parameter(ParameterSpec::optional(
                        "withhold_percent",
                        ParamKind::Decimal,
                        pct(0),
                    )),
            )
    }

    pub fn with(mut self, contract: EngineContract) -> Self {
        self.register(contract);
        self
    }

    /// Add or replace a contract.
    pub fn register(&mut self, contract: EngineContract) {
        self.contracts.insert(contract.name.clone(), contract);
    }

    pub fn get(&self, name: &str) -> Option<&EngineContract> {
        self.contracts.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.contracts.keys().map(String::as_str)
    }
}
