//! Domain Entities
//!
//! - `ConfigurationSet` / `PolicyDefinition` - raw schema as assembled from fragments
//! - `CompiledPolicyPack` / `CompiledPolicy` - the immutable runtime artifact
//! - `EngineRegistry` / `EngineContract` - calculation engine parameter schemas
//! - `SetDescriptor` - a set's header, read without assembling it
//! - `PostingEvent` - the business event handed to the selector

mod compiled;
mod configuration_set;
mod descriptor;
mod engine;
mod event;
mod policy;

pub use compiled::{
    CompiledLedgerEffect, CompiledPolicy, CompiledPolicyBuilder, CompiledPolicyPack,
    CompiledRoleBinding, DeadPolicy, DecisionTrace, MatchIndex, PackContents, TraceEntry,
};
pub use configuration_set::{
    ConfigurationSet, EngineParameterBundle, RoleBinding, SetScopeDef, UnknownField,
};
pub use descriptor::SetDescriptor;
pub use engine::{
    EngineContract, EngineRegistry, ParamBindError, ParamKind, ParameterSpec,
    ResolvedEngineParams,
};
pub use event::PostingEvent;
pub use policy::{LedgerEffect, Meaning, PolicyDefinition, ScopeDef, Trigger};
