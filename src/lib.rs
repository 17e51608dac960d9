//! Ledgerpack - accounting-policy configuration compiler
//!
//! Ledgerpack turns versioned YAML configuration sets into immutable
//! compiled policy packs, and dispatches posting events to the policy that
//! governs them.
//!
//! ```text
//! fragments ─▶ assemble ─▶ validate ─▶ compile ─▶ pin check ─▶ CompiledPolicyPack
//!                                                                   │
//!                                                 event ─▶ select ◀─┘
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod parser;

// Re-exports for convenience
pub use application::{compile_set_dir, ActiveConfigOptions, ActiveConfigService, CompilePipeline};
pub use config::Config;
pub use domain::entities::{CompiledPolicy, CompiledPolicyPack, EngineRegistry, PostingEvent};
pub use domain::guard::{parse_guard, GuardError, GuardVocabulary};
pub use domain::services::{Dispatch, PolicySelector};
pub use domain::value_objects::{Fingerprint, ScopeQuery};
pub use error::{LedgerPackError, PackResult};
pub use parser::parse_fragment;
