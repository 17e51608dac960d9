//! Domain Layer
//!
//! The policy DSL itself: schema, guard language, validation, compilation
//! and dispatch, without I/O.
//!
//! ## Structure
//!
//! - `value_objects/` - Scope, effective window, status, hashes, attribute values
//! - `entities/` - Raw configuration set, compiled pack, engine contracts
//! - `guard/` - Guard expression lexer, parser and evaluator
//! - `services/` - Validator, PolicyCompiler, IntegrityGuard, PolicySelector
//! - `policies/` - The `PostingRule` dispatch interface
//! - `ports/` - Interfaces implemented by infrastructure
//!
//! ## Design Principles
//!
//! 1. **No I/O** - Fragments, pin files and audit output go through ports
//! 2. **Pure Functions** - Services are stateless and testable
//! 3. **Ports & Adapters** - Infrastructure implements the traits in `ports/`

pub mod entities;
pub mod guard;
pub mod policies;
pub mod ports;
pub mod services;
pub mod value_objects;
