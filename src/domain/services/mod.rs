//! Domain Services
//!
//! Pure business logic over domain entities: validation, compilation,
//! fingerprinting, semantic diffs, integrity checks and dispatch. No I/O; the pin file is
//! reached through the [`PinStore`](crate::domain::ports::PinStore) port.

mod compiler;
pub mod fingerprint;
mod integrity;
mod pack_diff;
mod selector;
mod set_resolver;
mod validator;

pub use compiler::{CompileError, PolicyCompiler};
pub use integrity::{IntegrityError, IntegrityGuard, IntegrityMismatch, PinStatus};
pub use pack_diff::{DiffLine, DiffTag, PackDiff};
pub use selector::{Dispatch, PolicySelector};
pub use set_resolver::resolve_active;
pub use validator::{
    Check, ValidatedPolicy, ValidatedSet, ValidationFailure, ValidationIssue, ValidationResult,
    Validator,
};
