//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `repositories/` - Fragment assembler, set catalog, pin file store
//! - `audit/` - Audit sinks (tracing, NDJSON)

pub mod audit;
pub mod repositories;

pub use audit::{JsonAuditSink, TracingAuditSink, AUDIT_TARGET};
pub use repositories::{FsAssembler, FsPinStore, FsSetCatalog, ROOT_DESCRIPTOR};
