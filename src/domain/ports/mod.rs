//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod audit_sink;
pub mod config_set_source;
pub mod pin_store;

pub use audit_sink::{AuditRecord, AuditSink, MemoryAuditSink, NoopAuditSink};
pub use config_set_source::{AssembleError, ConfigSetSource};
pub use pin_store::{PinStore, PinStoreError, PIN_FILE_NAME};
