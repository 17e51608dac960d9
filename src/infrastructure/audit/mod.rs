//! Audit sinks
//!
//! The default sink turns each audit record into a `tracing` info event
//! with target `ledgerpack::audit`, so log routing decides where it lands.

use std::io::{self, Write};
use std::sync::Mutex;

use crate::domain::ports::{AuditRecord, AuditSink};

/// Log target of audit events.
pub const AUDIT_TARGET: &str = "ledgerpack::audit";

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, record: &AuditRecord) {
        tracing::info!(
            target: "ledgerpack::audit",
            config_id = record.config_id.as_str(),
            config_version = record.config_version,
            checksum = record.checksum.as_str(),
            legal_entity = record.legal_entity.as_str(),
            jurisdiction = record.jurisdiction.as_str(),
            regulatory_regime = record.regulatory_regime.as_str(),
            effective_from = record.effective_from.as_deref(),
            effective_to = record.effective_to.as_deref(),
            policy_count = record.policy_count,
            role_binding_count = record.role_binding_count,
            "active configuration loaded"
        );
    }
}

/// Writes one JSON object per record (NDJSON).
pub struct JsonAuditSink {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonAuditSink {
    pub fn stderr() -> Self {
        Self::with_writer(io::stderr())
    }

    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }
}

impl AuditSink for JsonAuditSink {
    fn record(&self, record: &AuditRecord) {
        let line = serde_json::json!({ "event": "audit", "record": record });
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}
