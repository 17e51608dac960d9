//! Audit Sink Port
//!
//! Every successful active-configuration lookup produces exactly one
//! [`AuditRecord`]. Journal entries posted later refer back to it.

use std::sync::Mutex;

use serde::Serialize;

use crate::domain::entities::CompiledPolicyPack;
use crate::domain::value_objects::format_date;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditRecord {
    pub config_id: String,
    pub config_version: u32,
    pub checksum: String,
    pub legal_entity: String,
    pub jurisdiction: String,
    pub regulatory_regime: String,
    /// `YYYY-MM-DD`, absent when unbounded.
    pub effective_from: Option<String>,
    /// Exclusive end, `YYYY-MM-DD`, absent when open-ended.
    pub effective_to: Option<String>,
    pub policy_count: usize,
    pub role_binding_count: usize,
}

impl AuditRecord {
    pub fn for_pack(pack: &CompiledPolicyPack) -> Self {
        let scope = pack.scope();
        let window = pack.window();
        Self {
            config_id: pack.config_id().to_string(),
            config_version: pack.config_version(),
            checksum: pack.checksum().to_string(),
            legal_entity: scope.legal_entity.to_string(),
            jurisdiction: scope.jurisdiction.to_string(),
            regulatory_regime: scope.regulatory_regime.to_string(),
            effective_from: window.from().map(format_date),
            effective_to: window.to().map(format_date),
            policy_count: pack.policies().len(),
            role_binding_count: pack.role_bindings().len(),
        }
    }
}

pub trait AuditSink: Send + Sync {
    fn record(&self, record: &AuditRecord);
}

/// Discards records.
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record(&self, _record: &AuditRecord) {}
}

/// Keeps records in memory.
#[derive(Default)]
pub struct MemoryAuditSink {
    records: Mutex<Vec<AuditRecord>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<AuditRecord> {
        self.records
            .lock()
            .map(|r| r.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, record: &AuditRecord) {
        match self.records.lock() {
            Ok(mut records) => records.push(record.clone()),
            Err(poisoned) => poisoned.into_inner().push(record.clone()),
        }
    }
}
