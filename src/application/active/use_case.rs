//! Active Configuration Use Case
//!
//! The entry point consumed by the posting pipeline:
//! 1. Pick the set governing a legal entity on a date
//! 2. Assemble, validate and compile it
//! 3. Check the pinned fingerprint
//! 4. Emit exactly one audit record
//!
//! The returned pack is owned by the caller; nothing is cached here.

use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::entities::{CompiledPolicyPack, SetDescriptor};
use crate::domain::ports::{AuditRecord, AuditSink, ConfigSetSource, PinStore};
use crate::domain::services::{resolve_active, IntegrityGuard, PinStatus};
use crate::error::{LedgerPackError, PackResult};
use crate::infrastructure::TracingAuditSink;

use super::options::ActiveConfigOptions;

pub struct ActiveConfigService<S, P>
where
    S: ConfigSetSource,
    P: PinStore,
{
    source: S,
    pins: P,
    options: ActiveConfigOptions,
    audit: Arc<dyn AuditSink>,
}

impl<S, P> ActiveConfigService<S, P>
where
    S: ConfigSetSource,
    P: PinStore,
{
    /// Audit records go to `tracing` until another sink is set.
    pub fn new(source: S, pins: P, options: ActiveConfigOptions) -> Self {
        Self {
            source,
            pins,
            options,
            audit: Arc::new(TracingAuditSink),
        }
    }

    pub fn with_audit_sink(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = audit;
        self
    }

    pub fn options(&self) -> &ActiveConfigOptions {
        &self.options
    }

    /// Descriptor of the set that would be loaded, without compiling it.
    pub fn resolve(
        &self,
        legal_entity: &str,
        as_of: NaiveDate,
        config_dir: Option<&Path>,
    ) -> PackResult<SetDescriptor> {
        let root = config_dir.unwrap_or(&self.options.sets_root);
        let descriptors = self.source.descriptors(root)?;
        resolve_active(&descriptors, legal_entity, as_of, self.options.allow_drafts)
            .cloned()
            .ok_or_else(|| LedgerPackError::NoActiveSet {
                legal_entity: legal_entity.to_string(),
                as_of,
                root: root.to_path_buf(),
            })
    }

    pub fn get_active_config(
        &self,
        legal_entity: &str,
        as_of: NaiveDate,
        config_dir: Option<&Path>,
    ) -> PackResult<CompiledPolicyPack> {
        let descriptor = self.resolve(legal_entity, as_of, config_dir)?;
        let pack = self.load(&descriptor)?;
        self.audit.record(&AuditRecord::for_pack(&pack));
        Ok(pack)
    }

    /// Compile and verify one set. No audit record.
    pub fn load(&self, descriptor: &SetDescriptor) -> PackResult<CompiledPolicyPack> {
        let pack = self
            .options
            .pipeline
            .compile_dir(&self.source, &descriptor.dir)?;

        let status = IntegrityGuard::new(&self.pins).verify(
            pack.config_id(),
            pack.canonical_fingerprint(),
            &descriptor.dir,
        )?;
        if status == PinStatus::Unpinned {
            tracing::debug!(config_id = pack.config_id(), "set is not pinned (draft mode)");
        }
        Ok(pack)
    }
}
