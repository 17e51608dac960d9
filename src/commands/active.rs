use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use ledgerpack::config::Config;
use ledgerpack::domain::ports::AuditRecord;
use ledgerpack::infrastructure::{FsPinStore, FsSetCatalog, JsonAuditSink};
use ledgerpack::{ActiveConfigOptions, ActiveConfigService};

/// Runs the same path the posting pipeline uses, audit record included.
/// With `--json` the audit record is written to stderr as NDJSON instead of
/// going through the log.
pub fn cmd_active(
    legal_entity: &str,
    as_of: NaiveDate,
    root: Option<PathBuf>,
    allow_drafts: bool,
    config: &Config,
    json: bool,
) -> Result<()> {
    let mut options = ActiveConfigOptions::from_config(config);
    if allow_drafts {
        options.allow_drafts = true;
    }
    let mut service = ActiveConfigService::new(FsSetCatalog::new(), FsPinStore::new(), options);
    if json {
        // Machine-readable audit trail on stderr; stdout stays the result.
        service = service.with_audit_sink(Arc::new(JsonAuditSink::stderr()));
    }
    let pack = service.get_active_config(legal_entity, as_of, root.as_deref())?;

    let record = AuditRecord::for_pack(&pack);
    if json {
        let _ = crate::ui::json::emit(serde_json::json!({
            "event": "active",
            "record": record,
            "fingerprint": pack.canonical_fingerprint().to_string(),
        }));
        return Ok(());
    }

    println!(
        "✓ {} v{} governs {} on {}",
        record.config_id, record.config_version, legal_entity, as_of
    );
    println!("  checksum     {}", record.checksum);
    println!("  fingerprint  {}", pack.canonical_fingerprint());
    println!(
        "  scope        {} / {} / {}",
        record.legal_entity, record.jurisdiction, record.regulatory_regime
    );
    println!(
        "  {} policies, {} role bindings",
        record.policy_count, record.role_binding_count
    );
    Ok(())
}
