use std::path::Path;

use anyhow::Result;
use ledgerpack::config::Config;
use ledgerpack::domain::ports::ConfigSetSource;
use ledgerpack::domain::services::ValidationFailure;
use ledgerpack::infrastructure::FsSetCatalog;
use ledgerpack::LedgerPackError;

/// Validate without compiling. Fails when any check reports an error.
pub fn cmd_check(dir: &Path, config: &Config, json: bool) -> Result<()> {
    let set = FsSetCatalog::new()
        .assemble(dir)
        .map_err(LedgerPackError::from)?;
    let result = super::pipeline(config).validate(&set);

    if json {
        let _ = crate::ui::json::emit(serde_json::json!({
            "event": "check",
            "dir": dir.display().to_string(),
            "config_id": set.display_id(),
            "checksum": set.checksum.to_string(),
            "files": set.files.len(),
            "is_valid": result.is_valid,
            "errors": result.errors,
        }));
    } else if result.is_valid {
        println!(
            "✓ {} is valid ({} files, {} policies)",
            set.display_id(),
            set.files.len(),
            set.policies.len()
        );
    }

    if result.is_valid {
        return Ok(());
    }
    Err(LedgerPackError::from(ValidationFailure {
        config_id: set.display_id().to_string(),
        errors: result.errors,
    })
    .into())
}
