use std::path::Path;

use anyhow::Result;
use ledgerpack::config::Config;
use ledgerpack::domain::ports::PinStore;
use ledgerpack::infrastructure::{FsPinStore, FsSetCatalog};
use ledgerpack::LedgerPackError;

/// Pin the set's current fingerprint, or remove the pin.
pub fn cmd_pin(dir: &Path, remove: bool, config: &Config, json: bool) -> Result<()> {
    let store = FsPinStore::new();

    if remove {
        let existed = store.remove_pin(dir).map_err(LedgerPackError::from)?;
        if json {
            let _ = crate::ui::json::emit(serde_json::json!({
                "event": "unpinned",
                "dir": dir.display().to_string(),
                "existed": existed,
            }));
        } else if existed {
            println!("✓ Removed {}", store.pin_path(dir).display());
        } else {
            println!("{} was not pinned", dir.display());
        }
        return Ok(());
    }

    let pack = super::pipeline(config).compile_dir(&FsSetCatalog::new(), dir)?;
    let path = store
        .write_pin(dir, pack.canonical_fingerprint())
        .map_err(LedgerPackError::from)?;

    if json {
        let _ = crate::ui::json::emit(serde_json::json!({
            "event": "pinned",
            "config_id": pack.config_id(),
            "fingerprint": pack.canonical_fingerprint().to_string(),
            "pin_path": path.display().to_string(),
        }));
    } else {
        println!(
            "✓ Pinned {} at {}",
            pack.config_id(),
            pack.canonical_fingerprint().short()
        );
        println!("  {}", path.display());
    }
    Ok(())
}
