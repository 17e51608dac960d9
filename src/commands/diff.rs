use std::path::Path;

use anyhow::Result;
use ledgerpack::config::Config;
use ledgerpack::domain::services::PackDiff;
use ledgerpack::infrastructure::FsSetCatalog;

pub fn cmd_diff(old: &Path, new: &Path, config: &Config, json: bool) -> Result<()> {
    let pipeline = super::pipeline(config);
    let source = FsSetCatalog::new();
    let old_pack = pipeline.compile_dir(&source, old)?;
    let new_pack = pipeline.compile_dir(&source, new)?;
    let diff = PackDiff::between(&old_pack, &new_pack);

    if json {
        let _ = crate::ui::json::emit(serde_json::json!({
            "event": "diff",
            "old": old_pack.canonical_fingerprint().to_string(),
            "new": new_pack.canonical_fingerprint().to_string(),
            "has_changes": diff.has_changes(),
            "additions": diff.additions,
            "deletions": diff.deletions,
            "unified": diff.unified,
        }));
        return Ok(());
    }

    if !diff.has_changes() {
        println!("No semantic changes (fingerprint {})", new_pack.canonical_fingerprint().short());
        return Ok(());
    }
    print!("{}", diff.unified);
    println!("\n{}", diff.summary());
    Ok(())
}
