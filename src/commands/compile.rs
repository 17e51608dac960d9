use std::path::Path;

use anyhow::Result;
use ledgerpack::config::Config;
use ledgerpack::domain::services::fingerprint::canonical_text;
use ledgerpack::infrastructure::FsSetCatalog;
use ledgerpack::CompiledPolicyPack;

fn compile(dir: &Path, config: &Config) -> Result<CompiledPolicyPack> {
    Ok(super::pipeline(config).compile_dir(&FsSetCatalog::new(), dir)?)
}

pub fn cmd_compile(dir: &Path, trace: bool, config: &Config, json: bool) -> Result<()> {
    let pack = compile(dir, config)?;

    if json {
        let index: serde_json::Map<String, serde_json::Value> = pack
            .match_index()
            .event_types()
            .map(|event_type| {
                let names: Vec<&str> = pack.candidates(event_type).map(|p| p.name()).collect();
                (event_type.to_string(), serde_json::json!(names))
            })
            .collect();
        let mut event = serde_json::json!({
            "event": "compiled",
            "config_id": pack.config_id(),
            "config_version": pack.config_version(),
            "status": pack.status().map(|s| s.to_string()),
            "checksum": pack.checksum().to_string(),
            "fingerprint": pack.canonical_fingerprint().to_string(),
            "policies": pack.policies().len(),
            "role_bindings": pack.role_bindings().len(),
            "match_index": index,
        });
        if trace {
            event["trace"] = pack
                .decision_trace()
                .entries()
                .iter()
                .map(|e| serde_json::json!({"subject": e.subject, "note": e.note}))
                .collect();
        }
        let _ = crate::ui::json::emit(event);
        return Ok(());
    }

    println!(
        "✓ Compiled {} v{} ({} policies, {} role bindings)",
        pack.config_id(),
        pack.config_version(),
        pack.policies().len(),
        pack.role_bindings().len()
    );
    println!("  checksum     {}", pack.checksum());
    println!("  fingerprint  {}", pack.canonical_fingerprint());
    println!("  scope        {} {}", pack.scope(), pack.window());
    for event_type in pack.match_index().event_types() {
        let names: Vec<&str> = pack.candidates(event_type).map(|p| p.name()).collect();
        println!("  {} → {}", event_type, names.join(", "));
    }
    if trace {
        println!("\nDecision trace:");
        for entry in pack.decision_trace().entries() {
            println!("  [{}] {}", entry.subject, entry.note);
        }
    }
    Ok(())
}

pub fn cmd_fingerprint(dir: &Path, canonical: bool, config: &Config, json: bool) -> Result<()> {
    let pack = compile(dir, config)?;

    if json {
        let mut event = serde_json::json!({
            "event": "fingerprint",
            "config_id": pack.config_id(),
            "fingerprint": pack.canonical_fingerprint().to_string(),
        });
        if canonical {
            event["canonical"] =
                ledgerpack::domain::services::fingerprint::canonical_form(pack.contents());
        }
        let _ = crate::ui::json::emit(event);
    } else if canonical {
        print!("{}", canonical_text(pack.contents()));
    } else {
        println!("{}", pack.canonical_fingerprint());
    }
    Ok(())
}
