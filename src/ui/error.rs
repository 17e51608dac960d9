use ledgerpack::LedgerPackError;

/// Human-readable rendering; validation failures list every error.
pub fn format_error(err: &anyhow::Error) -> String {
    let Some(pack_err) = err.downcast_ref::<LedgerPackError>() else {
        return format!("[ERROR] {}\n", err);
    };

    let mut out = format!("[ERROR] {}\n", pack_err);
    for message in pack_err.validation_errors() {
        out.push_str("  - ");
        out.push_str(message);
        out.push('\n');
    }
    out
}

pub fn error_event(err: &anyhow::Error) -> serde_json::Value {
    match err.downcast_ref::<LedgerPackError>() {
        Some(pack_err) => serde_json::json!({
            "event": "error",
            "kind": pack_err.kind(),
            "message": pack_err.to_string(),
            "errors": pack_err.validation_errors(),
        }),
        None => serde_json::json!({
            "event": "error",
            "kind": "other",
            "message": err.to_string(),
        }),
    }
}

pub fn print_error(err: &anyhow::Error, json: bool) {
    if json {
        let _ = crate::ui::json::emit(error_event(err));
        return;
    }
    eprint!("{}", format_error(err));
}

/// Process exit code: 2 for a missing set, 1 for everything else.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<LedgerPackError>() {
        Some(pack_err) if pack_err.is_not_found() => 2,
        _ => 1,
    }
}
