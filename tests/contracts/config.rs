//! CONTRACT: tool configuration comes from `ledgerpack.toml` in the working
//! directory; unknown keys warn, they do not fail.

use std::fs;

use crate::common::*;

#[test]
fn contract_project_config_sets_the_sets_root() {
    let fixture = SetsFixture::standard();
    let moved = fixture.project_root().join("config/sets");
    fs::create_dir_all(moved.parent().unwrap()).unwrap();
    fs::rename(fixture.sets_root(), &moved).unwrap();

    let missing = fixture.run(&["active", "ACME", "--as-of", "2024-05-01"]);
    assert_eq!(missing.exit_code, 2, "{}", missing.combined_output());

    fs::write(
        fixture.project_root().join("ledgerpack.toml"),
        "[sets]\nroot = \"config/sets\"\n",
    )
    .unwrap();
    let found = fixture.run(&["active", "ACME", "--as-of", "2024-05-01", "--json"]);
    assert!(found.success, "{}", found.combined_output());
    assert_eq!(found.events()[0]["record"]["config_id"], "acme-budget");
}

#[test]
fn contract_unknown_config_keys_warn_with_suggestion() {
    let fixture = SetsFixture::standard();
    fs::write(
        fixture.project_root().join("ledgerpack.toml"),
        "[sets]\nallow_draft = true\n",
    )
    .unwrap();

    let result = fixture.run(&["check", "sets/acme"]);
    assert!(result.success, "{}", result.combined_output());
    assert!(result.stderr.contains("[WARN] unknown key"), "{}", result.stderr);
    assert!(result.stderr.contains("allow_drafts"), "{}", result.stderr);
}

#[test]
fn contract_guard_identifiers_extend_the_vocabulary() {
    let fixture = SetsFixture::standard();
    fixture.write(
        "acme/policies/grants.yaml",
        "policies:\n  - name: grant_entry\n    trigger: { event_type: grant.entry }\n    meaning: { economic_type: GRANT }\n    guards: [\"grant.program == 'NSF'\"]\n    ledger_effects:\n      - { ledger: BUDGET, debit_role: BUDGET_CONTROL, credit_role: BUDGET_OFFSET }\n",
    );

    let refused = fixture.run(&["check", "sets/acme"]);
    assert!(!refused.success);
    assert!(refused.stderr.contains("grant.program"), "{}", refused.stderr);

    fs::write(
        fixture.project_root().join("ledgerpack.toml"),
        "[guards]\nidentifiers = [\"grant.*\"]\n",
    )
    .unwrap();
    let accepted = fixture.run(&["check", "sets/acme"]);
    assert!(accepted.success, "{}", accepted.combined_output());
}

#[test]
fn contract_malformed_config_is_an_error() {
    let fixture = SetsFixture::standard();
    fs::write(fixture.project_root().join("ledgerpack.toml"), "[sets\n").unwrap();
    let result = fixture.run(&["check", "sets/acme", "--json"]);
    assert!(!result.success);
    assert_eq!(result.events()[0]["kind"], "config");
}
