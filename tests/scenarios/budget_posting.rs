//! Scenario: Posting a budget entry
//!
//! Journey: the posting pipeline receives a `budget.entry` event for ACME.
//!
//! Steps:
//! 1. Load the active configuration for ACME on the event date
//! 2. Dispatch structurally, then with the event's attributes
//! 3. Check the audit record that anchors the posted entry
//!
//! Success Criteria:
//! - The ACME set wins over the wildcard set
//! - Higher precedence wins; guards decide between candidates
//! - Exactly one audit record per load, carrying the raw checksum

use std::sync::Arc;

use ledgerpack::domain::ports::{ConfigSetSource, MemoryAuditSink};
use ledgerpack::domain::value_objects::AttrValue;
use ledgerpack::infrastructure::{FsPinStore, FsSetCatalog};
use ledgerpack::{
    compile_set_dir, ActiveConfigOptions, ActiveConfigService, Dispatch, LedgerPackError,
    PolicySelector, PostingEvent, ScopeQuery,
};

use crate::common::*;

fn service(
    fixture: &SetsFixture,
) -> (ActiveConfigService<FsSetCatalog, FsPinStore>, Arc<MemoryAuditSink>) {
    let audit = Arc::new(MemoryAuditSink::new());
    let service = ActiveConfigService::new(
        FsSetCatalog::new(),
        FsPinStore::new(),
        ActiveConfigOptions::new(fixture.sets_root()),
    )
    .with_audit_sink(audit.clone());
    (service, audit)
}

/// SCENARIO: budget entry for ACME, small and large amounts
#[test]
fn scenario_budget_entry_is_dispatched_by_precedence_and_guards() {
    let fixture = SetsFixture::standard();
    let (service, audit) = service(&fixture);

    // Step 1: load
    let pack = service
        .get_active_config("ACME", date("2024-05-01"), None)
        .unwrap();
    assert_eq!(pack.config_id(), "acme-budget");
    assert_eq!(pack.config_version(), 3);
    assert_eq!(pack.policies().len(), 4);

    // Step 2: structural dispatch ignores guards, highest precedence wins
    let selector = PolicySelector::new(&pack);
    let scope = ScopeQuery::entity("ACME").with_jurisdiction("US");
    let structural = selector.select("budget.entry", date("2024-05-01"), &scope);
    assert_eq!(structural.policy().map(|p| p.name()), Some("budget_entry_large"));

    // Guards send a small amount to the ordinary policy
    let small = PostingEvent::new("budget.entry", date("2024-05-01"), scope.clone())
        .with_attribute("amount", 1200_i64);
    assert_eq!(
        selector.select_event(&small).policy().map(|p| p.name()),
        Some("budget_entry")
    );

    let large = PostingEvent::new("budget.entry", date("2024-05-01"), scope.clone())
        .with_attribute("amount", 30000_i64);
    let matched = selector.select_event(&large).policy().unwrap();
    assert_eq!(matched.name(), "budget_entry_large");
    let params = matched.engine_parameters().unwrap();
    assert_eq!(params.engine, "variance");
    assert_eq!(params.values.get("basis"), Some(&AttrValue::from("budget")));

    // Disabled capability keeps the FX policy out of dispatch
    let expense = selector.select("expense.paid", date("2024-05-01"), &scope);
    assert_eq!(expense.policy().map(|p| p.name()), Some("expense_paid"));

    // Policies inherit the set's jurisdiction
    assert_eq!(
        selector.select("budget.entry", date("2024-05-01"), &ScopeQuery::entity("ACME")),
        Dispatch::NoMatch
    );

    // Unknown event types are an ordinary miss
    assert_eq!(
        selector.select("payroll.run", date("2024-05-01"), &scope),
        Dispatch::NoMatch
    );

    // Step 3: one audit record, carrying the raw checksum
    let records = audit.records();
    assert_eq!(records.len(), 1);
    let assembled = FsSetCatalog::new().assemble(&fixture.set_dir("acme")).unwrap();
    assert_eq!(records[0].checksum, assembled.checksum.to_string());
    assert_eq!(records[0].config_version, 3);
    assert_eq!(records[0].legal_entity, "ACME");
    assert_eq!(records[0].jurisdiction, "US");
    assert_eq!(records[0].regulatory_regime, "*");
    assert_eq!(records[0].policy_count, 4);
    assert_eq!(records[0].role_binding_count, 4);
}

/// SCENARIO: one wildcard policy, dispatched on either side of its start date
#[test]
fn scenario_single_wildcard_policy_end_to_end() {
    let fixture = SetsFixture::new();
    fixture.write(
        "global/root.yaml",
        r#"config_id: global-budget
version: 1
status: PUBLISHED
scope:
  legal_entity: "*"
role_bindings:
  - { role: BUDGET_CONTROL, ledger: BUDGET }
  - { role: BUDGET_OFFSET, ledger: BUDGET }
  - { role: ENCUMBRANCE, ledger: GL }
  - { role: RESERVE, ledger: GL }
policies:
  - name: budget_entry
    trigger: { event_type: budget.entry }
    meaning: { economic_type: BUDGET_COMMITMENT }
    scope: { legal_entity: "*" }
    effective_from: 2024-01-01
    precedence: 1
    ledger_effects:
      - { ledger: BUDGET, debit_role: BUDGET_CONTROL, credit_role: BUDGET_OFFSET }
      - { ledger: GL, debit_role: ENCUMBRANCE, credit_role: RESERVE }
"#,
    );

    let pack = compile_set_dir(&fixture.set_dir("global")).unwrap();
    assert_eq!(pack.match_index().candidates("budget.entry").len(), 1);

    let selector = PolicySelector::new(&pack);
    let acme = ScopeQuery::entity("ACME");
    let matched = selector.select("budget.entry", date("2025-01-01"), &acme);
    let policy = matched.policy().unwrap();
    assert_eq!(policy.name(), "budget_entry");
    assert_eq!(policy.effects().len(), 2);

    assert_eq!(
        selector.select("budget.entry", date("2023-01-01"), &acme),
        Dispatch::NoMatch
    );
}

/// SCENARIO: another legal entity falls back to the wildcard set
#[test]
fn scenario_other_entities_use_the_shared_set() {
    let fixture = SetsFixture::standard();
    let (service, audit) = service(&fixture);

    let pack = service
        .get_active_config("GLOBEX", date("2024-05-01"), None)
        .unwrap();
    assert_eq!(pack.config_id(), "shared");

    // Before ACME's window opens only the shared set qualifies
    let early = service
        .get_active_config("ACME", date("2023-12-31"), None)
        .unwrap();
    assert_eq!(early.config_id(), "shared");

    assert_eq!(audit.records().len(), 2);
}

/// SCENARIO: nothing governs the request
#[test]
fn scenario_missing_configuration_is_not_found() {
    let fixture = SetsFixture::new();
    fixture.write("acme/root.yaml", ACME_ROOT);
    let (service, audit) = service(&fixture);

    let err = service
        .get_active_config("GLOBEX", date("2024-05-01"), None)
        .unwrap_err();
    assert!(matches!(err, LedgerPackError::NoActiveSet { .. }));

    let err = service
        .get_active_config("ACME", date("2024-05-01"), Some(fixture.sets_root().join("nope").as_path()))
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(audit.records().is_empty());
}

/// SCENARIO: the CLI shows the same result
#[test]
fn scenario_cli_active_and_select() {
    let fixture = SetsFixture::standard();

    let result = fixture.run(&["active", "ACME", "--as-of", "2024-05-01", "--json"]);
    assert!(result.success, "{}", result.combined_output());
    let events = result.events();
    assert_eq!(events[0]["event"], "active");
    assert_eq!(events[0]["record"]["config_id"], "acme-budget");
    assert_eq!(events[0]["record"]["policy_count"], 4);

    let result = fixture.run(&[
        "select",
        "sets/acme",
        "budget.entry",
        "--as-of",
        "2024-05-01",
        "--legal-entity",
        "ACME",
        "--jurisdiction",
        "US",
        "--attr",
        "amount=10",
        "--json",
    ]);
    assert!(result.success, "{}", result.combined_output());
    let events = result.events();
    assert_eq!(events[0]["policy"], "budget_entry");
    assert_eq!(events[0]["guards_evaluated"], true);

    let result = fixture.run(&["active", "NOBODY", "--as-of", "2024-05-01", "--root", "sets/acme"]);
    assert!(!result.success);
    assert_eq!(result.exit_code, 2);
}
