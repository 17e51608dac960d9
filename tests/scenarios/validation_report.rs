//! Scenario: Reviewing a broken configuration set
//!
//! Journey: an author submits a set with one defect of every kind and
//! wants the whole list in one run.
//!
//! Success Criteria:
//! - All four checks report, in one pass
//! - The entry point refuses the set with the same list and no audit

use std::sync::Arc;

use ledgerpack::domain::ports::{ConfigSetSource, MemoryAuditSink};
use ledgerpack::domain::services::Check;
use ledgerpack::infrastructure::{FsPinStore, FsSetCatalog};
use ledgerpack::{ActiveConfigOptions, ActiveConfigService, CompilePipeline, LedgerPackError};

use crate::common::*;

/// SCENARIO: one call surfaces every defect
#[test]
fn scenario_every_check_reports_at_once() {
    let fixture = SetsFixture::new();
    fixture.write("broken/root.yaml", BROKEN_ROOT);

    let set = FsSetCatalog::new().assemble(&fixture.set_dir("broken")).unwrap();
    let result = CompilePipeline::new().validate(&set);

    assert!(!result.is_valid);
    assert_eq!(result.count(Check::Schema), 1, "{:#?}", result.errors);
    assert_eq!(result.count(Check::Guard), 1, "{:#?}", result.errors);
    assert_eq!(result.count(Check::Ambiguity), 1, "{:#?}", result.errors);
    assert!(result.count(Check::RoleCoverage) >= 1, "{:#?}", result.errors);

    let text = result.errors.join("\n");
    assert!(text.contains("policies.0.colour"), "{text}");
    assert!(text.contains("bad_guard"), "{text}");
    assert!(text.contains("twin_one") && text.contains("twin_two"), "{text}");
    assert!(text.contains("REVENUE"), "{text}");
}

/// SCENARIO: drafts may be loaded in development, but never when invalid
#[test]
fn scenario_invalid_draft_is_refused_by_the_entry_point() {
    let fixture = SetsFixture::new();
    fixture.write("broken/root.yaml", BROKEN_ROOT);
    let audit = Arc::new(MemoryAuditSink::new());
    let service = ActiveConfigService::new(
        FsSetCatalog::new(),
        FsPinStore::new(),
        ActiveConfigOptions::new(fixture.sets_root()).with_allow_drafts(true),
    )
    .with_audit_sink(audit.clone());

    let err = service
        .get_active_config("ACME", date("2024-05-01"), None)
        .unwrap_err();
    let LedgerPackError::Validation(failure) = &err else {
        panic!("expected validation failure, got {err:?}");
    };
    assert_eq!(failure.config_id, "broken");
    assert!(failure.errors.len() >= 4);
    assert!(audit.records().is_empty());
}

/// SCENARIO: the CLI lists every error, as JSON for CI
#[test]
fn scenario_cli_check_reports_all_errors() {
    let fixture = SetsFixture::new();
    fixture.write("broken/root.yaml", BROKEN_ROOT);

    let result = fixture.run(&["check", "sets/broken", "--json"]);
    assert!(!result.success);
    let events = result.events();
    assert_eq!(events[0]["event"], "check");
    assert_eq!(events[0]["is_valid"], false);
    let errors = events[0]["errors"].as_array().unwrap();
    assert!(errors.len() >= 4);
    assert_eq!(events[1]["event"], "error");
    assert_eq!(events[1]["kind"], "validation");

    let human = fixture.run(&["check", "sets/broken"]);
    assert!(!human.success);
    assert!(human.stderr.contains("failed validation"), "{}", human.stderr);
    assert!(human.stderr.contains("  - guard: "), "{}", human.stderr);
}

/// SCENARIO: merge conflicts and YAML errors stop before validation
#[test]
fn scenario_structural_errors_name_the_file() {
    let fixture = SetsFixture::standard();
    fixture.write(
        "acme/policies/zz_dup.yaml",
        "engine_parameters:\n  std_variance:\n    engine: variance\n",
    );
    let result = fixture.run(&["check", "sets/acme", "--json"]);
    assert!(!result.success);
    let event = &result.events()[0];
    assert_eq!(event["kind"], "structural");
    let message = event["message"].as_str().unwrap();
    assert!(message.contains("zz_dup.yaml"), "{message}");
    assert!(message.contains("std_variance"), "{message}");

    fixture.write("acme/policies/zz_dup.yaml", "policies: [unclosed\n");
    let result = fixture.run(&["compile", "sets/acme", "--json"]);
    assert_eq!(result.events()[0]["kind"], "structural");
}
