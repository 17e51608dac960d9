//! Scenario: Rebuilding the same configuration
//!
//! Journey: the same set is compiled on two machines, after someone
//! reorganised its fragment files.
//!
//! Success Criteria:
//! - Repeated compilation gives the same fingerprint and checksum
//! - Moving policies between files changes the checksum only
//! - Identity fields stay out of the fingerprint

use ledgerpack::compile_set_dir;

use crate::common::*;

/// SCENARIO: compile twice
#[test]
fn scenario_compilation_is_deterministic() {
    let fixture = SetsFixture::standard();
    let a = compile_set_dir(&fixture.set_dir("acme")).unwrap();
    let b = compile_set_dir(&fixture.set_dir("acme")).unwrap();

    assert_eq!(a.canonical_fingerprint(), b.canonical_fingerprint());
    assert_eq!(a.checksum(), b.checksum());
    assert_eq!(a, b);
}

/// SCENARIO: fragments are reorganised without semantic change
#[test]
fn scenario_reorganised_fragments_keep_the_fingerprint() {
    let fixture = SetsFixture::standard();
    let before = compile_set_dir(&fixture.set_dir("acme")).unwrap();

    // Swap the files' order and split expense bindings from expense policies
    let expense = fixture.read("acme/policies/expense.yaml");
    let (bindings, policies) = expense.split_at(expense.find("policies:").unwrap());
    fixture.remove("acme/policies/expense.yaml");
    fixture.write("acme/a_expense_policies.yaml", policies);
    fixture.write("acme/zz/bindings.yml", bindings);

    let after = compile_set_dir(&fixture.set_dir("acme")).unwrap();
    assert_eq!(before.canonical_fingerprint(), after.canonical_fingerprint());
    assert_ne!(before.checksum(), after.checksum());

    // Candidate order does not depend on file order either
    let names = |pack: &ledgerpack::CompiledPolicyPack| -> Vec<String> {
        pack.candidates("budget.entry").map(|p| p.name().to_string()).collect()
    };
    assert_eq!(names(&before), names(&after));
}

/// SCENARIO: a version bump alone is not a semantic change
#[test]
fn scenario_identity_fields_are_not_fingerprinted() {
    let fixture = SetsFixture::standard();
    let before = compile_set_dir(&fixture.set_dir("acme")).unwrap();

    let bumped = fixture
        .read("acme/root.yaml")
        .replace("version: 3", "version: 4")
        .replace("config_id: acme-budget", "config_id: acme-budget-fy24");
    fixture.write("acme/root.yaml", &bumped);

    let after = compile_set_dir(&fixture.set_dir("acme")).unwrap();
    assert_eq!(after.config_version(), 4);
    assert_eq!(before.canonical_fingerprint(), after.canonical_fingerprint());
}

/// SCENARIO: files that are not fragments are ignored
#[test]
fn scenario_non_fragment_files_do_not_count() {
    let fixture = SetsFixture::standard();
    let before = compile_set_dir(&fixture.set_dir("acme")).unwrap();

    fixture.write("acme/README.md", "# notes\n");
    fixture.write("acme/.drafts/wip.yaml", "policies: [oops\n");
    fixture.write("acme/APPROVED_FINGERPRINT", &before.canonical_fingerprint().to_string());

    let after = compile_set_dir(&fixture.set_dir("acme")).unwrap();
    assert_eq!(before.checksum(), after.checksum());
}
