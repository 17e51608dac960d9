//! Scenario: Releasing a pinned configuration
//!
//! Journey: a controller approves the ACME set and pins its fingerprint.
//!
//! Steps:
//! 1. `ledgerpack pin sets/acme`
//! 2. Cosmetic edits (comments, key order) keep loading
//! 3. A semantic edit without re-pinning is refused
//! 4. Re-pinning (or unpinning) accepts the change
//!
//! Success Criteria:
//! - The pin file holds exactly the lowercase hex fingerprint
//! - Integrity failures name both fingerprints and never audit

use std::fs;

use ledgerpack::domain::ports::PIN_FILE_NAME;

use crate::common::*;

fn active(fixture: &SetsFixture) -> TestResult {
    fixture.run(&["active", "ACME", "--as-of", "2024-05-01", "--json"])
}

/// SCENARIO: pin, edit, refuse, re-pin
#[test]
fn scenario_pin_protects_semantic_content() {
    let fixture = SetsFixture::standard();

    // Step 1: pin
    let result = fixture.run(&["pin", "sets/acme", "--json"]);
    assert!(result.success, "{}", result.combined_output());
    let pinned = result.events()[0]["fingerprint"].as_str().unwrap().to_string();
    assert_eq!(pinned.len(), 64);
    assert!(pinned.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    let pin_file = fs::read_to_string(fixture.set_dir("acme").join(PIN_FILE_NAME)).unwrap();
    assert_eq!(pin_file.trim_end(), pinned);

    let result = fixture.run(&["fingerprint", "sets/acme"]);
    assert_eq!(result.stdout.trim(), pinned);

    let first = active(&fixture);
    assert!(first.success, "{}", first.combined_output());
    let first_checksum = first.events()[0]["record"]["checksum"].clone();

    // Step 2: cosmetic edit, reordered keys and a comment
    let reformatted = fixture
        .read("acme/policies/budget.yaml")
        .replace(
            "    guards:\n      - \"amount > 0\"\n    precedence: 1\n",
            "    precedence: 1   # default tier\n    guards:\n      - \"amount>0\"\n",
        );
    fixture.write("acme/policies/budget.yaml", &reformatted);
    let second = active(&fixture);
    assert!(second.success, "{}", second.combined_output());
    assert_ne!(second.events()[0]["record"]["checksum"], first_checksum);
    assert_eq!(second.events()[0]["fingerprint"], pinned.as_str());

    // Step 3: semantic edit
    let changed = fixture
        .read("acme/policies/budget.yaml")
        .replace("precedence: 5", "precedence: 7");
    fixture.write("acme/policies/budget.yaml", &changed);
    let refused = fixture.run(&["active", "ACME", "--as-of", "2024-05-01"]);
    assert!(!refused.success);
    assert_eq!(refused.exit_code, 1);
    assert!(
        refused.stderr.contains("integrity mismatch for 'acme-budget'"),
        "{}",
        refused.stderr
    );
    assert!(refused.stderr.contains(&pinned[..12]), "{}", refused.stderr);

    let still_valid = fixture.run(&["check", "sets/acme"]);
    assert!(still_valid.success, "{}", still_valid.combined_output());

    // Step 4: re-pin accepts the new content
    let repin = fixture.run(&["pin", "sets/acme", "--json"]);
    assert!(repin.success);
    assert_ne!(repin.events()[0]["fingerprint"], pinned.as_str());
    assert!(active(&fixture).success);

    // Unpinning returns the set to draft mode
    let unpin = fixture.run(&["pin", "sets/acme", "--remove", "--json"]);
    assert_eq!(unpin.events()[0]["existed"], true);
    assert!(!fixture.set_dir("acme").join(PIN_FILE_NAME).exists());
    assert!(active(&fixture).success);
}

/// SCENARIO: a hand-edited pin with a trailing newline still verifies
#[test]
fn scenario_pin_file_tolerates_line_endings_only() {
    let fixture = SetsFixture::standard();
    let fingerprint = fixture.run(&["fingerprint", "sets/acme"]).stdout.trim().to_string();

    fixture.write(&format!("acme/{}", PIN_FILE_NAME), &format!("{fingerprint}\r\n"));
    assert!(active(&fixture).success);

    fixture.write(&format!("acme/{}", PIN_FILE_NAME), &fingerprint.to_uppercase());
    let result = active(&fixture);
    assert!(!result.success);
    assert_eq!(result.events()[0]["kind"], "integrity");
}

/// SCENARIO: the semantic diff shows what a re-pin would approve
#[test]
fn scenario_diff_reports_semantic_changes_only() {
    let fixture = SetsFixture::standard();
    fs::create_dir_all(fixture.set_dir("acme-next")).unwrap();
    for file in ["root.yaml", "policies/budget.yaml", "policies/expense.yaml"] {
        let content = fixture.read(&format!("acme/{file}"));
        fixture.write(&format!("acme-next/{file}"), &format!("# copy\n{content}"));
    }

    let same = fixture.run(&["diff", "sets/acme", "sets/acme-next", "--json"]);
    assert!(same.success, "{}", same.combined_output());
    assert_eq!(same.events()[0]["has_changes"], false);

    let changed = fixture
        .read("acme-next/root.yaml")
        .replace("approval_limit: 25000", "approval_limit: 50000");
    fixture.write("acme-next/root.yaml", &changed);
    let diff = fixture.run(&["diff", "sets/acme", "sets/acme-next", "--json"]);
    let event = &diff.events()[0];
    assert_eq!(event["has_changes"], true);
    let unified = event["unified"].as_str().unwrap();
    assert!(unified.contains("25000"), "{unified}");
    assert!(unified.contains("50000"), "{unified}");
}
