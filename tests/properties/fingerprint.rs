//! Property tests for the canonical fingerprint.

use proptest::prelude::*;

use ledgerpack::compile_set_dir;

use crate::common::*;

const ROOT: &str = r#"config_id: prop
version: 1
status: PUBLISHED
scope:
  legal_entity: ACME
role_bindings:
  - role: DR
    ledger: GL
  - role: CR
    ledger: GL
"#;

fn policy_yaml(index: usize, precedence: u32, guard: bool, indent_guard: bool) -> String {
    let guard = match (guard, indent_guard) {
        (false, _) => String::new(),
        (true, false) => "    guards: [\"amount > 0\"]\n".to_string(),
        (true, true) => "    guards:\n      - \"( amount  >  0 )\"\n".to_string(),
    };
    format!(
        "  - name: p{index}\n    trigger: {{ event_type: ev{event} }}\n    meaning: {{ economic_type: X }}\n    precedence: {precedence}\n{guard}    ledger_effects:\n      - {{ ledger: GL, debit_role: DR, credit_role: CR }}\n",
        event = index % 3,
        precedence = precedence * 10 + index as u32,
    )
}

fn write_set(fixture: &SetsFixture, dir: &str, files: &[Vec<String>]) {
    fixture.write(&format!("{dir}/root.yaml"), ROOT);
    for (i, policies) in files.iter().enumerate() {
        let mut content = String::from("policies:\n");
        if policies.is_empty() {
            content = String::from("# empty fragment\n");
        }
        for policy in policies {
            content.push_str(policy);
        }
        fixture.write(&format!("{dir}/part_{i}.yaml"), &content);
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 32,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: policy order, file split and guard whitespace never change
    /// the fingerprint.
    #[test]
    fn property_fingerprint_ignores_layout(
        specs in proptest::collection::vec((0u32..5, any::<bool>()), 1..8),
        seed in any::<u64>(),
        split in 1usize..4,
    ) {
        let plain: Vec<String> = specs
            .iter()
            .enumerate()
            .map(|(i, (precedence, guard))| policy_yaml(i, *precedence, *guard, false))
            .collect();
        let mut reshaped: Vec<String> = specs
            .iter()
            .enumerate()
            .map(|(i, (precedence, guard))| policy_yaml(i, *precedence, *guard, true))
            .collect();

        // Deterministic shuffle driven by the seed
        let mut state = seed;
        for i in (1..reshaped.len()).rev() {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let j = (state >> 33) as usize % (i + 1);
            reshaped.swap(i, j);
        }
        let mut files = vec![Vec::new(); split];
        for (i, policy) in reshaped.into_iter().enumerate() {
            files[i % split].push(policy);
        }

        let fixture = SetsFixture::new();
        write_set(&fixture, "a", &[plain]);
        write_set(&fixture, "b", &files);

        let a = compile_set_dir(&fixture.set_dir("a")).unwrap();
        let b = compile_set_dir(&fixture.set_dir("b")).unwrap();
        prop_assert_eq!(a.canonical_fingerprint(), b.canonical_fingerprint());
        prop_assert_eq!(a.policies().len(), specs.len());
    }

    /// PROPERTY: changing one precedence always changes the fingerprint.
    #[test]
    fn property_precedence_is_semantic(
        count in 1usize..6,
        target in 0usize..6,
    ) {
        let target = target % count;
        let base: Vec<String> = (0..count).map(|i| policy_yaml(i, 1, false, false)).collect();
        let mut bumped = base.clone();
        bumped[target] = policy_yaml(target, 3, false, false);

        let fixture = SetsFixture::new();
        write_set(&fixture, "a", &[base]);
        write_set(&fixture, "b", &[bumped]);

        let a = compile_set_dir(&fixture.set_dir("a")).unwrap();
        let b = compile_set_dir(&fixture.set_dir("b")).unwrap();
        prop_assert_ne!(a.canonical_fingerprint(), b.canonical_fingerprint());
    }
}
