#![no_main]

use ledgerpack::{parse_guard, GuardError, GuardVocabulary};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(source) = std::str::from_utf8(data) {
        let vocabulary = GuardVocabulary::default();
        // Any parsed guard must survive a round trip through its canonical form
        if let Ok(expr) = parse_guard(source, &vocabulary) {
            let canonical = expr.to_string();
            match parse_guard(&canonical, &vocabulary) {
                Ok(reparsed) => assert_eq!(expr, reparsed),
                // The canonical form parenthesizes every node, so it can nest deeper
                Err(GuardError::Disallowed { .. }) => {}
                Err(e) => panic!("canonical guard {canonical:?} must parse: {e}"),
            }
        }
    }
});
