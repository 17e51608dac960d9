//! Property tests for the guard parser.

use proptest::prelude::*;

use ledgerpack::domain::guard::MAX_NESTING;
use ledgerpack::{parse_guard, GuardError, GuardVocabulary};

fn guard_token() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("amount".to_string()),
        Just("currency".to_string()),
        Just("payload.source".to_string()),
        Just("payload.a.b".to_string()),
        Just("len".to_string()),
        Just("and".to_string()),
        Just("or".to_string()),
        Just("not".to_string()),
        Just("in".to_string()),
        Just("==".to_string()),
        Just("!=".to_string()),
        Just("<=".to_string()),
        Just(">".to_string()),
        Just("=".to_string()),
        Just("(".to_string()),
        Just(")".to_string()),
        Just("[".to_string()),
        Just("]".to_string()),
        Just(",".to_string()),
        Just("'USD'".to_string()),
        Just("\"x\"".to_string()),
        Just("'unterminated".to_string()),
        Just("10.5".to_string()),
        Just("-3".to_string()),
        Just("true".to_string()),
        Just("null".to_string()),
    ]
}

fn simple_comparison() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("amount"), Just("quantity"), Just("unit_price")],
        prop_oneof![Just("=="), Just("!="), Just("<"), Just("<="), Just(">"), Just(">=")],
        -1000i64..1000,
    )
        .prop_map(|(ident, op, n)| format!("{ident} {op} {n}"))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: arbitrary text never panics the parser.
    #[test]
    fn property_parser_never_panics_on_arbitrary_text(source in ".{0,80}") {
        let _ = parse_guard(&source, &GuardVocabulary::default());
    }

    /// PROPERTY: token soup never panics the parser.
    #[test]
    fn property_parser_never_panics_on_token_soup(
        tokens in proptest::collection::vec(guard_token(), 0..16)
    ) {
        let source = tokens.join(" ");
        let _ = parse_guard(&source, &GuardVocabulary::default());
    }

    /// PROPERTY: the canonical rendering parses back to the same tree.
    #[test]
    fn property_canonical_rendering_is_stable(
        parts in proptest::collection::vec(simple_comparison(), 1..5),
        use_or in any::<bool>(),
        negate in any::<bool>(),
    ) {
        let joiner = if use_or { " or " } else { " and " };
        let mut source = parts.join(joiner);
        if negate {
            source = format!("not ({source})");
        }
        let vocabulary = GuardVocabulary::default();
        let parsed = parse_guard(&source, &vocabulary).unwrap();
        let rendered = parsed.to_string();
        let reparsed = parse_guard(&rendered, &vocabulary).unwrap();
        prop_assert_eq!(&parsed, &reparsed);
        prop_assert_eq!(rendered, reparsed.to_string());
    }

    /// PROPERTY: nesting is accepted up to the limit and rejected past it.
    #[test]
    fn property_nesting_depth_is_bounded(depth in 0usize..400, negate in any::<bool>()) {
        let source = if negate {
            format!("{}is_reversal", "not ".repeat(depth))
        } else {
            format!("{}amount > 0{}", "(".repeat(depth), ")".repeat(depth))
        };
        let result = parse_guard(&source, &GuardVocabulary::default());
        if depth <= MAX_NESTING {
            prop_assert!(result.is_ok(), "{:?}", result);
        } else {
            let rejected = matches!(result, Err(GuardError::Disallowed { .. }));
            prop_assert!(rejected, "{:?}", result);
        }
    }
}
