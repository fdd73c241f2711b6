//! Property-based tests using proptest

use proptest::prelude::*;
use freqcheck_rs::{
    ground_truth, rank, Checker, FrequencyTable, RankedList, ResultParser, Tokenize, Tokenizer,
};

fn corpus() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            "[a-eA-E]{1,4}",
            "[a-c]{1,3}[,.!_0-9]{0,2}",
            "[0-9,.;!-]{1,3}",
        ],
        0..60,
    )
    .prop_map(|words| words.join(" "))
}

fn shuffled_corpus() -> impl Strategy<Value = (Vec<String>, Vec<String>)> {
    prop::collection::vec("[a-f]{1,3}", 0..40)
        .prop_flat_map(|words| (Just(words.clone()), Just(words).prop_shuffle()))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn ground_truth_is_idempotent(text in corpus()) {
        let tokenizer = Tokenizer::new();
        prop_assert_eq!(ground_truth(&text, &tokenizer), ground_truth(&text, &tokenizer));
    }

    #[test]
    fn ground_truth_is_canonically_ordered(text in corpus()) {
        let truth = ground_truth(&text, &Tokenizer::new());
        for pair in truth.entries().windows(2) {
            let (e1, e2) = (&pair[0], &pair[1]);
            prop_assert!(
                e1.count > e2.count || (e1.count == e2.count && e1.token < e2.token),
                "{} before {}", e1, e2
            );
        }
        prop_assert!(truth.is_canonical());
    }

    #[test]
    fn ground_truth_is_complete(text in corpus()) {
        let tokenizer = Tokenizer::new();
        let truth = ground_truth(&text, &tokenizer);
        let tokens = tokenizer.tokenize(&text).collect::<Vec<_>>();
        let mut distinct = tokens.clone();
        distinct.sort();
        distinct.dedup();

        prop_assert_eq!(truth.len(), distinct.len());
        prop_assert_eq!(truth.total(), tokens.len() as u64);
        for entry in &truth {
            prop_assert!(!entry.token.is_empty());
            prop_assert!(entry.token.chars().all(|c| c.is_ascii_lowercase()));
        }
    }

    #[test]
    fn counting_ignores_token_order((words, shuffled) in shuffled_corpus()) {
        let t1 = FrequencyTable::from_tokens(words);
        let t2 = FrequencyTable::from_tokens(shuffled);
        prop_assert_eq!(rank(&t1), rank(&t2));
        prop_assert_eq!(t1, t2);
    }

    #[test]
    fn canonical_output_round_trips_through_parser(text in corpus()) {
        let truth = ground_truth(&text, &Tokenizer::new());
        let rendered = truth.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n");
        let parsed = ResultParser::default().parse_str(&rendered);
        prop_assert!(parsed.warnings.is_empty());
        prop_assert!(Checker::default().compare(&truth, &parsed.entries, "truth", "echo").passed());
    }

    #[test]
    fn any_discrepancy_fails_and_total_bounds_retained(
        text in corpus(),
        drop in 0usize..8,
        limit in 0usize..4,
    ) {
        let truth = ground_truth(&text, &Tokenizer::new());
        let found = truth.iter().skip(drop).cloned().collect::<RankedList>();
        let comparison = Checker::default()
            .with_max_reported(limit)
            .compare(&truth, &found, "truth", "truncated");

        prop_assert!(comparison.discrepancies.len() <= limit);
        prop_assert!(comparison.discrepancies.len() <= comparison.total);
        prop_assert_eq!(comparison.passed(), drop == 0 || truth.is_empty());
        if drop > 0 && !truth.is_empty() {
            // size mismatch, one missing token per dropped entry, and the first
            // position where the shifted tail no longer lines up
            let shifted = usize::from(truth.len() > 2 * drop);
            prop_assert_eq!(comparison.total, 1 + drop.min(truth.len()) + shifted);
        }
    }
}
