// Property-based tests for scoring and joining.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use std::collections::BTreeSet;

use proptest::prelude::*;
use concord_recon::align::align;
use concord_recon::engine::compare;
use concord_recon::score::score_verdicts;
use concord_recon::{CompareOptions, Table};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

fn arb_verdict() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("normal".to_string()),
        Just("double-expansion".to_string()),
        Just("expanded".to_string()),
    ]
}

fn arb_confidence() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("high".to_string()),
        Just("low".to_string()),
        Just("borderline".to_string()),
    ]
}

type Record = (String, String, String);

/// Rows keyed by distinct identifiers drawn from a small pool so the two
/// tables overlap often.
fn arb_table_rows() -> impl Strategy<Value = Vec<Record>> {
    proptest::collection::btree_set("[a-h]{1,2}", 1..=12).prop_flat_map(|ids| {
        let n = ids.len();
        (
            Just(ids.into_iter().collect::<Vec<_>>()),
            proptest::collection::vec(arb_verdict(), n),
            proptest::collection::vec(arb_confidence(), n),
        )
            .prop_map(|(ids, verdicts, confidences)| {
                ids.into_iter()
                    .zip(verdicts)
                    .zip(confidences)
                    .map(|((id, v), c)| (id, v, c))
                    .collect()
            })
    })
}

fn build(label: &str, rows: &[Record]) -> Table {
    Table::from_records(
        label,
        "Path",
        vec!["Path".into(), "Verdict".into(), "Confidence".into()],
        rows.iter()
            .map(|(id, v, c)| vec![id.clone(), v.clone(), c.clone()])
            .collect(),
    )
    .unwrap()
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn scoring_is_symmetric(
        v1 in arb_verdict(), v2 in arb_verdict(),
        c1 in arb_confidence(), c2 in arb_confidence(),
    ) {
        let ab = score_verdicts(&v1, &v2, &c1, &c2, "high");
        let ba = score_verdicts(&v2, &v1, &c2, &c1, "high");
        prop_assert_eq!(ab, ba);
    }

    #[test]
    fn score_bounds_follow_verdict_agreement(
        v1 in arb_verdict(), v2 in arb_verdict(),
        c1 in arb_confidence(), c2 in arb_confidence(),
    ) {
        match score_verdicts(&v1, &v2, &c1, &c2, "high") {
            None => prop_assert!(v1.is_empty() || v2.is_empty()),
            Some(d) => {
                prop_assert_eq!(d.discordant_verdict, v1 != v2);
                if d.discordant_verdict {
                    prop_assert!((2..=4).contains(&d.score));
                } else {
                    prop_assert!(d.score <= 1);
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Join and sort
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn join_covers_identifier_union(left in arb_table_rows(), right in arb_table_rows()) {
        let t1 = build("a", &left);
        let t2 = build("b", &right);
        let alignment = align(&t1, &t2, &CompareOptions::default());

        let expected: BTreeSet<&str> = t1.ids().chain(t2.ids()).collect();
        let got: Vec<&str> = alignment.rows.iter().map(|r| r.id.as_str()).collect();
        prop_assert_eq!(got, expected.into_iter().collect::<Vec<_>>());

        for row in &alignment.rows {
            prop_assert_eq!(row.in_left, t1.contains_id(&row.id));
            prop_assert_eq!(row.in_right, t2.contains_id(&row.id));
        }
    }

    #[test]
    fn sorted_rows_are_non_increasing(left in arb_table_rows(), right in arb_table_rows()) {
        let t1 = build("a", &left);
        let t2 = build("b", &right);
        let Ok(cmp) = compare(&t1, &t2, &CompareOptions::default(), None) else {
            // disjoint identifiers
            return Ok(());
        };

        let scores: Vec<Option<u8>> = cmp
            .rows
            .iter()
            .map(|r| r.discordance().map(|d| d.score))
            .collect();
        let first_unscored = scores.iter().position(Option::is_none).unwrap_or(scores.len());
        prop_assert!(scores[first_unscored..].iter().all(Option::is_none));
        for pair in scores[..first_unscored].windows(2) {
            prop_assert!(pair[0] >= pair[1]);
        }
        prop_assert_eq!(cmp.rows.len(), cmp.to_output_table().len());
    }
}
