// Property-based tests for the reconciliation passes.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use proptest::prelude::*;
use citedate_recon::config::ColumnNames;
use citedate_recon::{convert_iso, reconcile, select_canonical_date, to_iso, Table};

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

/// Date-ish strings: mostly well-formed, sometimes junk or empty.
fn arb_date_text() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => (1u32..=31, 1u32..=12, 1800i32..=1950)
            .prop_map(|(d, m, y)| format!("{d:02}.{m:02}.{y}")),
        1 => r"[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{2,5}",
        1 => r"[a-z ]{0,8}",
        1 => Just(String::new()),
    ]
}

/// Small citation alphabet so groups actually collide.
fn arb_citation() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => (1u32..12).prop_map(|n| n.to_string()),
        1 => r"[A-C]-[0-9]",
    ]
}

fn arb_table() -> impl Strategy<Value = Table> {
    prop::collection::vec((arb_citation(), arb_date_text(), r"[A-Z][a-z]{2,6}"), 0..60).prop_map(
        |rows| {
            Table::from_rows(
                vec!["Citation".into(), "Date".into(), "Surname".into()],
                rows.into_iter().map(|(c, d, s)| vec![c, d, s]).collect(),
            )
        },
    )
}

fn arb_valid_date() -> impl Strategy<Value = NaiveDate> {
    (0i64..(200 * 366)).prop_map(|offset| {
        NaiveDate::from_ymd_opt(1800, 1, 1).unwrap() + chrono::Duration::days(offset)
    })
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn reconcile_leaves_one_date_per_citation(table in arb_table()) {
        let columns = ColumnNames::default();
        let out = reconcile(&table, &columns).unwrap().table;
        let cite = out.column_index("Citation").unwrap();
        let cleaned = out.column_index("Date_Cleaned").unwrap();

        let mut per_citation: HashMap<&str, HashSet<&str>> = HashMap::new();
        for row in out.raw_rows() {
            per_citation.entry(row[cite].as_str()).or_default().insert(row[cleaned].as_str());
        }
        for (citation, values) in per_citation {
            prop_assert_eq!(values.len(), 1, "citation {} has {:?}", citation, values);
        }
    }

    #[test]
    fn reconcile_is_idempotent(table in arb_table()) {
        let columns = ColumnNames::default();
        let once = reconcile(&table, &columns).unwrap().table;
        let twice = reconcile(&once, &columns).unwrap().table;
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn row_count_is_invariant(table in arb_table()) {
        let columns = ColumnNames::default();
        let cleaned = reconcile(&table, &columns).unwrap().table;
        let converted = convert_iso(&cleaned, &columns).unwrap();
        prop_assert_eq!(table.len(), cleaned.len());
        prop_assert_eq!(cleaned.len(), converted.table.len());
        prop_assert_eq!(converted.converted + converted.failure_count(), table.len());
    }

    #[test]
    fn canonical_date_is_deterministic_and_a_mode(dates in prop::collection::vec(arb_date_text(), 1..20)) {
        let a = select_canonical_date(dates.iter().map(String::as_str)).unwrap();
        let b = select_canonical_date(dates.iter().map(String::as_str)).unwrap();
        prop_assert_eq!(&a, &b);

        let best = dates.iter().filter(|d| **d == a.date).count();
        for d in &dates {
            prop_assert!(dates.iter().filter(|x| *x == d).count() <= best);
        }
        // Among values tied at the top count, the winner was seen first.
        let first_top = dates
            .iter()
            .find(|d| dates.iter().filter(|x| x == d).count() == best)
            .unwrap();
        prop_assert_eq!(first_top, &a.date);
    }

    #[test]
    fn iso_round_trips_valid_dates(date in arb_valid_date(), pad in any::<bool>()) {
        let input = if pad {
            date.format("%d.%m.%Y").to_string()
        } else {
            date.format("%-d.%-m.%Y").to_string()
        };
        let c = to_iso(&input);
        prop_assert!(c.ok, "{} should convert", input);
        let reparsed = NaiveDate::parse_from_str(&c.iso, "%Y-%m-%d").unwrap();
        prop_assert_eq!(reparsed, date);
        prop_assert_eq!(c.iso.len(), 10);
    }

    #[test]
    fn iso_failure_passes_input_through(input in ".{0,16}") {
        let c = to_iso(&input);
        if !c.ok {
            prop_assert_eq!(c.iso, input);
        }
    }
}
