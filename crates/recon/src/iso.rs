use chrono::NaiveDate;
use citedate_core::Table;
use tracing::{info, warn};

use crate::config::ColumnNames;
use crate::error::{require_column, ReconError};
use crate::model::{DateParseWarning, IsoConversion, IsoConverted};

/// Parse a strict `d.m.yyyy` string (day and month 1-2 digits, year 4 digits).
///
/// Calendar validity is checked, so `31.02.2000` is rejected.
pub fn parse_day_month_year(input: &str) -> Option<NaiveDate> {
    let mut parts = input.split('.');
    let (day, month, year) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let digits = |s: &str, min: usize, max: usize| {
        (min..=max).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
    };
    if !digits(day, 1, 2) || !digits(month, 1, 2) || !digits(year, 4, 4) {
        return None;
    }

    // Year 0 does not exist in the civil calendar
    let year: i32 = year.parse().ok()?;
    if year == 0 {
        return None;
    }

    NaiveDate::from_ymd_opt(year, month.parse().ok()?, day.parse().ok()?)
}

/// Convert `dd.mm.yyyy` to `yyyy-mm-dd`.
///
/// Never fails: unparseable input comes back unchanged with `ok == false`.
pub fn to_iso(input: &str) -> IsoConversion {
    match parse_day_month_year(input) {
        Some(date) => IsoConversion {
            iso: date.format("%Y-%m-%d").to_string(),
            ok: true,
        },
        None => IsoConversion {
            iso: input.to_string(),
            ok: false,
        },
    }
}

/// Add (or overwrite) the ISO column from the cleaned column.
///
/// Conversion failures are collected, not raised; the only error is a
/// missing cleaned column.
pub fn convert_iso(table: &Table, columns: &ColumnNames) -> Result<IsoConverted, ReconError> {
    let cleaned_col = require_column(table, &columns.cleaned)?;

    let mut failures = Vec::new();
    let iso: Vec<String> = table
        .column(cleaned_col)
        .enumerate()
        .map(|(row, value)| {
            let conversion = to_iso(value);
            if !conversion.ok {
                failures.push(DateParseWarning {
                    row,
                    value: value.to_string(),
                });
            }
            conversion.iso
        })
        .collect();

    let converted = table.len() - failures.len();
    if !failures.is_empty() {
        warn!(failed = failures.len(), "dates could not be converted to ISO form");
    }
    info!(rows = table.len(), converted, "converted cleaned dates to ISO form");

    let mut out = table.clone();
    out.set_column(&columns.iso, iso);

    Ok(IsoConverted {
        table: out,
        converted,
        failures,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_padded_date() {
        assert_eq!(
            to_iso("05.12.1999"),
            IsoConversion { iso: "1999-12-05".into(), ok: true }
        );
    }

    #[test]
    fn pads_single_digit_parts() {
        assert_eq!(to_iso("5.2.1875").iso, "1875-02-05");
        assert_eq!(to_iso("05.2.1875").iso, "1875-02-05");
    }

    #[test]
    fn rejects_impossible_calendar_dates() {
        assert_eq!(
            to_iso("31.02.2000"),
            IsoConversion { iso: "31.02.2000".into(), ok: false }
        );
        assert!(!to_iso("32.01.2000").ok);
        assert!(!to_iso("29.02.1900").ok);
        assert!(to_iso("29.02.2000").ok);
        assert!(!to_iso("01.13.2000").ok);
        assert!(!to_iso("00.01.2000").ok);
        assert_eq!(
            to_iso("01.01.0000"),
            IsoConversion { iso: "01.01.0000".into(), ok: false }
        );
        assert_eq!(to_iso("01.01.0001").iso, "0001-01-01");
    }

    #[test]
    fn rejects_malformed_shapes() {
        for input in [
            "", "01.02", "01.02.2020.1", "01/02/2020", "aa.02.2020", "01.02.20",
            "001.02.2020", "01.02.20201", " 01.02.2020", "01.02.2020 ", "1.-2.2020", "..",
        ] {
            let c = to_iso(input);
            assert!(!c.ok, "{input:?} should not convert");
            assert_eq!(c.iso, input);
        }
    }

    #[test]
    fn table_pass_collects_failures() {
        let t = Table::from_rows(
            vec!["Citation".into(), "Date_Cleaned".into()],
            vec![
                vec!["1".into(), "01.02.2020".into()],
                vec!["2".into(), "unknown".into()],
                vec!["3".into(), "".into()],
                vec!["4".into(), "unknown".into()],
            ],
        );
        let out = convert_iso(&t, &ColumnNames::default()).unwrap();
        let iso_col = out.table.column_index("Date_ISO").unwrap();
        assert_eq!(
            out.table.column(iso_col).collect::<Vec<_>>(),
            vec!["2020-02-01", "unknown", "", "unknown"]
        );
        assert_eq!(out.converted, 1);
        assert_eq!(out.failure_count(), 3);
        assert_eq!(out.failures[0], DateParseWarning { row: 1, value: "unknown".into() });
        assert_eq!(out.unique_failed_values(), vec!["unknown".to_string(), String::new()]);
    }

    #[test]
    fn table_pass_requires_cleaned_column() {
        let t = Table::from_rows(vec!["Date".into()], vec![]);
        let err = convert_iso(&t, &ColumnNames::default()).unwrap_err();
        assert_eq!(err, ReconError::MissingColumn { column: "Date_Cleaned".into() });
    }
}
