use citedate_core::Table;
use tracing::{error, info};

use crate::config::ColumnNames;
use crate::error::{require_column, ReconError};
use crate::group::group_rows;
use crate::model::{CitationValues, ValidationReport};

/// Check that every citation carries a single cleaned date.
///
/// A failing report means reconciliation was skipped or broken upstream.
pub fn validate(table: &Table, columns: &ColumnNames) -> Result<ValidationReport, ReconError> {
    let citation_col = require_column(table, &columns.citation)?;
    let cleaned_col = require_column(table, &columns.cleaned)?;

    let groups = group_rows(table, citation_col);
    let mut offenders = Vec::new();

    for group in &groups {
        let mut values: Vec<String> = Vec::new();
        for &row in &group.rows {
            let value = table.cell(row, cleaned_col);
            if !values.iter().any(|v| v == value) {
                values.push(value.to_string());
            }
        }
        if values.len() > 1 {
            offenders.push(CitationValues {
                citation: group.citation.clone(),
                values,
            });
        }
    }

    if offenders.is_empty() {
        info!(citations = groups.len(), "all citations have consistent cleaned dates");
    } else {
        error!(offenders = offenders.len(), "citations with inconsistent cleaned dates");
    }

    Ok(ValidationReport {
        ok: offenders.is_empty(),
        checked_citations: groups.len(),
        offenders,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[(&str, &str)]) -> Table {
        Table::from_rows(
            vec!["Citation".into(), "Date_Cleaned".into()],
            rows.iter().map(|(c, d)| vec![c.to_string(), d.to_string()]).collect(),
        )
    }

    #[test]
    fn consistent_table_passes() {
        let t = table(&[("1", "a"), ("1", "a"), ("2", "b")]);
        let report = validate(&t, &ColumnNames::default()).unwrap();
        assert!(report.ok);
        assert_eq!(report.checked_citations, 2);
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn offenders_listed_with_all_values() {
        let t = table(&[("1", "a"), ("2", "x"), ("1", "b"), ("1", "a"), ("2", "y"), ("3", "z")]);
        let report = validate(&t, &ColumnNames::default()).unwrap();
        assert!(!report.ok);
        assert_eq!(report.offenders.len(), 2);
        assert_eq!(report.offenders[0].citation, "1");
        assert_eq!(report.offenders[0].values, vec!["a", "b"]);
        assert_eq!(report.offenders[1].values, vec!["x", "y"]);

        let err = report.into_result().unwrap_err();
        assert_eq!(
            err,
            ReconError::ConsistencyViolation { citations: vec!["1".into(), "2".into()] }
        );
    }

    #[test]
    fn requires_cleaned_column() {
        let t = Table::from_rows(
            vec!["Citation".into(), "Date".into()],
            vec![vec!["1".into(), "a".into()]],
        );
        let err = validate(&t, &ColumnNames::default()).unwrap_err();
        assert!(err.to_string().contains("Date_Cleaned"));
    }
}
