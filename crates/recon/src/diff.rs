use citedate_core::Table;

use crate::config::ColumnNames;
use crate::error::{require_column, ReconError};
use crate::group::{citation_order, group_rows};
use crate::model::DateChange;
use crate::vote::frequency_ranking;

/// List every citation whose cleaned date differs from an original date.
///
/// `before` supplies the raw dates, `after` the cleaned ones; rows are
/// aligned by position. Passing the cleaned table as both is fine, since it
/// still carries the raw date column. Output is in natural citation order.
pub fn diff(before: &Table, after: &Table, columns: &ColumnNames) -> Result<Vec<DateChange>, ReconError> {
    if before.len() != after.len() {
        return Err(ReconError::RowCountMismatch {
            before: before.len(),
            after: after.len(),
        });
    }

    let date_col = require_column(before, &columns.date)?;
    let citation_col = require_column(after, &columns.citation)?;
    let cleaned_col = require_column(after, &columns.cleaned)?;

    let mut changes: Vec<DateChange> = group_rows(after, citation_col)
        .into_iter()
        .filter(|group| {
            group
                .rows
                .iter()
                .any(|&row| before.cell(row, date_col) != after.cell(row, cleaned_col))
        })
        .map(|group| {
            let originals = || group.rows.iter().map(|&row| before.cell(row, date_col));

            let mut original_dates: Vec<String> = Vec::new();
            for date in originals() {
                if !original_dates.iter().any(|d| d == date) {
                    original_dates.push(date.to_string());
                }
            }

            DateChange {
                cleaned_date: after.cell(group.rows[0], cleaned_col).to_string(),
                frequency: frequency_ranking(originals()),
                record_count: group.rows.len(),
                original_dates,
                citation: group.citation,
            }
        })
        .collect();

    changes.sort_by(|a, b| citation_order(&a.citation, &b.citation));
    Ok(changes)
}

/// Number of rows whose raw date differs from the cleaned date.
pub fn changed_row_count(table: &Table, columns: &ColumnNames) -> Result<usize, ReconError> {
    let date_col = require_column(table, &columns.date)?;
    let cleaned_col = require_column(table, &columns.cleaned)?;
    Ok(table
        .raw_rows()
        .iter()
        .filter(|row| row[date_col] != row[cleaned_col])
        .count())
}
