use citedate_core::Table;
use tracing::{debug, info, warn};

use crate::config::ColumnNames;
use crate::error::{require_column, ReconError};
use crate::group::group_rows;
use crate::model::{CleaningSummary, Inconsistency, Reconciled};
use crate::vote::select_canonical_date;

/// Assign every row the majority date of its citation group.
///
/// Returns a new table with the cleaned column added (or overwritten, so a
/// second pass over its own output changes nothing). Fails before producing
/// any output if the citation or date column is missing.
pub fn reconcile(table: &Table, columns: &ColumnNames) -> Result<Reconciled, ReconError> {
    let citation_col = require_column(table, &columns.citation)?;
    let date_col = require_column(table, &columns.date)?;

    let groups = group_rows(table, citation_col);
    let mut cleaned: Vec<String> = table.column(date_col).map(str::to_string).collect();
    let mut inconsistencies = Vec::new();

    for group in &groups {
        let dates = group.rows.iter().map(|&row| table.cell(row, date_col));
        let Some(canonical) = select_canonical_date(dates) else {
            continue;
        };

        if canonical.frequency.len() > 1 {
            debug!(
                citation = %group.citation,
                chosen = %canonical.date,
                tie = canonical.is_tie,
                "multiple dates for citation"
            );
            inconsistencies.push(Inconsistency {
                citation: group.citation.clone(),
                chosen: canonical.date.clone(),
                is_tie: canonical.is_tie,
                frequency: canonical.frequency.clone(),
            });
        }

        for &row in &group.rows {
            cleaned[row].clone_from(&canonical.date);
        }
    }

    if !inconsistencies.is_empty() {
        warn!(
            inconsistent = inconsistencies.len(),
            "citations had conflicting dates; majority date applied"
        );
    }
    let ties = inconsistencies.iter().filter(|i| i.is_tie).count();
    if ties > 0 {
        warn!(ties, "citations resolved by first-seen tie-break");
    }

    let summary = CleaningSummary {
        total_citations: groups.len(),
        inconsistent_citations: inconsistencies.len(),
        consistent_citations: groups.len() - inconsistencies.len(),
    };
    info!(
        rows = table.len(),
        citations = summary.total_citations,
        inconsistent = summary.inconsistent_citations,
        "reconciled citation dates"
    );

    let mut out = table.clone();
    out.set_column(&columns.cleaned, cleaned);

    Ok(Reconciled {
        table: out,
        summary,
        inconsistencies,
    })
}
