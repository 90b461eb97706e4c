use std::collections::HashSet;

use citedate_core::Table;
use serde::Serialize;

use crate::error::{require_column, ReconError};

/// Distinct count and lexical range of one column. Empty cells are ignored,
/// matching how blank CSV fields are treated as missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnStats {
    pub column: String,
    pub unique: usize,
    pub min: Option<String>,
    pub max: Option<String>,
}

pub fn column_stats(table: &Table, name: &str) -> Result<ColumnStats, ReconError> {
    let col = require_column(table, name)?;

    let mut seen: HashSet<&str> = HashSet::new();
    let mut min: Option<&str> = None;
    let mut max: Option<&str> = None;
    for value in table.column(col).filter(|v| !v.is_empty()) {
        seen.insert(value);
        min = Some(min.map_or(value, |m| m.min(value)));
        max = Some(max.map_or(value, |m| m.max(value)));
    }

    Ok(ColumnStats {
        column: name.to_string(),
        unique: seen.len(),
        min: min.map(str::to_string),
        max: max.map(str::to_string),
    })
}

/// Number of distinct values in a column, empties included.
pub fn distinct_count(table: &Table, name: &str) -> Result<usize, ReconError> {
    let col = require_column(table, name)?;
    Ok(table.column(col).collect::<HashSet<_>>().len())
}

/// Rows where every named column holds a non-empty value.
pub fn rows_with_all(table: &Table, names: &[&str]) -> Result<usize, ReconError> {
    let cols = names
        .iter()
        .map(|name| require_column(table, name))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(table
        .raw_rows()
        .iter()
        .filter(|row| cols.iter().all(|&c| !row[c].is_empty()))
        .count())
}

/// Headers that mention "Date", in table order.
pub fn date_columns(table: &Table) -> Vec<String> {
    table
        .headers()
        .iter()
        .filter(|h| h.contains("Date"))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        Table::from_rows(
            vec!["Citation".into(), "Date".into(), "Date_ISO".into(), "Name".into()],
            vec![
                vec!["1".into(), "02.01.1880".into(), "1880-01-02".into(), "A".into()],
                vec!["1".into(), "".into(), "".into(), "B".into()],
                vec!["2".into(), "01.03.1879".into(), "1879-03-01".into(), "C".into()],
                vec!["3".into(), "02.01.1880".into(), "1880-01-02".into(), "D".into()],
            ],
        )
    }

    #[test]
    fn stats_skip_empty_cells() {
        let s = column_stats(&table(), "Date_ISO").unwrap();
        assert_eq!(s.unique, 2);
        assert_eq!(s.min.as_deref(), Some("1879-03-01"));
        assert_eq!(s.max.as_deref(), Some("1880-01-02"));
    }

    #[test]
    fn stats_on_empty_column() {
        let t = Table::new(vec!["Date".into()]);
        let s = column_stats(&t, "Date").unwrap();
        assert_eq!(s.unique, 0);
        assert!(s.min.is_none() && s.max.is_none());
    }

    #[test]
    fn distinct_counts_citations() {
        assert_eq!(distinct_count(&table(), "Citation").unwrap(), 3);
    }

    #[test]
    fn rows_with_all_requires_every_cell() {
        assert_eq!(rows_with_all(&table(), &["Date", "Date_ISO"]).unwrap(), 3);
        assert!(rows_with_all(&table(), &["Date", "Nope"]).is_err());
    }

    #[test]
    fn date_columns_filtered_by_name() {
        assert_eq!(date_columns(&table()), vec!["Date", "Date_ISO"]);
    }
}
