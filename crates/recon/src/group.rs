use std::cmp::Ordering;
use std::collections::HashMap;

use citedate_core::Table;

use crate::error::{require_column, ReconError};
use crate::model::CitationGroup;

/// Partition rows by the named citation column, in first-seen order.
pub fn group_by_citation(table: &Table, citation: &str) -> Result<Vec<CitationGroup>, ReconError> {
    let col = require_column(table, citation)?;
    Ok(group_rows(table, col))
}

/// Partition rows by the value in column `col`, in first-seen order.
/// Row indices inside each group stay in table order.
pub(crate) fn group_rows(table: &Table, col: usize) -> Vec<CitationGroup> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<CitationGroup> = Vec::new();

    for (row, key) in table.column(col).enumerate() {
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push(CitationGroup {
                citation: key.to_string(),
                rows: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].rows.push(row);
    }

    groups
}

/// Natural citation ordering: integers ascending, then everything else by
/// string. Numerically equal keys ("1" vs "01") fall back to string order.
pub fn citation_order(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<i64>(), b.trim().parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[(&str, &str)]) -> Table {
        Table::from_rows(
            vec!["Citation".into(), "Date".into()],
            rows.iter().map(|(c, d)| vec![c.to_string(), d.to_string()]).collect(),
        )
    }

    #[test]
    fn groups_in_first_seen_order() {
        let t = table(&[("7", "a"), ("3", "b"), ("7", "c"), ("10", "d"), ("3", "e")]);
        let groups = group_by_citation(&t, "Citation").unwrap();
        let keys: Vec<&str> = groups.iter().map(|g| g.citation.as_str()).collect();
        assert_eq!(keys, vec!["7", "3", "10"]);
        assert_eq!(groups[0].rows, vec![0, 2]);
        assert_eq!(groups[1].rows, vec![1, 4]);
        assert_eq!(groups[2].rows, vec![3]);
    }

    #[test]
    fn empty_citation_is_its_own_group() {
        let t = table(&[("", "a"), ("1", "b"), ("", "c")]);
        let groups = group_by_citation(&t, "Citation").unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].citation, "");
        assert_eq!(groups[0].rows, vec![0, 2]);
    }

    #[test]
    fn missing_column_is_reported() {
        let t = table(&[("1", "a")]);
        let err = group_by_citation(&t, "Cite").unwrap_err();
        assert_eq!(err, ReconError::MissingColumn { column: "Cite".into() });
    }

    #[test]
    fn natural_order_sorts_numbers_numerically() {
        let mut keys = vec!["10", "B-2", "2", "A-1", "1"];
        keys.sort_by(|a, b| citation_order(a, b));
        assert_eq!(keys, vec!["1", "2", "10", "A-1", "B-2"]);
    }
}
