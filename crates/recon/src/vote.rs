use std::collections::HashMap;

use crate::model::{CanonicalDate, DateCount};

/// Count each distinct date, ranked by descending count.
///
/// Equal counts keep the order in which the values were first seen, so the
/// ranking is fully determined by the input order.
pub fn frequency_ranking<'a, I>(dates: I) -> Vec<DateCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut slots: HashMap<&'a str, usize> = HashMap::new();
    let mut counts: Vec<DateCount> = Vec::new();

    for date in dates {
        match slots.get(date) {
            Some(&slot) => counts[slot].count += 1,
            None => {
                slots.insert(date, counts.len());
                counts.push(DateCount {
                    date: date.to_string(),
                    count: 1,
                });
            }
        }
    }

    // sort_by is stable: ties stay in first-seen order.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Pick the canonical date for one citation group by majority vote.
///
/// Returns `None` for an empty group.
pub fn select_canonical_date<'a, I>(dates: I) -> Option<CanonicalDate>
where
    I: IntoIterator<Item = &'a str>,
{
    let frequency = frequency_ranking(dates);
    let top = frequency.first()?;
    let is_tie = frequency.get(1).is_some_and(|second| second.count == top.count);

    Some(CanonicalDate {
        date: top.date.clone(),
        is_tie,
        frequency,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn majority_wins() {
        let c = select_canonical_date(["01.02.2020", "01.02.2020", "03.02.2020"]).unwrap();
        assert_eq!(c.date, "01.02.2020");
        assert!(!c.is_tie);
        assert_eq!(c.frequency[0].count, 2);
        assert_eq!(c.frequency[1].count, 1);
    }

    #[test]
    fn tie_goes_to_first_seen() {
        let c = select_canonical_date(["01.02.2020", "03.02.2020"]).unwrap();
        assert_eq!(c.date, "01.02.2020");
        assert!(c.is_tie);

        let c = select_canonical_date(["03.02.2020", "01.02.2020"]).unwrap();
        assert_eq!(c.date, "03.02.2020");
    }

    #[test]
    fn later_majority_overtakes_earlier_value() {
        let c = select_canonical_date(["a", "b", "b", "c", "a", "b"]).unwrap();
        assert_eq!(c.date, "b");
        let ranked: Vec<(&str, usize)> =
            c.frequency.iter().map(|d| (d.date.as_str(), d.count)).collect();
        assert_eq!(ranked, vec![("b", 3), ("a", 2), ("c", 1)]);
    }

    #[test]
    fn single_value_is_not_a_tie() {
        let c = select_canonical_date(["12.12.1850"]).unwrap();
        assert_eq!(c.date, "12.12.1850");
        assert!(!c.is_tie);
        assert_eq!(c.frequency.len(), 1);
    }

    #[test]
    fn empty_group_has_no_winner() {
        assert!(select_canonical_date(std::iter::empty::<&str>()).is_none());
    }

    #[test]
    fn three_way_tie_keeps_scan_order() {
        let c = select_canonical_date(["z", "y", "x"]).unwrap();
        assert_eq!(c.date, "z");
        assert!(c.is_tie);
    }
}
