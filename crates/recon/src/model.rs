use citedate_core::Table;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Grouping + vote
// ---------------------------------------------------------------------------

/// Rows sharing one citation value, as indices into the source table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CitationGroup {
    pub citation: String,
    pub rows: Vec<usize>,
}

/// One entry of a frequency ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateCount {
    pub date: String,
    pub count: usize,
}

/// Result of the majority vote over one citation group.
///
/// `frequency` is ordered by descending count, then by first appearance.
/// `date` is always `frequency[0].date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalDate {
    pub date: String,
    pub is_tie: bool,
    pub frequency: Vec<DateCount>,
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

/// A citation whose raw dates disagreed before cleaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Inconsistency {
    pub citation: String,
    pub chosen: String,
    pub is_tie: bool,
    pub frequency: Vec<DateCount>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleaningSummary {
    pub total_citations: usize,
    pub inconsistent_citations: usize,
    pub consistent_citations: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Reconciled {
    #[serde(skip)]
    pub table: Table,
    pub summary: CleaningSummary,
    pub inconsistencies: Vec<Inconsistency>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// A citation and every distinct cleaned value found for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CitationValues {
    pub citation: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub ok: bool,
    pub checked_citations: usize,
    pub offenders: Vec<CitationValues>,
}

impl ValidationReport {
    /// Escalate a failed report to [`ReconError::ConsistencyViolation`].
    ///
    /// [`ReconError::ConsistencyViolation`]: crate::ReconError::ConsistencyViolation
    pub fn into_result(self) -> Result<Self, crate::ReconError> {
        if self.ok {
            Ok(self)
        } else {
            Err(crate::ReconError::ConsistencyViolation {
                citations: self.offenders.into_iter().map(|o| o.citation).collect(),
            })
        }
    }
}

// ---------------------------------------------------------------------------
// ISO conversion
// ---------------------------------------------------------------------------

/// Output of a single `dd.mm.yyyy` → `yyyy-mm-dd` conversion.
///
/// When `ok` is false, `iso` is the input passed through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IsoConversion {
    pub iso: String,
    pub ok: bool,
}

/// A date string that could not be converted. Non-fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateParseWarning {
    pub row: usize,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct IsoConverted {
    #[serde(skip)]
    pub table: Table,
    pub converted: usize,
    pub failures: Vec<DateParseWarning>,
}

impl IsoConverted {
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Distinct failed input values, first-seen order.
    pub fn unique_failed_values(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.failures
            .iter()
            .filter(|w| seen.insert(w.value.as_str()))
            .map(|w| w.value.clone())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Diff
// ---------------------------------------------------------------------------

/// A citation where cleaning changed at least one row's date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateChange {
    pub citation: String,
    pub original_dates: Vec<String>,
    pub cleaned_date: String,
    pub frequency: Vec<DateCount>,
    pub record_count: usize,
}
