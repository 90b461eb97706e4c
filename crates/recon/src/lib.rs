//! `citedate-recon`: Citation date reconciliation engine.
//!
//! Pure engine crate: receives a loaded [`Table`], returns transformed tables
//! and structured summaries. No CLI or IO dependencies.

pub mod config;
pub mod diff;
pub mod error;
pub mod group;
pub mod iso;
pub mod model;
pub mod reconcile;
pub mod stats;
pub mod validate;
pub mod vote;

pub use citedate_core::Table;
pub use config::{ColumnNames, PipelineConfig};
pub use diff::diff;
pub use error::ReconError;
pub use iso::{convert_iso, to_iso};
pub use group::group_by_citation;
pub use model::{
    CanonicalDate, CitationGroup, CitationValues, CleaningSummary, DateChange, DateCount,
    DateParseWarning, Inconsistency, IsoConversion, IsoConverted, Reconciled, ValidationReport,
};
pub use reconcile::reconcile;
pub use validate::validate;
pub use vote::select_canonical_date;
