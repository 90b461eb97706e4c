//! `citedate clean`: majority-vote reconciliation of citation dates.

use std::io::Write;
use std::path::{Path, PathBuf};

use citedate_cli::report::{format_counts, format_range, format_values, Report};
use citedate_core::Table;
use citedate_recon::group::citation_order;
use citedate_recon::stats::{column_stats, distinct_count, ColumnStats};
use citedate_recon::vote::frequency_ranking;
use citedate_recon::{
    group_by_citation, reconcile, validate, DateCount, ReconError, Reconciled, ValidationReport,
};
use serde::Serialize;

use crate::context::Context;
use crate::{print_json, CliError, RunMeta};

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Date distribution of one citation before cleaning.
#[derive(Serialize)]
pub struct CitationDistribution {
    pub citation: String,
    pub frequency: Vec<DateCount>,
}

#[derive(Serialize)]
pub struct Analysis {
    pub records: usize,
    pub citations: usize,
    /// Distinct citation/date pairs, first `sample_rows`.
    #[serde(skip)]
    pub sample: Table,
    /// First `analysis_citations` citations in natural order.
    pub distributions: Vec<CitationDistribution>,
}

#[derive(Serialize)]
pub struct DatasetStats {
    pub rows: usize,
    pub cleaned_dates: ColumnStats,
    pub unique_citations: usize,
}

#[derive(Serialize)]
pub struct CleanOutcome {
    pub analysis: Analysis,
    #[serde(flatten)]
    pub reconciled: Reconciled,
    pub validation: ValidationReport,
    pub statistics: DatasetStats,
}

impl CleanOutcome {
    pub fn table(&self) -> &Table {
        &self.reconciled.table
    }
}

// ---------------------------------------------------------------------------
// Compute
// ---------------------------------------------------------------------------

pub fn analyze(table: &Table, ctx: &Context) -> Result<Analysis, ReconError> {
    let columns = ctx.columns();
    let settings = ctx.settings();

    let groups = group_by_citation(table, &columns.citation)?;
    let date_col = table
        .column_index(&columns.date)
        .ok_or_else(|| ReconError::MissingColumn { column: columns.date.clone() })?;

    let mut ordered: Vec<_> = groups.iter().collect();
    ordered.sort_by(|a, b| citation_order(&a.citation, &b.citation));
    let distributions = ordered
        .into_iter()
        .take(settings.analysis_citations)
        .map(|group| CitationDistribution {
            citation: group.citation.clone(),
            frequency: frequency_ranking(group.rows.iter().map(|&row| table.cell(row, date_col))),
        })
        .collect();

    Ok(Analysis {
        records: table.len(),
        citations: groups.len(),
        sample: table
            .distinct_projection(&[columns.citation.as_str(), columns.date.as_str()])
            .head(settings.sample_rows),
        distributions,
    })
}

/// Analyze, reconcile and validate. A failed validation is returned in the
/// outcome so it can be reported before the run is aborted.
pub fn compute(table: &Table, ctx: &Context) -> Result<CleanOutcome, CliError> {
    let columns = ctx.columns();

    let analysis = analyze(table, ctx)?;
    let reconciled = reconcile(table, columns)?;
    let validation = validate(&reconciled.table, columns)?;
    let statistics = DatasetStats {
        rows: reconciled.table.len(),
        cleaned_dates: column_stats(&reconciled.table, &columns.cleaned)?,
        unique_citations: distinct_count(&reconciled.table, &columns.citation)?,
    };

    Ok(CleanOutcome { analysis, reconciled, validation, statistics })
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

pub fn report_analysis<W: Write>(r: &mut Report<W>, ctx: &Context, analysis: &Analysis) -> std::io::Result<()> {
    let columns = ctx.columns();

    r.section("DATE ANALYSIS")?;
    r.line(format!("Total records: {}", analysis.records))?;
    r.line(format!("Unique citations: {}", analysis.citations))?;
    r.line("")?;
    r.line(format!("Sample of {} and {} values:", columns.citation, columns.date))?;
    r.table(&analysis.sample)?;

    if !analysis.distributions.is_empty() {
        r.line("")?;
        r.line(format!(
            "Date distribution for the first {} citations:",
            analysis.distributions.len()
        ))?;
        for d in &analysis.distributions {
            r.line(format!("  {} {}: {}", columns.citation, d.citation, format_counts(&d.frequency)))?;
        }
    }
    Ok(())
}

pub fn report_cleaning<W: Write>(r: &mut Report<W>, ctx: &Context, outcome: &CleanOutcome) -> std::io::Result<()> {
    let columns = ctx.columns();
    let reconciled = &outcome.reconciled;

    r.section("CLEANING DATES")?;
    if reconciled.inconsistencies.is_empty() {
        r.line("Every citation already has a single date.")?;
    }
    for inc in &reconciled.inconsistencies {
        r.line(format!("{} {}: multiple dates found", columns.citation, inc.citation))?;
        r.line(format!("  Distribution: {}", format_counts(&inc.frequency)))?;
        if inc.is_tie {
            r.line(format!("  Using: {} (tie, first seen)", inc.chosen))?;
        } else {
            r.line(format!("  Using: {}", inc.chosen))?;
        }
    }

    let s = &reconciled.summary;
    r.line("")?;
    r.line("Cleaning summary:")?;
    r.line(format!("  Total citations: {}", s.total_citations))?;
    r.line(format!("  Citations with inconsistent dates: {}", s.inconsistent_citations))?;
    r.line(format!("  Citations already consistent: {}", s.consistent_citations))?;

    report_validation(r, &outcome.validation)?;

    let comparison_rows = ctx.settings().comparison_rows;
    r.section(&format!("BEFORE AND AFTER (first {comparison_rows} rows)"))?;
    let projected = outcome.table().head(comparison_rows).select(&[
        columns.citation.as_str(),
        columns.date.as_str(),
        columns.cleaned.as_str(),
    ]);
    r.table(&projected)
}

pub fn report_validation<W: Write>(r: &mut Report<W>, validation: &ValidationReport) -> std::io::Result<()> {
    r.section("VALIDATION")?;
    if validation.ok {
        r.line(format!(
            "All {} citations have a single cleaned date.",
            validation.checked_citations
        ))
    } else {
        for offender in &validation.offenders {
            r.line(format!(
                "Citation {} still has {} dates: {}",
                offender.citation,
                offender.values.len(),
                format_values(&offender.values)
            ))?;
        }
        Ok(())
    }
}

pub fn report_statistics<W: Write>(r: &mut Report<W>, stats: &DatasetStats) -> std::io::Result<()> {
    r.section("DATASET STATISTICS")?;
    r.line(format!("Total rows: {}", stats.rows))?;
    r.line(format!("Date range: {}", format_range(&stats.cleaned_dates)))?;
    r.line(format!("Unique dates: {}", stats.cleaned_dates.unique))?;
    r.line(format!("Unique citations: {}", stats.unique_citations))
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

pub fn cmd_clean(ctx: &Context, input: Option<PathBuf>, output: Option<PathBuf>) -> Result<(), CliError> {
    let input = input.unwrap_or_else(|| ctx.paths.messy.clone());
    let output = output.unwrap_or_else(|| ctx.paths.cleaned.clone());

    let table = citedate_io::csv::load(&input)?;
    let outcome = compute(&table, ctx)?;

    let mut r = ctx.report();
    report_analysis(&mut r, ctx, &outcome.analysis)
        .and_then(|()| report_cleaning(&mut r, ctx, &outcome))
        .map_err(CliError::report)?;

    // Nothing is written when a citation still has two cleaned dates
    outcome.validation.clone().into_result()?;

    citedate_io::csv::write(outcome.table(), &output)?;
    r.line("")
        .and_then(|()| r.line(format!("Saved cleaned data to {}", output.display())))
        .and_then(|()| report_statistics(&mut r, &outcome.statistics))
        .map_err(CliError::report)?;

    if ctx.json {
        #[derive(Serialize)]
        struct Doc<'a> {
            meta: RunMeta,
            input: &'a Path,
            output: &'a Path,
            #[serde(flatten)]
            outcome: &'a CleanOutcome,
        }
        print_json(&Doc {
            meta: RunMeta::new("clean"),
            input: &input,
            output: &output,
            outcome: &outcome,
        })?;
    }
    Ok(())
}
