//! `citedate changes`: what cleaning changed, citation by citation.

use std::io::Write;
use std::path::{Path, PathBuf};

use citedate_cli::report::{format_counts, format_values, Report};
use citedate_core::Table;
use citedate_recon::diff::changed_row_count;
use citedate_recon::{diff, validate, DateChange, ValidationReport};
use serde::Serialize;

use crate::clean::report_validation;
use crate::context::Context;
use crate::{print_json, CliError, RunMeta};

#[derive(Serialize)]
pub struct ChangesOutcome {
    pub changed_rows: usize,
    pub changes: Vec<DateChange>,
    pub validation: ValidationReport,
}

/// `table` is a cleaned table; it still carries the raw date column, so it
/// serves as both sides of the diff.
pub fn compute(table: &Table, ctx: &Context) -> Result<ChangesOutcome, CliError> {
    let columns = ctx.columns();
    Ok(ChangesOutcome {
        changed_rows: changed_row_count(table, columns)?,
        changes: diff(table, table, columns)?,
        validation: validate(table, columns)?,
    })
}

pub fn report<W: Write>(r: &mut Report<W>, ctx: &Context, outcome: &ChangesOutcome) -> std::io::Result<()> {
    let citation = &ctx.columns().citation;

    r.section("CHANGES MADE DURING CLEANING")?;
    if outcome.changes.is_empty() {
        r.line("No dates were changed.")?;
    } else {
        r.line(format!("Rows with changed dates: {}", outcome.changed_rows))?;
        r.line(format!("Citations affected: {}", outcome.changes.len()))?;
    }

    for change in &outcome.changes {
        r.line("")?;
        r.line(format!("{citation} {} ({} records)", change.citation, change.record_count))?;
        r.line(format!("  Original dates: {}", format_values(&change.original_dates)))?;
        r.line(format!("  Distribution: {}", format_counts(&change.frequency)))?;
        r.line(format!("  Cleaned date: {}", change.cleaned_date))?;
    }

    report_validation(r, &outcome.validation)
}

pub fn cmd_changes(ctx: &Context, input: Option<PathBuf>) -> Result<(), CliError> {
    let input = input.unwrap_or_else(|| ctx.paths.cleaned.clone());

    let table = citedate_io::csv::load(&input)?;
    let outcome = compute(&table, ctx)?;

    let mut r = ctx.report();
    report(&mut r, ctx, &outcome).map_err(CliError::report)?;

    if ctx.json {
        #[derive(Serialize)]
        struct Doc<'a> {
            meta: RunMeta,
            input: &'a Path,
            #[serde(flatten)]
            outcome: &'a ChangesOutcome,
        }
        print_json(&Doc {
            meta: RunMeta::new("changes"),
            input: &input,
            outcome: &outcome,
        })?;
    }

    outcome.validation.into_result()?;
    Ok(())
}
