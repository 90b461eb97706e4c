//! `citedate iso`: add the yyyy-mm-dd column.

use std::io::Write;
use std::path::{Path, PathBuf};

use citedate_cli::report::{format_range, format_values, Report};
use citedate_core::Table;
use citedate_recon::stats::{column_stats, date_columns, ColumnStats};
use citedate_recon::{convert_iso, IsoConverted};
use serde::Serialize;

use crate::context::Context;
use crate::{print_json, CliError, RunMeta};

#[derive(Serialize)]
pub struct IsoOutcome {
    #[serde(flatten)]
    pub converted: IsoConverted,
    pub failed_values: Vec<String>,
    /// Distinct cleaned/ISO pairs, first `comparison_rows`.
    #[serde(skip)]
    pub samples: Table,
    pub cleaned_dates: ColumnStats,
    pub iso_dates: ColumnStats,
    pub date_columns: Vec<String>,
}

impl IsoOutcome {
    pub fn table(&self) -> &Table {
        &self.converted.table
    }
}

pub fn compute(table: &Table, ctx: &Context) -> Result<IsoOutcome, CliError> {
    let columns = ctx.columns();

    let converted = convert_iso(table, columns)?;
    let out = &converted.table;
    Ok(IsoOutcome {
        failed_values: converted.unique_failed_values(),
        samples: out
            .distinct_projection(&[columns.cleaned.as_str(), columns.iso.as_str()])
            .head(ctx.settings().comparison_rows),
        cleaned_dates: column_stats(out, &columns.cleaned)?,
        iso_dates: column_stats(out, &columns.iso)?,
        date_columns: date_columns(out),
        converted,
    })
}

pub fn report<W: Write>(r: &mut Report<W>, ctx: &Context, outcome: &IsoOutcome) -> std::io::Result<()> {
    let columns = ctx.columns();
    let rows = outcome.table().len();

    r.section("ISO DATE CONVERSION")?;
    r.line("Sample conversions:")?;
    r.table(&outcome.samples)?;
    r.line("")?;
    r.line(format!("Converted: {} of {rows} rows", outcome.converted.converted))?;
    if outcome.converted.failure_count() > 0 {
        r.line(format!(
            "Could not convert: {} rows (kept as-is)",
            outcome.converted.failure_count()
        ))?;
        r.line(format!("Values that could not be converted: {}", format_values(&outcome.failed_values)))?;
    }

    r.section("DATE RANGES")?;
    r.line(format!("{}: {}", columns.cleaned, format_range(&outcome.cleaned_dates)))?;
    r.line(format!("{}: {}", columns.iso, format_range(&outcome.iso_dates)))?;
    r.line(format!("Unique ISO dates: {}", outcome.iso_dates.unique))?;
    r.line(format!("Date columns: {}", format_values(&outcome.date_columns)))
}

pub fn cmd_iso(ctx: &Context, input: Option<PathBuf>, output: Option<PathBuf>) -> Result<(), CliError> {
    let input = input.unwrap_or_else(|| ctx.paths.cleaned.clone());
    let output = output.unwrap_or_else(|| ctx.paths.final_.clone());

    let table = citedate_io::csv::load(&input)?;
    let outcome = compute(&table, ctx).map_err(|e| {
        if e.code == crate::exit_codes::EXIT_MISSING_COLUMN {
            e.with_hint("run `citedate clean` first to produce the cleaned column")
        } else {
            e
        }
    })?;

    let mut r = ctx.report();
    report(&mut r, ctx, &outcome).map_err(CliError::report)?;

    citedate_io::csv::write(outcome.table(), &output)?;
    r.line("")
        .and_then(|()| r.line(format!("Saved final data to {}", output.display())))
        .and_then(|()| {
            r.line(format!(
                "Shape: {} rows x {} columns",
                outcome.table().len(),
                outcome.table().column_count()
            ))
        })
        .map_err(CliError::report)?;

    if ctx.json {
        #[derive(Serialize)]
        struct Doc<'a> {
            meta: RunMeta,
            input: &'a Path,
            output: &'a Path,
            #[serde(flatten)]
            outcome: &'a IsoOutcome,
        }
        print_json(&Doc {
            meta: RunMeta::new("iso"),
            input: &input,
            output: &output,
            outcome: &outcome,
        })?;
    }
    Ok(())
}
