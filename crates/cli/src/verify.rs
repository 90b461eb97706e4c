//! `citedate verify`: summary of the final table.

use std::io::Write;
use std::path::{Path, PathBuf};

use citedate_cli::report::{format_range, Report};
use citedate_core::Table;
use citedate_recon::diff::changed_row_count;
use citedate_recon::stats::{column_stats, rows_with_all, ColumnStats};
use serde::Serialize;

use crate::context::Context;
use crate::{print_json, CliError, RunMeta};

#[derive(Serialize)]
pub struct VerifyOutcome {
    pub rows: usize,
    /// Distinct citation/date/cleaned/ISO rows, first `sample_rows`.
    #[serde(skip)]
    pub sample: Table,
    pub date_columns: Vec<ColumnStats>,
    pub corrected_rows: usize,
    /// Rows where both the cleaned and the ISO date are non-empty.
    pub complete_rows: usize,
}

pub fn compute(table: &Table, ctx: &Context) -> Result<VerifyOutcome, CliError> {
    let c = ctx.columns();
    let names = [c.citation.as_str(), c.date.as_str(), c.cleaned.as_str(), c.iso.as_str()];

    let date_columns = names[1..]
        .iter()
        .map(|name| column_stats(table, name))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(VerifyOutcome {
        rows: table.len(),
        sample: table.distinct_projection(&names).head(ctx.settings().sample_rows),
        corrected_rows: changed_row_count(table, c)?,
        complete_rows: rows_with_all(table, &[c.cleaned.as_str(), c.iso.as_str()])?,
        date_columns,
    })
}

pub fn report<W: Write>(r: &mut Report<W>, outcome: &VerifyOutcome) -> std::io::Result<()> {
    r.section("FINAL DATA")?;
    r.line(format!("Total records: {}", outcome.rows))?;
    r.line("")?;
    r.table(&outcome.sample)?;

    r.section("DATE COLUMNS")?;
    for stats in &outcome.date_columns {
        r.line(format!(
            "{}: {} unique, {}",
            stats.column,
            stats.unique,
            format_range(stats)
        ))?;
    }
    r.line("")?;
    r.line(format!("Rows corrected during cleaning: {}", outcome.corrected_rows))?;
    r.line(format!(
        "Rows with both cleaned and ISO dates: {} of {}",
        outcome.complete_rows, outcome.rows
    ))
}

pub fn cmd_verify(ctx: &Context, input: Option<PathBuf>) -> Result<(), CliError> {
    let input = input.unwrap_or_else(|| ctx.paths.final_.clone());

    let table = citedate_io::csv::load(&input)?;
    let outcome = compute(&table, ctx)?;

    let mut r = ctx.report();
    report(&mut r, &outcome).map_err(CliError::report)?;

    if ctx.json {
        #[derive(Serialize)]
        struct Doc<'a> {
            meta: RunMeta,
            input: &'a Path,
            #[serde(flatten)]
            outcome: &'a VerifyOutcome,
        }
        print_json(&Doc {
            meta: RunMeta::new("verify"),
            input: &input,
            outcome: &outcome,
        })?;
    }
    Ok(())
}
