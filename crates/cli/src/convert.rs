//! `citedate convert`: Excel workbook to CSV.

use std::io::Write;
use std::path::{Path, PathBuf};

use citedate_cli::report::{format_values, Report};
use citedate_core::Table;
use serde::Serialize;

use crate::context::Context;
use crate::{print_json, CliError, RunMeta};

#[derive(Serialize)]
pub struct ConvertOutcome {
    #[serde(skip)]
    pub table: Table,
    pub rows: usize,
    pub columns: Vec<String>,
}

pub fn compute(input: &Path, sheet: Option<&str>) -> Result<ConvertOutcome, CliError> {
    let table = citedate_io::xlsx::import_table(input, sheet)?;
    Ok(ConvertOutcome {
        rows: table.len(),
        columns: table.headers().to_vec(),
        table,
    })
}

pub fn report<W: Write>(r: &mut Report<W>, ctx: &Context, input: &Path, outcome: &ConvertOutcome) -> std::io::Result<()> {
    r.section("EXCEL CONVERSION")?;
    r.line(format!(
        "Read {}: {} rows x {} columns",
        input.display(),
        outcome.rows,
        outcome.columns.len()
    ))?;
    r.line(format!("Columns: {}", format_values(&outcome.columns)))?;
    r.line("")?;
    r.line(format!("First {} rows:", ctx.settings().preview_rows))?;
    r.table(&outcome.table.head(ctx.settings().preview_rows))
}

pub fn cmd_convert(
    ctx: &Context,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    sheet: Option<String>,
) -> Result<(), CliError> {
    // An explicit workbook gets a sibling CSV; the configured one gets files.messy
    let output = match (&input, output) {
        (_, Some(output)) => output,
        (Some(input), None) => input.with_extension("csv"),
        (None, None) => ctx.paths.messy.clone(),
    };
    let input = input.unwrap_or_else(|| ctx.paths.excel.clone());

    let outcome = compute(&input, sheet.as_deref())?;

    let mut r = ctx.report();
    report(&mut r, ctx, &input, &outcome).map_err(CliError::report)?;

    citedate_io::csv::write(&outcome.table, &output)?;
    r.line("")
        .and_then(|()| r.line(format!("Saved CSV to {}", output.display())))
        .map_err(CliError::report)?;

    if ctx.json {
        #[derive(Serialize)]
        struct Doc<'a> {
            meta: RunMeta,
            input: &'a Path,
            output: &'a Path,
            #[serde(flatten)]
            outcome: &'a ConvertOutcome,
        }
        print_json(&Doc {
            meta: RunMeta::new("convert"),
            input: &input,
            output: &output,
            outcome: &outcome,
        })?;
    }
    Ok(())
}
