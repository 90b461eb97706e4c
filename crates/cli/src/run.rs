//! `citedate run`: every stage in order, in memory.
//!
//! Stages hand tables to each other directly. Files are written only after
//! the last stage succeeds, so a failed run leaves no partial output.

use std::path::Path;

use citedate_core::Table;
use serde::Serialize;
use tracing::info;

use crate::context::Context;
use crate::convert::ConvertOutcome;
use crate::{changes, clean, convert, iso, verify};
use crate::{print_json, CliError, RunMeta};

#[derive(Serialize)]
struct RunDoc<'a> {
    meta: RunMeta,
    #[serde(skip_serializing_if = "Option::is_none")]
    convert: Option<&'a ConvertOutcome>,
    clean: &'a clean::CleanOutcome,
    changes: &'a changes::ChangesOutcome,
    iso: &'a iso::IsoOutcome,
    verify: &'a verify::VerifyOutcome,
    written: Vec<&'a Path>,
}

pub fn cmd_run(ctx: &Context, from_excel: bool, sheet: Option<String>) -> Result<(), CliError> {
    let paths = &ctx.paths;
    let mut r = ctx.report();

    let (converted, messy): (Option<ConvertOutcome>, Table) = if from_excel {
        let outcome = convert::compute(&paths.excel, sheet.as_deref())?;
        convert::report(&mut r, ctx, &paths.excel, &outcome).map_err(CliError::report)?;
        let table = outcome.table.clone();
        (Some(outcome), table)
    } else {
        (None, citedate_io::csv::load(&paths.messy)?)
    };

    let cleaned = clean::compute(&messy, ctx)?;
    clean::report_analysis(&mut r, ctx, &cleaned.analysis)
        .and_then(|()| clean::report_cleaning(&mut r, ctx, &cleaned))
        .map_err(CliError::report)?;
    cleaned.validation.clone().into_result()?;

    let changed = changes::compute(cleaned.table(), ctx)?;
    let finished = iso::compute(cleaned.table(), ctx)?;
    let verified = verify::compute(finished.table(), ctx)?;

    changes::report(&mut r, ctx, &changed)
        .and_then(|()| iso::report(&mut r, ctx, &finished))
        .and_then(|()| verify::report(&mut r, &verified))
        .map_err(CliError::report)?;

    // All stages passed: stage every artifact, then rename them into place
    let mut staged = Vec::new();
    if let Some(outcome) = &converted {
        staged.push(citedate_io::csv::stage(&outcome.table, &paths.messy)?);
    }
    staged.push(citedate_io::csv::stage(cleaned.table(), &paths.cleaned)?);
    staged.push(citedate_io::csv::stage(finished.table(), &paths.final_)?);

    citedate_io::csv::commit_all(staged)?;

    let mut written: Vec<&Path> = Vec::new();
    if converted.is_some() {
        written.push(&paths.messy);
    }
    written.push(&paths.cleaned);
    written.push(&paths.final_);

    let summary = &cleaned.reconciled.summary;
    info!(
        rows = verified.rows,
        citations = summary.total_citations,
        inconsistent = summary.inconsistent_citations,
        unconverted = finished.converted.failure_count(),
        "pipeline complete"
    );

    r.section("PIPELINE COMPLETE").map_err(CliError::report)?;
    for path in &written {
        r.line(format!("Wrote {}", path.display())).map_err(CliError::report)?;
    }
    r.line(format!(
        "{} rows, {} citations, {} reconciled, {} dates not converted",
        verified.rows,
        summary.total_citations,
        summary.inconsistent_citations,
        finished.converted.failure_count()
    ))
    .map_err(CliError::report)?;

    if ctx.json {
        print_json(&RunDoc {
            meta: RunMeta::new("run"),
            convert: converted.as_ref(),
            clean: &cleaned,
            changes: &changed,
            iso: &finished,
            verify: &verified,
            written,
        })?;
    }
    Ok(())
}
