//! Human-readable report rendering.
//!
//! Every command writes its report through [`Report`], which is disabled
//! under `--quiet` and `--json` so callers never branch on output mode.

use std::io::{self, Write};

use citedate_core::Table;
use citedate_recon::stats::ColumnStats;
use citedate_recon::DateCount;
use unicode_width::UnicodeWidthStr;

pub struct Report<W: Write> {
    out: W,
    enabled: bool,
}

impl<W: Write> Report<W> {
    pub fn new(out: W, enabled: bool) -> Self {
        Self { out, enabled }
    }

    /// Blank line, then `=== TITLE ===`.
    pub fn section(&mut self, title: &str) -> io::Result<()> {
        if !self.enabled {
            return Ok(());
        }
        writeln!(self.out)?;
        writeln!(self.out, "=== {title} ===")
    }

    pub fn line(&mut self, text: impl AsRef<str>) -> io::Result<()> {
        if !self.enabled {
            return Ok(());
        }
        writeln!(self.out, "{}", text.as_ref())
    }

    pub fn table(&mut self, table: &Table) -> io::Result<()> {
        if !self.enabled {
            return Ok(());
        }
        self.out.write_all(render_table(table).as_bytes())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Render a table with right-aligned, width-padded columns and no index.
pub fn render_table(table: &Table) -> String {
    let headers = table.headers();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
    for row in table.raw_rows() {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.width());
        }
    }

    let mut out = String::new();
    push_row(&mut out, headers.iter().map(String::as_str), &widths);
    for row in table.raw_rows() {
        push_row(&mut out, row.iter().map(String::as_str), &widths);
    }
    if table.is_empty() {
        out.push_str("(no rows)\n");
    }
    out
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let mut line = String::new();
    for (i, (cell, &width)) in cells.zip(widths).enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        line.extend(std::iter::repeat(' ').take(width.saturating_sub(cell.width())));
        line.push_str(cell);
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

/// `{14.05.1872: 3, 15.05.1872: 1}`
pub fn format_counts(counts: &[DateCount]) -> String {
    let body: Vec<String> = counts
        .iter()
        .map(|c| format!("{}: {}", display_value(&c.date), c.count))
        .collect();
    format!("{{{}}}", body.join(", "))
}

/// `[31.02.1874, unknown]`
pub fn format_values<S: AsRef<str>>(values: &[S]) -> String {
    let body: Vec<&str> = values.iter().map(|v| display_value(v.as_ref())).collect();
    format!("[{}]", body.join(", "))
}

/// `min to max`, or a placeholder when the column has no values.
pub fn format_range(stats: &ColumnStats) -> String {
    match (&stats.min, &stats.max) {
        (Some(min), Some(max)) => format!("{min} to {max}"),
        _ => "(no values)".to_string(),
    }
}

fn display_value(value: &str) -> &str {
    if value.is_empty() {
        "(empty)"
    } else {
        value
    }
}
