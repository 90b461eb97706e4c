// Excel import (xlsx, xls, xlsb, ods) into a header-row table

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use chrono::{Duration, NaiveDate};
use citedate_core::Table;
use tracing::{debug, info};

use crate::error::TableError;

/// Import one worksheet as a table whose first row is the header.
///
/// `sheet` selects a worksheet by name; `None` takes the first one. Fully
/// empty rows are skipped. Empty header cells are named `Unnamed: <col>`.
pub fn import_table(path: &Path, sheet: Option<&str>) -> Result<Table, TableError> {
    if !path.exists() {
        return Err(TableError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let mut workbook: Sheets<_> = open_workbook_auto(path)
        .map_err(|e| TableError::format(path, format!("failed to open Excel file: {e}")))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let sheet_name = match sheet {
        Some(name) => sheet_names
            .iter()
            .find(|s| s.as_str() == name)
            .cloned()
            .ok_or_else(|| {
                TableError::format(
                    path,
                    format!("no sheet named '{name}' (available: {})", sheet_names.join(", ")),
                )
            })?,
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| TableError::format(path, "Excel file contains no sheets"))?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| TableError::format(path, format!("failed to read sheet '{sheet_name}': {e}")))?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row
            .iter()
            .enumerate()
            .map(|(col, cell)| match cell_text(cell) {
                text if text.is_empty() => format!("Unnamed: {col}"),
                text => text,
            })
            .collect(),
        None => return Err(TableError::format(path, format!("sheet '{sheet_name}' is empty"))),
    };

    let mut table = Table::new(headers);
    let mut skipped = 0usize;
    for row in rows {
        if row.iter().all(|c| matches!(c, Data::Empty)) {
            skipped += 1;
            continue;
        }
        table.push_row(row.iter().map(cell_text).collect());
    }

    if skipped > 0 {
        debug!(sheet = %sheet_name, skipped, "skipped empty rows");
    }
    info!(
        path = %path.display(),
        sheet = %sheet_name,
        rows = table.len(),
        columns = table.column_count(),
        "imported worksheet"
    );
    Ok(table)
}

/// Render one cell the way it should appear in the CSV.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(n) => {
            // Format nicely: integers without decimals
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{}", n)
            }
        }
        Data::Int(n) => n.to_string(),
        Data::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
        Data::Error(e) => format!("#{:?}", e),
        Data::DateTime(dt) => serial_to_day_month_year(dt.as_f64()),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

/// Render an Excel serial date as `dd.mm.yyyy` (with time when present).
///
/// Assumes the 1900 date system. Serial 60 is Excel's phantom 29 Feb 1900.
fn serial_to_day_month_year(serial: f64) -> String {
    let days = serial.floor() as i64;
    if days == 60 {
        return "29.02.1900".to_string();
    }

    // Serials before the phantom leap day are one day ahead of real dates
    let epoch = if days < 60 {
        NaiveDate::from_ymd_opt(1899, 12, 31)
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30)
    };
    let offset = Duration::try_days(days);
    let Some(date) = epoch.zip(offset).and_then(|(e, d)| e.checked_add_signed(d)) else {
        return format!("{serial}");
    };

    let secs = ((serial - serial.floor()) * 86_400.0).round() as i64;
    if secs == 0 {
        date.format("%d.%m.%Y").to_string()
    } else {
        let datetime = date.and_hms_opt(0, 0, 0).map(|d| d + Duration::seconds(secs));
        match datetime {
            Some(dt) => dt.format("%d.%m.%Y %H:%M:%S").to_string(),
            None => date.format("%d.%m.%Y").to_string(),
        }
    }
}
