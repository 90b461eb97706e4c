// CSV import/export for whole tables

use std::io::Read;
use std::path::{Path, PathBuf};

use citedate_core::Table;
use tracing::{debug, info};

use crate::error::TableError;

/// Load a CSV file with a header row, sniffing the delimiter.
pub fn load(path: &Path) -> Result<Table, TableError> {
    let content = read_file_as_utf8(path)?;
    let delimiter = sniff_delimiter(&content);
    debug!(path = %path.display(), delimiter = %(delimiter as char), "sniffed delimiter");
    parse_table(path, &content, delimiter)
}

/// Lines examined when guessing the delimiter.
const SNIFF_LINES: usize = 20;

/// Guess the field delimiter from the first lines of the file.
///
/// Excel in day-first locales exports with semicolons, and hand-made files
/// use tabs or pipes, so comma is only the default. Each candidate parses the
/// sample as real CSV (quoted commas inside names are not split). A candidate
/// must split the header into at least two fields; the winner is the one
/// whose records most often have exactly the header's field count, with the
/// wider header breaking ties. Equal scores keep the candidate order below.
fn sniff_delimiter(content: &str) -> u8 {
    const CANDIDATES: [u8; 4] = [b',', b';', b'\t', b'|'];

    let sample: String = content
        .lines()
        .take(SNIFF_LINES)
        .flat_map(|line| [line, "\n"])
        .collect();

    let score = |delimiter: u8| -> Option<(usize, usize)> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(sample.as_bytes());
        let mut lengths = reader.records().map_while(Result::ok).map(|r| r.len());

        let width = lengths.next().filter(|&w| w > 1)?;
        let matching = lengths.filter(|&len| len == width).count();
        Some((matching, width))
    };

    CANDIDATES
        .iter()
        .filter_map(|&d| score(d).map(|s| (s, d)))
        // max_by_key keeps the last maximum; reverse so earlier candidates win ties
        .rev()
        .max_by_key(|&(s, _)| s)
        .map_or(b',', |(_, d)| d)
}

/// Read file and convert to UTF-8 if needed (handles Windows-1252, Latin-1, etc.)
///
/// A leading UTF-8 byte order mark is dropped.
pub fn read_file_as_utf8(path: &Path) -> Result<String, TableError> {
    let mut file = std::fs::File::open(path).map_err(|e| TableError::from_read(path, e))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| TableError::from_read(path, e))?;

    let text = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let bytes = e.into_bytes();
            // Fall back to Windows-1252 (common for Excel-exported CSVs)
            debug!(path = %path.display(), "not UTF-8, decoding as Windows-1252");
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
    };

    Ok(match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    })
}

fn parse_table(path: &Path, content: &str, delimiter: u8) -> Result<Table, TableError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| TableError::format(path, e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();

    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(TableError::format(path, "no header row"));
    }

    let mut table = Table::new(headers);
    for result in reader.records() {
        let record = result.map_err(|e| TableError::format(path, e.to_string()))?;
        if record.len() > table.column_count() {
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            return Err(TableError::format(
                path,
                format!(
                    "line {line}: {} fields, header has {}",
                    record.len(),
                    table.column_count()
                ),
            ));
        }
        // Blank lines carry no record
        if record.iter().all(str::is_empty) && record.len() <= 1 {
            continue;
        }
        table.push_row(record.iter().map(str::to_string).collect());
    }

    info!(path = %path.display(), rows = table.len(), columns = table.column_count(), "loaded table");
    Ok(table)
}

/// Write a table as comma-separated UTF-8 with a header row.
///
/// The destination is replaced atomically: data goes to a sibling temp file
/// first, so a failed write never leaves a truncated file behind.
pub fn write(table: &Table, path: &Path) -> Result<(), TableError> {
    stage(table, path)?.commit()
}

/// A table written to a temp sibling of its destination, not yet renamed
/// into place. Dropping it without [`Staged::commit`] removes the temp file.
#[derive(Debug)]
pub struct Staged {
    tmp: PathBuf,
    dest: PathBuf,
    rows: usize,
    committed: bool,
}

/// Write `table` next to `path` without touching `path` itself.
///
/// Fails up front if the destination cannot be replaced by a file, so that
/// several tables can be staged and then committed together.
pub fn stage(table: &Table, path: &Path) -> Result<Staged, TableError> {
    if path.is_dir() {
        return Err(TableError::io(path, "destination is a directory"));
    }

    let tmp = temp_sibling(path);
    let staged = Staged {
        tmp,
        dest: path.to_path_buf(),
        rows: table.len(),
        committed: false,
    };
    write_to_path(table, &staged.tmp)?;
    debug!(path = %path.display(), "staged table");
    Ok(staged)
}

impl Staged {
    pub fn path(&self) -> &Path {
        &self.dest
    }

    /// Rename the temp file over the destination.
    pub fn commit(mut self) -> Result<(), TableError> {
        std::fs::rename(&self.tmp, &self.dest).map_err(|e| TableError::io(&self.dest, e))?;
        self.committed = true;
        info!(path = %self.dest.display(), rows = self.rows, "wrote table");
        Ok(())
    }
}

impl Drop for Staged {
    fn drop(&mut self) {
        if !self.committed {
            let _ = std::fs::remove_file(&self.tmp);
        }
    }
}

/// Commit staged tables in order. Every table has already been written in
/// full, so only the renames remain.
pub fn commit_all(staged: Vec<Staged>) -> Result<(), TableError> {
    staged.into_iter().try_for_each(Staged::commit)
}

fn write_to_path(table: &Table, path: &Path) -> Result<(), TableError> {
    let mut writer = csv::WriterBuilder::new()
        .from_path(path)
        .map_err(|e| TableError::io(path, e))?;

    writer
        .write_record(table.headers())
        .map_err(|e| TableError::io(path, e))?;
    for row in table.raw_rows() {
        writer.write_record(row).map_err(|e| TableError::io(path, e))?;
    }

    writer.flush().map_err(|e| TableError::io(path, e))?;
    Ok(())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "table.csv".to_string());
    path.with_file_name(format!(".{name}.tmp"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn load_reads_header_and_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("messy.csv");
        fs::write(&path, "Citation,Date,Name\n1,01.02.2020,Anna\n1,03.02.2020,\"Berg, Jon\"\n").unwrap();

        let table = load(&path).unwrap();
        assert_eq!(table.headers(), &["Citation", "Date", "Name"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(1, 2), "Berg, Jon");
    }

    #[test]
    fn load_sniffs_semicolons() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("semi.csv");
        fs::write(&path, "Citation;Date\n1;01.02.2020\n2;03.02.2020\n").unwrap();

        let table = load(&path).unwrap();
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.cell(1, 1), "03.02.2020");
    }

    #[test]
    fn sniff_prefers_consistent_field_counts() {
        // Quoted commas in a semicolon file must not make comma win
        let semi = "Citation;Date;Name\n1;01.02.2020;\"Berg, Jon\"\n2;03.02.2020;\"Dahl, Kari\"\n";
        assert_eq!(sniff_delimiter(semi), b';');

        assert_eq!(sniff_delimiter("Citation\tDate\n1\t01.02.2020\n"), b'\t');
        assert_eq!(sniff_delimiter("Citation|Date\n1|01.02.2020\n"), b'|');
        // Single column or empty input falls back to comma
        assert_eq!(sniff_delimiter("Citation\n1\n"), b',');
        assert_eq!(sniff_delimiter(""), b',');
    }

    #[test]
    fn load_pads_short_rows_and_skips_blank_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("short.csv");
        fs::write(&path, "Citation,Date,Name\n1,01.02.2020\n\n2,03.02.2020,Kari\n").unwrap();

        let table = load(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(0, 2), "");
        assert_eq!(table.cell(1, 2), "Kari");
    }

    #[test]
    fn load_rejects_overlong_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("long.csv");
        fs::write(&path, "Citation,Date\n1,01.02.2020,extra\n").unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, TableError::Format { .. }), "{err}");
        assert!(err.to_string().contains("3 fields"));
    }

    #[test]
    fn load_missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let err = load(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, TableError::NotFound { .. }));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn load_empty_file_is_format_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        fs::write(&path, "").unwrap();
        assert!(matches!(load(&path).unwrap_err(), TableError::Format { .. }));
    }

    #[test]
    fn load_strips_bom_and_decodes_windows_1252() {
        let dir = tempdir().unwrap();
        let bom = dir.path().join("bom.csv");
        fs::write(&bom, "\u{feff}Citation,Date\n1,01.02.2020\n").unwrap();
        assert_eq!(load(&bom).unwrap().headers()[0], "Citation");

        let latin = dir.path().join("latin.csv");
        // "Sæther" in Windows-1252
        fs::write(&latin, b"Citation,Surname\n1,S\xe6ther\n").unwrap();
        assert_eq!(load(&latin).unwrap().cell(0, 1), "Sæther");
    }

    #[test]
    fn write_then_load_preserves_order_and_quoting() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let table = Table::from_rows(
            vec!["Citation".into(), "Date".into(), "Note".into()],
            vec![
                vec!["2".into(), "03.02.2020".into(), "a, b".into()],
                vec!["1".into(), "01.02.2020".into(), "".into()],
            ],
        );

        write(&table, &path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("Citation,Date,Note\n2,03.02.2020,\"a, b\"\n"));
        assert_eq!(load(&path).unwrap(), table);
        assert!(!dir.path().join(".out.csv.tmp").exists());
    }

    #[test]
    fn write_overwrites_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        fs::write(&path, "old,content\nx,y\nz,w\n").unwrap();

        let table = Table::from_rows(vec!["A".into()], vec![vec!["1".into()]]);
        write(&table, &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "A\n1\n");
    }

    #[test]
    fn staged_tables_appear_only_on_commit() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.csv");
        let b = dir.path().join("b.csv");
        let table = Table::from_rows(vec!["A".into()], vec![vec!["1".into()]]);

        let staged = vec![stage(&table, &a).unwrap(), stage(&table, &b).unwrap()];
        assert!(!a.exists() && !b.exists());
        assert!(dir.path().join(".a.csv.tmp").exists());
        assert_eq!(staged[1].path(), b.as_path());

        commit_all(staged).unwrap();
        assert_eq!(fs::read_to_string(&a).unwrap(), "A\n1\n");
        assert_eq!(fs::read_to_string(&b).unwrap(), "A\n1\n");
        assert!(!dir.path().join(".b.csv.tmp").exists());
    }

    #[test]
    fn dropped_stage_removes_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let table = Table::new(vec!["A".into()]);

        drop(stage(&table, &path).unwrap());
        assert!(!path.exists());
        assert!(!dir.path().join(".out.csv.tmp").exists());
    }

    #[test]
    fn stage_onto_directory_fails_before_writing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("taken.csv");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep.txt"), "x").unwrap();

        let err = stage(&Table::new(vec!["A".into()]), &path).unwrap_err();
        assert!(matches!(err, TableError::Io { .. }));
        assert!(err.to_string().contains("directory"));
        assert!(!dir.path().join(".taken.csv.tmp").exists());
    }

    #[test]
    fn write_into_missing_dir_fails_cleanly() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("no/such/dir/out.csv");
        let table = Table::new(vec!["A".into()]);
        let err = write(&table, &path).unwrap_err();
        assert!(matches!(err, TableError::Io { .. }));
        assert!(!path.exists());
    }
}
