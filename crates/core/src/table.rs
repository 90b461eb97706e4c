use serde::Serialize;

/// An ordered table of string cells.
///
/// Every row holds exactly `headers.len()` cells. Rows shorter than the
/// header are padded with empty strings on insert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let mut table = Self::new(headers);
        for row in rows {
            table.push_row(row);
        }
        table
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Index of the first header equal to `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Append a row, padding it to the header width.
    ///
    /// Cells beyond the header width are dropped.
    pub fn push_row(&mut self, mut cells: Vec<String>) {
        cells.resize(self.headers.len(), String::new());
        self.rows.push(cells);
    }

    pub fn raw_rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Cell at (row, col), or `""` when out of range.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// All values of one column in row order.
    pub fn column(&self, col: usize) -> impl Iterator<Item = &str> + '_ {
        self.rows
            .iter()
            .map(move |r| r.get(col).map(String::as_str).unwrap_or(""))
    }

    /// Replace the column named `name` with `values`, or append it as a new
    /// rightmost column. Returns the column index.
    ///
    /// `values` must have one entry per row; missing entries become empty.
    pub fn set_column(&mut self, name: &str, values: Vec<String>) -> usize {
        let col = match self.column_index(name) {
            Some(col) => col,
            None => {
                self.headers.push(name.to_string());
                for row in &mut self.rows {
                    row.push(String::new());
                }
                self.headers.len() - 1
            }
        };

        let mut values = values.into_iter();
        for row in &mut self.rows {
            row[col] = values.next().unwrap_or_default();
        }
        col
    }

    /// Keep only the first `n` rows.
    pub fn head(&self, n: usize) -> Table {
        Table {
            headers: self.headers.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Project onto the named columns, in the given order. Unknown names
    /// are skipped.
    pub fn select(&self, names: &[&str]) -> Table {
        let cols = self.resolve(names);
        Table {
            headers: cols.iter().map(|(_, n)| n.to_string()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| cols.iter().map(|(c, _)| row[*c].clone()).collect())
                .collect(),
        }
    }

    /// Like [`Table::select`], but drops duplicate rows while keeping first
    /// occurrences.
    pub fn distinct_projection(&self, names: &[&str]) -> Table {
        let cols = self.resolve(names);

        let mut seen = std::collections::HashSet::new();
        let mut out = Table::new(cols.iter().map(|(_, n)| n.to_string()).collect());
        for row in &self.rows {
            let projected: Vec<String> = cols.iter().map(|(c, _)| row[*c].clone()).collect();
            if seen.insert(projected.clone()) {
                out.rows.push(projected);
            }
        }
        out
    }

    fn resolve<'n>(&self, names: &[&'n str]) -> Vec<(usize, &'n str)> {
        names
            .iter()
            .filter_map(|name| self.column_index(name).map(|c| (c, *name)))
            .collect()
    }
}
