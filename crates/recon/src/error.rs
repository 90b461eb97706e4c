use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty or duplicate column names, etc.).
    ConfigValidation(String),
    /// Missing required column in input data.
    MissingColumn { column: String },
    /// A citation still has more than one distinct cleaned date.
    ConsistencyViolation { citations: Vec<String> },
    /// Before/after tables handed to `diff` are not row-aligned.
    RowCountMismatch { before: usize, after: usize },
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingColumn { column } => write!(f, "missing required column '{column}'"),
            Self::ConsistencyViolation { citations } => {
                write!(
                    f,
                    "{} citation(s) still have inconsistent cleaned dates: {}",
                    citations.len(),
                    citations.join(", ")
                )
            }
            Self::RowCountMismatch { before, after } => {
                write!(f, "row count mismatch: {before} rows before, {after} rows after")
            }
        }
    }
}

impl std::error::Error for ReconError {}

/// Resolve a column by name or fail with [`ReconError::MissingColumn`].
pub(crate) fn require_column(table: &citedate_core::Table, name: &str) -> Result<usize, ReconError> {
    table.column_index(name).ok_or_else(|| ReconError::MissingColumn {
        column: name.to_string(),
    })
}
