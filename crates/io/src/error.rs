use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum TableError {
    /// Source file does not exist.
    NotFound { path: PathBuf },
    /// File exists but its rows cannot be read as a table.
    Format { path: PathBuf, message: String },
    /// Read or write failure.
    Io { path: PathBuf, message: String },
}

impl TableError {
    pub(crate) fn format(path: &Path, message: impl Into<String>) -> Self {
        Self::Format {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    pub(crate) fn io(path: &Path, message: impl ToString) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }

    /// Map an open/read error, keeping "not found" distinct.
    pub(crate) fn from_read(path: &Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::io(path, err)
        }
    }
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { path } => write!(f, "file '{}' not found", path.display()),
            Self::Format { path, message } => {
                write!(f, "cannot parse '{}': {message}", path.display())
            }
            Self::Io { path, message } => write!(f, "IO error on '{}': {message}", path.display()),
        }
    }
}

impl std::error::Error for TableError {}
