//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Code | Domain     | Description                                   |
//! |------|------------|-----------------------------------------------|
//! | 0    | Universal  | Success (date conversion warnings included)   |
//! | 1    | Universal  | General error (unspecified)                   |
//! | 2    | Universal  | CLI usage error (bad args)                    |
//! | 3-5  | io         | Source missing, unparseable input, write/IO   |
//! | 6-7  | recon      | Missing column, consistency violation         |
//! | 8    | config     | Invalid or unreadable config                  |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant error mapping below

use citedate_io::TableError;
use citedate_recon::ReconError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without fatal errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
#[allow(dead_code)]
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// IO (3-5)
// =============================================================================

/// Input file does not exist.
pub const EXIT_SOURCE_NOT_FOUND: u8 = 3;

/// Input file exists but cannot be parsed as a table.
pub const EXIT_FORMAT: u8 = 4;

/// Read or write failure (permissions, disk, rename).
pub const EXIT_IO: u8 = 5;

// =============================================================================
// Recon (6-7)
// =============================================================================

/// A required column (citation, date, cleaned) is absent.
pub const EXIT_MISSING_COLUMN: u8 = 6;

/// A citation still has more than one cleaned date after reconciliation.
pub const EXIT_CONSISTENCY: u8 = 7;

// =============================================================================
// Config (8)
// =============================================================================

/// Config file unreadable, unparseable, or invalid.
pub const EXIT_CONFIG: u8 = 8;

// =============================================================================
// Error mapping
// =============================================================================

pub fn table_exit_code(err: &TableError) -> u8 {
    match err {
        TableError::NotFound { .. } => EXIT_SOURCE_NOT_FOUND,
        TableError::Format { .. } => EXIT_FORMAT,
        TableError::Io { .. } => EXIT_IO,
    }
}

pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::MissingColumn { .. } => EXIT_MISSING_COLUMN,
        ReconError::ConsistencyViolation { .. } => EXIT_CONSISTENCY,
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_CONFIG,
        ReconError::RowCountMismatch { .. } => EXIT_ERROR,
    }
}
