use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Pipeline configuration, usually read from `citedate.toml`.
///
/// Every section is optional; an empty document yields the defaults used by
/// the marriage-record tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    #[serde(default)]
    pub columns: ColumnNames,
    #[serde(default)]
    pub files: FileNames,
    #[serde(default)]
    pub report: ReportSettings,
}

// ---------------------------------------------------------------------------
// Columns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnNames {
    pub citation: String,
    pub date: String,
    pub cleaned: String,
    pub iso: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            citation: "Citation".into(),
            date: "Date".into(),
            cleaned: "Date_Cleaned".into(),
            iso: "Date_ISO".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

/// Stage artifact names. Relative names resolve against a base directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileNames {
    pub excel: String,
    pub messy: String,
    pub cleaned: String,
    #[serde(rename = "final")]
    pub final_: String,
}

impl Default for FileNames {
    fn default() -> Self {
        Self {
            excel: "MarriagePaticipantsTable_Messy.xlsx".into(),
            messy: "MarriagePaticipantsTable_Messy.csv".into(),
            cleaned: "MarriagePaticipantsTable_Cleaned.csv".into(),
            final_: "MarriagePaticipantsTable_Final.csv".into(),
        }
    }
}

/// File names joined onto a base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagePaths {
    pub excel: PathBuf,
    pub messy: PathBuf,
    pub cleaned: PathBuf,
    pub final_: PathBuf,
}

impl FileNames {
    pub fn resolve(&self, base_dir: &Path) -> StagePaths {
        StagePaths {
            excel: base_dir.join(&self.excel),
            messy: base_dir.join(&self.messy),
            cleaned: base_dir.join(&self.cleaned),
            final_: base_dir.join(&self.final_),
        }
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportSettings {
    /// Rows shown after an Excel conversion.
    pub preview_rows: usize,
    /// Distinct rows shown in analysis and final verification samples.
    pub sample_rows: usize,
    /// Rows shown in before/after and ISO conversion samples.
    pub comparison_rows: usize,
    /// Citations whose date distribution is printed during analysis.
    pub analysis_citations: usize,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            preview_rows: 5,
            sample_rows: 15,
            comparison_rows: 10,
            analysis_citations: 5,
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl PipelineConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: PipelineConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ReconError> {
        toml::to_string_pretty(self).map_err(|e| ReconError::ConfigParse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        let c = &self.columns;
        let columns = [
            ("citation", &c.citation),
            ("date", &c.date),
            ("cleaned", &c.cleaned),
            ("iso", &c.iso),
        ];

        for (key, name) in &columns {
            if name.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "columns.{key} must not be empty"
                )));
            }
        }

        // Derived columns overwrite by name, so every role needs its own column
        for (i, (key_a, name_a)) in columns.iter().enumerate() {
            for (key_b, name_b) in &columns[i + 1..] {
                if name_a == name_b {
                    return Err(ReconError::ConfigValidation(format!(
                        "columns.{key_a} and columns.{key_b} are both '{name_a}'"
                    )));
                }
            }
        }

        let f = &self.files;
        for (key, name) in [
            ("excel", &f.excel),
            ("messy", &f.messy),
            ("cleaned", &f.cleaned),
            ("final", &f.final_),
        ] {
            if name.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "files.{key} must not be empty"
                )));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
