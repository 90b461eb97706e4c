//! Resolved config and output mode shared by the stage commands.

use std::io;
use std::path::{Path, PathBuf};

use citedate_cli::report::Report;
use citedate_recon::config::{ReportSettings, StagePaths};
use citedate_recon::{ColumnNames, PipelineConfig};
use tracing::{debug, info};

use crate::exit_codes::EXIT_CONFIG;
use crate::CliError;

/// Looked up in the current directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "citedate.toml";

pub struct Context {
    pub config: PipelineConfig,
    pub paths: StagePaths,
    pub json: bool,
    pub quiet: bool,
}

impl Context {
    pub fn load(config_path: Option<&Path>, json: bool, quiet: bool) -> Result<Self, CliError> {
        let (config, source) = load_config(config_path)?;

        // Relative file names resolve against the config file's directory
        let base_dir = source
            .as_deref()
            .and_then(Path::parent)
            .unwrap_or_else(|| Path::new(""));
        let paths = config.files.resolve(base_dir);

        Ok(Self { config, paths, json, quiet })
    }

    pub fn columns(&self) -> &ColumnNames {
        &self.config.columns
    }

    pub fn settings(&self) -> &ReportSettings {
        &self.config.report
    }

    /// Human report on stdout; silent under `--quiet` or `--json`.
    pub fn report(&self) -> Report<io::StdoutLock<'static>> {
        Report::new(io::stdout().lock(), !self.quiet && !self.json)
    }
}

/// Read and validate the config. Without an explicit path, falls back to
/// `citedate.toml` if it exists, otherwise to the built-in defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<(PipelineConfig, Option<PathBuf>), CliError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let path = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !path.is_file() {
                debug!("no {DEFAULT_CONFIG_FILE} found, using built-in defaults");
                return Ok((PipelineConfig::default(), None));
            }
            path
        }
    };

    let text = std::fs::read_to_string(&path).map_err(|e| {
        CliError::new(EXIT_CONFIG, format!("cannot read config '{}': {e}", path.display()))
    })?;
    let config = PipelineConfig::from_toml(&text)
        .map_err(|e| CliError::new(EXIT_CONFIG, format!("{}: {e}", path.display())))?;

    info!(path = %path.display(), "loaded config");
    Ok((config, Some(path)))
}
