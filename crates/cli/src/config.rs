//! `citedate config`: validate or print the pipeline config.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use serde::Serialize;

use crate::context::{load_config, DEFAULT_CONFIG_FILE};
use crate::exit_codes::EXIT_CONFIG;
use crate::{print_json, CliError, RunMeta};

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Check a config file without running anything
    #[command(after_help = "\
Examples:
  citedate config validate
  citedate config validate data/citedate.toml")]
    Validate {
        /// Config file (default: --config, then ./citedate.toml)
        path: Option<PathBuf>,
    },

    /// Print the effective config as TOML, defaults filled in
    #[command(after_help = "\
Examples:
  citedate config show > citedate.toml
  citedate --config data/citedate.toml config show")]
    Show,
}

pub fn cmd_config(cmd: ConfigCommands, global: Option<&Path>, json: bool) -> Result<(), CliError> {
    match cmd {
        ConfigCommands::Validate { path } => cmd_config_validate(path.as_deref().or(global), json),
        ConfigCommands::Show => cmd_config_show(global, json),
    }
}

fn cmd_config_validate(path: Option<&Path>, json: bool) -> Result<(), CliError> {
    // Validate is explicit about its target: a missing default file is an error here
    let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
    if !path.is_file() {
        return Err(CliError::new(EXIT_CONFIG, format!("config '{}' not found", path.display()))
            .with_hint("`citedate config show > citedate.toml` writes a starting point"));
    }

    let (config, _) = load_config(Some(path))?;

    if json {
        #[derive(Serialize)]
        struct Doc<'a> {
            meta: RunMeta,
            path: &'a Path,
            valid: bool,
        }
        print_json(&Doc { meta: RunMeta::new("config validate"), path, valid: true })?;
    } else {
        let c = &config.columns;
        eprintln!(
            "{}: ok (columns: {}, {}, {}, {})",
            path.display(),
            c.citation,
            c.date,
            c.cleaned,
            c.iso
        );
    }
    Ok(())
}

fn cmd_config_show(global: Option<&Path>, json: bool) -> Result<(), CliError> {
    let (config, source) = load_config(global)?;

    if json {
        #[derive(Serialize)]
        struct Doc<'a> {
            meta: RunMeta,
            source: Option<&'a Path>,
            config: &'a citedate_recon::PipelineConfig,
        }
        return print_json(&Doc {
            meta: RunMeta::new("config show"),
            source: source.as_deref(),
            config: &config,
        });
    }

    match &source {
        Some(path) => println!("# effective config from {}", path.display()),
        None => println!("# built-in defaults (no {DEFAULT_CONFIG_FILE} found)"),
    }
    print!("{}", config.to_toml()?);
    Ok(())
}
