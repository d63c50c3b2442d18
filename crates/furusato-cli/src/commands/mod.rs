//! Subcommands.

pub mod config;
pub mod extract;
pub mod page;

use std::path::Path;

use furusato_core::FurusatoConfig;
use tracing::debug;

/// Load `--config` if given, else the user config file if present, else
/// defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<FurusatoConfig> {
    if let Some(path) = config_path {
        return Ok(FurusatoConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Using config {}", default_path.display());
        Ok(FurusatoConfig::from_file(&default_path)?)
    } else {
        Ok(FurusatoConfig::default())
    }
}

/// Split a `--ner-command` value into program and arguments.
pub fn split_command(command: &str) -> Vec<String> {
    command.split_whitespace().map(str::to_string).collect()
}
