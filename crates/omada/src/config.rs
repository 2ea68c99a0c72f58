//! CLI configuration: thin wrapper around `omada_config`.
//!
//! Adds `--config` path handling and target resolution from `GlobalOpts`.

use std::path::PathBuf;

pub use omada_config::{Config, Target};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Config file in use: `--config` / `OMADA_CONFIG`, else the platform path.
pub fn config_path(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(omada_config::config_path)
}

pub fn load_config(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(omada_config::load_config_from(&config_path(global))?)
}

pub fn save_config(cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    omada_config::save_config_to(cfg, &config_path(global))?;
    Ok(())
}

/// The target selected by `--target`, or the default target.
pub fn resolve_target(global: &GlobalOpts) -> Result<(String, Target), CliError> {
    let cfg = load_config(global)?;
    let name = cfg.resolve_name(global.target_name())?.to_owned();
    let target = cfg.target(&name)?.clone();
    Ok((name, target))
}
