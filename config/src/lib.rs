//! Seed the process environment from a project `.env` and an XDG
//! `config.toml`, with priority **existing env > .env > XDG**.
//!
//! The CLI reads its connection settings (`GI_NOTEBOOK_HOST`,
//! `GI_NOTEBOOK_PORT`, `GI_NOTEBOOK_API_ROOT`, `GI_NOTEBOOK_TOKEN`) from the
//! environment; this crate fills in whatever the shell did not set, so a
//! checkout-local `.env` or `~/.config/ginotebook/config.toml` both work
//! without exporting anything.

mod dotenv;
mod xdg;

use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("read xdg config: {0}")]
    XdgRead(std::io::Error),
    #[error("parse xdg toml: {0}")]
    XdgParse(#[from] toml::de::Error),
    #[error("read .env: {0}")]
    DotenvRead(std::io::Error),
}

/// Apply config values to the process environment, setting only keys that are
/// **not** already present there.
///
/// When a key is missing from the environment, the value comes from:
/// 1. the project `.env` (in `override_dir` if given, else the current
///    directory), then
/// 2. the `[env]` table of `<config dir>/<app_name>/config.toml`.
pub fn load_and_apply(app_name: &str, override_dir: Option<&Path>) -> Result<(), LoadError> {
    let xdg_map = xdg::read(app_name)?;
    let dotenv_map = dotenv::read(override_dir).map_err(LoadError::DotenvRead)?;

    let mut keys: std::collections::HashSet<&String> = xdg_map.keys().collect();
    keys.extend(dotenv_map.keys());

    for key in keys {
        if std::env::var(key).is_ok() {
            continue; // existing env wins
        }
        if let Some(value) = dotenv_map.get(key).or_else(|| xdg_map.get(key)) {
            std::env::set_var(key, value);
        }
    }

    Ok(())
}
