//! Unix path operations (XDG base directories)

use crate::error::{Error, Result};
use crate::platform::traits::PathOps;
use std::path::PathBuf;

pub struct UnixPaths;

impl UnixPaths {
    pub fn new() -> Self {
        Self
    }
}

/// `$var`, then the `dirs` lookup, then `~/<fallback>`
fn xdg_dir(var: &str, lookup: Option<PathBuf>, fallback: &str, what: &str) -> Result<PathBuf> {
    std::env::var_os(var)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .or(lookup)
        .or_else(|| dirs::home_dir().map(|home| home.join(fallback)))
        .ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Could not determine {} directory", what),
            ))
        })
}

impl PathOps for UnixPaths {
    fn config_dir(&self) -> Result<PathBuf> {
        xdg_dir("XDG_CONFIG_HOME", dirs::config_dir(), ".config", "config")
    }

    fn data_dir(&self) -> Result<PathBuf> {
        xdg_dir("XDG_DATA_HOME", dirs::data_dir(), ".local/share", "data")
    }
}
