//! Windows path operations

use crate::error::{Error, Result};
use crate::platform::traits::PathOps;
use std::path::PathBuf;

pub struct WindowsPaths;

impl WindowsPaths {
    pub fn new() -> Self {
        Self
    }
}

fn known_folder(dir: Option<PathBuf>, what: &str) -> Result<PathBuf> {
    dir.ok_or_else(|| {
        Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Could not determine {} directory", what),
        ))
    })
}

impl PathOps for WindowsPaths {
    fn config_dir(&self) -> Result<PathBuf> {
        // AppData\Roaming
        known_folder(dirs::config_dir(), "config")
    }

    fn data_dir(&self) -> Result<PathBuf> {
        // AppData\Local, where the shell history lives
        known_folder(dirs::data_local_dir(), "data")
    }
}
