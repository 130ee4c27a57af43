//! Platform-specific operation traits
//!
//! These traits define the interface for platform-specific operations,
//! allowing for clean abstraction and easier testing.

use crate::error::Result;
use std::path::PathBuf;

/// Platform-specific path operations
pub trait PathOps: Send + Sync {
    /// Get configuration directory
    fn config_dir(&self) -> Result<PathBuf>;

    /// Get data directory
    fn data_dir(&self) -> Result<PathBuf>;
}

/// What the host can do with the foreign binaries
pub trait HostOps: Send + Sync {
    /// Whether the emulator and converter executables run without a compatibility layer
    fn runs_dos_binaries(&self) -> bool;

    /// Line terminator used by console streams
    fn line_terminator(&self) -> &'static str;
}
