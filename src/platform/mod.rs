//! Platform abstraction layer
//!
//! Host-specific knowledge lives here: where configuration files go, whether
//! the DOS-era binaries can run natively, and which line terminator the
//! console streams use.

mod launch;
mod traits;
#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod windows;

pub use launch::{absolute_path, Invocation, LaunchStrategy, PathTranslator};
pub use traits::*;

use crate::config::LaunchMode;

/// Platform implementation factory
pub struct Platform;

impl Platform {
    /// Get the platform-specific path operations
    pub fn paths() -> Box<dyn PathOps> {
        #[cfg(unix)]
        {
            Box::new(unix::UnixPaths::new())
        }

        #[cfg(windows)]
        {
            Box::new(windows::WindowsPaths::new())
        }

        #[cfg(not(any(unix, windows)))]
        {
            compile_error!("Unsupported platform");
        }
    }

    /// Get the platform-specific host capabilities
    pub fn host() -> Box<dyn HostOps> {
        #[cfg(unix)]
        {
            Box::new(unix::UnixHost::new())
        }

        #[cfg(windows)]
        {
            Box::new(windows::WindowsHost::new())
        }

        #[cfg(not(any(unix, windows)))]
        {
            compile_error!("Unsupported platform");
        }
    }

    /// Launch mode used when the configuration says `auto`
    pub fn default_launch_mode() -> LaunchMode {
        if Self::host().runs_dos_binaries() {
            LaunchMode::Direct
        } else {
            LaunchMode::Compatibility
        }
    }

    /// Line terminator of the child's console streams on this host
    pub fn line_terminator() -> &'static str {
        Self::host().line_terminator()
    }
}
