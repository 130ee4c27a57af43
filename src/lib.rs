//! cmifloppy - disk image editor for the CMI sampler OS
//!
//! The sampler OS is an opaque DOS-era binary. This crate drives it through
//! its text console: one long-lived emulator process per disk image, commands
//! written to stdin, and directory listings scraped back out of the
//! interleaved stdout/stderr text. Disk format changes are delegated to two
//! external converters chained through an intermediate IMD file.
//!
//! ## Module Organization
//!
//! - [`session`] - Emulator process lifecycle, output buffer, settle policies
//! - [`directory`] - Directory listing scraper
//! - [`commands`] - Console command grammar
//! - [`disk`] - Sample operations on an open disk, WAV check, image creation
//! - [`convert`] - Two-stage conversion pipeline and tool runner
//! - [`workbench`] - Single active disk plus conversion flow
//! - [`tempo`] - BPM to sequencer speed conversion
//! - [`config`] - Configuration loading and validation
//! - [`platform`] - Host capabilities, launch strategies, guest paths
//! - [`models`] - Plain data types
//! - [`mod@error`] - Error types and Result aliases
//!
//! ## Quick Start
//!
//! ```no_run
//! use cmifloppy::{init, Workbench};
//! use std::path::Path;
//!
//! # async fn run() -> cmifloppy::Result<()> {
//! let config = init(None)?;
//! let mut workbench = Workbench::new(config);
//! for entry in workbench.open(Path::new("voices.img")).await? {
//!     println!("{}", entry);
//! }
//! workbench.close().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Synchronization
//!
//! The console has no acknowledgement protocol. Each command is followed by
//! a settle wait (fixed delay or output quiescence) before its output is read,
//! and a [`SampleDisk`] only lets one command be in flight at a time.

#[macro_use]
extern crate tracing;

pub mod commands;
pub mod config;
pub mod convert;
pub mod directory;
pub mod disk;
pub mod error;
pub mod models;
pub mod platform;
pub mod session;
pub mod tempo;
pub mod workbench;

pub use commands::{Command, CommandBuilder};
pub use config::loader::ConfigLoader;
pub use config::Config;
pub use convert::{ConversionJob, ConversionPipeline, ProcessToolRunner, ToolRunner};
pub use directory::{scrape_directory, DirectoryScraper};
pub use disk::{DiskLabel, ExportKind, SampleDisk};
pub use error::{Error, Result};
pub use models::{DirectoryEntry, SessionState, TargetFormat};
pub use session::{SessionController, SettlePolicy};
pub use tempo::bpm_to_speed;
pub use workbench::Workbench;

/// The current version of cmifloppy from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The package name from Cargo.toml
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// The package description from Cargo.toml
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Load configuration and report what will be launched
///
/// `config_path` overrides the search locations. Without it a missing file
/// falls back to defaults; a file that exists but does not parse or
/// validate is an error.
pub fn init(config_path: Option<&std::path::Path>) -> Result<Config> {
    info!("Initializing {} v{}", NAME, VERSION);

    let config = ConfigLoader::load_from(config_path)?;
    let strategy = config.launch_strategy();
    debug!("Launch strategy: {:?}", strategy);

    if !config.emulator.executable.exists() {
        warn!(
            "Emulator not found at {}; sessions will fail to start",
            config.emulator.executable.display()
        );
    }

    Ok(config)
}

/// Human-readable explanation of a startup failure with hints
pub fn handle_startup_error(error: &Error) -> String {
    match error {
        Error::ConfigLoadFailed { path, reason } => format!(
            "Configuration Error: Failed to load config from '{}': {}\n\nTry:\n• Check the file exists and is readable\n• Unset ${} to use the default locations",
            path.display(),
            reason,
            config::loader::CONFIG_ENV_VAR
        ),
        Error::ConfigParseFailed { format, reason } => format!(
            "Configuration Error: Failed to parse {} config: {}\n\nTry:\n• Check configuration file syntax\n• Run `cmifloppy config` to print a valid configuration",
            format, reason
        ),
        Error::ConfigValidationFailed { field, reason } => format!(
            "Configuration Error: Validation failed for '{}': {}",
            field, reason
        ),
        Error::SpawnFailed { program, reason } => format!(
            "Could not start '{}': {}\n\nTry:\n• Check emulator.executable and emulator.compatibility_runner\n• Install Wine or set emulator.launch_mode = \"direct\"",
            program, reason
        ),
        Error::ExternalToolFailure { tool, status, stderr } => format!(
            "Conversion failed in {} ({}){}",
            tool,
            status,
            if stderr.is_empty() {
                String::new()
            } else {
                format!(":\n{}", stderr)
            }
        ),
        other => other.to_string(),
    }
}
