//! Configuration management for cmifloppy
//!
//! Locations of the external binaries, how they are launched on this host,
//! and the timing contract used to synchronize with the emulator console.

pub mod loader;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::platform::{LaunchStrategy, PathTranslator, Platform};
use crate::session::SettlePolicy;

/// Main configuration structure for cmifloppy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Emulator process configuration
    pub emulator: EmulatorConfig,

    /// Console synchronization timing
    pub timing: TimingConfig,

    /// Disk image converter tools
    pub tools: ToolsConfig,

    /// Disk image creation
    pub image: ImageConfig,
}

impl Config {
    /// Launch strategy resolved against the current host
    pub fn launch_strategy(&self) -> LaunchStrategy {
        let mode = match self.emulator.launch_mode {
            LaunchMode::Auto => Platform::default_launch_mode(),
            mode => mode,
        };

        match mode {
            LaunchMode::Compatibility | LaunchMode::Auto => LaunchStrategy::Compatibility {
                runner: self.emulator.compatibility_runner.clone(),
            },
            LaunchMode::Direct => LaunchStrategy::Direct,
        }
    }

    /// Host to guest path translator matching the launch strategy
    pub fn path_translator(&self) -> PathTranslator {
        match self.launch_strategy() {
            LaunchStrategy::Direct => PathTranslator::Identity,
            LaunchStrategy::Compatibility { .. } => PathTranslator::DrivePrefix {
                prefix: self.emulator.guest_drive_prefix.clone(),
            },
        }
    }
}

/// How the foreign executables are started
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LaunchMode {
    /// Decide from the host platform
    #[default]
    Auto,
    /// Execute the binaries directly
    Direct,
    /// Run the binaries through a compatibility layer such as Wine
    Compatibility,
}

/// Emulator process configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmulatorConfig {
    /// Path to the sampler OS executable
    pub executable: PathBuf,

    /// Launch mode
    pub launch_mode: LaunchMode,

    /// Program used as the compatibility layer
    pub compatibility_runner: String,

    /// Drive letter the compatibility layer maps the host root to
    pub guest_drive_prefix: String,

    /// Directory the emulator is started in, where `export` writes its files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_directory: Option<PathBuf>,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            executable: PathBuf::from("./Files/cmios9.exe"),
            launch_mode: LaunchMode::Auto,
            compatibility_runner: "wine".to_string(),
            guest_drive_prefix: "Z:".to_string(),
            working_directory: None,
        }
    }
}

/// How the console output is considered complete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SettleMode {
    /// Sleep for a fixed delay
    #[default]
    Fixed,
    /// Wait until the output goes quiet
    Quiescence,
}

/// Console synchronization timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Wait after launch for the startup banner, in milliseconds
    pub warm_up_ms: u64,

    /// Settle mode applied after each command
    pub settle_mode: SettleMode,

    /// Fixed settle delay in milliseconds
    pub settle_delay_ms: u64,

    /// Silence required before output is considered complete, in milliseconds
    pub quiet_window_ms: u64,

    /// Upper bound for a quiescence wait, in milliseconds
    pub settle_timeout_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            warm_up_ms: 1000,
            settle_mode: SettleMode::Fixed,
            settle_delay_ms: 500,
            quiet_window_ms: 150,
            settle_timeout_ms: 5000,
        }
    }
}

impl TimingConfig {
    /// Policy applied after every command
    pub fn command_settle(&self) -> SettlePolicy {
        match self.settle_mode {
            SettleMode::Fixed => SettlePolicy::Fixed(Duration::from_millis(self.settle_delay_ms)),
            SettleMode::Quiescence => SettlePolicy::Quiescence {
                window: Duration::from_millis(self.quiet_window_ms),
                timeout: Duration::from_millis(self.settle_timeout_ms),
            },
        }
    }

    /// Policy applied once after launching the emulator
    pub fn warm_up(&self) -> SettlePolicy {
        match self.settle_mode {
            SettleMode::Fixed => SettlePolicy::Fixed(Duration::from_millis(self.warm_up_ms)),
            SettleMode::Quiescence => SettlePolicy::Quiescence {
                window: Duration::from_millis(self.quiet_window_ms),
                timeout: Duration::from_millis(self.warm_up_ms.max(self.settle_timeout_ms)),
            },
        }
    }
}

/// Disk image converter tools
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Raw image to ImageDisk converter
    pub bin2imd: PathBuf,

    /// MAME floppy tool used for IMD to MFI/MFM
    pub floptool: PathBuf,

    /// Where intermediate IMD files are written (system temp dir when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intermediate_dir: Option<PathBuf>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            bin2imd: PathBuf::from("./Files/bin2imd.exe"),
            floptool: PathBuf::from("./Files/floptool.exe"),
            intermediate_dir: None,
        }
    }
}

/// Disk image creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Blank formatted disk copied when creating a new image
    pub template: PathBuf,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            template: PathBuf::from("./Files/empty.img"),
        }
    }
}
