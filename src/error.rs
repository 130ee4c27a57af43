//! Error types and Result aliases for cmifloppy

use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

/// Result type alias for cmifloppy operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for cmifloppy
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // === Session errors ===
    /// `start` was called while the emulator process is still alive
    #[error("The emulator process is already running for '{}'", image.display())]
    AlreadyRunning { image: PathBuf },

    /// A command was attempted with no live emulator process
    #[error("The emulator process is not running")]
    NotRunning,

    /// The emulator or a converter could not be launched at all
    #[error("Failed to spawn '{program}': {reason}")]
    SpawnFailed { program: String, reason: String },

    /// One of the redirected child streams could not be attached
    #[error("Failed to attach {stream} of '{program}'")]
    StreamAttachFailed { program: String, stream: String },

    /// Writing a command line to the emulator failed
    #[error("Failed to send '{command}' to the emulator: {reason}")]
    CommandSendFailed { command: String, reason: String },

    /// The quiescence wait gave up before the child went quiet
    #[error("Output did not settle within {timeout:?}")]
    SettleTimeout { timeout: Duration },

    // === Scraper errors (logged, never returned to callers of the scraper) ===
    /// The listing grammar could not be evaluated
    #[error("Failed to parse directory listing: {reason}")]
    ParseFailure { reason: String },

    // === Conversion errors ===
    /// A converter returned non-zero or could not be run
    #[error("External tool '{tool}' failed ({status}): {stderr}")]
    ExternalToolFailure {
        tool: String,
        status: String,
        stderr: String,
    },

    /// Unknown target disk image format
    #[error("Unsupported disk image format: '{format}'")]
    UnsupportedFormat { format: String },

    // === Sample and image errors ===
    /// A sample name cannot be embedded into a command line
    #[error("Invalid sample name '{name}': {reason}")]
    InvalidSampleName { name: String, reason: String },

    /// The WAV file is not mono 8-bit PCM
    #[error("'{}' is not a mono 8-bit PCM WAV file", path.display())]
    InvalidWav { path: PathBuf },

    /// The blank disk template is missing
    #[error("Blank disk template not found at '{}'", path.display())]
    TemplateNotFound { path: PathBuf },

    /// Refused to overwrite an existing file
    #[error("'{}' already exists", path.display())]
    FileExists { path: PathBuf },

    /// `export` finished but the emulator left no file behind
    #[error("The emulator did not write '{}'", path.display())]
    ExportNotWritten { path: PathBuf },

    /// A tempo that has no sequencer speed
    #[error("Invalid tempo {bpm}: must be a positive number of beats per minute")]
    InvalidTempo { bpm: f64 },

    /// An operation needed an open disk image
    #[error("No disk image is open")]
    NoImageOpen,

    // === Configuration errors ===
    /// Failed to load configuration file
    #[error("Failed to load config from '{}': {reason}", path.display())]
    ConfigLoadFailed { path: PathBuf, reason: String },

    /// Failed to save configuration file
    #[error("Failed to save config to '{}': {reason}", path.display())]
    ConfigSaveFailed { path: PathBuf, reason: String },

    /// Configuration file not found
    #[error("Configuration file not found")]
    ConfigNotFound,

    /// Configuration validation failed
    #[error("Configuration validation failed for '{field}': {reason}")]
    ConfigValidationFailed { field: String, reason: String },

    /// Failed to parse configuration
    #[error("Failed to parse {format} config: {reason}")]
    ConfigParseFailed { format: String, reason: String },

    /// Failed to serialize configuration
    #[error("Failed to serialize config as {format}: {reason}")]
    ConfigSerializationFailed { format: String, reason: String },

    // === I/O ===
    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build an `ExternalToolFailure` from a finished process
    pub fn tool_failed(tool: &str, status: ExitStatus, stderr: &[u8]) -> Self {
        Error::ExternalToolFailure {
            tool: tool.to_string(),
            status: status.to_string(),
            stderr: String::from_utf8_lossy(stderr).trim().to_string(),
        }
    }

    /// Whether the failure came from one of the external binaries
    pub fn is_external(&self) -> bool {
        matches!(
            self,
            Error::SpawnFailed { .. } | Error::ExternalToolFailure { .. }
        )
    }
}
