//! Core data models for cmifloppy
//!
//! Plain data shared between the session layer, the directory scraper and
//! the conversion pipeline.

pub mod directory_entry;
pub mod disk_format;
pub mod emulator_process;

pub use directory_entry::DirectoryEntry;
pub use disk_format::TargetFormat;
pub use emulator_process::{EmulatorProcess, SessionState};
