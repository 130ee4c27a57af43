//! Directory entries scraped from the emulator's `dir` listing

use serde::{Deserialize, Serialize};
use std::fmt;

/// One sample name from a directory listing, padding removed
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// Name as the sampler OS knows it, e.g. `PIANO.VC`
    pub name: String,
}

impl DirectoryEntry {
    /// Create an entry
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Whether the entry is a voice card sample (only these can be exported)
    pub fn is_voice_card(&self) -> bool {
        self.name.ends_with("VC")
    }
}

impl fmt::Display for DirectoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<&str> for DirectoryEntry {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}
