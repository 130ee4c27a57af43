//! Disk image container formats the conversion pipeline can produce

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::Error;

/// Target container format of a conversion job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetFormat {
    /// ImageDisk, produced directly by the raw converter
    Imd,
    /// MAME floppy image
    Mfi,
    /// HxC MFM image
    Mfm,
}

impl TargetFormat {
    /// Lowercase name as the format tool expects it
    pub fn as_str(self) -> &'static str {
        match self {
            TargetFormat::Imd => "imd",
            TargetFormat::Mfi => "mfi",
            TargetFormat::Mfm => "mfm",
        }
    }

    /// Whether the format needs the IMD intermediate and a second tool
    pub fn needs_second_stage(self) -> bool {
        !matches!(self, TargetFormat::Imd)
    }

    /// Infer the format from a destination file extension
    pub fn from_extension(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "imd" => Ok(TargetFormat::Imd),
            "mfi" => Ok(TargetFormat::Mfi),
            "mfm" => Ok(TargetFormat::Mfm),
            _ => Err(Error::UnsupportedFormat {
                format: s.to_string(),
            }),
        }
    }
}
