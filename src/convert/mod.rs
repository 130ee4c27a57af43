//! Disk image format conversion
//!
//! A raw sampler disk is always turned into an ImageDisk (IMD) file first.
//! MFI and MFM targets take a second pass through the floppy tool, reading
//! an intermediate IMD artifact that only exists for the duration of the
//! job. The first failing stage aborts the job; the intermediate is removed
//! on every exit path.

pub mod runner;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::TargetFormat;
use crate::platform::{Invocation, LaunchStrategy};

pub use runner::{ProcessToolRunner, ToolOutput, ToolRunner};

/// File name of the intermediate IMD artifact
pub const INTERMEDIATE_FILE_NAME: &str = "temp.imd";

/// Disk geometry passed to the raw converter: 2 sides, 128-byte sectors
/// numbered 1-26, 77 tracks
pub const RAW_GEOMETRY: [&str; 5] = ["/2", "DM=0", "SS=128", "SM=1-26", "N=77"];

/// Tool names used in logs and errors
pub const RAW_TO_IMD_TOOL: &str = "bin2imd";
pub const FORMAT_TOOL: &str = "floptool";

/// One format conversion request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub format: TargetFormat,
}

impl ConversionJob {
    pub fn new(
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        format: TargetFormat,
    ) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            format,
        }
    }

    /// Job whose format is given explicitly or inferred from the destination extension
    pub fn for_destination(
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        format: Option<TargetFormat>,
    ) -> Result<Self> {
        let destination = destination.into();
        let format = match format {
            Some(format) => format,
            None => TargetFormat::from_extension(&destination).ok_or_else(|| {
                Error::UnsupportedFormat {
                    format: destination
                        .extension()
                        .map(|ext| ext.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                }
            })?,
        };
        Ok(Self::new(source, destination, format))
    }
}

/// Locations of the converter binaries and how to launch them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterTools {
    pub raw_to_imd: PathBuf,
    pub format_tool: PathBuf,
    pub strategy: LaunchStrategy,
    /// Directory for the intermediate artifact; a fresh temp dir when unset
    pub intermediate_dir: Option<PathBuf>,
}

impl ConverterTools {
    pub fn from_config(config: &Config) -> Self {
        Self {
            raw_to_imd: config.tools.bin2imd.clone(),
            format_tool: config.tools.floptool.clone(),
            strategy: config.launch_strategy(),
            intermediate_dir: config.tools.intermediate_dir.clone(),
        }
    }

    /// `<raw_to_imd> <source> <target> /2 DM=0 SS=128 SM=1-26 N=77`
    pub fn raw_to_imd(&self, source: &Path, target: &Path) -> Invocation {
        let mut args = vec![
            source.as_os_str().to_os_string(),
            target.as_os_str().to_os_string(),
        ];
        args.extend(RAW_GEOMETRY.iter().map(OsString::from));
        self.strategy.invocation(&self.raw_to_imd, args)
    }

    /// `<format_tool> flopconvert imd <format> <source.imd> <target>`
    pub fn imd_to_format(&self, format: TargetFormat, source: &Path, target: &Path) -> Invocation {
        let args = [
            OsString::from("flopconvert"),
            OsString::from("imd"),
            OsString::from(format.as_str()),
            source.as_os_str().to_os_string(),
            target.as_os_str().to_os_string(),
        ];
        self.strategy.invocation(&self.format_tool, args)
    }
}

/// Intermediate IMD file, deleted when dropped
pub struct IntermediateArtifact {
    path: PathBuf,
    _dir: Option<TempDir>,
}

impl IntermediateArtifact {
    /// Reserve `temp.imd` in `dir`, or in a new temporary directory
    pub fn create(dir: Option<&Path>) -> Result<Self> {
        match dir {
            Some(dir) => Ok(Self {
                path: dir.join(INTERMEDIATE_FILE_NAME),
                _dir: None,
            }),
            None => {
                let dir = TempDir::new()?;
                Ok(Self {
                    path: dir.path().join(INTERMEDIATE_FILE_NAME),
                    _dir: Some(dir),
                })
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for IntermediateArtifact {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed intermediate {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                "Failed to remove intermediate {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}

/// Runs conversion jobs stage by stage
pub struct ConversionPipeline<R = ProcessToolRunner> {
    tools: ConverterTools,
    runner: R,
}

impl ConversionPipeline<ProcessToolRunner> {
    /// Pipeline running the configured tools as child processes
    pub fn from_config(config: &Config) -> Self {
        Self::with_runner(ConverterTools::from_config(config), ProcessToolRunner)
    }
}

impl<R: ToolRunner> ConversionPipeline<R> {
    pub fn with_runner(tools: ConverterTools, runner: R) -> Self {
        Self { tools, runner }
    }

    /// Run every stage of `job`, stopping at the first failure
    ///
    /// The caller must make sure nothing else holds the source image open.
    pub async fn run(&self, job: &ConversionJob) -> Result<PathBuf> {
        info!(
            "Converting {} to {} ({})",
            job.source.display(),
            job.destination.display(),
            job.format
        );

        if !job.format.needs_second_stage() {
            let invocation = self.tools.raw_to_imd(&job.source, &job.destination);
            self.runner.run(RAW_TO_IMD_TOOL, &invocation).await?;
            return Ok(job.destination.clone());
        }

        let artifact = IntermediateArtifact::create(self.tools.intermediate_dir.as_deref())?;

        let stage1 = self.tools.raw_to_imd(&job.source, artifact.path());
        self.runner.run(RAW_TO_IMD_TOOL, &stage1).await?;

        let stage2 = self
            .tools
            .imd_to_format(job.format, artifact.path(), &job.destination);
        self.runner.run(FORMAT_TOOL, &stage2).await?;

        info!("Conversion finished: {}", job.destination.display());
        Ok(job.destination.clone())
    }
}
