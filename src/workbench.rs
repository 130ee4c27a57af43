//! Application flow over a single open disk
//!
//! The workbench holds at most one [`SampleDisk`]. Opening, creating or
//! converting an image always stops the previous session first.

use std::path::Path;

use crate::config::Config;
use crate::convert::{ConversionJob, ConversionPipeline, ProcessToolRunner, ToolRunner};
use crate::disk::{create_image, DiskLabel, SampleDisk};
use crate::error::{Error, Result};
use crate::models::{DirectoryEntry, TargetFormat};

/// Owns the active disk session and the conversion pipeline
pub struct Workbench<R = ProcessToolRunner> {
    config: Config,
    pipeline: ConversionPipeline<R>,
    disk: Option<SampleDisk>,
}

impl Workbench<ProcessToolRunner> {
    /// Workbench running the configured binaries
    pub fn new(config: Config) -> Self {
        let pipeline = ConversionPipeline::from_config(&config);
        Self::with_pipeline(config, pipeline)
    }
}

impl<R: ToolRunner> Workbench<R> {
    pub fn with_pipeline(config: Config, pipeline: ConversionPipeline<R>) -> Self {
        Self {
            config,
            pipeline,
            disk: None,
        }
    }

    /// The open disk, if any
    pub fn disk(&self) -> Option<&SampleDisk> {
        self.disk.as_ref()
    }

    /// The open disk, or `NoImageOpen`
    pub fn active(&self) -> Result<&SampleDisk> {
        self.disk.as_ref().ok_or(Error::NoImageOpen)
    }

    /// Start a session on `image` and list its directory
    pub async fn open(&mut self, image: &Path) -> Result<Vec<DirectoryEntry>> {
        self.close().await?;

        let disk = SampleDisk::open(image, &self.config)?;
        disk.start().await?;
        let entries = disk.list_directory().await?;
        info!("Opened {} ({} entries)", image.display(), entries.len());

        self.disk = Some(disk);
        Ok(entries)
    }

    /// Create a labelled blank image from the template and open it
    pub async fn create(
        &mut self,
        dest: &Path,
        label: &DiskLabel,
        overwrite: bool,
    ) -> Result<Vec<DirectoryEntry>> {
        self.close().await?;
        create_image(&self.config.image.template, dest, label, overwrite).await?;
        self.open(dest).await
    }

    /// Convert the open image, then resume a session on it
    ///
    /// A failing stage leaves no session open; the error is returned as is.
    pub async fn convert(
        &mut self,
        dest: &Path,
        format: Option<TargetFormat>,
    ) -> Result<Vec<DirectoryEntry>> {
        let source = self.active()?.image_path().to_path_buf();
        let job = ConversionJob::for_destination(&source, dest, format)?;

        self.close().await?;
        if let Err(e) = self.pipeline.run(&job).await {
            error!("Conversion of {} failed: {}", source.display(), e);
            return Err(e);
        }

        self.open(&source).await
    }

    /// Stop the active session, if any
    pub async fn close(&mut self) -> Result<()> {
        if let Some(disk) = self.disk.take() {
            debug!("Closing {}", disk.image_path().display());
            disk.stop().await?;
        }
        Ok(())
    }
}
