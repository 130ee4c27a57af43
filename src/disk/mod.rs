//! Sample disk sessions
//!
//! [`SampleDisk`] is the high-level handle on one open disk image. It owns
//! the emulator session, serializes command exchanges so that at most one
//! command is in flight, and turns user intents into console commands.

pub mod image;
pub mod wav;

use std::path::{Path, PathBuf};

use tokio::sync::{watch, Mutex};

use crate::commands::{exported_file_name, Command, CommandBuilder};
use crate::config::Config;
use crate::directory::DirectoryScraper;
use crate::error::{Error, Result};
use crate::models::DirectoryEntry;
use crate::platform::absolute_path;
use crate::session::{SessionController, SettleOutcome, SettlePolicy};

pub use image::{create_image, DiskLabel};
pub use wav::{is_mono_8bit_wav, WavFormat};

/// How an exported sample is written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    /// Converted to WAV by the emulator
    Wav,
    /// Native voice card file, moved out of the emulator's working directory
    VoiceCard,
}

impl ExportKind {
    /// Pick the export kind from the destination file name
    pub fn for_destination(dest: &Path) -> Self {
        match dest.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("vc") => ExportKind::VoiceCard,
            _ => ExportKind::Wav,
        }
    }
}

/// One open disk image and its emulator session
pub struct SampleDisk {
    image: PathBuf,
    session: Mutex<SessionController>,
    commands: CommandBuilder,
    scraper: DirectoryScraper,
    /// Directory the emulator drops `export` files into
    workdir: PathBuf,
    /// Bumped to cut short a settle wait in progress
    interrupt: watch::Sender<u64>,
}

impl SampleDisk {
    /// Prepare a session for `image` from configuration; nothing is launched yet
    pub fn open(image: impl Into<PathBuf>, config: &Config) -> Result<Self> {
        let image = image.into();
        let session = SessionController::new(image.clone(), config)?;
        let workdir = match &config.emulator.working_directory {
            Some(dir) => absolute_path(dir)?,
            None => std::env::current_dir()?,
        };
        Ok(Self::new(session, CommandBuilder::from_config(config), workdir))
    }

    /// Wrap an existing controller
    pub fn new(session: SessionController, commands: CommandBuilder, workdir: PathBuf) -> Self {
        let (interrupt, _) = watch::channel(0);
        Self {
            image: session.image_path().to_path_buf(),
            session: Mutex::new(session),
            commands,
            scraper: DirectoryScraper::new(),
            workdir,
            interrupt,
        }
    }

    /// Disk image this session is bound to
    pub fn image_path(&self) -> &Path {
        &self.image
    }

    /// Launch the emulator
    pub async fn start(&self) -> Result<()> {
        self.session.lock().await.start().await
    }

    /// Kill the emulator, cutting short any command waiting to settle
    pub async fn stop(&self) -> Result<()> {
        self.interrupt.send_modify(|generation| *generation += 1);
        self.session.lock().await.stop().await
    }

    /// Whether the emulator process is alive
    pub async fn is_running(&self) -> bool {
        self.session.lock().await.is_running()
    }

    /// Send one command, wait for it to settle and return everything it printed
    ///
    /// Exchanges are serialized: a second caller waits until the first has
    /// read its output.
    pub async fn exchange(&self, command: &Command) -> Result<String> {
        let mut interrupt = self.interrupt.subscribe();
        let mut session = self.session.lock().await;

        session.send_command(command.line()).await?;
        let outcome = command
            .settle()
            .wait_or_interrupt(session.output(), &mut interrupt)
            .await;

        match (outcome, command.settle()) {
            (SettleOutcome::TimedOut, SettlePolicy::Quiescence { timeout, .. }) => {
                warn!("'{}': {}", command, Error::SettleTimeout { timeout });
            }
            (SettleOutcome::Interrupted, _) => {
                debug!("'{}' interrupted before its output settled", command);
            }
            _ => {}
        }

        let output = session.read_output();
        debug!("Output of '{}':\n{}", command, output);
        Ok(output)
    }

    /// Entries of the disk directory
    pub async fn list_directory(&self) -> Result<Vec<DirectoryEntry>> {
        let output = self.exchange(&self.commands.dir()).await?;
        let entries = self.scraper.scrape(&output);
        if entries.is_empty() {
            debug!("No directory listing found in emulator output");
        }
        Ok(entries)
    }

    /// Import a mono 8-bit WAV as voice card `<name>.VC`
    pub async fn import_sample(&self, wav: &Path, name: &str) -> Result<String> {
        let command = self.commands.import(&absolute_path(wav)?, name)?;
        if !is_mono_8bit_wav(wav)? {
            return Err(Error::InvalidWav {
                path: wav.to_path_buf(),
            });
        }
        info!("Importing {} as {}", wav.display(), name);
        self.exchange(&command).await
    }

    /// Export a voice card sample to `dest`, as WAV or as a native `.vc` file
    pub async fn export_sample(&self, name: &str, dest: &Path) -> Result<ExportKind> {
        if !DirectoryEntry::new(name).is_voice_card() {
            return Err(Error::InvalidSampleName {
                name: name.to_string(),
                reason: "only voice card samples can be exported".to_string(),
            });
        }

        let kind = ExportKind::for_destination(dest);
        info!("Exporting {} to {} ({:?})", name, dest.display(), kind);

        match kind {
            ExportKind::Wav => {
                let command = self.commands.export_wav(name, &absolute_path(dest)?)?;
                self.exchange(&command).await?;
            }
            ExportKind::VoiceCard => {
                self.exchange(&self.commands.export_vc(name)?).await?;
                let exported = self.workdir.join(exported_file_name(name));
                if !tokio::fs::try_exists(&exported).await? {
                    return Err(Error::ExportNotWritten { path: exported });
                }
                move_file(&exported, dest).await?;
            }
        }

        Ok(kind)
    }

    /// Remove a sample from the disk
    pub async fn delete_sample(&self, name: &str) -> Result<String> {
        let command = self.commands.delete(name)?;
        info!("Deleting {}", name);
        self.exchange(&command).await
    }

    /// Rename a sample; the new name gets the voice card suffix
    pub async fn rename_sample(&self, old: &str, new: &str) -> Result<String> {
        let command = self.commands.rename(old, new)?;
        info!("Renaming {} to {}", old, new);
        self.exchange(&command).await
    }

    /// Send a free-form console line
    pub async fn send_raw(&self, line: &str) -> Result<String> {
        let command = self.commands.raw(line)?;
        self.exchange(&command).await
    }
}

/// Move a file, replacing `dest`; falls back to copy and delete across filesystems
async fn move_file(from: &Path, to: &Path) -> Result<()> {
    if tokio::fs::rename(from, to).await.is_ok() {
        return Ok(());
    }
    tokio::fs::copy(from, to).await?;
    tokio::fs::remove_file(from).await?;
    Ok(())
}
