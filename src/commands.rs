//! Command grammar of the sampler OS console
//!
//! Every user intent maps to one literal line written to the emulator's
//! stdin, paired with the settle policy the caller waits out before reading
//! the response. Host paths are translated into the guest convention here,
//! before they are embedded in a command.

use std::fmt;
use std::path::Path;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::platform::PathTranslator;
use crate::session::SettlePolicy;

/// File suffix of voice card samples on the disk
pub const VOICE_CARD_SUFFIX: &str = ".VC";

/// One console command and how long to let it settle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    line: String,
    settle: SettlePolicy,
}

impl Command {
    /// Create a command from a literal line
    pub fn new(line: impl Into<String>, settle: SettlePolicy) -> Self {
        Self {
            line: line.into(),
            settle,
        }
    }

    /// The literal text sent to the emulator, without terminator
    pub fn line(&self) -> &str {
        &self.line
    }

    /// Wait applied after sending the command
    pub fn settle(&self) -> SettlePolicy {
        self.settle
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line)
    }
}

/// Builds commands for one host/guest path convention
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    translator: PathTranslator,
    settle: SettlePolicy,
}

impl CommandBuilder {
    /// Create a builder with an explicit translator and settle policy
    pub fn new(translator: PathTranslator, settle: SettlePolicy) -> Self {
        Self { translator, settle }
    }

    /// Builder matching the configured launch strategy and timing
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.path_translator(), config.timing.command_settle())
    }

    /// The path translator in use
    pub fn translator(&self) -> &PathTranslator {
        &self.translator
    }

    /// `dir`
    pub fn dir(&self) -> Command {
        self.command("dir".to_string())
    }

    /// `wav2vc2 <guest wav> <name>.VC`
    pub fn import(&self, wav: &Path, name: &str) -> Result<Command> {
        validate_sample_name(name)?;
        let source = self.translator.to_guest(wav);
        Ok(self.command(format!("wav2vc2 {} {}{}", source, name, VOICE_CARD_SUFFIX)))
    }

    /// `vc2wav <name> <guest dest>`
    pub fn export_wav(&self, name: &str, dest: &Path) -> Result<Command> {
        validate_sample_name(name)?;
        let target = self.translator.to_guest(dest);
        Ok(self.command(format!("vc2wav {} {}", name, target)))
    }

    /// `export <name>`, written by the emulator into its working directory
    pub fn export_vc(&self, name: &str) -> Result<Command> {
        validate_sample_name(name)?;
        Ok(self.command(format!("export {}", name)))
    }

    /// `rm <name>`
    pub fn delete(&self, name: &str) -> Result<Command> {
        validate_sample_name(name)?;
        Ok(self.command(format!("rm {}", name)))
    }

    /// `move <old> <new>.VC`
    pub fn rename(&self, old: &str, new: &str) -> Result<Command> {
        validate_sample_name(old)?;
        validate_sample_name(new)?;
        Ok(self.command(format!("move {} {}{}", old, new, VOICE_CARD_SUFFIX)))
    }

    /// A free-form line, used by the interactive shell
    pub fn raw(&self, line: &str) -> Result<Command> {
        if line.contains(['\r', '\n']) {
            return Err(Error::InvalidSampleName {
                name: line.to_string(),
                reason: "command must be a single line".to_string(),
            });
        }
        Ok(self.command(line.trim().to_string()))
    }

    fn command(&self, line: String) -> Command {
        Command::new(line, self.settle)
    }
}

/// Reject names that would break the line-oriented command grammar
pub fn validate_sample_name(name: &str) -> Result<()> {
    let reason = if name.is_empty() {
        "name cannot be empty"
    } else if name.contains(['\r', '\n']) {
        "name cannot contain line breaks"
    } else if name.chars().any(char::is_whitespace) {
        "name cannot contain whitespace"
    } else {
        return Ok(());
    };

    Err(Error::InvalidSampleName {
        name: name.to_string(),
        reason: reason.to_string(),
    })
}

/// File name the emulator gives a sample written by `export`
pub fn exported_file_name(name: &str) -> String {
    if name.ends_with(VOICE_CARD_SUFFIX) {
        name.to_string()
    } else {
        format!("{}{}", name, VOICE_CARD_SUFFIX)
    }
}
