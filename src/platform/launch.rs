//! Launch strategies and guest path translation
//!
//! The emulator and converters are DOS-era executables. On hosts that can
//! run them natively they are executed directly; elsewhere they go through a
//! compatibility layer that takes the executable path as its first argument.
//! Either way the caller gets back a plain `(program, args)` pair.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Resolve `path` against the current directory, leaving absolute paths alone
///
/// Needed for anything handed to a child that runs in another directory.
pub fn absolute_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// A normalized program + argv pair ready to hand to the process layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program to execute
    pub program: OsString,
    /// Arguments, passed as discrete argv entries
    pub args: Vec<OsString>,
}

impl Invocation {
    /// Create an invocation from a program and its arguments
    pub fn new<P, I, A>(program: P, args: I) -> Self
    where
        P: Into<OsString>,
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Build a `tokio::process::Command` for this invocation
    pub fn to_command(&self) -> tokio::process::Command {
        let mut command = tokio::process::Command::new(&self.program);
        command.args(&self.args);
        command
    }

    /// Short name used in logs and errors
    pub fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// How a foreign executable is started on this host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchStrategy {
    /// Run the executable itself
    Direct,
    /// Run `runner <executable> <args...>`
    Compatibility { runner: String },
}

impl LaunchStrategy {
    /// Wrap `executable args...` according to the strategy
    pub fn invocation<I, A>(&self, executable: &Path, args: I) -> Invocation
    where
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        match self {
            LaunchStrategy::Direct => Invocation::new(executable.as_os_str(), args),
            LaunchStrategy::Compatibility { runner } => {
                let mut argv: Vec<OsString> = vec![executable.as_os_str().to_os_string()];
                argv.extend(args.into_iter().map(Into::into));
                Invocation::new(runner.as_str(), argv)
            }
        }
    }

    /// The emulator invocation bound to one disk image: `<exe> -q1 <image>`
    pub fn emulator(&self, executable: &Path, image: &Path) -> Invocation {
        self.invocation(
            executable,
            [OsString::from("-q1"), image.as_os_str().to_os_string()],
        )
    }
}

/// Rewrites host paths into the convention the emulator expects
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathTranslator {
    /// Paths are passed through unchanged
    Identity,
    /// Prefix with a drive letter and use backslash separators
    DrivePrefix { prefix: String },
}

impl PathTranslator {
    /// Translate a host path for embedding in an emulator command
    pub fn to_guest(&self, path: &Path) -> String {
        let host = path.to_string_lossy();
        match self {
            PathTranslator::Identity => host.into_owned(),
            PathTranslator::DrivePrefix { prefix } => {
                format!("{}{}", prefix, host.replace('/', "\\"))
            }
        }
    }
}
