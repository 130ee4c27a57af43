//! Emulator Process Model
//!
//! Lifecycle bookkeeping for the one emulator process a session owns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Lifecycle state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SessionState {
    /// No process has been launched yet
    #[default]
    NotStarted,
    /// The emulator process is alive
    Running,
    /// The process was killed or exited on its own
    Stopped,
}

/// Lifecycle record of the emulator process bound to one disk image
#[derive(Debug, Clone)]
pub struct EmulatorProcess {
    /// Disk image the process was started against
    pub image: PathBuf,

    /// OS process identifier
    pub pid: Option<u32>,

    /// Current state of the process
    pub state: SessionState,

    /// When the process was started
    pub start_time: Option<DateTime<Utc>>,

    /// When the process stopped (if applicable)
    pub end_time: Option<DateTime<Utc>>,

    /// Exit code, when the OS reported one
    pub exit_code: Option<i32>,
}

impl EmulatorProcess {
    /// Create a record in the `NotStarted` state
    pub fn new(image: PathBuf) -> Self {
        Self {
            image,
            pid: None,
            state: SessionState::NotStarted,
            start_time: None,
            end_time: None,
            exit_code: None,
        }
    }

    /// Mark the process as started with the given PID
    pub fn mark_started(&mut self, pid: Option<u32>) {
        self.pid = pid;
        self.state = SessionState::Running;
        self.start_time = Some(Utc::now());
        self.end_time = None;
        self.exit_code = None;
    }

    /// Mark the process as stopped
    pub fn mark_stopped(&mut self, exit_code: Option<i32>) {
        if self.state == SessionState::Stopped {
            return;
        }
        self.state = SessionState::Stopped;
        self.end_time = Some(Utc::now());
        self.exit_code = exit_code;
    }

    /// Check if the process is currently running
    pub fn is_running(&self) -> bool {
        matches!(self.state, SessionState::Running)
    }

    /// How long the process ran, once it has stopped
    pub fn run_time(&self) -> Option<std::time::Duration> {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => {
                Some(end.signed_duration_since(start).to_std().unwrap_or_default())
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for EmulatorProcess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let pid = self.pid.map_or("N/A".to_string(), |pid| pid.to_string());
        write!(f, "{} [{}] - {:?}", self.image.display(), pid, self.state)?;
        if let Some(code) = self.exit_code {
            write!(f, " (exit: {})", code)?;
        }
        Ok(())
    }
}
