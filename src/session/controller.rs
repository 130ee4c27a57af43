//! Session Controller
//!
//! Owns the emulator process bound to one disk image, its input stream and
//! the two background tasks that drain stdout and stderr into the session's
//! [`OutputBuffer`].

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin};
use tokio::task::JoinHandle;

use super::output::{OutputBuffer, StreamKind};
use super::settle::SettlePolicy;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::{EmulatorProcess, SessionState};
use crate::platform::{absolute_path, Invocation, Platform};

/// Controls one emulator process for one disk image
pub struct SessionController {
    /// How to launch the emulator
    invocation: Invocation,
    /// Wait applied after launch for the startup banner
    warm_up: SettlePolicy,
    /// Directory the emulator runs in; inherited from the caller when unset
    working_directory: Option<PathBuf>,
    /// Lifecycle bookkeeping
    process: EmulatorProcess,
    /// Child handle, present while a process has been launched and not reaped
    child: Option<Child>,
    /// Child stdin, valid only while the process is alive
    stdin: Option<ChildStdin>,
    /// Aggregated stdout/stderr lines
    output: OutputBuffer,
    /// Background stream readers
    readers: Vec<JoinHandle<()>>,
}

impl SessionController {
    /// Create a controller for `image` using the configured emulator and launch strategy
    pub fn new(image: impl Into<PathBuf>, config: &Config) -> Result<Self> {
        let image = image.into();
        if image.as_os_str().is_empty() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Disk image path cannot be empty",
            )));
        }

        let Some(dir) = &config.emulator.working_directory else {
            let invocation = config
                .launch_strategy()
                .emulator(&config.emulator.executable, &image);
            return Ok(Self::with_invocation(image, invocation, config.timing.warm_up()));
        };

        // The child runs elsewhere, so relative paths must not reach it
        let invocation = config.launch_strategy().emulator(
            &absolute_path(&config.emulator.executable)?,
            &absolute_path(&image)?,
        );
        Ok(Self::with_invocation(image, invocation, config.timing.warm_up())
            .with_working_directory(absolute_path(dir)?))
    }

    /// Create a controller that launches an explicit invocation
    pub fn with_invocation(
        image: impl Into<PathBuf>,
        invocation: Invocation,
        warm_up: SettlePolicy,
    ) -> Self {
        Self {
            invocation,
            warm_up,
            working_directory: None,
            process: EmulatorProcess::new(image.into()),
            child: None,
            stdin: None,
            output: OutputBuffer::new(),
            readers: Vec::new(),
        }
    }

    /// Run the emulator in `dir` instead of the caller's directory
    pub fn with_working_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_directory = Some(dir.into());
        self
    }

    /// Disk image this session is bound to
    pub fn image_path(&self) -> &Path {
        &self.process.image
    }

    /// Directory the emulator is started in, when not inherited
    pub fn working_directory(&self) -> Option<&Path> {
        self.working_directory.as_deref()
    }

    /// The invocation used to launch the emulator
    pub fn invocation(&self) -> &Invocation {
        &self.invocation
    }

    /// The session's output buffer
    pub fn output(&self) -> &OutputBuffer {
        &self.output
    }

    /// Lifecycle record of the emulator process
    pub fn process(&self) -> &EmulatorProcess {
        &self.process
    }

    /// Current lifecycle state, noticing a child that exited on its own
    pub fn state(&mut self) -> SessionState {
        self.refresh();
        self.process.state
    }

    /// Whether the emulator process is alive
    pub fn is_running(&mut self) -> bool {
        self.state() == SessionState::Running
    }

    fn refresh(&mut self) {
        let Some(child) = self.child.as_mut() else {
            return;
        };

        match child.try_wait() {
            Ok(None) => {}
            Ok(Some(status)) => {
                warn!(
                    "Emulator for {} exited on its own ({})",
                    self.process.image.display(),
                    status
                );
                self.process.mark_stopped(status.code());
                self.stdin = None;
            }
            Err(e) => {
                error!("Failed to poll emulator process: {}", e);
            }
        }
    }

    /// Launch the emulator and wait for its startup banner
    pub async fn start(&mut self) -> Result<()> {
        if self.is_running() {
            return Err(Error::AlreadyRunning {
                image: self.process.image.clone(),
            });
        }
        self.release();

        let program = self.invocation.program_name();
        info!("Starting emulator: {}", self.invocation);

        let mut command = self.invocation.to_command();
        command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.working_directory {
            debug!("Emulator working directory: {}", dir.display());
            command.current_dir(dir);
        }

        let mut child = command.spawn().map_err(|e| {
            error!("Failed to spawn '{}': {}", self.invocation, e);
            Error::SpawnFailed {
                program: program.clone(),
                reason: e.to_string(),
            }
        })?;

        let stdin = child.stdin.take();
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let missing = match (&stdin, &stdout, &stderr) {
            (None, _, _) => "stdin",
            (_, None, _) => "stdout",
            _ => "stderr",
        };
        let (Some(stdin), Some(stdout), Some(stderr)) = (stdin, stdout, stderr) else {
            error!("Failed to attach {} of '{}', killing it", missing, program);
            if let Err(e) = child.kill().await {
                error!("Failed to kill partially started emulator: {}", e);
            }
            self.process.mark_started(None);
            self.process.mark_stopped(None);
            return Err(Error::StreamAttachFailed {
                program,
                stream: missing.to_string(),
            });
        };

        self.output.clear();
        self.readers = vec![
            tokio::spawn(drain(stdout, self.output.clone(), StreamKind::Output)),
            tokio::spawn(drain(stderr, self.output.clone(), StreamKind::Error)),
        ];
        self.process.mark_started(child.id());
        self.stdin = Some(stdin);
        self.child = Some(child);

        debug!("Emulator started with pid {:?}", self.process.pid);

        let outcome = self.warm_up.wait(&self.output).await;
        let banner = self.read_output();
        debug!("Warm-up ended ({:?}), banner:\n{}", outcome, banner);

        Ok(())
    }

    /// Write one command line to the emulator and flush
    ///
    /// No response is awaited; synchronization is up to the caller.
    pub async fn send_command(&mut self, text: &str) -> Result<()> {
        if !self.is_running() {
            return Err(Error::NotRunning);
        }
        let stdin = self.stdin.as_mut().ok_or(Error::NotRunning)?;

        debug!("> {}", text);
        let line = format!("{}{}", text, Platform::line_terminator());
        let send_failed = |e: std::io::Error| Error::CommandSendFailed {
            command: text.to_string(),
            reason: e.to_string(),
        };
        stdin.write_all(line.as_bytes()).await.map_err(send_failed)?;
        stdin.flush().await.map_err(send_failed)?;
        Ok(())
    }

    /// Atomically return everything buffered so far and clear the buffer
    pub fn read_output(&self) -> String {
        self.output.take_text()
    }

    /// Kill the emulator, wait for it to exit and release every handle
    ///
    /// Calling this with no live process is a no-op.
    pub async fn stop(&mut self) -> Result<()> {
        self.stdin = None;

        let Some(mut child) = self.child.take() else {
            self.release();
            return Ok(());
        };

        let exit = match child.try_wait() {
            Ok(Some(status)) => Ok(status.code()),
            _ => {
                info!("Stopping emulator for {}", self.process.image.display());
                terminate(&mut child).await
            }
        };
        self.finish_stop(exit)
    }

    /// Record the end of the process whether or not it was reaped cleanly
    fn finish_stop(&mut self, exit: std::io::Result<Option<i32>>) -> Result<()> {
        self.release();
        match exit {
            Ok(code) => {
                self.process.mark_stopped(code);
                Ok(())
            }
            Err(e) => {
                error!(
                    "Failed to stop emulator for {}: {}",
                    self.process.image.display(),
                    e
                );
                self.process.mark_stopped(None);
                Err(e.into())
            }
        }
    }

    fn release(&mut self) {
        self.stdin = None;
        for reader in self.readers.drain(..) {
            reader.abort();
        }
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        for reader in self.readers.drain(..) {
            reader.abort();
        }
        if let Some(child) = self.child.as_mut() {
            if let Err(e) = child.start_kill() {
                debug!("Emulator already gone on drop: {}", e);
            }
        }
    }
}

/// Kill the child and reap it
async fn terminate(child: &mut Child) -> std::io::Result<Option<i32>> {
    child.kill().await?;
    Ok(child.wait().await?.code())
}

/// Read complete lines from a child stream into the buffer until EOF
async fn drain<R>(stream: R, buffer: OutputBuffer, kind: StreamKind)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(stream);
    let mut raw = Vec::new();

    loop {
        raw.clear();
        match reader.read_until(b'\n', &mut raw).await {
            Ok(0) => break,
            Ok(_) => {
                while matches!(raw.last(), Some(b'\n' | b'\r')) {
                    raw.pop();
                }
                buffer.append(kind, &String::from_utf8_lossy(&raw));
            }
            Err(e) => {
                warn!("Stopped reading emulator {:?} stream: {}", kind, e);
                break;
            }
        }
    }

    trace!("Emulator {:?} stream closed", kind);
}
