//! Settle policies
//!
//! The emulator never acknowledges a command. After writing one, the caller
//! waits until the response is assumed to be fully buffered, either for a
//! fixed delay or until the output has been quiet for a window of time.

use std::time::{Duration, Instant};
use tokio::sync::watch;

use super::output::OutputBuffer;

/// Upper bound on how often the quiescence detector samples the buffer
const MAX_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// How long to wait after a command before reading its output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlePolicy {
    /// Sleep for exactly this long
    Fixed(Duration),
    /// Wait until no output has arrived for `window`, giving up after `timeout`
    Quiescence { window: Duration, timeout: Duration },
}

/// How a settle wait ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleOutcome {
    /// The fixed delay elapsed
    Elapsed,
    /// The output went quiet
    Quiet,
    /// The timeout passed while output was still arriving
    TimedOut,
    /// The wait was interrupted by the session owner
    Interrupted,
}

impl SettlePolicy {
    /// Wait according to the policy, watching `buffer` for activity
    pub async fn wait(&self, buffer: &OutputBuffer) -> SettleOutcome {
        match *self {
            SettlePolicy::Fixed(delay) => {
                tokio::time::sleep(delay).await;
                SettleOutcome::Elapsed
            }
            SettlePolicy::Quiescence { window, timeout } => {
                wait_for_quiescence(buffer, window, timeout).await
            }
        }
    }

    /// Like [`wait`](Self::wait), but returns early when `interrupt` changes
    pub async fn wait_or_interrupt(
        &self,
        buffer: &OutputBuffer,
        interrupt: &mut watch::Receiver<u64>,
    ) -> SettleOutcome {
        tokio::select! {
            outcome = self.wait(buffer) => outcome,
            Ok(()) = interrupt.changed() => SettleOutcome::Interrupted,
        }
    }
}

async fn wait_for_quiescence(
    buffer: &OutputBuffer,
    window: Duration,
    timeout: Duration,
) -> SettleOutcome {
    let started = Instant::now();
    let poll = (window / 4).clamp(Duration::from_millis(1), MAX_POLL_INTERVAL);

    loop {
        tokio::time::sleep(poll).await;

        // Output from before the wait started does not count as activity
        let quiet_for = match buffer.last_activity() {
            Some(last) if last > started => last.elapsed(),
            _ => started.elapsed(),
        };

        if quiet_for >= window {
            return SettleOutcome::Quiet;
        }
        if started.elapsed() >= timeout {
            return SettleOutcome::TimedOut;
        }
    }
}
