//! Emulator session control
//!
//! The sampler OS has no structured protocol: a session is a long-lived child
//! process fed command lines on stdin, whose stdout and stderr are drained
//! concurrently into one shared buffer that callers read and clear.

pub mod controller;
pub mod output;
pub mod settle;

pub use controller::SessionController;
pub use output::{OutputBuffer, StreamKind, ERROR_MARKER};
pub use settle::{SettleOutcome, SettlePolicy};
