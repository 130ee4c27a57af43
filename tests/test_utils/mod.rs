//! Test Utilities
//!
//! Stand-in emulator and converter scripts, run through `sh` as the
//! compatibility layer so no Wine or DOS binaries are needed.

#![allow(dead_code)]

pub mod fixtures;

pub use fixtures::{mono_8bit_wav, FakeToolkit};
