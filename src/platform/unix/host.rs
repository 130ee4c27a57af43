//! Unix host capabilities

use crate::platform::traits::HostOps;

pub struct UnixHost;

impl UnixHost {
    pub fn new() -> Self {
        Self
    }
}

impl HostOps for UnixHost {
    fn runs_dos_binaries(&self) -> bool {
        false
    }

    fn line_terminator(&self) -> &'static str {
        "\n"
    }
}
