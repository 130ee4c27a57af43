//! Windows host capabilities

use crate::platform::traits::HostOps;

pub struct WindowsHost;

impl WindowsHost {
    pub fn new() -> Self {
        Self
    }
}

impl HostOps for WindowsHost {
    fn runs_dos_binaries(&self) -> bool {
        true
    }

    fn line_terminator(&self) -> &'static str {
        "\r\n"
    }
}
