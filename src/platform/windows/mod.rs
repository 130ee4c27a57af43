//! Windows-specific platform implementations

mod host;
mod paths;

pub use host::WindowsHost;
pub use paths::WindowsPaths;
