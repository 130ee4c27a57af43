//! Unix-specific platform implementations

mod host;
mod paths;

pub use host::UnixHost;
pub use paths::UnixPaths;
