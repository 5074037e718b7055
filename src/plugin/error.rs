//! Plugin system error types.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for plugin operations.
pub type PluginResult<T> = Result<T, PluginError>;

/// Errors that can occur during plugin operations.
///
/// The loader pipeline itself never returns these; its failures become
/// state on the loader. These cover the registry and manifest helpers.
#[derive(Debug, Error)]
pub enum PluginError {
    /// Plugin root or plugin directory not found.
    #[error("Plugin path not found: {0}")]
    NotFound(PathBuf),

    /// Invalid plugin manifest.
    #[error("Invalid plugin manifest: {0}")]
    InvalidManifest(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
