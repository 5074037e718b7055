//! Core plugin loading types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse outcome of a load attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadState {
    /// No load has been attempted since construction or the last reset.
    #[default]
    None,
    /// The directory loaded as a valid plugin.
    Ok,
    /// The load failed; see the error state for the reason.
    Error,
}

/// Specific reason when the load outcome is `Error`.
///
/// `None` holds exactly when the load state is not `Error`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorState {
    /// No error.
    #[default]
    None,
    /// The directory argument was blank or absent.
    Input,
    /// The path does not resolve to an existing directory.
    MissingDir,
    /// The manifest file is absent at the expected location.
    MissingPackage,
    /// The manifest is unparseable or lacks the reserved root key.
    BadPackage,
    /// The manifest is structurally valid but the namespace is blank.
    Namespace,
}

impl LoadState {
    /// Get the display name for this load state.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Ok => "ok",
            Self::Error => "error",
        }
    }
}

impl ErrorState {
    /// Get the display name for this error state.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Input => "input",
            Self::MissingDir => "missingdir",
            Self::MissingPackage => "missingpackage",
            Self::BadPackage => "badpackage",
            Self::Namespace => "namespace",
        }
    }
}

impl std::fmt::Display for LoadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::fmt::Display for ErrorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Typed failure produced by the pure evaluation path.
///
/// The mutable read model derives its [`ErrorState`] from this via `From`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LoadFailure {
    /// Directory argument blank or absent; no I/O attempted.
    #[error("plugin directory argument is blank")]
    BlankInput,

    /// Path does not exist or is not a directory.
    #[error("plugin directory does not exist")]
    MissingDirectory,

    /// Manifest file absent at `<directory>/package.json`.
    #[error("plugin manifest {MANIFEST_FILE} not found")]
    MissingManifest,

    /// Manifest unparseable or missing the `staplegun` root key.
    #[error("plugin manifest is invalid or lacks a {MANIFEST_KEY} entry")]
    BadManifest,

    /// Manifest valid but the namespace field is blank.
    #[error("plugin namespace is blank")]
    BlankNamespace,
}

impl From<LoadFailure> for ErrorState {
    fn from(failure: LoadFailure) -> Self {
        match failure {
            LoadFailure::BlankInput => Self::Input,
            LoadFailure::MissingDirectory => Self::MissingDir,
            LoadFailure::MissingManifest => Self::MissingPackage,
            LoadFailure::BadManifest => Self::BadPackage,
            LoadFailure::BlankNamespace => Self::Namespace,
        }
    }
}

/// Manifest file name expected inside a plugin directory.
pub const MANIFEST_FILE: &str = "package.json";

/// Reserved root key inside the manifest that holds the plugin section.
pub const MANIFEST_KEY: &str = "staplegun";

/// Subdirectory scanned for auto-discovered command scripts.
pub const COMMANDS_DIR: &str = "commands";

/// File extension of command scripts.
pub const COMMAND_EXTENSION: &str = "js";

/// Check whether a string is blank (empty or whitespace-only).
///
/// Applied uniformly to the directory argument and the manifest namespace.
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}
