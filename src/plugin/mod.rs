//! Plugin discovery and loading.
//!
//! A plugin is a directory containing a `package.json` manifest with a
//! `staplegun` section and, optionally, a `commands/` subdirectory of
//! command scripts. Loading a plugin runs a fixed validation pipeline
//! and records the outcome as state: either a namespace, defaults, and
//! a merged command list, or a precise error reason.
//!
//! # Example manifest
//!
//! ```json
//! {
//!   "staplegun": {
//!     "namespace": "movies",
//!     "defaults": { "cache": true },
//!     "commands": [
//!       { "name": "search", "file": "search.js", "description": "Search movies" }
//!     ]
//!   }
//! }
//! ```

mod command;
mod error;
mod loader;
mod manifest;
mod registry;
mod types;

pub use command::{CommandDescriptor, CommandLoader, ScriptCommandLoader};
pub use error::{PluginError, PluginResult};
pub use loader::{LoadedPlugin, PluginLoader};
pub use manifest::{ManifestCommand, PackageManifest, StaplegunSection};
pub use registry::{PluginEntry, PluginRegistry};
pub use types::{
    is_blank, ErrorState, LoadFailure, LoadState, COMMANDS_DIR, COMMAND_EXTENSION, MANIFEST_FILE,
    MANIFEST_KEY,
};
