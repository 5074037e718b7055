//! # Staplegun
//!
//! Plugin discovery and loading for command-line frameworks.
//!
//! Staplegun answers one question: does this directory contain a valid
//! plugin? A valid plugin contributes a namespace, a bag of default
//! options, and a list of commands merged from two sources: explicit
//! declarations in the `package.json` manifest and auto-discovered
//! scripts under `commands/`. An invalid one gets a precise failure
//! reason a caller can branch on.
//!
//! ## Quick Start
//!
//! ```no_run
//! use staplegun::{LoadState, PluginLoader};
//!
//! let mut loader = PluginLoader::new();
//! loader.load_from_directory("./plugins/movies");
//!
//! if loader.load_state == LoadState::Ok {
//!     println!("loaded plugin {}", loader.namespace.as_deref().unwrap_or(""));
//! } else {
//!     eprintln!("load failed: {}", loader.error_state);
//! }
//! ```

#![forbid(unsafe_code)]

pub mod plugin;

pub use plugin::{
    CommandDescriptor, CommandLoader, ErrorState, LoadFailure, LoadState, LoadedPlugin,
    PluginEntry, PluginError, PluginLoader, PluginRegistry, PluginResult, ScriptCommandLoader,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "staplegun";
