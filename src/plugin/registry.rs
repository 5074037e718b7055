//! Plugin registry: load every plugin under a root directory.
//!
//! The registry is the typical caller of the loader. It walks the
//! immediate subdirectories of a plugins root, runs one load per
//! candidate, and keeps every outcome so a frontend can report broken
//! plugins instead of silently skipping them.

use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

use super::{CommandDescriptor, ErrorState, LoadState, PluginError, PluginLoader, PluginResult};

/// One candidate plugin directory and its load outcome.
#[derive(Debug, Clone, Serialize)]
pub struct PluginEntry {
    /// The candidate directory.
    pub directory: PathBuf,
    /// The loader's terminal state for this directory.
    pub loader: PluginLoader,
}

impl PluginEntry {
    /// Whether this entry loaded as a valid plugin.
    pub fn is_loaded(&self) -> bool {
        self.loader.is_loaded()
    }
}

/// Loads and holds every plugin found under a root directory.
#[derive(Debug, Clone, Serialize)]
pub struct PluginRegistry {
    /// The scanned root.
    root: PathBuf,
    /// All candidate directories, loaded or failed, in path order.
    plugins: Vec<PluginEntry>,
}

impl PluginRegistry {
    /// Scan `root` for plugins: every immediate subdirectory is treated
    /// as a candidate and loaded. Broken candidates are recorded with
    /// their error state, never dropped; only a missing root fails.
    pub fn scan(root: &Path) -> PluginResult<Self> {
        if !root.is_dir() {
            return Err(PluginError::NotFound(root.to_path_buf()));
        }

        let mut plugins = Vec::new();

        for entry in WalkDir::new(root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_dir())
        {
            let directory = entry.path().to_path_buf();
            let mut loader = PluginLoader::new();
            loader.load_from_directory(&directory.to_string_lossy());

            if loader.load_state == LoadState::Error {
                tracing::warn!(
                    directory = %directory.display(),
                    error = %loader.error_state,
                    "Skipping broken plugin"
                );
            }

            plugins.push(PluginEntry { directory, loader });
        }

        Ok(Self { root: root.to_path_buf(), plugins })
    }

    /// The scanned root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All candidate entries, loaded or failed.
    pub fn plugins(&self) -> impl Iterator<Item = &PluginEntry> {
        self.plugins.iter()
    }

    /// Entries that loaded successfully.
    pub fn loaded(&self) -> impl Iterator<Item = &PluginEntry> {
        self.plugins.iter().filter(|p| p.is_loaded())
    }

    /// Entries that failed, with their error states.
    pub fn failed(&self) -> impl Iterator<Item = (&PluginEntry, ErrorState)> {
        self.plugins
            .iter()
            .filter(|p| !p.is_loaded())
            .map(|p| (p, p.loader.error_state))
    }

    /// Look up a loaded plugin by namespace.
    pub fn get(&self, namespace: &str) -> Option<&PluginEntry> {
        self.loaded().find(|p| p.loader.namespace.as_deref() == Some(namespace))
    }

    /// Total number of candidate directories.
    pub fn count(&self) -> usize {
        self.plugins.len()
    }

    /// Number of successfully loaded plugins.
    pub fn count_loaded(&self) -> usize {
        self.loaded().count()
    }

    /// Every command across all loaded plugins, as
    /// `(namespace:name, descriptor)` pairs in plugin order.
    pub fn commands(&self) -> impl Iterator<Item = (String, &CommandDescriptor)> {
        self.loaded().flat_map(|entry| {
            let namespace = entry.loader.namespace.as_deref().unwrap_or_default();
            entry
                .loader
                .commands
                .iter()
                .map(move |cmd| (format!("{namespace}:{}", cmd.name), cmd))
        })
    }
}
