//! The plugin loading state machine.
//!
//! [`PluginLoader`] runs a fixed validation pipeline over one directory
//! and records the outcome as state. The order of checks is part of the
//! contract: blank input, then directory existence, then manifest
//! presence, then manifest parse and root key, then namespace, then
//! command assembly. Each check short-circuits; callers can therefore
//! tell "nothing there" apart from "something there but broken" apart
//! from "something there but unusable".
//!
//! Failures never propagate out of a load call. The caller inspects
//! `load_state` and `error_state` afterwards, the way a plugin registry
//! decides whether a candidate directory joins the runtime.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};

use super::{
    is_blank, CommandDescriptor, CommandLoader, ErrorState, LoadFailure, LoadState,
    PackageManifest, ScriptCommandLoader, COMMANDS_DIR, COMMAND_EXTENSION, MANIFEST_FILE,
};

/// Immutable result of a successful plugin evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadedPlugin {
    /// The validated plugin directory.
    pub directory: PathBuf,
    /// Namespace prefixing every command this plugin contributes.
    pub namespace: String,
    /// Default configuration values from the manifest.
    pub defaults: Map<String, Value>,
    /// Merged command list, manifest-declared first, then scanned.
    pub commands: Vec<CommandDescriptor>,
}

/// Loads a plugin from a directory, recording the outcome as state.
///
/// The instance is reusable: every call to [`load_from_directory`]
/// re-evaluates from a clean baseline, so nothing from a prior load
/// leaks into the next. Each load is synchronous and serial; distinct
/// instances are fully independent.
///
/// [`load_from_directory`]: PluginLoader::load_from_directory
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PluginLoader {
    /// Plugin namespace; `Some` and non-blank exactly when loaded.
    pub namespace: Option<String>,

    /// Coarse lifecycle stage.
    pub load_state: LoadState,

    /// Failure reason; `None` unless `load_state` is `Error`.
    pub error_state: ErrorState,

    /// The directory path, recorded once it passed existence validation.
    pub directory: Option<PathBuf>,

    /// Default configuration values from the manifest.
    pub defaults: Map<String, Value>,

    /// Merged, null-filtered command list; empty unless loaded.
    pub commands: Vec<CommandDescriptor>,

    /// Reserved for a human-readable message; currently always `None`.
    pub error_message: Option<String>,
}

impl PluginLoader {
    /// Create a loader in its baseline state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore every field to its baseline. Always succeeds.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether the last load succeeded.
    pub fn is_loaded(&self) -> bool {
        self.load_state == LoadState::Ok
    }

    /// Load a plugin from `directory`, using the default script loader.
    ///
    /// Resets first, then drives the instance to a terminal state. All
    /// failures become state; nothing is returned or raised.
    pub fn load_from_directory(&mut self, directory: &str) {
        self.load_from_directory_with(directory, &ScriptCommandLoader);
    }

    /// Load a plugin from `directory` with an injected command loader.
    pub fn load_from_directory_with(&mut self, directory: &str, commands: &dyn CommandLoader) {
        self.reset();

        match Self::evaluate(directory, commands) {
            Ok(plugin) => {
                tracing::debug!(
                    namespace = %plugin.namespace,
                    commands = plugin.commands.len(),
                    "Plugin loaded"
                );
                self.namespace = Some(plugin.namespace);
                self.directory = Some(plugin.directory);
                self.defaults = plugin.defaults;
                self.commands = plugin.commands;
                self.load_state = LoadState::Ok;
                self.error_state = ErrorState::None;
            }
            Err(failure) => {
                tracing::debug!(directory, error = %failure, "Plugin load failed");
                // The directory field is only set once existence passed.
                if !matches!(failure, LoadFailure::BlankInput | LoadFailure::MissingDirectory) {
                    self.directory = Some(PathBuf::from(directory));
                }
                self.load_state = LoadState::Error;
                self.error_state = failure.into();
            }
        }
    }

    /// Evaluate a directory as a plugin without touching any instance.
    ///
    /// This is the pure core of the pipeline: same checks, same order,
    /// but the outcome is a tagged result instead of mutated state.
    /// Safe to call concurrently from any number of threads.
    pub fn evaluate(
        directory: &str,
        commands: &dyn CommandLoader,
    ) -> Result<LoadedPlugin, LoadFailure> {
        // 1. Blank input: rejected before any filesystem access.
        if is_blank(directory) {
            return Err(LoadFailure::BlankInput);
        }

        // 2. The path must resolve to an existing directory.
        let dir = Path::new(directory);
        if !dir.is_dir() {
            return Err(LoadFailure::MissingDirectory);
        }

        // 3. The manifest must exist as a regular file.
        let manifest_path = dir.join(MANIFEST_FILE);
        if !manifest_path.is_file() {
            return Err(LoadFailure::MissingManifest);
        }

        // 4. Narrow parse boundary: read, parse, locate the reserved
        //    root key. Every failure in here collapses to BadManifest.
        let section = std::fs::read_to_string(&manifest_path)
            .ok()
            .and_then(|content| PackageManifest::from_json(&content).ok())
            .and_then(|manifest| manifest.staplegun)
            .ok_or(LoadFailure::BadManifest)?;

        // 5. Namespace has its own error code, distinct from BadManifest.
        let namespace = match section.namespace {
            Some(ns) if !is_blank(&ns) => ns,
            _ => return Err(LoadFailure::BlankNamespace),
        };

        // 6. Command assembly: manifest entries first, then the scan of
        //    commands/*.js, each group in its own order. Entries the
        //    collaborator returns as None are dropped; duplicates across
        //    the two sources are kept.
        let mut descriptors = Vec::new();

        for entry in &section.commands {
            let file = entry.file.as_ref().map(|f| dir.join(f));
            let Some(mut descriptor) =
                commands.load_from_file(file.as_deref(), entry.function_name.as_deref())
            else {
                continue;
            };
            if let Some(name) = &entry.name {
                descriptor.name = name.clone();
            }
            if entry.description.is_some() {
                descriptor.description = entry.description.clone();
            }
            descriptors.push(descriptor);
        }

        for file in scan_command_files(dir) {
            if let Some(descriptor) = commands.load_from_file(Some(&file), None) {
                descriptors.push(descriptor);
            }
        }

        Ok(LoadedPlugin {
            directory: dir.to_path_buf(),
            namespace,
            defaults: section.defaults,
            commands: descriptors,
        })
    }
}

/// List command script files under `<directory>/commands`, sorted by
/// file name for a deterministic merge order.
///
/// A missing or unreadable commands directory yields an empty list; the
/// scan is a discovery convenience, not a validation step.
fn scan_command_files(directory: &Path) -> Vec<PathBuf> {
    let commands_dir = directory.join(COMMANDS_DIR);

    let entries = match std::fs::read_dir(&commands_dir) {
        Ok(entries) => entries,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(dir = %commands_dir.display(), error = %e, "Failed to scan commands directory");
            }
            return Vec::new();
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file() && path.extension().is_some_and(|ext| ext == COMMAND_EXTENSION)
        })
        .collect();

    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Build a plugin directory with the given manifest body and command
    /// script files under `commands/`.
    fn plugin_dir(manifest: &str, scripts: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("package.json"), manifest).unwrap();

        if !scripts.is_empty() {
            let commands = dir.path().join("commands");
            std::fs::create_dir_all(&commands).unwrap();
            for script in scripts {
                std::fs::write(commands.join(script), "module.exports = () => {}").unwrap();
            }
        }

        dir
    }

    const VALID_MANIFEST: &str = r#"
{
  "staplegun": {
    "namespace": "foo",
    "defaults": { "x": 1 },
    "commands": [
      { "name": "a", "file": "a.js", "description": "d" }
    ]
  }
}
"#;

    #[test]
    fn test_blank_input() {
        for blank in ["", "   ", "\t", " \n "] {
            let mut loader = PluginLoader::new();
            loader.load_from_directory(blank);

            assert_eq!(loader.load_state, LoadState::Error);
            assert_eq!(loader.error_state, ErrorState::Input);
            assert!(loader.directory.is_none());
            assert!(loader.commands.is_empty());
        }
    }

    #[test]
    fn test_blank_input_pure_path() {
        let result = PluginLoader::evaluate("  ", &ScriptCommandLoader);
        assert_eq!(result.unwrap_err(), LoadFailure::BlankInput);
    }

    #[test]
    fn test_missing_directory() {
        let mut loader = PluginLoader::new();
        loader.load_from_directory("/no/such/plugin/anywhere");

        assert_eq!(loader.load_state, LoadState::Error);
        assert_eq!(loader.error_state, ErrorState::MissingDir);
        assert!(loader.directory.is_none());
    }

    #[test]
    fn test_file_path_is_not_a_directory() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("plain.txt");
        std::fs::write(&file, "not a directory").unwrap();

        let mut loader = PluginLoader::new();
        loader.load_from_directory(file.to_str().unwrap());

        assert_eq!(loader.error_state, ErrorState::MissingDir);
    }

    #[test]
    fn test_missing_manifest() {
        let dir = TempDir::new().unwrap();

        let mut loader = PluginLoader::new();
        loader.load_from_directory(dir.path().to_str().unwrap());

        assert_eq!(loader.load_state, LoadState::Error);
        assert_eq!(loader.error_state, ErrorState::MissingPackage);
        // Existence passed, so the directory was recorded.
        assert_eq!(loader.directory.as_deref(), Some(dir.path()));
    }

    #[test]
    fn test_unparseable_manifest() {
        let dir = plugin_dir("{ this is not json", &[]);

        let mut loader = PluginLoader::new();
        loader.load_from_directory(dir.path().to_str().unwrap());

        assert_eq!(loader.error_state, ErrorState::BadPackage);
    }

    #[test]
    fn test_manifest_without_reserved_key() {
        let dir = plugin_dir(r#"{"name": "ordinary-package"}"#, &[]);

        let mut loader = PluginLoader::new();
        loader.load_from_directory(dir.path().to_str().unwrap());

        assert_eq!(loader.error_state, ErrorState::BadPackage);
    }

    #[test]
    fn test_blank_namespace() {
        let dir = plugin_dir(r#"{"staplegun": {"namespace": "   "}}"#, &[]);

        let mut loader = PluginLoader::new();
        loader.load_from_directory(dir.path().to_str().unwrap());

        assert_eq!(loader.error_state, ErrorState::Namespace);
    }

    #[test]
    fn test_absent_namespace() {
        let dir = plugin_dir(r#"{"staplegun": {}}"#, &[]);

        let mut loader = PluginLoader::new();
        loader.load_from_directory(dir.path().to_str().unwrap());

        assert_eq!(loader.error_state, ErrorState::Namespace);
    }

    #[test]
    fn test_successful_load_merges_both_sources() {
        let dir = plugin_dir(VALID_MANIFEST, &["b.js"]);

        let mut loader = PluginLoader::new();
        loader.load_from_directory(dir.path().to_str().unwrap());

        assert_eq!(loader.load_state, LoadState::Ok);
        assert_eq!(loader.error_state, ErrorState::None);
        assert_eq!(loader.namespace.as_deref(), Some("foo"));
        assert_eq!(loader.defaults.get("x"), Some(&serde_json::json!(1)));
        assert!(loader.error_message.is_none());

        // Manifest-sourced first, then scan-sourced, in order.
        assert_eq!(loader.commands.len(), 2);
        assert_eq!(loader.commands[0].name, "a");
        assert_eq!(loader.commands[0].description.as_deref(), Some("d"));
        assert_eq!(loader.commands[1].name, "b");
        assert!(loader.commands[1].file.as_deref().is_some_and(|f| f.ends_with("commands/b.js")));
    }

    #[test]
    fn test_scan_order_is_sorted() {
        let manifest = r#"{"staplegun": {"namespace": "foo"}}"#;
        let dir = plugin_dir(manifest, &["zeta.js", "alpha.js", "mid.js"]);

        let mut loader = PluginLoader::new();
        loader.load_from_directory(dir.path().to_str().unwrap());

        let names: Vec<&str> = loader.commands.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_scan_ignores_other_extensions() {
        let manifest = r#"{"staplegun": {"namespace": "foo"}}"#;
        let dir = plugin_dir(manifest, &["run.js", "notes.txt", "data.json"]);

        let mut loader = PluginLoader::new();
        loader.load_from_directory(dir.path().to_str().unwrap());

        assert_eq!(loader.commands.len(), 1);
        assert_eq!(loader.commands[0].name, "run");
    }

    #[test]
    fn test_duplicate_names_across_sources_are_kept() {
        let manifest = r#"
{
  "staplegun": {
    "namespace": "foo",
    "commands": [{ "name": "a", "file": "commands/a.js" }]
  }
}
"#;
        let dir = plugin_dir(manifest, &["a.js"]);

        let mut loader = PluginLoader::new();
        loader.load_from_directory(dir.path().to_str().unwrap());

        assert_eq!(loader.load_state, LoadState::Ok);
        let names: Vec<&str> = loader.commands.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["a", "a"]);
    }

    #[test]
    fn test_manifest_entry_without_file_is_kept() {
        let manifest = r#"
{
  "staplegun": {
    "namespace": "foo",
    "commands": [{ "name": "phantom", "description": "no script" }]
  }
}
"#;
        let dir = plugin_dir(manifest, &[]);

        let mut loader = PluginLoader::new();
        loader.load_from_directory(dir.path().to_str().unwrap());

        assert_eq!(loader.load_state, LoadState::Ok);
        assert_eq!(loader.commands.len(), 1);
        assert_eq!(loader.commands[0].name, "phantom");
        assert!(!loader.commands[0].loaded);
    }

    #[test]
    fn test_null_descriptors_are_filtered() {
        struct NullLoader;
        impl CommandLoader for NullLoader {
            fn load_from_file(
                &self,
                _file: Option<&Path>,
                _function_name: Option<&str>,
            ) -> Option<CommandDescriptor> {
                None
            }
        }

        let dir = plugin_dir(VALID_MANIFEST, &["b.js"]);

        let mut loader = PluginLoader::new();
        loader.load_from_directory_with(dir.path().to_str().unwrap(), &NullLoader);

        assert_eq!(loader.load_state, LoadState::Ok);
        assert!(loader.commands.is_empty());
    }

    #[test]
    fn test_repeated_load_is_idempotent() {
        let dir = plugin_dir(VALID_MANIFEST, &["b.js"]);
        let path = dir.path().to_str().unwrap();

        let mut loader = PluginLoader::new();
        loader.load_from_directory(path);
        let first = loader.clone();

        loader.load_from_directory(path);
        assert_eq!(loader, first);
    }

    #[test]
    fn test_failed_load_clears_prior_success() {
        let dir = plugin_dir(VALID_MANIFEST, &["b.js"]);

        let mut loader = PluginLoader::new();
        loader.load_from_directory(dir.path().to_str().unwrap());
        assert!(loader.is_loaded());

        loader.load_from_directory("/no/such/plugin/anywhere");

        assert_eq!(loader.load_state, LoadState::Error);
        assert_eq!(loader.error_state, ErrorState::MissingDir);
        assert!(loader.namespace.is_none());
        assert!(loader.defaults.is_empty());
        assert!(loader.commands.is_empty());
        assert!(loader.directory.is_none());
    }

    #[test]
    fn test_commands_empty_on_every_failure() {
        let bad = plugin_dir("{ broken", &["a.js"]);
        let cases =
            ["", "/no/such/plugin/anywhere", bad.path().to_str().unwrap()];

        for case in cases {
            let mut loader = PluginLoader::new();
            loader.load_from_directory(case);

            assert_ne!(loader.load_state, LoadState::Ok);
            assert!(loader.commands.is_empty(), "commands leaked for {case:?}");
            assert_ne!(loader.error_state, ErrorState::None);
        }
    }

    #[test]
    fn test_reset_restores_baseline() {
        let dir = plugin_dir(VALID_MANIFEST, &[]);

        let mut loader = PluginLoader::new();
        loader.load_from_directory(dir.path().to_str().unwrap());
        loader.reset();

        assert_eq!(loader, PluginLoader::new());
    }

    #[test]
    fn test_evaluate_returns_immutable_result() {
        let dir = plugin_dir(VALID_MANIFEST, &["b.js"]);

        let plugin =
            PluginLoader::evaluate(dir.path().to_str().unwrap(), &ScriptCommandLoader).unwrap();

        assert_eq!(plugin.namespace, "foo");
        assert_eq!(plugin.directory, dir.path());
        assert_eq!(plugin.commands.len(), 2);
    }
}
