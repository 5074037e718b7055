//! Command descriptors and the command-loading seam.
//!
//! The loader core does not resolve invokable behavior itself; it hands
//! each script reference to a [`CommandLoader`] and accepts an opaque
//! descriptor back. [`ScriptCommandLoader`] is the default collaborator.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A command contributed by a plugin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDescriptor {
    /// Command name shown to the user.
    pub name: String,

    /// Optional description of what this command does.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Resolved script path, if the source named one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,

    /// Exported function to invoke; `None` means auto-detect.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_name: Option<String>,

    /// Whether invokable behavior was resolved for this command.
    #[serde(default)]
    pub loaded: bool,
}

/// Loads a command descriptor from a script file.
///
/// Returning `None` marks the command as explicitly null; the merge step
/// drops it. Returning a descriptor with `loaded = false` keeps the
/// command visible even though nothing invokable was found behind it.
pub trait CommandLoader {
    /// Build a descriptor for a script file.
    ///
    /// `function_name` is a hint; implementations must tolerate its
    /// absence and fall back to auto-detection.
    fn load_from_file(
        &self,
        file: Option<&Path>,
        function_name: Option<&str>,
    ) -> Option<CommandDescriptor>;
}

/// Default command loader for script files on disk.
///
/// Marks a command as loaded when the script exists as a regular file.
/// Resolving the exported function is left to the framework runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptCommandLoader;

impl CommandLoader for ScriptCommandLoader {
    fn load_from_file(
        &self,
        file: Option<&Path>,
        function_name: Option<&str>,
    ) -> Option<CommandDescriptor> {
        let Some(file) = file else {
            // No usable file reference. The command stays visible but
            // carries no behavior.
            return Some(CommandDescriptor {
                function_name: function_name.map(String::from),
                ..CommandDescriptor::default()
            });
        };

        let name = file.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
        let loaded = file.is_file();
        if !loaded {
            tracing::debug!(file = %file.display(), "Command script not found on disk");
        }

        Some(CommandDescriptor {
            name,
            description: None,
            file: Some(file.to_path_buf()),
            function_name: function_name.map(String::from),
            loaded,
        })
    }
}
