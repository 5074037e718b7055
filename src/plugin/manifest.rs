//! Plugin manifest parsing.
//!
//! A plugin manifest is the `package.json` at the root of a plugin
//! directory. The plugin section lives under the reserved `staplegun`
//! key; everything else in the file is ignored.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{PluginError, PluginResult};

/// Parsed `package.json` structure, reduced to the fields consumed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageManifest {
    /// Package name (informational).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Package version (informational).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// The plugin section under the reserved root key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staplegun: Option<StaplegunSection>,
}

/// The `staplegun` section of a plugin manifest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaplegunSection {
    /// Namespace prefixing every command this plugin contributes.
    /// Required non-blank for a successful load.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// Default configuration values, arbitrary key/value.
    #[serde(default)]
    pub defaults: Map<String, Value>,

    /// Explicitly declared commands.
    #[serde(default)]
    pub commands: Vec<ManifestCommand>,
}

/// One command declaration in the manifest's `commands` array.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManifestCommand {
    /// Command name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Script file, relative to the plugin directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Exported function to invoke; absent means auto-detect.
    #[serde(default, rename = "functionName", skip_serializing_if = "Option::is_none")]
    pub function_name: Option<String>,

    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PackageManifest {
    /// Parse a manifest from a JSON string.
    pub fn from_json(content: &str) -> PluginResult<Self> {
        serde_json::from_str(content).map_err(|e| PluginError::InvalidManifest(e.to_string()))
    }

    /// Parse a manifest from a file.
    pub fn from_file(path: &Path) -> PluginResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}
