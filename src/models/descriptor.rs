//! A single unit of test configuration.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::OneOrMany;
use crate::constants::DEFAULT_SRC_DIR;

/// One test run: which files to execute, against which VS Code build, with
/// which extension(s) loaded.
///
/// Only the path-bearing fields are interpreted by the resolver. Everything
/// else is carried through as-is for the test runner, and unrecognised keys
/// land in [`TestDescriptor::extra`] so nothing is dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestDescriptor {
    /// Glob(s) of compiled test files to run.
    pub files: OneOrMany<String>,

    /// VS Code version to test against (`stable`, `insiders`, or a release).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Extension(s) under test. Relative entries resolve against the
    /// directory of the configuration file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension_development_path: Option<OneOrMany<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_folder: Option<String>,

    /// Options forwarded verbatim to the Mocha runner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mocha: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Source directory used to map coverage back to sources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_dir: Option<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub env: IndexMap<String, String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub launch_args: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub install_extensions: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_extension_dependencies: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_installation: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download: Option<serde_json::Value>,

    /// Keys this crate does not know about, preserved for the runner.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl TestDescriptor {
    /// Create a descriptor that only names the files to run.
    pub fn new(files: impl Into<OneOrMany<String>>) -> Self {
        Self {
            files: files.into(),
            version: None,
            extension_development_path: None,
            workspace_folder: None,
            mocha: None,
            label: None,
            src_dir: None,
            env: IndexMap::new(),
            launch_args: Vec::new(),
            install_extensions: Vec::new(),
            skip_extension_dependencies: None,
            platform: None,
            use_installation: None,
            download: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Source directory for coverage mapping, `src` when unset.
    pub fn src_dir(&self) -> &str {
        self.src_dir.as_deref().unwrap_or(DEFAULT_SRC_DIR)
    }
}
