//! The final resolved configuration handed to test runners.

use std::path::{Component, Path, PathBuf};

use serde::Serialize;

use crate::models::{CanonicalConfiguration, CoverageOptions, TestDescriptor};

/// A canonical configuration together with the file it came from.
///
/// `dir` is always the parent of `path`; both are fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedConfiguration {
    #[serde(flatten)]
    config: CanonicalConfiguration,
    path: PathBuf,
    dir: PathBuf,
}

impl ResolvedConfiguration {
    pub fn new(config: CanonicalConfiguration, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| path.clone());
        Self { config, path, dir }
    }

    pub fn tests(&self) -> &[TestDescriptor] {
        &self.config.tests
    }

    pub fn coverage(&self) -> Option<&CoverageOptions> {
        self.config.coverage.as_ref()
    }

    /// Absolute path of the configuration file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory containing the configuration file.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Extension development paths for `test`, made absolute.
    ///
    /// Without an explicit path the config directory itself is the extension.
    /// Relative entries resolve against [`dir`](Self::dir); absolute entries
    /// pass through. Order and duplicates are kept.
    pub fn extension_development_paths(&self, test: &TestDescriptor) -> Vec<PathBuf> {
        match &test.extension_development_path {
            None => vec![self.dir.clone()],
            Some(paths) => paths.iter().map(|p| self.resolve_path(p)).collect(),
        }
    }

    /// Resolve a descriptor-relative path against the config directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            join_lexically(&self.dir, path)
        }
    }

    /// Descriptors matching `selector`: by exact `label`, or by zero-based
    /// index when the selector is a number and no label matches.
    pub fn select(&self, selector: &str) -> Vec<&TestDescriptor> {
        let by_label: Vec<&TestDescriptor> = self
            .tests()
            .iter()
            .filter(|t| t.label.as_deref() == Some(selector))
            .collect();
        if !by_label.is_empty() {
            return by_label;
        }

        selector
            .parse::<usize>()
            .ok()
            .and_then(|index| self.tests().get(index))
            .into_iter()
            .collect()
    }
}

/// `base.join(rel)` with `.` dropped and `..` applied, without touching the
/// filesystem.
fn join_lexically(base: &Path, rel: &Path) -> PathBuf {
    let mut out = base.to_path_buf();
    for component in rel.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
