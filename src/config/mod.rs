//! Configuration discovery, loading and normalization.
//!
//! Resolution is a strict pipeline:
//! 1. [`walker::locate`] finds the nearest `.vscode-test.{json,js,mjs,cjs}`
//!    (skipped when an explicit path is given)
//! 2. [`LoaderRegistry::load`] turns the file into a [`RawLoadedValue`]
//! 3. [`normalize::normalize`] reduces it to a
//!    [`CanonicalConfiguration`](crate::models::CanonicalConfiguration)
//! 4. [`ResolvedConfiguration`] wraps the result with its source location

pub mod loader;
pub mod normalize;
pub mod resolved;
pub mod walker;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::constants::CONFIG_BASENAME;

pub use loader::{ConfigLoader, JsonLoader, LoadFailure, LoaderRegistry, ModuleLoader, UnsupportedExtension};
pub use normalize::{RawLoadedValue, normalize};
pub use resolved::ResolvedConfiguration;
pub use walker::locate;

/// Errors that abort a resolution attempt. None of them are retried.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "could not find a {base_name} configuration file ({}) in {} or any parent directory; pass an explicit path with --config",
        candidate_list(.base_name, .extensions),
        .start_dir.display()
    )]
    NotFound {
        base_name: String,
        start_dir: PathBuf,
        extensions: Vec<String>,
    },

    #[error("cannot load {}: {source}", .path.display())]
    UnsupportedExtension {
        path: PathBuf,
        source: UnsupportedExtension,
    },

    #[error("failed to load config file {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        source: LoadFailure,
    },

    #[error("invalid configuration in {}: {reason}", .path.display())]
    Shape { path: PathBuf, reason: String },
}

impl ConfigError {
    /// The configuration file involved, when one was identified.
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigError::NotFound { .. } => None,
            ConfigError::UnsupportedExtension { path, .. }
            | ConfigError::Load { path, .. }
            | ConfigError::Shape { path, .. } => Some(path),
        }
    }
}

fn candidate_list(base_name: &str, extensions: &[String]) -> String {
    extensions
        .iter()
        .map(|ext| format!("{base_name}.{ext}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Resolve the configuration for `cwd` using the built-in loaders.
///
/// With `explicit` set, that file is loaded directly (relative paths are
/// taken relative to `cwd`); otherwise the walker searches upward from `cwd`
/// for `.vscode-test.*`.
pub async fn resolve(
    cwd: &Path,
    explicit: Option<&Path>,
) -> Result<ResolvedConfiguration, ConfigError> {
    resolve_with(LoaderRegistry::builtin(), cwd, explicit, CONFIG_BASENAME).await
}

/// Same as [`resolve`] with a caller-provided registry and base name.
pub async fn resolve_with(
    registry: &LoaderRegistry,
    cwd: &Path,
    explicit: Option<&Path>,
    base_name: &str,
) -> Result<ResolvedConfiguration, ConfigError> {
    let cwd = absolute(cwd);
    let path = match explicit {
        Some(explicit) => absolute(&cwd.join(explicit)),
        None => walker::locate(registry, &cwd, base_name).await?,
    };
    tracing::debug!(path = %path.display(), "resolving configuration");

    let raw = registry.load(&path).await?;
    let config = normalize(raw, &path).await?;
    Ok(ResolvedConfiguration::new(config, path))
}

/// Make `path` absolute against the process working directory.
///
/// Falls back to the path as given if the working directory is unavailable;
/// later filesystem access then reports the real problem.
pub(crate) fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_lists_candidates_and_hint() {
        let err = ConfigError::NotFound {
            base_name: ".vscode-test".to_string(),
            start_dir: PathBuf::from("/work/project"),
            extensions: vec!["json".to_string(), "js".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains(".vscode-test.json, .vscode-test.js"));
        assert!(msg.contains("/work/project"));
        assert!(msg.contains("--config"));
        assert!(err.path().is_none());
    }

    #[test]
    fn shape_error_names_path() {
        let err = ConfigError::Shape {
            path: PathBuf::from("/p/.vscode-test.json"),
            reason: "no test configurations defined".to_string(),
        };
        assert_eq!(err.path(), Some(Path::new("/p/.vscode-test.json")));
        assert!(err.to_string().contains("/p/.vscode-test.json"));
    }

    #[tokio::test]
    async fn explicit_relative_path_resolves_against_cwd() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("conf")).unwrap();
        std::fs::write(
            dir.path().join("conf").join("tests.json"),
            r#"{"files": "out/**/*.test.js"}"#,
        )
        .unwrap();

        let resolved = resolve(dir.path(), Some(Path::new("conf/tests.json")))
            .await
            .unwrap();
        assert_eq!(resolved.path(), absolute(&dir.path().join("conf/tests.json")));
        assert_eq!(resolved.dir(), absolute(&dir.path().join("conf")));
        assert_eq!(resolved.tests().len(), 1);
    }

    #[tokio::test]
    async fn explicit_path_with_unknown_extension_fails() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("tests.yaml"), "files: a.js").unwrap();

        let err = resolve(dir.path(), Some(Path::new("tests.yaml")))
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedExtension { .. }));
        assert!(err.to_string().contains("yaml"));
    }

    #[tokio::test]
    async fn explicit_missing_file_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve(dir.path(), Some(Path::new("missing.json")))
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::Load { .. }));
        assert!(err.to_string().contains("missing.json"));
    }
}
