//! Upward search for the nearest configuration file.

use std::path::{Path, PathBuf};

use super::{ConfigError, LoaderRegistry, absolute};

/// Find `{base_name}.{ext}` in `start_dir` or its closest ancestor.
///
/// Within one directory the registry's extension order decides which file
/// wins; a match in a nearer directory always beats any match further up.
/// Nothing is cached, every call walks the filesystem again.
pub async fn locate(
    registry: &LoaderRegistry,
    start_dir: &Path,
    base_name: &str,
) -> Result<PathBuf, ConfigError> {
    let start = absolute(start_dir);
    let extensions = registry.known_extensions();
    let mut dir = start.as_path();

    loop {
        for ext in &extensions {
            let candidate = dir.join(format!("{base_name}.{ext}"));
            let found = tokio::fs::try_exists(&candidate).await.unwrap_or(false);
            tracing::debug!(candidate = %candidate.display(), found, "probing config candidate");
            if found {
                return Ok(candidate);
            }
        }

        match dir.parent() {
            Some(parent) if parent != dir => dir = parent,
            _ => break,
        }
    }

    Err(ConfigError::NotFound {
        base_name: base_name.to_string(),
        start_dir: start,
        extensions: extensions.iter().map(|e| e.to_string()).collect(),
    })
}
