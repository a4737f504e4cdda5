//! Per-format loading strategies and the extension → strategy table.
//!
//! JSON files are read and parsed in-process. JavaScript configs are
//! evaluated by a Node.js child process running a small ESM bootstrap that
//! imports the file, settles its default export (calling it if it is a
//! function, awaiting it if it is a thenable, stripping a `default` wrapper
//! after each step) and prints the module namespace as JSON after a marker
//! line.

use std::path::Path;
use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use thiserror::Error;

use super::ConfigError;
use super::normalize::RawLoadedValue;
use crate::constants::{MAX_UNWRAP_ROUNDS, MODULE_OUTPUT_MARKER};
use crate::env::Env;

/// Why a configuration file could not be turned into a raw value.
#[derive(Error, Debug)]
pub enum LoadFailure {
    #[error("could not read file: {0}")]
    Read(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not start `{program}` to evaluate the module: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("module evaluation failed ({status}):\n{stderr}")]
    Module { status: String, stderr: String },

    #[error("module produced no usable configuration: {0}")]
    ModuleOutput(String),

    #[error("{0}")]
    Other(String),
}

/// An extension that no registered loader handles.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "unsupported config file extension '{extension}' (supported: {})",
    .known.join(", ")
)]
pub struct UnsupportedExtension {
    pub extension: String,
    pub known: Vec<String>,
}

/// A strategy that turns a configuration file into a raw value.
#[async_trait]
pub trait ConfigLoader: Send + Sync {
    async fn load(&self, path: &Path) -> Result<RawLoadedValue, LoadFailure>;
}

/// Reads the file and parses it as JSON.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonLoader;

#[async_trait]
impl ConfigLoader for JsonLoader {
    async fn load(&self, path: &Path) -> Result<RawLoadedValue, LoadFailure> {
        let content = tokio::fs::read_to_string(path).await?;
        let value: serde_json::Value = serde_json::from_str(&content)?;
        Ok(RawLoadedValue::Value(value))
    }
}

/// ESM bootstrap run with `node --input-type=module -e`.
///
/// The target path is the last argv entry. Only `default` is settled: each
/// call or await is followed by stripping a `default` wrapper from the
/// result, so `export default import('./other.mjs')` yields the other
/// module's default export. Other exports are serialized as they are, so
/// exported helper functions are dropped by `JSON.stringify` instead of
/// being invoked.
const MODULE_BOOTSTRAP: &str = r#"
import { pathToFileURL } from 'node:url';

const target = process.argv[process.argv.length - 1];
const maxRounds = __MAX_ROUNDS__;

const isObject = (value) => value !== null && typeof value === 'object';
const isPending = (value) =>
  typeof value === 'function' || (isObject(value) && typeof value.then === 'function');

const settle = async (value) => {
  for (let round = 0; round < maxRounds && isPending(value); round++) {
    value = typeof value === 'function' ? await value() : await value;
    if (isObject(value) && !Array.isArray(value) && 'default' in value) {
      value = value.default;
    }
  }
  if (isPending(value)) {
    throw new Error(`default export did not settle after ${maxRounds} rounds`);
  }
  return value;
};

const namespace = await import(pathToFileURL(target).href);
const result = {};
for (const key of Object.keys(namespace)) {
  result[key] = key === 'default' ? await settle(namespace[key]) : namespace[key];
}
process.stdout.write('\n' + __MARKER__ + '\n' + JSON.stringify(result) + '\n');
"#;

/// Evaluates `.js` / `.mjs` / `.cjs` configs with Node.js.
#[derive(Debug, Clone)]
pub struct ModuleLoader {
    node: String,
}

impl ModuleLoader {
    /// Use the given Node.js binary.
    pub fn new(node: impl Into<String>) -> Self {
        Self { node: node.into() }
    }

    /// Use the Node.js binary configured in the environment.
    pub fn from_env(env: &Env) -> Self {
        Self::new(env.node_binary())
    }

    pub fn node(&self) -> &str {
        &self.node
    }

    fn bootstrap() -> String {
        MODULE_BOOTSTRAP
            .replace("__MAX_ROUNDS__", &MAX_UNWRAP_ROUNDS.to_string())
            .replace("__MARKER__", &format!("'{MODULE_OUTPUT_MARKER}'"))
    }
}

#[async_trait]
impl ConfigLoader for ModuleLoader {
    async fn load(&self, path: &Path) -> Result<RawLoadedValue, LoadFailure> {
        let mut command = tokio::process::Command::new(&self.node);
        command
            .arg("--input-type=module")
            .arg("-e")
            .arg(Self::bootstrap())
            .arg("--")
            .arg(path)
            .kill_on_drop(true);
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            command.current_dir(dir);
        }

        let output = command.output().await.map_err(|source| LoadFailure::Spawn {
            program: self.node.clone(),
            source,
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !output.status.success() {
            return Err(LoadFailure::Module {
                status: output.status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }
        if !stderr.trim().is_empty() {
            tracing::warn!(path = %path.display(), stderr = %stderr.trim(), "config module wrote to stderr");
        }

        parse_module_output(&stdout).map(RawLoadedValue::Value)
    }
}

/// Extract the JSON payload that follows the last marker line.
fn parse_module_output(stdout: &str) -> Result<serde_json::Value, LoadFailure> {
    let (_, payload) = stdout
        .rsplit_once(MODULE_OUTPUT_MARKER)
        .ok_or_else(|| LoadFailure::ModuleOutput("no result marker in output".to_string()))?;
    serde_json::from_str(payload.trim()).map_err(|e| LoadFailure::ModuleOutput(e.to_string()))
}

/// Immutable extension → loader table.
///
/// Entry order is the walker's priority order. A registry is assembled once
/// with [`LoaderRegistry::with_loader`] and never changes afterwards.
#[derive(Clone, Default)]
pub struct LoaderRegistry {
    entries: Vec<(String, Arc<dyn ConfigLoader>)>,
}

static BUILTIN: LazyLock<LoaderRegistry> =
    LazyLock::new(|| LoaderRegistry::standard(&Env::real()));

impl LoaderRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry of built-in loaders: `json`, `js`, `mjs`,
    /// `cjs`, in that priority order.
    pub fn builtin() -> &'static LoaderRegistry {
        &BUILTIN
    }

    /// Built-in loaders, with the Node.js binary taken from `env`.
    pub fn standard(env: &Env) -> Self {
        let module: Arc<dyn ConfigLoader> = Arc::new(ModuleLoader::from_env(env));
        Self::new()
            .with_loader("json", Arc::new(JsonLoader))
            .with_loader("js", module.clone())
            .with_loader("mjs", module.clone())
            .with_loader("cjs", module)
    }

    /// Register `loader` for `extension` (without the leading dot).
    ///
    /// Re-registering an extension replaces its loader but keeps its
    /// first-registered position.
    pub fn with_loader(mut self, extension: &str, loader: Arc<dyn ConfigLoader>) -> Self {
        match self.entries.iter_mut().find(|(ext, _)| ext == extension) {
            Some(entry) => entry.1 = loader,
            None => self.entries.push((extension.to_string(), loader)),
        }
        self
    }

    /// Registered extensions in priority order.
    pub fn known_extensions(&self) -> Vec<&str> {
        self.entries.iter().map(|(ext, _)| ext.as_str()).collect()
    }

    /// Look up the loader for `extension`.
    pub fn resolve_loader(&self, extension: &str) -> Result<&dyn ConfigLoader, UnsupportedExtension> {
        self.entries
            .iter()
            .find(|(ext, _)| ext == extension)
            .map(|(_, loader)| loader.as_ref())
            .ok_or_else(|| UnsupportedExtension {
                extension: extension.to_string(),
                known: self.entries.iter().map(|(ext, _)| ext.clone()).collect(),
            })
    }

    /// Load `path` with the loader registered for its extension.
    pub async fn load(&self, path: &Path) -> Result<RawLoadedValue, ConfigError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        let loader = self
            .resolve_loader(extension)
            .map_err(|source| ConfigError::UnsupportedExtension {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::debug!(path = %path.display(), extension, "loading config file");
        loader.load(path).await.map_err(|source| ConfigError::Load {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl std::fmt::Debug for LoaderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoaderRegistry")
            .field("extensions", &self.known_extensions())
            .finish()
    }
}

/// Load `path` with the built-in registry.
pub async fn load(path: &Path) -> Result<RawLoadedValue, ConfigError> {
    LoaderRegistry::builtin().load(path).await
}
