//! Environment variable abstraction for testability.
//!
//! Production code uses [`Env::real()`] which delegates to [`std::env::var`].
//! Tests use [`Env::mock()`] backed by a `HashMap`, so they never have to
//! mutate the process environment.

use std::collections::HashMap;

use crate::constants::ENV_NODE_BINARY;

/// Environment variable reader.
#[derive(Clone, Debug, Default)]
pub struct Env {
    overrides: Option<HashMap<String, String>>,
}

impl Env {
    /// Create an `Env` that reads from the real process environment.
    pub fn real() -> Self {
        Self { overrides: None }
    }

    /// Create an `Env` backed by explicit key-value pairs.
    pub fn mock(vars: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>) -> Self {
        Self {
            overrides: Some(
                vars.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Look up an environment variable by name.
    pub fn var(&self, name: &str) -> Result<String, std::env::VarError> {
        match &self.overrides {
            Some(map) => map.get(name).cloned().ok_or(std::env::VarError::NotPresent),
            None => std::env::var(name),
        }
    }

    /// Node.js binary to evaluate module configs with.
    ///
    /// Empty values are ignored so `VSCODE_TEST_NODE=` behaves like unset.
    pub fn node_binary(&self) -> String {
        self.var(ENV_NODE_BINARY)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "node".to_string())
    }
}
