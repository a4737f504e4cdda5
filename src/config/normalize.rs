//! Reduce whatever a loader produced to a [`CanonicalConfiguration`].
//!
//! Accepted shapes, after unwrapping a `default` property and awaiting
//! deferred values:
//! - `{ "tests": [...], "coverage": {...} }`: a full configuration
//! - `[ {...}, {...} ]`: a list of test descriptors
//! - `{ "files": ... }`: a single test descriptor

use std::fmt;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use serde_json::Value;

use super::ConfigError;
use super::loader::LoadFailure;
use crate::constants::MAX_UNWRAP_ROUNDS;
use crate::models::{CanonicalConfiguration, CoverageOptions, TestDescriptor};

/// A value that still has to be awaited before it can be inspected.
pub type PendingValue = Pin<Box<dyn Future<Output = Result<RawLoadedValue, LoadFailure>> + Send>>;

/// Output of a loader, before normalization.
pub enum RawLoadedValue {
    Value(Value),
    Deferred(PendingValue),
}

impl RawLoadedValue {
    /// Wrap a future that produces the real value later.
    pub fn deferred<F>(future: F) -> Self
    where
        F: Future<Output = Result<RawLoadedValue, LoadFailure>> + Send + 'static,
    {
        RawLoadedValue::Deferred(Box::pin(future))
    }
}

impl From<Value> for RawLoadedValue {
    fn from(value: Value) -> Self {
        RawLoadedValue::Value(value)
    }
}

impl fmt::Debug for RawLoadedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawLoadedValue::Value(v) => f.debug_tuple("Value").field(v).finish(),
            RawLoadedValue::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

/// Normalize a raw loaded value from `path`.
///
/// Never touches the filesystem; `path` is only used for error messages.
/// Deferred values are awaited at most [`MAX_UNWRAP_ROUNDS`] times.
pub async fn normalize(
    raw: RawLoadedValue,
    path: &Path,
) -> Result<CanonicalConfiguration, ConfigError> {
    let value = settle(raw, path).await?;
    into_canonical(value, path)
}

/// Await deferred values until a plain value remains, then strip one
/// `default` wrapper from it.
async fn settle(mut raw: RawLoadedValue, path: &Path) -> Result<Value, ConfigError> {
    let mut awaited = 0;
    loop {
        match raw {
            RawLoadedValue::Value(value) => return Ok(unwrap_default(value)),
            RawLoadedValue::Deferred(_) if awaited == MAX_UNWRAP_ROUNDS => {
                return Err(shape_error(
                    path,
                    format!("configuration was still pending after {MAX_UNWRAP_ROUNDS} awaits"),
                ));
            }
            RawLoadedValue::Deferred(pending) => {
                awaited += 1;
                tracing::trace!(round = awaited, "awaiting deferred configuration");
                raw = pending.await.map_err(|source| ConfigError::Load {
                    path: path.to_path_buf(),
                    source,
                })?;
            }
        }
    }
}

fn unwrap_default(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("default") => {
            tracing::trace!("unwrapping default export");
            map.remove("default").unwrap_or(Value::Null)
        }
        other => other,
    }
}

fn into_canonical(value: Value, path: &Path) -> Result<CanonicalConfiguration, ConfigError> {
    let (tests, coverage) = match value {
        Value::Object(mut map) if map.contains_key("tests") => {
            let tests = match map.remove("tests") {
                Some(Value::Array(items)) => descriptors(items, path)?,
                Some(other) => {
                    return Err(shape_error(
                        path,
                        format!("`tests` must be an array of test configurations, found {}", kind(&other)),
                    ));
                }
                None => Vec::new(),
            };
            let coverage = match map.remove("coverage") {
                None | Some(Value::Null) => None,
                Some(raw) => Some(
                    serde_json::from_value::<CoverageOptions>(raw)
                        .map_err(|e| shape_error(path, format!("invalid `coverage`: {e}")))?,
                ),
            };
            if !map.is_empty() {
                let ignored: Vec<&str> = map.keys().map(String::as_str).collect();
                tracing::debug!(?ignored, "ignoring unknown top-level keys");
            }
            (tests, coverage)
        }
        Value::Array(items) => (descriptors(items, path)?, None),
        single @ Value::Object(_) => (vec![descriptor(single, 0, path)?], None),
        other => {
            return Err(shape_error(
                path,
                format!(
                    "expected a configuration object or an array of test configurations, found {}",
                    kind(&other)
                ),
            ));
        }
    };

    if tests.is_empty() {
        return Err(shape_error(path, "no test configurations defined".to_string()));
    }

    Ok(CanonicalConfiguration { tests, coverage })
}

fn descriptors(items: Vec<Value>, path: &Path) -> Result<Vec<TestDescriptor>, ConfigError> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| descriptor(item, index, path))
        .collect()
}

fn descriptor(value: Value, index: usize, path: &Path) -> Result<TestDescriptor, ConfigError> {
    serde_json::from_value(value)
        .map_err(|e| shape_error(path, format!("invalid test configuration at index {index}: {e}")))
}

fn shape_error(path: &Path, reason: String) -> ConfigError {
    ConfigError::Shape {
        path: path.to_path_buf(),
        reason,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
