//! Shared types for test configuration.
//!
//! These are the shapes every configuration source reduces to. The
//! resolution engine in [`crate::config`] produces them; downstream runners
//! only ever read them.

pub mod coverage;
pub mod descriptor;

use serde::{Deserialize, Serialize};

pub use coverage::CoverageOptions;
pub use descriptor::TestDescriptor;

/// A field that accepts either a single value or a list of values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// Iterate over the contained values in order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        match self {
            OneOrMany::One(value) => std::slice::from_ref(value).iter(),
            OneOrMany::Many(values) => values.iter(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            OneOrMany::One(_) => 1,
            OneOrMany::Many(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<&str> for OneOrMany<String> {
    fn from(value: &str) -> Self {
        OneOrMany::One(value.to_string())
    }
}

impl From<String> for OneOrMany<String> {
    fn from(value: String) -> Self {
        OneOrMany::One(value)
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(values: Vec<T>) -> Self {
        OneOrMany::Many(values)
    }
}

/// The single normalized configuration shape.
///
/// `tests` is never empty once produced by
/// [`normalize`](crate::config::normalize::normalize).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalConfiguration {
    pub tests: Vec<TestDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage: Option<CoverageOptions>,
}
