//! Coverage options attached to a whole configuration.

use serde::{Deserialize, Serialize};

use super::OneOrMany;

/// Coverage settings. The resolver never interprets these; they are handed
/// to the coverage layer exactly as written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_all: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<OneOrMany<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<OneOrMany<String>>,

    /// Reporter name(s) or reporter-to-options map, as accepted by the
    /// coverage tool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporter: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
