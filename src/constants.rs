//! App-wide constants.
//!
//! Centralises the tool name, config file naming, environment variable
//! names and resolution limits so a rename only requires changing this file.

/// Display name of the tool (lowercase).
pub const APP_NAME: &str = "vscode-test-config";

/// Crate version, baked in at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Base name of the configuration file searched for by the walker
/// (`.vscode-test.json`, `.vscode-test.js`, ...).
pub const CONFIG_BASENAME: &str = ".vscode-test";

/// Source directory assumed for coverage mapping when a descriptor sets none.
pub const DEFAULT_SRC_DIR: &str = "src";

/// Upper bound on deferred/default-export unwrapping rounds.
pub const MAX_UNWRAP_ROUNDS: usize = 4;

/// Line printed by the module bootstrap right before the JSON payload.
pub const MODULE_OUTPUT_MARKER: &str = "@@vscode-test-config:result@@";

// ── Environment variable names ──────────────────────────────────────

/// Overrides the Node.js binary used to evaluate `.js`/`.mjs` configs.
pub const ENV_NODE_BINARY: &str = "VSCODE_TEST_NODE";

/// Log filter for the CLI (`tracing_subscriber::EnvFilter` syntax).
pub const ENV_LOG: &str = "VSCODE_TEST_LOG";
