//! vscode-test-config: locate, load and normalize VS Code extension test
//! configuration (library crate).
//!
//! Re-exports public modules for integration tests and external use.

pub mod config;
pub mod constants;
pub mod env;
pub mod models;

pub use config::{ConfigError, ResolvedConfiguration, resolve};
pub use models::{CanonicalConfiguration, CoverageOptions, TestDescriptor};
