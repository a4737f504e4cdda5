//! vscode-test-config: inspect VS Code extension test configuration.
//!
//! Entry point and error handling boundary. Uses `anyhow` for
//! ergonomic error propagation and user-facing messages.

mod cli;

use std::path::Path;
use std::process;

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use cli::args::{Cli, Command, SelectArgs};
use vscode_test_config::config::{self, LoaderRegistry, ResolvedConfiguration};
use vscode_test_config::constants::{CONFIG_BASENAME, ENV_LOG};
use vscode_test_config::models::{CoverageOptions, TestDescriptor};

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(err) = run().await {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

/// Log to stderr, filtered by `VSCODE_TEST_LOG` (default: warnings only).
fn init_tracing() {
    let filter = EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let cwd = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("failed to determine current directory")?,
    };
    let explicit = cli.config.as_deref();

    match cli.command {
        Command::Locate => run_locate(&cwd, explicit).await,
        Command::Show(args) => run_show(&cwd, explicit, args).await,
        Command::Paths(args) => run_paths(&cwd, explicit, args).await,
    }
}

/// Print the configuration file path the resolver would load.
async fn run_locate(cwd: &Path, explicit: Option<&Path>) -> Result<()> {
    let path = match explicit {
        Some(path) => std::path::absolute(cwd.join(path))
            .with_context(|| format!("failed to resolve {}", path.display()))?,
        None => config::locate(LoaderRegistry::builtin(), cwd, CONFIG_BASENAME).await?,
    };
    println!("{}", path.display());
    Ok(())
}

/// JSON shape printed by `show`.
#[derive(Serialize)]
struct ShowOutput<'a> {
    path: &'a Path,
    dir: &'a Path,
    tests: Vec<&'a TestDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    coverage: Option<&'a CoverageOptions>,
}

/// Print the resolved configuration as pretty JSON.
async fn run_show(cwd: &Path, explicit: Option<&Path>, args: SelectArgs) -> Result<()> {
    let resolved = config::resolve(cwd, explicit).await?;
    let tests = selected_tests(&resolved, args.label.as_deref())?;

    let output = ShowOutput {
        path: resolved.path(),
        dir: resolved.dir(),
        tests,
        coverage: resolved.coverage(),
    };
    let rendered =
        serde_json::to_string_pretty(&output).context("failed to serialize configuration")?;
    println!("{rendered}");
    Ok(())
}

/// Print each test run's extension development paths.
async fn run_paths(cwd: &Path, explicit: Option<&Path>, args: SelectArgs) -> Result<()> {
    let resolved = config::resolve(cwd, explicit).await?;
    let tests = selected_tests(&resolved, args.label.as_deref())?;

    for test in tests {
        let name = match &test.label {
            Some(label) => label.clone(),
            None => {
                let index = resolved
                    .tests()
                    .iter()
                    .position(|t| std::ptr::eq(t, test))
                    .unwrap_or_default();
                format!("#{index}")
            }
        };
        println!("{}", name.bold());
        for path in resolved.extension_development_paths(test) {
            println!("  {}", path.display());
        }
    }
    Ok(())
}

fn selected_tests<'a>(
    resolved: &'a ResolvedConfiguration,
    label: Option<&str>,
) -> Result<Vec<&'a TestDescriptor>> {
    match label {
        None => Ok(resolved.tests().iter().collect()),
        Some(label) => {
            let tests = resolved.select(label);
            if tests.is_empty() {
                bail!(
                    "no test configuration labelled '{label}' in {}",
                    resolved.path().display()
                );
            }
            Ok(tests)
        }
    }
}
