//! Clap argument types.

use clap::Parser;
use std::path::PathBuf;

use vscode_test_config::constants::{APP_NAME, VERSION};

/// Locate and inspect VS Code extension test configuration.
#[derive(Parser, Debug)]
#[command(name = APP_NAME, version = VERSION)]
pub struct Cli {
    /// Configuration file to use instead of searching for `.vscode-test.*`.
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Directory to start the search from (default: current directory).
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Print the path of the configuration file that would be used.
    Locate,

    /// Print the resolved configuration as JSON.
    Show(SelectArgs),

    /// Print the resolved extension development path(s) of each test run.
    Paths(SelectArgs),
}

/// Test selection shared by `show` and `paths`.
#[derive(Parser, Debug)]
pub struct SelectArgs {
    /// Only include the test configuration with this label (or index).
    #[arg(long, short = 'l')]
    pub label: Option<String>,
}
