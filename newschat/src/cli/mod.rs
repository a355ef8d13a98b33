//! Terminal view: argument parsing and command execution.

mod args;
mod commands;

pub use args::{Cli, Commands, DEFAULT_PORT};
pub use commands::{build_app, execute, CliApp};
