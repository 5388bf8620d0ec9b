//! Command-line interface for docrule.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, ValidateArgs};
pub use commands::{Command, CommandDispatcher, CommandResult, ValidateCommand};
