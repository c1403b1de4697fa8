//! Terminal interface - command parsing and text rendering over the goal store.
//!
//! This module stands where a graphical front end would: it fills the drafts from
//! command-line arguments, asks the store to act, and prints what the store holds.

/// Command parsing and execution
pub mod commands;

pub use commands::{Command, HELP_TEXT, exit_code, parse_args, run_command};
