//! Command-line interface
//!
//! This module contains the CLI commands and argument parsing
//! for the deploy configuration tool.

pub mod commands;

pub use commands::{Command, Opt};
