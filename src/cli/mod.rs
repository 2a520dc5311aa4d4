//! CLI module for taskrank - command-line interface and subcommands.
//!
//! Provides the main entry point with subcommands for scoring a batch,
//! suggesting what to work on next, and running the daemon.

pub mod commands;

pub use commands::Cli;
