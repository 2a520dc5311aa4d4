//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - analyze: score and rank a batch of tasks
//! - suggest: show the top tasks of a batch or of the daemon's last analysis
//! - serve: run the daemon in the foreground

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Taskrank - rank tasks by urgency, importance, effort and what they block
#[derive(Parser, Debug)]
#[command(name = "taskrank")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score and rank a JSON array of tasks
    Analyze {
        /// Task file, or `-` for stdin
        file: PathBuf,

        /// Print the ranked list as JSON
        #[arg(long)]
        json: bool,

        /// Score on the running daemon so later `suggest` calls can reuse it
        #[arg(short, long)]
        daemon: bool,
    },

    /// Show the highest-priority tasks
    Suggest {
        /// Task file, or `-` for stdin; without it the daemon's last analysis is used
        file: Option<PathBuf>,

        /// Number of tasks to show
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Print the suggestions as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the scoring daemon in the foreground
    Serve {
        /// Socket path (overrides the config file)
        #[arg(short, long)]
        socket: Option<PathBuf>,
    },
}
