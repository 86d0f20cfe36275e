use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Classroom Smart Board Lock
///
/// Shows a rotating 6-digit code on the locked board, accepts the
/// time-derived real code to unlock, and forces the board locked
/// whenever the class schedule enters a break.
#[derive(Parser, Debug)]
#[command(name = "smartboard-lock")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file (defaults to the system location)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write an example configuration file
    Init {
        /// Output path (defaults to the config location)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Run the lock daemon in the foreground
    Run,
    /// Show the current period and code rotation status
    Status {
        /// Emit machine-readable JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the code currently shown on the board
    Code {
        /// Print the real (complement) code a remote user must type
        #[arg(long)]
        real: bool,
    },
    /// Check an unlock code against the current time window
    Verify {
        /// The 6-digit code to check
        code: String,
    },
}
