//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--config <path>`: Use this config file
//! - `--debug`: Enable debug logging
//! - `--json`: Machine-readable output
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// gitsim - An in-memory commit graph simulator for learning branches and merges
#[derive(Parser, Debug)]
#[command(name = "gitsim")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Read configuration from this file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Emit JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Drive a single repository interactively
    #[command(
        name = "shell",
        long_about = "Start a session and drive its repository one command per line.\n\n\
            State lives only as long as the shell does. Lines are read from \
            standard input, or from a script file with --script.",
        after_help = "\
SHELL COMMANDS:
    commit <message> [-- <content>]   record a commit on the current branch
    branch                            list branches
    branch <name>                     create a branch at HEAD
    checkout <name>                   switch to (or create) a branch
    merge <source> [into] [<target>]  merge source into target (default: current)
    log [<branch>]                    full history, or one branch's first-parent chain
    base <a> <b>                      nearest common ancestor of two branches
    status                            current branch and counts
    verify                            check repository invariants
    clear                             start over from a fresh root
    help                              show this list
    exit                              leave the shell

EXAMPLES:
    # Interactive
    gitsim shell

    # Replay a script
    gitsim shell --script lesson.txt"
    )]
    Shell {
        /// Read commands from this file instead of standard input
        #[arg(long, value_name = "FILE")]
        script: Option<PathBuf>,
    },

    /// Serve JSON-lines requests
    #[command(
        name = "batch",
        long_about = "Read one JSON request per line and write one JSON response per line.\n\n\
            Requests carry an \"op\" field: new_session, commit, branch, checkout, \
            merge, log, status, or clear. Sessions are created on first use and \
            last until the input ends.",
        after_help = "\
EXAMPLE:
    echo '{\"op\":\"new_session\"}' | gitsim batch"
    )]
    Batch {
        /// Read requests from this file instead of standard input
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Show the effective configuration
    Config,

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
