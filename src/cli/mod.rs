//! cli
//!
//! Command-line interface layer for gitsim.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Load configuration and build the session registry
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. Handlers talk to the [`crate::api::Service`],
//! which owns the mapping from requests to repository operations.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use anyhow::{Context as _, Result};

use crate::core::config::Config;
use crate::ui::output::Verbosity;

/// Execution context shared by command handlers.
#[derive(Debug, Clone)]
pub struct Context {
    /// Enable debug output and post-command verification
    pub debug: bool,
    /// Minimal output
    pub quiet: bool,
    /// Emit JSON instead of text
    pub json: bool,
    /// Loaded configuration
    pub config: Config,
}

impl Context {
    /// Output verbosity implied by the flags.
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.debug)
    }
}

/// Run the CLI application with already-parsed arguments.
///
/// This is the main entry point called from `main.rs`.
pub fn run(cli: Cli, config: Config) -> Result<()> {
    let ctx = Context {
        debug: cli.debug,
        quiet: cli.quiet,
        json: cli.json || config.json_output(),
        config,
    };

    commands::dispatch(cli.command, &ctx)
}

/// Load configuration for the given arguments.
pub fn load_config(cli: &Cli) -> Result<Config> {
    Config::load(cli.config.as_deref()).context("Failed to load configuration")
}
