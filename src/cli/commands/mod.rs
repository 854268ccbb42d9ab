//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Validates command-specific arguments
//! 2. Calls the [`crate::api::Service`] to execute requests
//! 3. Formats and displays output
//!
//! Handlers do NOT reach into repository internals for mutation.

mod batch;
mod completion;
mod config_cmd;
mod shell;

// Re-export command functions for testing and direct invocation
pub use batch::{batch, serve};
pub use completion::completion;
pub use config_cmd::show as config_show;
pub use shell::{shell, Flow, ShellCommand, ShellSession};

use crate::cli::args::Command;
use crate::cli::Context;
use anyhow::Result;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Shell { script } => shell::shell(ctx, script.as_deref()),
        Command::Batch { file } => batch::batch(ctx, file.as_deref()),
        Command::Config => config_cmd::show(ctx),
        Command::Completion { shell } => completion::completion(shell),
    }
}
