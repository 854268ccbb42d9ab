//! batch command - Serve JSON-lines requests
//!
//! Each input line is one [`Request`](crate::api::Request); each output line
//! is the matching [`Response`](crate::api::Response). Blank lines are
//! skipped. A malformed line produces an error response and processing
//! continues.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use tracing::info;

use crate::api::Service;
use crate::cli::Context;
use crate::session::SessionRegistry;

/// Run batch mode over `file`, or standard input if `None`.
pub fn batch(ctx: &Context, file: Option<&Path>) -> Result<()> {
    let registry = Arc::new(SessionRegistry::new(ctx.config.repository_settings()));
    let service = Service::new(registry);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match file {
        Some(path) => {
            let input = File::open(path)
                .with_context(|| format!("Failed to open '{}'", path.display()))?;
            serve(&service, BufReader::new(input), &mut out)
        }
        None => serve(&service, io::stdin().lock(), &mut out),
    }
}

/// Answer every request in `input`, writing responses to `out`.
pub fn serve(service: &Service, input: impl BufRead, out: &mut impl Write) -> Result<()> {
    let mut handled = 0usize;
    let mut failed = 0usize;

    for line in input.lines() {
        let line = line.context("Failed to read request")?;
        if line.trim().is_empty() {
            continue;
        }

        let response = service.handle_json(&line);
        handled += 1;
        if !response.is_success() {
            failed += 1;
        }

        serde_json::to_writer(&mut *out, &response).context("Failed to encode response")?;
        writeln!(out)?;
        out.flush()?;
    }

    info!(handled, failed, sessions = service.registry().len(), "batch finished");
    Ok(())
}
