//! gitsim binary entry point.

use std::process::ExitCode;

use gitsim::cli::{self, Cli};
use gitsim::ui::output;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = Cli::parse_args();

    let config = match cli::load_config(&args) {
        Ok(config) => config,
        Err(err) => {
            output::error(format!("{err:#}"));
            return ExitCode::FAILURE;
        }
    };

    init_logging(args.debug, config.log_filter());

    match cli::run(args, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::error(format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}

/// Install the stderr subscriber. `RUST_LOG` wins over `--debug`, which
/// wins over the configured filter.
fn init_logging(debug: bool, configured: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directive = if debug { "debug" } else { configured };
        EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("warn"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
