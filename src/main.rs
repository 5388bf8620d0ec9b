//! docrule CLI entry point.

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use docrule::cli::{Cli, CommandDispatcher};
use docrule::report::should_use_colors;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is WARN
///
/// Logs go to stderr so reports on stdout stay machine-readable.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("docrule=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("docrule=warn"))
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("docrule starting with args: {:?}", cli);

    let use_color = !cli.no_color && should_use_colors();
    console::set_colors_enabled(use_color);

    let dispatcher = CommandDispatcher::new(use_color);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match dispatcher.dispatch(&cli, &mut out) {
        Ok(result) => ExitCode::from(result.exit_code as u8),
        Err(e) => {
            let _ = out.flush();
            if e.is_config_error() {
                eprintln!("Configuration error: {}", e);
            } else {
                eprintln!("Error: {}", e);
            }
            ExitCode::from(2)
        }
    }
}
