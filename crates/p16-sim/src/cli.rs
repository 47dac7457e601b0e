use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Default log filter when `RUST_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Run a P16 program image and print the final machine state.
#[derive(Parser, Debug, PartialEq, Eq)]
#[command(name = "p16-sim", version, about)]
pub struct Cli {
    /// Program image: one `ADDR:VALUE` hexadecimal directive per line.
    pub image: PathBuf,
}

/// Installs the stderr log subscriber, filtered by `RUST_LOG`.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}
