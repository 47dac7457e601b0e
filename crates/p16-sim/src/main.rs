//! CLI entry point for the P16 simulator binary.

use std::process;

use clap::Parser;
use p16_core as _;
use p16_sim::cli::{init_logging, Cli};
use p16_sim::render_report;
use p16_sim::simulate::{run_image, EXIT_FAILURE};
#[cfg(test)]
use rstest as _;
#[cfg(test)]
use tempfile as _;
use thiserror as _;
use tracing as _;
use tracing_subscriber as _;

fn main() {
    let cli = Cli::parse();
    init_logging();

    let simulation = match run_image(&cli.image) {
        Ok(simulation) => simulation,
        Err(error) => {
            eprintln!("error: {error}");
            process::exit(EXIT_FAILURE);
        }
    };

    print!("{}", render_report(&simulation.state));
    if let Some(diagnostic) = simulation.fault_diagnostic() {
        eprintln!("error: {diagnostic}");
    }

    process::exit(simulation.exit_code());
}
