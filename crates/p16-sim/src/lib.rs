//! Command-line simulator for P16 program images.
//!
//! Loads an `ADDR:VALUE` text image into a fresh [`p16_core::CoreState`], runs
//! it to completion and renders the final machine state.

#[cfg(test)]
use rstest as _;
#[cfg(test)]
use tempfile as _;

/// Command-line arguments and logging setup.
pub mod cli;
/// Load-time error types.
pub mod errors;
/// Program image parsing.
pub mod image;
/// Final state report.
pub mod report;
/// Image-to-outcome driver and exit policy.
pub mod simulate;

pub use errors::LoadError;
pub use image::{load_image, parse_image, ProgramImage};
pub use report::{render_report, StateReport};
pub use simulate::{run_image, Simulation};
