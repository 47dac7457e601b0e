use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to obtain a program image.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The image file could not be opened or read.
    #[error("cannot read program image {}: {source}", path.display())]
    Read {
        /// Path given on the command line.
        path: PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },
}
