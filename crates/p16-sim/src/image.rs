//! `ADDR:VALUE` program image format.
//!
//! One directive per line, both fields hexadecimal with an optional `0x`
//! prefix. The value is the run of hex digits right after the colon; any text
//! following it is ignored. Lines that do not parse, including lines that are
//! not valid UTF-8, are skipped.

use std::fs;
use std::path::Path;

use p16_core::CoreState;
use tracing::debug;

use crate::LoadError;

/// Parsed program image: directives in file order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgramImage {
    directives: Vec<(u16, u16)>,
    skipped_lines: usize,
}

impl ProgramImage {
    /// `(address, word)` pairs in file order, duplicates included.
    #[must_use]
    pub fn directives(&self) -> &[(u16, u16)] {
        &self.directives
    }

    /// Number of non-blank lines that were not valid directives.
    #[must_use]
    pub const fn skipped_lines(&self) -> usize {
        self.skipped_lines
    }

    /// Writes every directive into program memory, in file order.
    pub fn apply(&self, state: &mut CoreState) {
        state.load_program(self.directives.iter().copied());
    }
}

fn strip_hex_prefix(field: &str) -> &str {
    field
        .strip_prefix("0x")
        .or_else(|| field.strip_prefix("0X"))
        .unwrap_or(field)
}

fn parse_hex_digits(digits: &str) -> Option<u16> {
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(digits, 16).ok()
}

/// Parses one `ADDR:VALUE` line.
#[must_use]
pub fn parse_directive(line: &str) -> Option<(u16, u16)> {
    let (addr, rest) = line.trim().split_once(':')?;
    let value = strip_hex_prefix(rest.trim_start());
    let end = value
        .find(|c: char| !c.is_ascii_hexdigit())
        .unwrap_or(value.len());
    Some((
        parse_hex_digits(strip_hex_prefix(addr.trim()))?,
        parse_hex_digits(&value[..end])?,
    ))
}

/// Parses a whole image. Malformed lines are logged and skipped.
#[must_use]
pub fn parse_image(text: &str) -> ProgramImage {
    let mut image = ProgramImage::default();

    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_directive(line) {
            Some(directive) => image.directives.push(directive),
            None => {
                image.skipped_lines += 1;
                debug!(line = index + 1, content = line, "skipping malformed image line");
            }
        }
    }

    image
}

/// Reads and parses the image at `path`.
///
/// # Errors
///
/// Returns [`LoadError::Read`] when the file cannot be read. Bytes that are
/// not valid UTF-8 only make their own line malformed.
pub fn load_image(path: &Path) -> Result<ProgramImage, LoadError> {
    let bytes = fs::read(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let image = parse_image(&String::from_utf8_lossy(&bytes));
    debug!(
        path = %path.display(),
        directives = image.directives.len(),
        skipped = image.skipped_lines,
        "program image loaded"
    );
    Ok(image)
}
