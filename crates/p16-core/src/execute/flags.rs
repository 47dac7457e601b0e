//! FLAGS update behaviors for different instruction classes.

use crate::state::{FLAGS_C, FLAGS_OV, FLAGS_S, FLAGS_Z};

/// Describes how FLAGS should be updated after an instruction executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlagsUpdate {
    /// No change to FLAGS.
    #[default]
    None,
    /// `CMP`: rewrite Z and S, keep C and Ov.
    Compare {
        /// Operands were equal.
        zero: bool,
        /// First operand was below the second (unsigned).
        sign: bool,
    },
    /// Rewrite all four flags.
    Arithmetic {
        /// Zero flag.
        zero: bool,
        /// Sign flag.
        sign: bool,
        /// Carry flag.
        carry: bool,
        /// Overflow flag.
        overflow: bool,
    },
}

impl FlagsUpdate {
    /// Builds a full update with Z and S derived from `result`.
    #[must_use]
    pub const fn from_result(result: u16, carry: bool, overflow: bool) -> Self {
        Self::Arithmetic {
            zero: result == 0,
            sign: (result & 0x8000) != 0,
            carry,
            overflow,
        }
    }

    /// Applies this update to a packed FLAGS value.
    #[must_use]
    pub const fn apply(self, flags: u16) -> u16 {
        match self {
            Self::None => flags,
            Self::Compare { zero, sign } => {
                let kept = flags & (FLAGS_C | FLAGS_OV);
                kept | bit(zero, FLAGS_Z) | bit(sign, FLAGS_S)
            }
            Self::Arithmetic {
                zero,
                sign,
                carry,
                overflow,
            } => bit(zero, FLAGS_Z) | bit(sign, FLAGS_S) | bit(carry, FLAGS_C) | bit(overflow, FLAGS_OV),
        }
    }
}

const fn bit(enabled: bool, flag: u16) -> u16 {
    if enabled {
        flag
    } else {
        0
    }
}
