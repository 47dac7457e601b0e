//! Arithmetic/logic unit: pure result and flag computation.

use super::flags::FlagsUpdate;

const SIGN_BIT: u16 = 0x8000;

/// Operation kinds understood by the ALU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum AluOp {
    Add,
    Sub,
    Mul,
    And,
    Or,
    Not,
    Xor,
    Shr,
    Shl,
    Ror,
    Rol,
}

/// Result value and flag update produced by one ALU evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AluResult {
    /// 16-bit result written to the destination register.
    pub value: u16,
    /// Flag side effects.
    pub flags: FlagsUpdate,
}

/// Evaluates `op` over `a` and `b`.
///
/// For `SHR`/`SHL`, `b` is the shift amount; `NOT`, `ROR` and `ROL` ignore it.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn evaluate(op: AluOp, a: u16, b: u16) -> AluResult {
    match op {
        AluOp::Add => {
            let (value, carry) = a.overflowing_add(b);
            let overflow = ((a ^ value) & (b ^ value) & SIGN_BIT) != 0;
            with_flags(value, carry, overflow)
        }
        AluOp::Sub => {
            let (value, borrow) = a.overflowing_sub(b);
            let overflow = ((a ^ b) & (a ^ value) & SIGN_BIT) != 0;
            with_flags(value, borrow, overflow)
        }
        AluOp::Mul => {
            let wide = u32::from(a) * u32::from(b);
            let value = (wide & 0xFFFF) as u16;
            let carry = wide > 0xFFFF;
            let overflow = i16::try_from(i32::from(signed(a)) * i32::from(signed(b))).is_err();
            with_flags(value, carry, overflow)
        }
        AluOp::And => with_flags(a & b, false, false),
        AluOp::Or => with_flags(a | b, false, false),
        AluOp::Not => with_flags(!a, false, false),
        AluOp::Xor => with_flags(a ^ b, false, false),
        AluOp::Shr => without_flags(a.checked_shr(u32::from(b)).unwrap_or(0)),
        AluOp::Shl => without_flags(a.checked_shl(u32::from(b)).unwrap_or(0)),
        AluOp::Ror => without_flags(a.rotate_right(1)),
        AluOp::Rol => without_flags(a.rotate_left(1)),
    }
}

/// Flag update for `CMP a, b`: Z on equality, S on unsigned less-than.
#[must_use]
pub const fn compare(a: u16, b: u16) -> FlagsUpdate {
    FlagsUpdate::Compare {
        zero: a == b,
        sign: a < b,
    }
}

#[allow(clippy::cast_possible_wrap)]
const fn signed(value: u16) -> i16 {
    value as i16
}

const fn with_flags(value: u16, carry: bool, overflow: bool) -> AluResult {
    AluResult {
        value,
        flags: FlagsUpdate::from_result(value, carry, overflow),
    }
}

const fn without_flags(value: u16) -> AluResult {
    AluResult {
        value,
        flags: FlagsUpdate::None,
    }
}
