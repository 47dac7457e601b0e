/// Primary opcode values (`OPCODE` field, bits 15..11) with an assigned meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Opcode {
    StackCompare = 0x00,
    Jump = 0x01,
    MovRegister = 0x02,
    MovImmediate = 0x03,
    StoreRegister = 0x04,
    StoreImmediate = 0x05,
    Load = 0x06,
    Add = 0x08,
    Sub = 0x09,
    Mul = 0x0A,
    And = 0x0B,
    Or = 0x0C,
    Not = 0x0D,
    Xor = 0x0E,
    Shr = 0x0F,
    Shl = 0x10,
    Ror = 0x11,
    Rol = 0x12,
    Halt = 0x1F,
}

impl Opcode {
    /// Converts a 5-bit primary opcode value into an assigned opcode.
    #[must_use]
    pub const fn from_u5(op: u8) -> Option<Self> {
        match op {
            0x00 => Some(Self::StackCompare),
            0x01 => Some(Self::Jump),
            0x02 => Some(Self::MovRegister),
            0x03 => Some(Self::MovImmediate),
            0x04 => Some(Self::StoreRegister),
            0x05 => Some(Self::StoreImmediate),
            0x06 => Some(Self::Load),
            0x08 => Some(Self::Add),
            0x09 => Some(Self::Sub),
            0x0A => Some(Self::Mul),
            0x0B => Some(Self::And),
            0x0C => Some(Self::Or),
            0x0D => Some(Self::Not),
            0x0E => Some(Self::Xor),
            0x0F => Some(Self::Shr),
            0x10 => Some(Self::Shl),
            0x11 => Some(Self::Ror),
            0x12 => Some(Self::Rol),
            0x1F => Some(Self::Halt),
            _ => None,
        }
    }

    /// Returns the raw 5-bit opcode value.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Canonical assigned `(OPCODE, SEL)` encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum OpcodeEncoding {
    Nop,
    Push,
    Pop,
    Cmp,
    Jmp,
    Jeq,
    Jlt,
    Jgt,
    MovRegister,
    MovImmediate,
    StoreRegister,
    StoreImmediate,
    Load,
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
    Halt,
}

impl OpcodeEncoding {
    /// Assembly mnemonic used by the disassembler.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Nop => "NOP",
            Self::Push => "PSH",
            Self::Pop => "POP",
            Self::Cmp => "CMP",
            Self::Jmp => "JMP",
            Self::Jeq => "JEQ",
            Self::Jlt => "JLT",
            Self::Jgt => "JGT",
            Self::MovRegister | Self::MovImmediate => "MOV",
            Self::StoreRegister | Self::StoreImmediate => "STR",
            Self::Load => "LDR",
            Self::Add => "ADD",
            Self::Sub => "SUB",
            Self::Mul => "MUL",
            Self::And => "AND",
            Self::Or => "ORR",
            Self::Not => "NOT",
            Self::Xor => "XOR",
            Self::Shr => "SHR",
            Self::Shl => "SHL",
            Self::Ror => "ROR",
            Self::Rol => "ROL",
            Self::Halt => "HLT",
        }
    }

    /// Returns the `(OPCODE, SEL)` pair this encoding is assigned to.
    ///
    /// `SEL` is `None` for opcodes that ignore the low selector bits.
    #[must_use]
    pub const fn primary_bits(self) -> (u8, Option<u8>) {
        let (opcode, sel) = match self {
            Self::Nop => (Opcode::StackCompare, Some(0b00)),
            Self::Push => (Opcode::StackCompare, Some(0b01)),
            Self::Pop => (Opcode::StackCompare, Some(0b10)),
            Self::Cmp => (Opcode::StackCompare, Some(0b11)),
            Self::Jmp => (Opcode::Jump, Some(0b00)),
            Self::Jeq => (Opcode::Jump, Some(0b01)),
            Self::Jlt => (Opcode::Jump, Some(0b10)),
            Self::Jgt => (Opcode::Jump, Some(0b11)),
            Self::MovRegister => (Opcode::MovRegister, None),
            Self::MovImmediate => (Opcode::MovImmediate, None),
            Self::StoreRegister => (Opcode::StoreRegister, None),
            Self::StoreImmediate => (Opcode::StoreImmediate, None),
            Self::Load => (Opcode::Load, None),
            Self::Add => (Opcode::Add, None),
            Self::Sub => (Opcode::Sub, None),
            Self::Mul => (Opcode::Mul, None),
            Self::And => (Opcode::And, None),
            Self::Or => (Opcode::Or, None),
            Self::Not => (Opcode::Not, None),
            Self::Xor => (Opcode::Xor, None),
            Self::Shr => (Opcode::Shr, None),
            Self::Shl => (Opcode::Shl, None),
            Self::Ror => (Opcode::Ror, None),
            Self::Rol => (Opcode::Rol, None),
            Self::Halt => (Opcode::Halt, None),
        };
        (opcode.as_u8(), sel)
    }
}

/// Single source-of-truth opcode table.
///
/// A `None` selector matches any value of the two low bits. Any opcode not
/// present here is unrecognized by definition.
pub const OPCODE_ENCODING_TABLE: &[(u8, Option<u8>, OpcodeEncoding)] = &[
    (0x00, Some(0b00), OpcodeEncoding::Nop),
    (0x00, Some(0b01), OpcodeEncoding::Push),
    (0x00, Some(0b10), OpcodeEncoding::Pop),
    (0x00, Some(0b11), OpcodeEncoding::Cmp),
    (0x01, Some(0b00), OpcodeEncoding::Jmp),
    (0x01, Some(0b01), OpcodeEncoding::Jeq),
    (0x01, Some(0b10), OpcodeEncoding::Jlt),
    (0x01, Some(0b11), OpcodeEncoding::Jgt),
    (0x02, None, OpcodeEncoding::MovRegister),
    (0x03, None, OpcodeEncoding::MovImmediate),
    (0x04, None, OpcodeEncoding::StoreRegister),
    (0x05, None, OpcodeEncoding::StoreImmediate),
    (0x06, None, OpcodeEncoding::Load),
    (0x08, None, OpcodeEncoding::Add),
    (0x09, None, OpcodeEncoding::Sub),
    (0x0A, None, OpcodeEncoding::Mul),
    (0x0B, None, OpcodeEncoding::And),
    (0x0C, None, OpcodeEncoding::Or),
    (0x0D, None, OpcodeEncoding::Not),
    (0x0E, None, OpcodeEncoding::Xor),
    (0x0F, None, OpcodeEncoding::Shr),
    (0x10, None, OpcodeEncoding::Shl),
    (0x11, None, OpcodeEncoding::Ror),
    (0x12, None, OpcodeEncoding::Rol),
    (0x1F, None, OpcodeEncoding::Halt),
];

/// Returns true if the primary opcode has no assigned meaning.
#[must_use]
pub const fn is_unassigned_primary_opcode(op: u8) -> bool {
    Opcode::from_u5(op).is_none()
}

/// Returns the assigned encoding for an opcode/selector pair.
///
/// `None` means the opcode is unrecognized.
#[must_use]
pub fn classify_opcode(op: u8, sel: u8) -> Option<OpcodeEncoding> {
    if op > 0x1F || sel > 0b11 {
        return None;
    }

    OPCODE_ENCODING_TABLE
        .iter()
        .find_map(|(entry_op, entry_sel, encoding)| {
            let sel_matches = entry_sel.is_none_or(|s| s == sel);
            (*entry_op == op && sel_matches).then_some(*encoding)
        })
}

/// Extracts the `(OPCODE, SEL)` pair from an instruction word.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn decode_primary_word_op_sel(word: u16) -> (u8, u8) {
    (((word >> 11) & 0x001F) as u8, (word & 0x0003) as u8)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{
        classify_opcode, decode_primary_word_op_sel, is_unassigned_primary_opcode, Opcode,
        OpcodeEncoding, OPCODE_ENCODING_TABLE,
    };

    #[test]
    fn table_contains_unique_op_sel_pairs() {
        let pairs: HashSet<_> = OPCODE_ENCODING_TABLE
            .iter()
            .map(|(op, sel, _)| (*op, *sel))
            .collect();
        assert_eq!(pairs.len(), OPCODE_ENCODING_TABLE.len());
    }

    #[test]
    fn every_table_entry_resolves_via_lookup() {
        for (op, sel, encoding) in OPCODE_ENCODING_TABLE {
            let probe = sel.unwrap_or(0b10);
            assert_eq!(classify_opcode(*op, probe), Some(*encoding));
            assert_eq!(encoding.primary_bits(), (*op, *sel));
        }
    }

    #[test]
    fn table_covers_every_encoding_once() {
        let encodings: HashSet<_> = OPCODE_ENCODING_TABLE.iter().map(|(_, _, e)| *e).collect();
        assert_eq!(encodings.len(), OPCODE_ENCODING_TABLE.len());
        assert_eq!(OPCODE_ENCODING_TABLE.len(), 25);
    }

    #[test]
    fn selector_only_matters_for_stack_and_jump_opcodes() {
        for (op, sel, _) in OPCODE_ENCODING_TABLE {
            let opcode = Opcode::from_u5(*op).expect("table opcodes are assigned");
            assert_eq!(
                sel.is_some(),
                matches!(opcode, Opcode::StackCompare | Opcode::Jump)
            );
        }
    }

    #[test]
    fn multiplexed_opcodes_use_all_selector_patterns() {
        assert_eq!(classify_opcode(0x00, 0b00), Some(OpcodeEncoding::Nop));
        assert_eq!(classify_opcode(0x00, 0b01), Some(OpcodeEncoding::Push));
        assert_eq!(classify_opcode(0x00, 0b10), Some(OpcodeEncoding::Pop));
        assert_eq!(classify_opcode(0x00, 0b11), Some(OpcodeEncoding::Cmp));
        assert_eq!(classify_opcode(0x01, 0b00), Some(OpcodeEncoding::Jmp));
        assert_eq!(classify_opcode(0x01, 0b11), Some(OpcodeEncoding::Jgt));
    }

    #[test]
    fn single_operation_opcodes_ignore_selector() {
        for sel in 0..=0b11 {
            assert_eq!(classify_opcode(0x08, sel), Some(OpcodeEncoding::Add));
            assert_eq!(classify_opcode(0x1F, sel), Some(OpcodeEncoding::Halt));
        }
    }

    #[test]
    fn unassigned_primary_opcodes_are_unrecognized() {
        let unassigned: Vec<u8> = (0u8..=0x1F).filter(|op| is_unassigned_primary_opcode(*op)).collect();
        let mut expected = vec![0x07];
        expected.extend(0x13..=0x1E);
        assert_eq!(unassigned, expected);

        for op in unassigned {
            for sel in 0..=0b11 {
                assert_eq!(classify_opcode(op, sel), None);
            }
        }
    }

    #[test]
    fn primary_word_decode_extracts_opcode_and_selector() {
        let word = 0b01001_010_111_110_11_u16;
        assert_eq!(decode_primary_word_op_sel(word), (0x09, 0b11));
    }

    #[test]
    fn opcode_values_roundtrip() {
        for op in 0u8..=0x1F {
            if let Some(opcode) = Opcode::from_u5(op) {
                assert_eq!(opcode.as_u8(), op);
            }
        }
    }
}
