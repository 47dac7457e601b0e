//! Instruction decoder for the P16 ISA.
//!
//! Decoding is total: every 16-bit word maps to exactly one
//! [`DecodedInstruction`] variant. Words whose opcode has no assigned meaning
//! become [`DecodedInstruction::Unrecognized`], which the execution engine
//! turns into a fault.

use crate::encoding::{classify_opcode, decode_primary_word_op_sel, OpcodeEncoding};
use crate::execute::AluOp;
use crate::state::GeneralRegister;

/// Branch condition carried by the relative-jump family (opcode `0x01`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JumpCondition {
    /// `JMP`: always taken.
    Always,
    /// `JEQ`: taken when `Z ∧ ¬S`.
    Equal,
    /// `JLT`: taken when `¬Z ∧ S`.
    Less,
    /// `JGT`: taken when `¬Z ∧ ¬S`.
    Greater,
}

impl JumpCondition {
    /// Evaluates the condition against the Z and S flags.
    #[must_use]
    pub const fn is_satisfied(self, zero: bool, sign: bool) -> bool {
        match self {
            Self::Always => true,
            Self::Equal => zero && !sign,
            Self::Less => !zero && sign,
            Self::Greater => !zero && !sign,
        }
    }

    const fn encoding(self) -> OpcodeEncoding {
        match self {
            Self::Always => OpcodeEncoding::Jmp,
            Self::Equal => OpcodeEncoding::Jeq,
            Self::Less => OpcodeEncoding::Jlt,
            Self::Greater => OpcodeEncoding::Jgt,
        }
    }
}

/// Decoded instruction with all meaningful fields extracted.
///
/// `Alu` carries two-source operations (`ADD`, `SUB`, `MUL`, `AND`, `ORR`,
/// `XOR`), `Unary` carries `NOT`, `ROR` and `ROL`, and `Shift` carries `SHR`
/// and `SHL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum DecodedInstruction {
    Nop,
    Push {
        rt: GeneralRegister,
    },
    Pop {
        rd: GeneralRegister,
    },
    Cmp {
        rs: GeneralRegister,
        rt: GeneralRegister,
    },
    Jump {
        condition: JumpCondition,
        /// Signed displacement added to the jump's own `PC`.
        offset: i16,
    },
    MovRegister {
        rd: GeneralRegister,
        rs: GeneralRegister,
    },
    MovImmediate {
        rd: GeneralRegister,
        imm: u8,
    },
    StoreRegister {
        rs: GeneralRegister,
        rt: GeneralRegister,
    },
    StoreImmediate {
        rs: GeneralRegister,
        imm: u8,
    },
    Load {
        rd: GeneralRegister,
        rs: GeneralRegister,
    },
    Alu {
        op: AluOp,
        rd: GeneralRegister,
        rs: GeneralRegister,
        rt: GeneralRegister,
    },
    Unary {
        op: AluOp,
        rd: GeneralRegister,
        rs: GeneralRegister,
    },
    Shift {
        op: AluOp,
        rd: GeneralRegister,
        rs: GeneralRegister,
        shamt: u8,
    },
    Halt,
    /// Opcode with no assigned meaning.
    Unrecognized {
        word: u16,
    },
}

/// Destination register field (bits 10..8).
#[must_use]
pub const fn field_rd(word: u16) -> GeneralRegister {
    GeneralRegister::from_field(word >> 8)
}

/// First source register field (bits 7..5).
#[must_use]
pub const fn field_rs(word: u16) -> GeneralRegister {
    GeneralRegister::from_field(word >> 5)
}

/// Second source register field (bits 4..2).
#[must_use]
pub const fn field_rt(word: u16) -> GeneralRegister {
    GeneralRegister::from_field(word >> 2)
}

/// 8-bit immediate of the `MOV Rd, #imm` form (bits 7..0).
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn field_imm8(word: u16) -> u8 {
    (word & 0x00FF) as u8
}

/// 8-bit immediate of `STR [Rs], #imm`: bits 10..8 on top of bits 4..0.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn field_split_imm8(word: u16) -> u8 {
    ((((word >> 8) & 0x7) << 5) | (word & 0x1F)) as u8
}

/// 9-bit relative offset (bits 10..2), sign-extended from its bit 8.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub const fn field_simm9(word: u16) -> i16 {
    let raw = (word >> 2) & 0x01FF;
    if (raw & 0x0100) != 0 {
        (raw | 0xFE00) as i16
    } else {
        raw as i16
    }
}

/// Shift amount (bits 4..0).
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn field_shamt(word: u16) -> u8 {
    (word & 0x001F) as u8
}

const fn encoding_for(op: AluOp) -> OpcodeEncoding {
    match op {
        AluOp::Add => OpcodeEncoding::Add,
        AluOp::Sub => OpcodeEncoding::Sub,
        AluOp::Mul => OpcodeEncoding::Mul,
        AluOp::And => OpcodeEncoding::And,
        AluOp::Or => OpcodeEncoding::Or,
        AluOp::Not => OpcodeEncoding::Not,
        AluOp::Xor => OpcodeEncoding::Xor,
        AluOp::Shr => OpcodeEncoding::Shr,
        AluOp::Shl => OpcodeEncoding::Shl,
        AluOp::Ror => OpcodeEncoding::Ror,
        AluOp::Rol => OpcodeEncoding::Rol,
    }
}

fn primary(encoding: OpcodeEncoding) -> u16 {
    let (op, sel) = encoding.primary_bits();
    (u16::from(op) << 11) | u16::from(sel.unwrap_or(0))
}

impl DecodedInstruction {
    /// Returns the assigned encoding, or `None` for [`Self::Unrecognized`].
    #[must_use]
    pub const fn encoding(self) -> Option<OpcodeEncoding> {
        match self {
            Self::Nop => Some(OpcodeEncoding::Nop),
            Self::Push { .. } => Some(OpcodeEncoding::Push),
            Self::Pop { .. } => Some(OpcodeEncoding::Pop),
            Self::Cmp { .. } => Some(OpcodeEncoding::Cmp),
            Self::Jump { condition, .. } => Some(condition.encoding()),
            Self::MovRegister { .. } => Some(OpcodeEncoding::MovRegister),
            Self::MovImmediate { .. } => Some(OpcodeEncoding::MovImmediate),
            Self::StoreRegister { .. } => Some(OpcodeEncoding::StoreRegister),
            Self::StoreImmediate { .. } => Some(OpcodeEncoding::StoreImmediate),
            Self::Load { .. } => Some(OpcodeEncoding::Load),
            Self::Alu { op, .. } | Self::Unary { op, .. } | Self::Shift { op, .. } => {
                Some(encoding_for(op))
            }
            Self::Halt => Some(OpcodeEncoding::Halt),
            Self::Unrecognized { .. } => None,
        }
    }

    /// Re-encodes this instruction as its canonical 16-bit word.
    ///
    /// Bits the instruction does not use are zero. `Unrecognized` returns
    /// the original word unchanged.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn encode(self) -> u16 {
        match self {
            Self::Unrecognized { word } => word,
            Self::Nop => primary(OpcodeEncoding::Nop),
            Self::Halt => primary(OpcodeEncoding::Halt),
            Self::Push { rt } => primary(OpcodeEncoding::Push) | (rt.bits() << 2),
            Self::Pop { rd } => primary(OpcodeEncoding::Pop) | (rd.bits() << 8),
            Self::Cmp { rs, rt } => {
                primary(OpcodeEncoding::Cmp) | (rs.bits() << 5) | (rt.bits() << 2)
            }
            Self::StoreRegister { rs, rt } => {
                primary(OpcodeEncoding::StoreRegister) | (rs.bits() << 5) | (rt.bits() << 2)
            }
            Self::Jump { condition, offset } => {
                primary(condition.encoding()) | (((offset as u16) & 0x01FF) << 2)
            }
            Self::MovRegister { rd, rs } => {
                primary(OpcodeEncoding::MovRegister) | (rd.bits() << 8) | (rs.bits() << 5)
            }
            Self::Load { rd, rs } => {
                primary(OpcodeEncoding::Load) | (rd.bits() << 8) | (rs.bits() << 5)
            }
            Self::Unary { op, rd, rs } => {
                primary(encoding_for(op)) | (rd.bits() << 8) | (rs.bits() << 5)
            }
            Self::MovImmediate { rd, imm } => {
                primary(OpcodeEncoding::MovImmediate) | (rd.bits() << 8) | u16::from(imm)
            }
            Self::StoreImmediate { rs, imm } => {
                let imm = u16::from(imm);
                primary(OpcodeEncoding::StoreImmediate)
                    | (((imm >> 5) & 0x7) << 8)
                    | (rs.bits() << 5)
                    | (imm & 0x1F)
            }
            Self::Alu { op, rd, rs, rt } => {
                primary(encoding_for(op)) | (rd.bits() << 8) | (rs.bits() << 5) | (rt.bits() << 2)
            }
            Self::Shift { op, rd, rs, shamt } => {
                primary(encoding_for(op))
                    | (rd.bits() << 8)
                    | (rs.bits() << 5)
                    | (u16::from(shamt) & 0x1F)
            }
        }
    }
}

/// Instruction decoder for the P16 ISA.
#[derive(Debug)]
pub struct Decoder;

impl Decoder {
    /// Decodes a 16-bit instruction word.
    ///
    /// The opcode (and, for opcodes `0x00`/`0x01`, the two low selector bits)
    /// is resolved first; only then are the operand fields that opcode uses
    /// extracted.
    #[must_use]
    pub fn decode(word: u16) -> DecodedInstruction {
        let (op, sel) = decode_primary_word_op_sel(word);

        let Some(encoding) = classify_opcode(op, sel) else {
            return DecodedInstruction::Unrecognized { word };
        };

        let rd = field_rd(word);
        let rs = field_rs(word);
        let rt = field_rt(word);

        match encoding {
            OpcodeEncoding::Nop => DecodedInstruction::Nop,
            OpcodeEncoding::Push => DecodedInstruction::Push { rt },
            OpcodeEncoding::Pop => DecodedInstruction::Pop { rd },
            OpcodeEncoding::Cmp => DecodedInstruction::Cmp { rs, rt },
            OpcodeEncoding::Jmp => jump(JumpCondition::Always, word),
            OpcodeEncoding::Jeq => jump(JumpCondition::Equal, word),
            OpcodeEncoding::Jlt => jump(JumpCondition::Less, word),
            OpcodeEncoding::Jgt => jump(JumpCondition::Greater, word),
            OpcodeEncoding::MovRegister => DecodedInstruction::MovRegister { rd, rs },
            OpcodeEncoding::MovImmediate => DecodedInstruction::MovImmediate {
                rd,
                imm: field_imm8(word),
            },
            OpcodeEncoding::StoreRegister => DecodedInstruction::StoreRegister { rs, rt },
            OpcodeEncoding::StoreImmediate => DecodedInstruction::StoreImmediate {
                rs,
                imm: field_split_imm8(word),
            },
            OpcodeEncoding::Load => DecodedInstruction::Load { rd, rs },
            OpcodeEncoding::Halt => DecodedInstruction::Halt,
            OpcodeEncoding::Add => binary(AluOp::Add, word),
            OpcodeEncoding::Sub => binary(AluOp::Sub, word),
            OpcodeEncoding::Mul => binary(AluOp::Mul, word),
            OpcodeEncoding::And => binary(AluOp::And, word),
            OpcodeEncoding::Or => binary(AluOp::Or, word),
            OpcodeEncoding::Xor => binary(AluOp::Xor, word),
            OpcodeEncoding::Not => unary(AluOp::Not, word),
            OpcodeEncoding::Ror => unary(AluOp::Ror, word),
            OpcodeEncoding::Rol => unary(AluOp::Rol, word),
            OpcodeEncoding::Shr => shift(AluOp::Shr, word),
            OpcodeEncoding::Shl => shift(AluOp::Shl, word),
        }
    }
}

const fn binary(op: AluOp, word: u16) -> DecodedInstruction {
    DecodedInstruction::Alu {
        op,
        rd: field_rd(word),
        rs: field_rs(word),
        rt: field_rt(word),
    }
}

const fn unary(op: AluOp, word: u16) -> DecodedInstruction {
    DecodedInstruction::Unary {
        op,
        rd: field_rd(word),
        rs: field_rs(word),
    }
}

const fn shift(op: AluOp, word: u16) -> DecodedInstruction {
    DecodedInstruction::Shift {
        op,
        rd: field_rd(word),
        rs: field_rs(word),
        shamt: field_shamt(word),
    }
}

const fn jump(condition: JumpCondition, word: u16) -> DecodedInstruction {
    DecodedInstruction::Jump {
        condition,
        offset: field_simm9(word),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::is_unassigned_primary_opcode;
    use crate::state::GeneralRegister::{R0, R1, R2, R3, R5, R7};

    #[test]
    fn decode_nop_and_halt() {
        assert_eq!(Decoder::decode(0x0000), DecodedInstruction::Nop);
        assert_eq!(Decoder::decode(0xF800), DecodedInstruction::Halt);
        assert_eq!(Decoder::decode(0xFFFF), DecodedInstruction::Halt);
    }

    #[test]
    fn decode_mov_immediate_and_add() {
        assert_eq!(
            Decoder::decode(0x1805),
            DecodedInstruction::MovImmediate { rd: R0, imm: 5 }
        );
        assert_eq!(
            Decoder::decode(0x1903),
            DecodedInstruction::MovImmediate { rd: R1, imm: 3 }
        );
        assert_eq!(
            Decoder::decode(0x4204),
            DecodedInstruction::Alu {
                op: AluOp::Add,
                rd: R2,
                rs: R0,
                rt: R1
            }
        );
    }

    #[test]
    fn unassigned_opcode_is_unrecognized() {
        assert_eq!(
            Decoder::decode(0x3800),
            DecodedInstruction::Unrecognized { word: 0x3800 }
        );
        assert_eq!(
            Decoder::decode(0x9FFF),
            DecodedInstruction::Unrecognized { word: 0x9FFF }
        );
    }

    #[test]
    fn stack_group_uses_full_register_fields() {
        // PSH R7: rt = 7, selector 01.
        assert_eq!(
            Decoder::decode(0b00000_000_000_111_01),
            DecodedInstruction::Push { rt: R7 }
        );
        // POP R5: rd = 5, selector 10.
        assert_eq!(
            Decoder::decode(0b00000_101_000_000_10),
            DecodedInstruction::Pop { rd: R5 }
        );
        // CMP R3, R1: rs = 3, rt = 1, selector 11.
        assert_eq!(
            Decoder::decode(0b00000_000_011_001_11),
            DecodedInstruction::Cmp { rs: R3, rt: R1 }
        );
    }

    #[test]
    fn jump_offsets_sign_extend_from_bit_eight() {
        assert_eq!(field_simm9(0b00001_011111111_00), 255);
        assert_eq!(field_simm9(0b00001_100000000_00), -256);
        assert_eq!(field_simm9(0b00001_111111110_00), -2);
        assert_eq!(
            Decoder::decode(0b00001_000000110_01),
            DecodedInstruction::Jump {
                condition: JumpCondition::Equal,
                offset: 6
            }
        );
    }

    #[test]
    fn store_immediate_reassembles_split_field() {
        let word = 0b00101_101_010_01100;
        assert_eq!(field_split_imm8(word), 0b101_01100);
        assert_eq!(
            Decoder::decode(word),
            DecodedInstruction::StoreImmediate {
                rs: R2,
                imm: 0b101_01100
            }
        );
    }

    #[test]
    fn shift_amount_uses_five_bits() {
        let word = 0b01111_001_010_11111;
        assert_eq!(
            Decoder::decode(word),
            DecodedInstruction::Shift {
                op: AluOp::Shr,
                rd: R1,
                rs: R2,
                shamt: 31
            }
        );
    }

    #[test]
    fn jump_conditions_partition_compare_outcomes() {
        let outcomes = [(true, false), (false, true), (false, false)];
        for (zero, sign) in outcomes {
            let taken: Vec<bool> = [
                JumpCondition::Equal,
                JumpCondition::Less,
                JumpCondition::Greater,
            ]
            .iter()
            .map(|c| c.is_satisfied(zero, sign))
            .collect();
            assert_eq!(taken.iter().filter(|t| **t).count(), 1);
            assert!(JumpCondition::Always.is_satisfied(zero, sign));
        }
    }

    #[test]
    fn alu_opcodes_select_matching_operation() {
        let cases = [
            (0x08_u16, AluOp::Add),
            (0x09, AluOp::Sub),
            (0x0A, AluOp::Mul),
            (0x0B, AluOp::And),
            (0x0C, AluOp::Or),
            (0x0D, AluOp::Not),
            (0x0E, AluOp::Xor),
            (0x0F, AluOp::Shr),
            (0x10, AluOp::Shl),
            (0x11, AluOp::Ror),
            (0x12, AluOp::Rol),
        ];

        for (opcode, expected) in cases {
            let word = (opcode << 11) | 0x00E4;
            let op = match Decoder::decode(word) {
                DecodedInstruction::Alu { op, .. }
                | DecodedInstruction::Unary { op, .. }
                | DecodedInstruction::Shift { op, .. } => op,
                other => panic!("{word:#06X} decoded as {other:?}"),
            };
            assert_eq!(op, expected, "opcode {opcode:#04X}");
        }
    }

    #[test]
    fn exhaustive_decode_classification() {
        for word in 0u16..=u16::MAX {
            let decoded = Decoder::decode(word);
            let (op, _) = decode_primary_word_op_sel(word);
            match decoded {
                DecodedInstruction::Unrecognized { word: raw } => {
                    assert_eq!(raw, word);
                    assert!(
                        is_unassigned_primary_opcode(op),
                        "{word:#06X} unrecognized but opcode {op:#04X} is assigned"
                    );
                }
                other => {
                    assert!(
                        !is_unassigned_primary_opcode(op),
                        "{word:#06X} decoded with unassigned opcode {op:#04X}"
                    );
                    assert_eq!(
                        Decoder::decode(other.encode()),
                        other,
                        "canonical encoding of {word:#06X} must decode identically"
                    );
                }
            }
        }
    }
}
