//! Instruction disassembly for the P16 ISA.
//!
//! Renders decoded instructions as assembly text. The engine uses the
//! [`Display`](fmt::Display) form in trace logs and the simulator uses
//! [`disassemble_one`] when describing a fault.

use std::fmt;

use crate::decoder::{DecodedInstruction, Decoder};
use crate::memory::WordMemory;
use crate::state::GeneralRegister;

/// A single disassembled instruction row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisassemblyRow {
    /// Program-memory address of the instruction.
    pub addr: u16,
    /// Raw instruction word.
    pub raw_word: u16,
    /// The instruction mnemonic (e.g., "ADD", "MOV", "NOP").
    pub mnemonic: &'static str,
    /// The formatted operands (e.g., "R0, R1" or "#0x05").
    pub operands: String,
    /// Whether the word has no assigned meaning.
    pub is_unrecognized: bool,
}

impl fmt::Display for DisassemblyRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06X}: {:04X}  {}", self.addr, self.raw_word, self.mnemonic)?;
        if !self.operands.is_empty() {
            write!(f, " {}", self.operands)?;
        }
        Ok(())
    }
}

/// Disassembles the program word at `pc`.
#[must_use]
pub fn disassemble_one(pc: u16, program: &WordMemory) -> DisassemblyRow {
    let raw_word = program.read(pc);
    let decoded = Decoder::decode(raw_word);

    DisassemblyRow {
        addr: pc,
        raw_word,
        mnemonic: mnemonic(decoded),
        operands: format_operands(decoded),
        is_unrecognized: matches!(decoded, DecodedInstruction::Unrecognized { .. }),
    }
}

fn mnemonic(instr: DecodedInstruction) -> &'static str {
    instr.encoding().map_or(".word", |encoding| encoding.mnemonic())
}

fn format_operands(instr: DecodedInstruction) -> String {
    let r = format_register;

    match instr {
        DecodedInstruction::Nop | DecodedInstruction::Halt => String::new(),
        DecodedInstruction::Push { rt } => r(rt).to_string(),
        DecodedInstruction::Pop { rd } => r(rd).to_string(),
        DecodedInstruction::Cmp { rs, rt } => format!("{}, {}", r(rs), r(rt)),
        DecodedInstruction::Jump { offset, .. } => format!("#{offset:+}"),
        DecodedInstruction::MovRegister { rd, rs }
        | DecodedInstruction::Unary { rd, rs, .. } => format!("{}, {}", r(rd), r(rs)),
        DecodedInstruction::MovImmediate { rd, imm } => format!("{}, #{imm:#04X}", r(rd)),
        DecodedInstruction::StoreRegister { rs, rt } => format!("[{}], {}", r(rs), r(rt)),
        DecodedInstruction::StoreImmediate { rs, imm } => format!("[{}], #{imm:#04X}", r(rs)),
        DecodedInstruction::Load { rd, rs } => format!("{}, [{}]", r(rd), r(rs)),
        DecodedInstruction::Alu { rd, rs, rt, .. } => {
            format!("{}, {}, {}", r(rd), r(rs), r(rt))
        }
        DecodedInstruction::Shift { rd, rs, shamt, .. } => {
            format!("{}, {}, #{shamt}", r(rd), r(rs))
        }
        DecodedInstruction::Unrecognized { word } => format!("{word:#06X} ; UNRECOGNIZED"),
    }
}

const fn format_register(reg: GeneralRegister) -> &'static str {
    match reg {
        GeneralRegister::R0 => "R0",
        GeneralRegister::R1 => "R1",
        GeneralRegister::R2 => "R2",
        GeneralRegister::R3 => "R3",
        GeneralRegister::R4 => "R4",
        GeneralRegister::R5 => "R5",
        GeneralRegister::R6 => "R6",
        GeneralRegister::R7 => "R7",
    }
}

impl fmt::Display for DecodedInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operands = format_operands(*self);
        if operands.is_empty() {
            f.write_str(mnemonic(*self))
        } else {
            write!(f, "{} {operands}", mnemonic(*self))
        }
    }
}
