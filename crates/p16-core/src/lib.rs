//! Core instruction-set simulator for the P16 teaching architecture.
//!
//! The core owns the whole machine: eight general registers, `PC`, `LR`,
//! `SP`, four condition flags, word-addressed program and data memories and
//! an eight-slot stack window. Hosts load a program into a [`CoreState`] and
//! drive it with [`step_one`] or [`run`]; faults come back as values and
//! never abort the process.

/// Memory model: word memories, fixed constants, stack window.
pub mod memory;
pub use memory::{
    Stack, StackEffect, WordMemory, END_OF_PROGRAM, INSTRUCTION_BYTES, MEMORY_WORDS, STACK_BASE,
    STACK_CAPACITY, STACK_FLOOR,
};

/// Public host-facing API and integration types.
pub mod api;
pub use api::{CoreConfig, CoreState, RunOutcome, StepOutcome};

/// Architectural CPU state model primitives.
pub mod state;
pub use state::{
    ArchitecturalState, GeneralRegister, HaltReason, RunState, FLAGS_C, FLAGS_OV, FLAGS_S,
    FLAGS_Z, GENERAL_REGISTER_COUNT,
};

/// Opcode table and classification.
pub mod encoding;
pub use encoding::{classify_opcode, Opcode, OpcodeEncoding, OPCODE_ENCODING_TABLE};

/// Instruction decode with field extraction.
pub mod decoder;
pub use decoder::{DecodedInstruction, Decoder, JumpCondition};

/// Assembly rendering of decoded instructions.
pub mod disasm;
pub use disasm::{disassemble_one, DisassemblyRow};

/// Fault taxonomy.
pub mod fault;
pub use fault::{FaultClass, FaultCode};

/// Instruction execution pipeline.
pub mod execute;
pub use execute::{
    commit_execution, execute_instruction, run, step_one, AluOp, ExecuteOutcome, ExecuteState,
    FlagsUpdate,
};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
