//! Instruction execution pipeline for the P16 ISA.
//!
//! Each step runs in two phases:
//! 1. [`execute_instruction`] reads operands from an immutable view of the
//!    core and records every side effect in an [`ExecuteState`].
//! 2. [`commit_execution`] applies the recorded effects: data memory, stack,
//!    destination register, FLAGS, then `PC`.
//!
//! A fault skips phase 2 entirely, so faulting instructions produce no partial
//! side effects.

/// Result and flag computation.
pub mod alu;
mod flags;

pub use alu::{compare, evaluate, AluOp, AluResult};
pub use flags::FlagsUpdate;

use tracing::{debug, trace, warn};

use crate::decoder::{DecodedInstruction, Decoder};
use crate::memory::{Stack, StackEffect, END_OF_PROGRAM, INSTRUCTION_BYTES};
use crate::state::{GeneralRegister, HaltReason, RunState};
use crate::{CoreConfig, CoreState, FaultCode, RunOutcome, StepOutcome};

/// Outcome of executing a single instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecuteOutcome {
    /// Instruction completed; commit and keep running.
    Retired,
    /// `HLT` completed; commit and stop.
    Halted,
    /// Fault was raised; commit nothing.
    Fault {
        /// Fault code.
        cause: FaultCode,
    },
}

/// Side effects accumulated while executing one instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecuteState {
    /// Destination register and the value it receives.
    pub register_write: Option<(GeneralRegister, u16)>,
    /// FLAGS update to apply.
    pub flags_update: FlagsUpdate,
    /// Data-memory address and the value stored there.
    pub data_write: Option<(u16, u16)>,
    /// Validated stack mutation.
    pub stack_effect: Option<StackEffect>,
    /// `PC` value after commit.
    pub next_pc: u16,
}

impl ExecuteState {
    /// Creates an empty side-effect record that only advances `PC`.
    #[must_use]
    pub const fn new(next_pc: u16) -> Self {
        Self {
            register_write: None,
            flags_update: FlagsUpdate::None,
            data_write: None,
            stack_effect: None,
            next_pc,
        }
    }

    const fn write_alu(&mut self, rd: GeneralRegister, result: AluResult) {
        self.register_write = Some((rd, result.value));
        self.flags_update = result.flags;
    }
}

/// Address of the instruction after `pc`.
///
/// Sequential advance saturates at [`END_OF_PROGRAM`] instead of wrapping to
/// zero.
#[must_use]
pub const fn sequential_next_pc(pc: u16) -> u16 {
    pc.saturating_add(INSTRUCTION_BYTES)
}

/// Executes `instr` against `state` without mutating it.
///
/// Returns the outcome together with the side effects to commit. On
/// [`ExecuteOutcome::Fault`] the side effects must be discarded.
#[must_use]
pub fn execute_instruction(
    instr: &DecodedInstruction,
    state: &CoreState,
) -> (ExecuteOutcome, ExecuteState) {
    let arch = &state.arch;
    let pc = arch.pc();
    let mut exec = ExecuteState::new(sequential_next_pc(pc));

    let outcome = match *instr {
        DecodedInstruction::Nop => ExecuteOutcome::Retired,
        DecodedInstruction::Halt => ExecuteOutcome::Halted,
        DecodedInstruction::Unrecognized { word } => ExecuteOutcome::Fault {
            cause: FaultCode::UnrecognizedOpcode { word },
        },
        DecodedInstruction::Push { rt } => match Stack::plan_push(arch.sp(), arch.gpr(rt)) {
            Ok(effect) => {
                exec.stack_effect = Some(effect);
                ExecuteOutcome::Retired
            }
            Err(cause) => ExecuteOutcome::Fault { cause },
        },
        DecodedInstruction::Pop { rd } => match state.stack.plan_pop(arch.sp()) {
            Ok((value, effect)) => {
                exec.register_write = Some((rd, value));
                exec.stack_effect = Some(effect);
                ExecuteOutcome::Retired
            }
            Err(cause) => ExecuteOutcome::Fault { cause },
        },
        DecodedInstruction::Cmp { rs, rt } => {
            exec.flags_update = compare(arch.gpr(rs), arch.gpr(rt));
            ExecuteOutcome::Retired
        }
        DecodedInstruction::Jump { condition, offset } => {
            if condition.is_satisfied(arch.zero(), arch.sign()) {
                exec.next_pc = pc.wrapping_add_signed(offset);
            }
            ExecuteOutcome::Retired
        }
        DecodedInstruction::MovRegister { rd, rs } => {
            exec.register_write = Some((rd, arch.gpr(rs)));
            ExecuteOutcome::Retired
        }
        DecodedInstruction::MovImmediate { rd, imm } => {
            exec.register_write = Some((rd, u16::from(imm)));
            ExecuteOutcome::Retired
        }
        DecodedInstruction::StoreRegister { rs, rt } => {
            exec.data_write = Some((arch.gpr(rs), arch.gpr(rt)));
            ExecuteOutcome::Retired
        }
        DecodedInstruction::StoreImmediate { rs, imm } => {
            exec.data_write = Some((arch.gpr(rs), u16::from(imm)));
            ExecuteOutcome::Retired
        }
        DecodedInstruction::Load { rd, rs } => {
            exec.register_write = Some((rd, state.data.read(arch.gpr(rs))));
            ExecuteOutcome::Retired
        }
        DecodedInstruction::Alu { op, rd, rs, rt } => {
            exec.write_alu(rd, evaluate(op, arch.gpr(rs), arch.gpr(rt)));
            ExecuteOutcome::Retired
        }
        DecodedInstruction::Unary { op, rd, rs } => {
            exec.write_alu(rd, evaluate(op, arch.gpr(rs), 0));
            ExecuteOutcome::Retired
        }
        DecodedInstruction::Shift { op, rd, rs, shamt } => {
            exec.write_alu(rd, evaluate(op, arch.gpr(rs), u16::from(shamt)));
            ExecuteOutcome::Retired
        }
    };

    (outcome, exec)
}

/// Applies the side effects recorded by [`execute_instruction`].
///
/// Only call this for [`ExecuteOutcome::Retired`] or
/// [`ExecuteOutcome::Halted`].
pub fn commit_execution(state: &mut CoreState, exec: &ExecuteState) {
    if let Some((addr, value)) = exec.data_write {
        state.data.write(addr, value);
    }

    if let Some(effect) = exec.stack_effect {
        let sp = state.stack.apply(effect);
        state.arch.set_sp(sp);
    }

    if let Some((reg, value)) = exec.register_write {
        state.arch.set_gpr(reg, value);
    }

    let flags = exec.flags_update.apply(state.arch.flags());
    state.arch.set_flags(flags);
    state.arch.set_pc(exec.next_pc);
}

/// Runs a single fetch/decode/execute/commit step.
///
/// Once the core is halted or faulted, further calls return the same terminal
/// outcome without executing anything.
pub fn step_one(state: &mut CoreState) -> StepOutcome {
    match state.run_state {
        RunState::Halted(reason) => return StepOutcome::Halted { reason },
        RunState::Faulted(cause) => {
            return StepOutcome::Fault {
                cause,
                pc: state.arch.pc(),
            }
        }
        RunState::Running => {}
    }

    let pc = state.arch.pc();
    if pc >= END_OF_PROGRAM {
        debug!(pc, "end of program memory reached");
        return halt(state, HaltReason::EndOfProgram);
    }

    let word = state.program.read(pc);
    let instruction = Decoder::decode(word);
    let (outcome, exec) = execute_instruction(&instruction, state);

    match outcome {
        ExecuteOutcome::Retired => {
            commit_execution(state, &exec);
            trace!(pc, word, %instruction, "retired");
            StepOutcome::Retired
        }
        ExecuteOutcome::Halted => {
            commit_execution(state, &exec);
            debug!(pc, "halt instruction retired");
            halt(state, HaltReason::HaltInstruction)
        }
        ExecuteOutcome::Fault { cause } => {
            warn!(pc, word, %cause, "fault raised");
            state.run_state = RunState::Faulted(cause);
            StepOutcome::Fault { cause, pc }
        }
    }
}

fn halt(state: &mut CoreState, reason: HaltReason) -> StepOutcome {
    state.run_state = RunState::Halted(reason);
    StepOutcome::Halted { reason }
}

/// Steps until the core halts or faults, or until `config.max_steps`
/// instructions have retired.
///
/// When the step limit stops the run, `final_step` is
/// [`StepOutcome::Retired`].
pub fn run(state: &mut CoreState, config: &CoreConfig) -> RunOutcome {
    if state.run_state.is_terminal() {
        return RunOutcome {
            steps: 0,
            final_step: step_one(state),
        };
    }

    let mut steps = 0_u64;
    loop {
        if config.max_steps.is_some_and(|limit| steps >= limit) {
            debug!(steps, "step limit reached");
            return RunOutcome {
                steps,
                final_step: StepOutcome::Retired,
            };
        }

        let outcome = step_one(state);
        match outcome {
            StepOutcome::Retired => steps += 1,
            StepOutcome::Halted {
                reason: HaltReason::HaltInstruction,
            } => {
                return RunOutcome {
                    steps: steps + 1,
                    final_step: outcome,
                }
            }
            StepOutcome::Halted { .. } | StepOutcome::Fault { .. } => {
                return RunOutcome {
                    steps,
                    final_step: outcome,
                }
            }
        }
    }
}
