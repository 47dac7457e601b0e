//! Public host-facing API for embedding the simulator core.

use crate::memory::{Stack, WordMemory};
use crate::state::{ArchitecturalState, HaltReason, RunState};
use crate::FaultCode;

/// Top-level configuration for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CoreConfig {
    /// Stop after this many retired instructions. `None` runs until the core
    /// halts or faults.
    pub max_steps: Option<u64>,
}

impl CoreConfig {
    /// Configuration that stops after `max_steps` retired instructions.
    #[must_use]
    pub const fn with_max_steps(max_steps: u64) -> Self {
        Self {
            max_steps: Some(max_steps),
        }
    }
}

/// Complete machine state owned by one simulator instance.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CoreState {
    /// Architectural register file and special registers.
    pub arch: ArchitecturalState,
    /// Program memory, indexed by `PC`.
    pub program: WordMemory,
    /// Data memory, indexed by raw register value.
    pub data: WordMemory,
    /// Bounded stack window.
    pub stack: Stack,
    /// Current execution state.
    pub run_state: RunState,
}

impl CoreState {
    /// Stores `words` into program memory, later entries overwriting earlier
    /// ones at the same address.
    pub fn load_program<I>(&mut self, words: I)
    where
        I: IntoIterator<Item = (u16, u16)>,
    {
        for (addr, word) in words {
            self.program.write(addr, word);
        }
    }

    /// Restores power-on state while keeping program memory.
    ///
    /// Registers, flags, data memory and the stack are zeroed, `SP` returns to
    /// the stack base and the run state returns to `Running`.
    pub fn reset(&mut self) {
        self.arch = ArchitecturalState::default();
        self.data.clear();
        self.stack.clear();
        self.run_state = RunState::Running;
    }

    /// Returns the latched fault, if the core is faulted.
    #[must_use]
    pub const fn latched_fault(&self) -> Option<FaultCode> {
        self.run_state.latched_fault()
    }
}

/// Output status from one step attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepOutcome {
    /// Instruction retired and the core is still running.
    Retired,
    /// Core is halted normally.
    Halted {
        /// Why execution stopped.
        reason: HaltReason,
    },
    /// Fault was raised; nothing from the faulting instruction was committed.
    Fault {
        /// Fault code raised by decode or execute.
        cause: FaultCode,
        /// Program counter of the faulting instruction.
        pc: u16,
    },
}

impl StepOutcome {
    /// Returns `true` when no further instruction will execute.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Retired)
    }
}

/// Aggregated outcome from [`run`](crate::run).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunOutcome {
    /// Number of instructions retired during this call, `HLT` included.
    pub steps: u64,
    /// Last step-level status observed before returning.
    pub final_step: StepOutcome,
}

impl RunOutcome {
    /// Returns `true` when the run ended in a normal halt.
    #[must_use]
    pub const fn halted_normally(&self) -> bool {
        matches!(self.final_step, StepOutcome::Halted { .. })
    }

    /// Returns the fault that ended the run, if any.
    #[must_use]
    pub const fn fault(&self) -> Option<FaultCode> {
        match self.final_step {
            StepOutcome::Fault { cause, .. } => Some(cause),
            StepOutcome::Retired | StepOutcome::Halted { .. } => None,
        }
    }
}
