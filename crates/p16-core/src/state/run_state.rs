use crate::FaultCode;

/// Why a run ended normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HaltReason {
    /// `HLT` retired.
    HaltInstruction,
    /// `PC` reached the end-of-program sentinel before a fetch.
    EndOfProgram,
}

/// Execution-state machine for the fetch/decode/execute loop.
///
/// `Halted` and `Faulted` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RunState {
    /// Ready to execute the next instruction.
    #[default]
    Running,
    /// Stopped normally.
    Halted(HaltReason),
    /// Stopped by a fatal fault.
    Faulted(FaultCode),
}

impl RunState {
    /// Returns the latched fault, if this state is faulted.
    #[must_use]
    pub const fn latched_fault(self) -> Option<FaultCode> {
        match self {
            Self::Faulted(cause) => Some(cause),
            Self::Running | Self::Halted(_) => None,
        }
    }

    /// Returns `true` once no further instruction can execute.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Running)
    }
}
