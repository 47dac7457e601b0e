use thiserror::Error;

/// Fault classes used for diagnostics and exit policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultClass {
    /// Decoder found no assigned meaning for the instruction word.
    Decode,
    /// Push or pop tried to leave the stack window.
    Stack,
}

/// Fatal faults raised by the execution engine.
///
/// Every fault is terminal: the run stops and the architectural state stays
/// exactly as it was after the last retired instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum FaultCode {
    /// `PSH` with the stack pointer already at the window floor.
    #[error("stack overflow: push with SP={sp:#06X}")]
    StackOverflow {
        /// Stack pointer observed when the push was attempted.
        sp: u16,
    },
    /// `POP` with the stack pointer already at the stack base.
    #[error("stack underflow: pop with SP={sp:#06X}")]
    StackUnderflow {
        /// Stack pointer observed when the pop was attempted.
        sp: u16,
    },
    /// Instruction word whose opcode has no assigned meaning.
    #[error("unrecognized instruction {word:#06X}")]
    UnrecognizedOpcode {
        /// Raw instruction word that failed to decode.
        word: u16,
    },
}

impl FaultCode {
    /// Returns the diagnostics class for this fault.
    #[must_use]
    pub const fn class(self) -> FaultClass {
        match self {
            Self::StackOverflow { .. } | Self::StackUnderflow { .. } => FaultClass::Stack,
            Self::UnrecognizedOpcode { .. } => FaultClass::Decode,
        }
    }

    /// Returns `true` for push/pop window violations.
    #[must_use]
    pub const fn is_stack_fault(self) -> bool {
        matches!(self.class(), FaultClass::Stack)
    }
}
