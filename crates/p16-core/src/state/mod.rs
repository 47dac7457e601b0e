//! Architectural CPU state model primitives.

/// Architectural register file types and storage model.
pub mod registers;
/// Execution state machine.
pub mod run_state;

pub use registers::{
    ArchitecturalState, GeneralRegister, FLAGS_ACTIVE_MASK, FLAGS_C, FLAGS_OV, FLAGS_S, FLAGS_Z,
    GENERAL_REGISTER_COUNT,
};
pub use run_state::{HaltReason, RunState};
