use std::path::Path;

use p16_core::{disassemble_one, run, CoreConfig, CoreState, RunOutcome, StepOutcome};
use tracing::info;

use crate::{load_image, LoadError, ProgramImage};

/// Process exit status for a normal halt.
pub const EXIT_SUCCESS: i32 = 0;
/// Process exit status for a load error or a fatal fault.
pub const EXIT_FAILURE: i32 = 1;

/// Final state and outcome of one simulated program.
#[derive(Debug, Clone)]
pub struct Simulation {
    /// Machine state after the last retired instruction.
    pub state: CoreState,
    /// How the run ended.
    pub outcome: RunOutcome,
}

impl Simulation {
    /// Runs `image` on a fresh core until it halts or faults.
    #[must_use]
    pub fn execute(image: &ProgramImage) -> Self {
        let mut state = CoreState::default();
        image.apply(&mut state);

        let outcome = run(&mut state, &CoreConfig::default());
        info!(steps = outcome.steps, final_step = ?outcome.final_step, "simulation finished");

        Self { state, outcome }
    }

    /// Process exit status for this run.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self.outcome.final_step {
            StepOutcome::Fault { .. } => EXIT_FAILURE,
            StepOutcome::Retired | StepOutcome::Halted { .. } => EXIT_SUCCESS,
        }
    }

    /// Describes the fault that ended the run, including the faulting
    /// instruction.
    #[must_use]
    pub fn fault_diagnostic(&self) -> Option<String> {
        match self.outcome.final_step {
            StepOutcome::Fault { cause, pc } => {
                let row = disassemble_one(pc, &self.state.program);
                Some(format!("{cause} at PC={pc:#06X} ({row})"))
            }
            StepOutcome::Retired | StepOutcome::Halted { .. } => None,
        }
    }
}

/// Loads the image at `path` and runs it.
///
/// # Errors
///
/// Returns [`LoadError`] when the image cannot be read.
pub fn run_image(path: &Path) -> Result<Simulation, LoadError> {
    let image = load_image(path)?;
    Ok(Simulation::execute(&image))
}
