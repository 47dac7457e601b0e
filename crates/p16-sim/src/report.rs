use std::fmt;

use p16_core::memory::stack_slot_address;
use p16_core::{CoreState, GeneralRegister};

/// Human-readable final machine state.
///
/// Lists the general registers, `PC`, `LR`, `SP`, every nonzero data-memory
/// word, every stack slot with its window address, and the four flags.
#[derive(Debug, Clone, Copy)]
pub struct StateReport<'a> {
    state: &'a CoreState,
}

impl<'a> StateReport<'a> {
    /// Wraps `state` for rendering.
    #[must_use]
    pub const fn new(state: &'a CoreState) -> Self {
        Self { state }
    }
}

impl fmt::Display for StateReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arch = &self.state.arch;

        writeln!(f, "Registers:")?;
        for reg in GeneralRegister::ALL {
            writeln!(f, "R{}: {:#06X}", reg.index(), arch.gpr(reg))?;
        }
        writeln!(f, "PC: {:#06X}", arch.pc())?;
        writeln!(f, "LR: {:#06X}", arch.lr())?;
        writeln!(f, "SP: {:#06X}", arch.sp())?;

        writeln!(f)?;
        writeln!(f, "Data memory:")?;
        for (addr, value) in self.state.data.iter_nonzero() {
            writeln!(f, "{addr:#06X}: {value:#06X}")?;
        }

        writeln!(f)?;
        writeln!(f, "Stack:")?;
        for (slot, value) in self.state.stack.slots().iter().enumerate() {
            writeln!(f, "{:#06X}: {value:#06X}", stack_slot_address(slot))?;
        }

        writeln!(f)?;
        writeln!(f, "Flags:")?;
        writeln!(
            f,
            "C: {}, Ov: {}, Z: {}, S: {}",
            u8::from(arch.carry()),
            u8::from(arch.overflow()),
            u8::from(arch.zero()),
            u8::from(arch.sign())
        )
    }
}

/// Renders the final report for `state`.
#[must_use]
pub fn render_report(state: &CoreState) -> String {
    StateReport::new(state).to_string()
}
