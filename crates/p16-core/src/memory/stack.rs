use crate::memory::map::{sp_in_window, top_slot, STACK_BASE, STACK_CAPACITY, STACK_FLOOR};
use crate::FaultCode;

/// A validated stack mutation, computed before anything is committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackEffect {
    /// Store `value` in `slot` and move `SP` down to `new_sp`.
    Push {
        /// Slot receiving the value.
        slot: usize,
        /// Pushed value.
        value: u16,
        /// Stack pointer after the push.
        new_sp: u16,
    },
    /// Move `SP` up to `new_sp`; the slot contents stay in place.
    Pop {
        /// Stack pointer after the pop.
        new_sp: u16,
    },
}

/// Fixed-capacity LIFO window addressed through the stack pointer.
///
/// The stack does not own `SP`; callers pass the current value in and get the
/// next one back, so a rejected push or pop never changes anything.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Stack {
    slots: [u16; STACK_CAPACITY],
}

impl Stack {
    /// Returns every slot, slot 0 being the first one filled.
    #[must_use]
    pub const fn slots(&self) -> &[u16; STACK_CAPACITY] {
        &self.slots
    }

    /// Validates a push of `value` with the current `sp`.
    ///
    /// # Errors
    ///
    /// Returns [`FaultCode::StackOverflow`] when the stack is full or `sp`
    /// is outside the window.
    pub const fn plan_push(sp: u16, value: u16) -> Result<StackEffect, FaultCode> {
        if !sp_in_window(sp) || sp == STACK_FLOOR {
            return Err(FaultCode::StackOverflow { sp });
        }
        let new_sp = sp - 2;
        match top_slot(new_sp) {
            Some(slot) => Ok(StackEffect::Push {
                slot,
                value,
                new_sp,
            }),
            None => Err(FaultCode::StackOverflow { sp }),
        }
    }

    /// Validates a pop with the current `sp` and reads the value it yields.
    ///
    /// # Errors
    ///
    /// Returns [`FaultCode::StackUnderflow`] when the stack is empty or `sp`
    /// is outside the window.
    pub const fn plan_pop(&self, sp: u16) -> Result<(u16, StackEffect), FaultCode> {
        if sp == STACK_BASE {
            return Err(FaultCode::StackUnderflow { sp });
        }
        match top_slot(sp) {
            Some(slot) => Ok((self.slots[slot], StackEffect::Pop { new_sp: sp + 2 })),
            None => Err(FaultCode::StackUnderflow { sp }),
        }
    }

    /// Applies a validated effect and returns the new stack pointer.
    pub const fn apply(&mut self, effect: StackEffect) -> u16 {
        match effect {
            StackEffect::Push {
                slot,
                value,
                new_sp,
            } => {
                self.slots[slot] = value;
                new_sp
            }
            StackEffect::Pop { new_sp } => new_sp,
        }
    }

    /// Pushes `value` and returns the new stack pointer.
    ///
    /// # Errors
    ///
    /// Returns [`FaultCode::StackOverflow`] when the stack is full.
    pub fn push(&mut self, sp: u16, value: u16) -> Result<u16, FaultCode> {
        let effect = Self::plan_push(sp, value)?;
        Ok(self.apply(effect))
    }

    /// Pops the top value and returns it with the new stack pointer.
    ///
    /// # Errors
    ///
    /// Returns [`FaultCode::StackUnderflow`] when the stack is empty.
    pub fn pop(&mut self, sp: u16) -> Result<(u16, u16), FaultCode> {
        let (value, effect) = self.plan_pop(sp)?;
        Ok((value, self.apply(effect)))
    }

    /// Zeroes every slot.
    pub fn clear(&mut self) {
        self.slots = [0; STACK_CAPACITY];
    }
}
