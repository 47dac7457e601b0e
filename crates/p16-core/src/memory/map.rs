//! Fixed architectural address constants and stack-window helpers.

/// Number of word slots in program memory and in data memory.
pub const MEMORY_WORDS: usize = u16::MAX as usize + 1;

/// `PC` value at or beyond which the engine stops without fetching.
pub const END_OF_PROGRAM: u16 = 0xFFFF;

/// Width of one instruction in address units; `PC` advances by this much.
pub const INSTRUCTION_BYTES: u16 = 2;

/// Number of word slots in the hardware stack.
pub const STACK_CAPACITY: usize = 8;

/// Stack pointer value for an empty stack (upper bound of the window).
pub const STACK_BASE: u16 = 0x8200;

/// Stack pointer value for a full stack (lower bound of the window).
#[allow(clippy::cast_possible_truncation)]
pub const STACK_FLOOR: u16 = STACK_BASE - (STACK_CAPACITY as u16) * INSTRUCTION_BYTES;

/// Returns `true` when `sp` lies inside the stack window on a slot boundary.
#[must_use]
pub const fn sp_in_window(sp: u16) -> bool {
    sp >= STACK_FLOOR && sp <= STACK_BASE && (STACK_BASE - sp) % 2 == 0
}

/// Returns the 0-based slot that holds the top of stack for `sp`.
///
/// `None` when the stack is empty or `sp` is outside the window.
#[must_use]
pub const fn top_slot(sp: u16) -> Option<usize> {
    if !sp_in_window(sp) || sp == STACK_BASE {
        return None;
    }
    Some(((STACK_BASE - sp) / 2) as usize - 1)
}

/// Returns the stack-window address a slot is reported under.
///
/// Slot `n` is the top of stack when `SP` equals this address.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn stack_slot_address(slot: usize) -> u16 {
    STACK_BASE - ((slot as u16) + 1) * INSTRUCTION_BYTES
}
