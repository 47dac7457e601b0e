use crate::memory::STACK_BASE;

/// Number of architecturally visible general-purpose registers (`R0..R7`).
pub const GENERAL_REGISTER_COUNT: usize = 8;
/// `FLAGS` bit for zero result.
pub const FLAGS_Z: u16 = 1 << 0;
/// `FLAGS` bit for sign (bit 15 of the result).
pub const FLAGS_S: u16 = 1 << 1;
/// `FLAGS` bit for carry/borrow.
pub const FLAGS_C: u16 = 1 << 2;
/// `FLAGS` bit for signed overflow.
pub const FLAGS_OV: u16 = 1 << 3;
/// Mask of architecturally active `FLAGS` bits (`Z/S/C/Ov`).
pub const FLAGS_ACTIVE_MASK: u16 = FLAGS_Z | FLAGS_S | FLAGS_C | FLAGS_OV;

/// Architecturally visible general-purpose register identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum GeneralRegister {
    R0 = 0,
    R1 = 1,
    R2 = 2,
    R3 = 3,
    R4 = 4,
    R5 = 5,
    R6 = 6,
    R7 = 7,
}

impl GeneralRegister {
    /// Ordered list of all architectural general-purpose registers.
    pub const ALL: [Self; GENERAL_REGISTER_COUNT] = [
        Self::R0,
        Self::R1,
        Self::R2,
        Self::R3,
        Self::R4,
        Self::R5,
        Self::R6,
        Self::R7,
    ];

    /// Returns the array index for this register (`0..=7`).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the 3-bit field encoding for this register.
    #[must_use]
    pub const fn bits(self) -> u16 {
        self as u16
    }

    /// Decodes the low three bits of `bits`; higher bits are ignored.
    #[must_use]
    pub const fn from_field(bits: u16) -> Self {
        match bits & 0x7 {
            0 => Self::R0,
            1 => Self::R1,
            2 => Self::R2,
            3 => Self::R3,
            4 => Self::R4,
            5 => Self::R5,
            6 => Self::R6,
            _ => Self::R7,
        }
    }
}

/// Full architectural register state for the P16 core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchitecturalState {
    gpr: [u16; GENERAL_REGISTER_COUNT],
    pc: u16,
    lr: u16,
    sp: u16,
    flags: u16,
}

impl Default for ArchitecturalState {
    fn default() -> Self {
        Self {
            gpr: [0; GENERAL_REGISTER_COUNT],
            pc: 0,
            lr: 0,
            sp: STACK_BASE,
            flags: 0,
        }
    }
}

impl ArchitecturalState {
    /// Reads a general-purpose register.
    #[must_use]
    pub const fn gpr(&self, reg: GeneralRegister) -> u16 {
        self.gpr[reg.index()]
    }

    /// Writes a general-purpose register.
    pub const fn set_gpr(&mut self, reg: GeneralRegister, value: u16) {
        self.gpr[reg.index()] = value;
    }

    /// Returns all general-purpose registers in index order.
    #[must_use]
    pub const fn gprs(&self) -> &[u16; GENERAL_REGISTER_COUNT] {
        &self.gpr
    }

    /// Reads the `PC` register.
    #[must_use]
    pub const fn pc(&self) -> u16 {
        self.pc
    }

    /// Writes the `PC` register.
    pub const fn set_pc(&mut self, value: u16) {
        self.pc = value;
    }

    /// Reads the link register. No instruction writes it.
    #[must_use]
    pub const fn lr(&self) -> u16 {
        self.lr
    }

    /// Writes the link register.
    pub const fn set_lr(&mut self, value: u16) {
        self.lr = value;
    }

    /// Reads the `SP` register.
    #[must_use]
    pub const fn sp(&self) -> u16 {
        self.sp
    }

    /// Writes the `SP` register.
    pub const fn set_sp(&mut self, value: u16) {
        self.sp = value;
    }

    /// Reads the packed `FLAGS` value.
    #[must_use]
    pub const fn flags(&self) -> u16 {
        self.flags
    }

    /// Writes the packed `FLAGS` value; inactive bits are dropped.
    pub const fn set_flags(&mut self, value: u16) {
        self.flags = value & FLAGS_ACTIVE_MASK;
    }

    /// Returns `true` when a specific `FLAGS` bit is set.
    #[must_use]
    pub const fn flag_is_set(&self, flag: u16) -> bool {
        (self.flags & flag) != 0
    }

    /// Sets or clears a specific active `FLAGS` bit.
    pub const fn set_flag(&mut self, flag: u16, enabled: bool) {
        if enabled {
            self.flags |= flag & FLAGS_ACTIVE_MASK;
        } else {
            self.flags &= !(flag & FLAGS_ACTIVE_MASK);
        }
    }

    /// Carry flag.
    #[must_use]
    pub const fn carry(&self) -> bool {
        self.flag_is_set(FLAGS_C)
    }

    /// Overflow flag.
    #[must_use]
    pub const fn overflow(&self) -> bool {
        self.flag_is_set(FLAGS_OV)
    }

    /// Zero flag.
    #[must_use]
    pub const fn zero(&self) -> bool {
        self.flag_is_set(FLAGS_Z)
    }

    /// Sign flag.
    #[must_use]
    pub const fn sign(&self) -> bool {
        self.flag_is_set(FLAGS_S)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ArchitecturalState, GeneralRegister, FLAGS_ACTIVE_MASK, FLAGS_C, FLAGS_OV, FLAGS_S,
        FLAGS_Z, GENERAL_REGISTER_COUNT,
    };
    use crate::memory::STACK_BASE;

    #[test]
    fn register_count_and_decode_match_architecture() {
        assert_eq!(GENERAL_REGISTER_COUNT, 8);

        for bits in 0_u16..=7 {
            let reg = GeneralRegister::from_field(bits);
            assert_eq!(reg.bits(), bits);
            assert_eq!(reg.index(), usize::from(bits));
            assert_eq!(GeneralRegister::from_field(bits | 0xFFF8), reg);
        }
    }

    #[test]
    fn general_register_file_tracks_each_register_independently() {
        let mut state = ArchitecturalState::default();

        for (offset, reg) in (0_u16..).zip(GeneralRegister::ALL.iter().copied()) {
            state.set_gpr(reg, 0x1000 + offset);
        }

        for (offset, reg) in (0_u16..).zip(GeneralRegister::ALL.iter().copied()) {
            assert_eq!(state.gpr(reg), 0x1000 + offset);
        }
        assert_eq!(state.gprs()[7], 0x1007);
    }

    #[test]
    fn power_on_state_is_zeroed_with_sp_at_stack_base() {
        let state = ArchitecturalState::default();

        assert!(state.gprs().iter().all(|value| *value == 0));
        assert_eq!(state.pc(), 0);
        assert_eq!(state.lr(), 0);
        assert_eq!(state.sp(), STACK_BASE);
        assert_eq!(state.flags(), 0);
    }

    #[test]
    fn special_registers_are_present_and_readable() {
        let mut state = ArchitecturalState::default();

        state.set_pc(0x0102);
        state.set_lr(0x0BAD);
        state.set_sp(0x81F8);

        assert_eq!(state.pc(), 0x0102);
        assert_eq!(state.lr(), 0x0BAD);
        assert_eq!(state.sp(), 0x81F8);
    }

    #[test]
    fn flags_only_store_active_architectural_bits() {
        let mut state = ArchitecturalState::default();
        state.set_flags(u16::MAX);

        assert_eq!(state.flags(), FLAGS_ACTIVE_MASK);
        assert!(state.carry() && state.overflow() && state.zero() && state.sign());
    }

    #[test]
    fn flags_individual_bits_can_be_set_and_cleared() {
        let mut state = ArchitecturalState::default();

        for flag in [FLAGS_Z, FLAGS_S, FLAGS_C, FLAGS_OV] {
            state.set_flag(flag, true);
            assert!(state.flag_is_set(flag));
        }

        for flag in [FLAGS_Z, FLAGS_S, FLAGS_C, FLAGS_OV] {
            state.set_flag(flag, false);
            assert!(!state.flag_is_set(flag));
        }

        assert_eq!(state.flags(), 0);
    }
}
