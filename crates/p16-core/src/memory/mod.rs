//! Memory model: word-addressed program/data memories and the stack window.

/// Fixed address constants and stack-window helpers.
pub mod map;
/// Bounded LIFO stack window.
pub mod stack;

pub use map::{
    sp_in_window, stack_slot_address, top_slot, END_OF_PROGRAM, INSTRUCTION_BYTES, MEMORY_WORDS,
    STACK_BASE, STACK_CAPACITY, STACK_FLOOR,
};
pub use stack::{Stack, StackEffect};

/// Allocates a zeroed 64 Ki-word backing store.
#[must_use]
pub fn new_word_space() -> Box<[u16]> {
    vec![0; MEMORY_WORDS].into_boxed_slice()
}

/// A full 16-bit address space of 16-bit word slots.
///
/// Every `u16` address is valid, so reads and writes cannot fail.
#[derive(Clone, PartialEq, Eq)]
pub struct WordMemory {
    words: Box<[u16]>,
}

impl Default for WordMemory {
    fn default() -> Self {
        Self {
            words: new_word_space(),
        }
    }
}

impl std::fmt::Debug for WordMemory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WordMemory")
            .field("nonzero_words", &self.iter_nonzero().count())
            .finish()
    }
}

impl WordMemory {
    /// Reads the word at `addr`.
    #[must_use]
    pub fn read(&self, addr: u16) -> u16 {
        self.words[usize::from(addr)]
    }

    /// Writes `value` at `addr`.
    pub fn write(&mut self, addr: u16, value: u16) {
        self.words[usize::from(addr)] = value;
    }

    /// Iterates `(address, value)` pairs whose value is nonzero, in address order.
    pub fn iter_nonzero(&self) -> impl Iterator<Item = (u16, u16)> + '_ {
        (0..=u16::MAX)
            .zip(self.words.iter().copied())
            .filter(|(_, value)| *value != 0)
    }

    /// Zeroes every slot.
    pub fn clear(&mut self) {
        self.words.fill(0);
    }
}

#[cfg(test)]
mod tests {
    use super::{new_word_space, WordMemory, MEMORY_WORDS};

    #[test]
    fn canonical_backing_store_size_is_64k_words() {
        let memory = new_word_space();
        assert_eq!(memory.len(), MEMORY_WORDS);
        assert!(memory.iter().all(|word| *word == 0));
    }

    #[test]
    fn every_address_is_writable_including_the_last() {
        let mut memory = WordMemory::default();
        memory.write(0x0000, 0x1111);
        memory.write(0x0001, 0x2222);
        memory.write(u16::MAX, 0xFFFF);

        assert_eq!(memory.read(0x0000), 0x1111);
        assert_eq!(memory.read(0x0001), 0x2222);
        assert_eq!(memory.read(u16::MAX), 0xFFFF);
    }

    #[test]
    fn nonzero_iteration_is_address_ordered() {
        let mut memory = WordMemory::default();
        memory.write(0x9000, 7);
        memory.write(0x0010, 3);
        memory.write(0x0020, 0);

        let cells: Vec<_> = memory.iter_nonzero().collect();
        assert_eq!(cells, vec![(0x0010, 3), (0x9000, 7)]);

        memory.clear();
        assert_eq!(memory.iter_nonzero().count(), 0);
    }
}
