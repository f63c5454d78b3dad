#![cfg_attr(not(test), no_std)]

pub mod stats;

/// Fixed-capacity circular buffer with an explicit cursor and fill count.
///
/// Wraparound and the not-yet-full state are tracked here instead of being
/// spread over modulo arithmetic at every use site. Slots are addressed by
/// their absolute position, which callers need when comparing a sample
/// against its circular neighbors.
pub struct RingBuffer<const N: usize, T> {
    slots: [T; N],
    cursor: usize,
    filled: usize,
}

impl<const N: usize, T: Default> Default for RingBuffer<N, T> {
    fn default() -> Self {
        Self {
            slots: core::array::from_fn(|_| Default::default()),
            cursor: 0,
            filled: 0,
        }
    }
}

impl<const N: usize, T> RingBuffer<N, T> {
    /// Write `v` at the cursor, advance, and hand back the evicted value.
    pub fn push(&mut self, mut v: T) -> T {
        core::mem::swap(&mut self.slots[self.cursor], &mut v);
        self.cursor = (self.cursor + 1) % N;
        self.filled = (self.filled + 1).min(N);
        v
    }

    /// Slot index the next push will write to.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn get(&self, slot: usize) -> &T {
        &self.slots[slot % N]
    }

    /// All slots in slot order, including not-yet-written defaults.
    pub fn inner(&self) -> &[T; N] {
        &self.slots
    }

    /// Entries written so far, capped at the capacity.
    pub fn len(&self) -> usize {
        self.filled
    }

    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    pub fn is_full(&self) -> bool {
        self.filled == N
    }

    /// The entries actually written, in slot order (not age order).
    pub fn valid(&self) -> &[T] {
        &self.slots[..self.filled]
    }
}
