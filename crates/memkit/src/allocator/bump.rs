//! Word-granular bump pointer shared by the region, fixed and scratch
//! strategies.
//!
//! A `WordBump` does not own its storage. Owners decide where the words come
//! from (a zeroed heap allocation or a caller's buffer) and how long they live.

use core::cell::Cell;
use core::ptr::{self, NonNull};

/// Bump cursor over `capacity` contiguous words starting at `data`
pub(crate) struct WordBump {
    data: NonNull<usize>,
    capacity: usize,
    used: Cell<usize>,
}

impl WordBump {
    /// # Safety
    /// `data` must be valid for reads and writes of `capacity` words for as
    /// long as the returned cursor (and any block it hands out) is used.
    pub(crate) const unsafe fn new(data: NonNull<usize>, capacity: usize) -> Self {
        Self {
            data,
            capacity,
            used: Cell::new(0),
        }
    }

    #[inline]
    pub(crate) fn base(&self) -> NonNull<usize> {
        self.data
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub(crate) fn used(&self) -> usize {
        self.used.get()
    }

    #[inline]
    pub(crate) fn remaining(&self) -> usize {
        self.capacity - self.used.get()
    }

    #[inline]
    pub(crate) fn has_room(&self, words: usize) -> bool {
        words <= self.remaining()
    }

    /// Hands out the next `words` words, or `None` when they do not fit
    #[inline]
    pub(crate) fn bump(&self, words: usize) -> Option<NonNull<u8>> {
        let start = self.used.get();
        let end = start.checked_add(words)?;
        if end > self.capacity {
            return None;
        }
        self.used.set(end);

        // SAFETY: `start <= capacity`, so the offset stays within (or one past)
        // the buffer described by `data`.
        let ptr = unsafe { self.data.add(start) };
        Some(ptr.cast())
    }

    /// Forgets every block handed out so far
    #[inline]
    pub(crate) fn rewind(&self) {
        self.used.set(0);
    }

    /// Zeroes the whole buffer and rewinds the cursor
    ///
    /// Takes `&mut self` so no outstanding borrow of the owner can observe the
    /// wipe.
    pub(crate) fn wipe(&mut self) {
        // SAFETY: `data` is valid for `capacity` words (constructor contract).
        unsafe { ptr::write_bytes(self.data.as_ptr(), 0, self.capacity) };
        self.rewind();
    }

    /// Whether `ptr` points into this buffer
    pub(crate) fn contains(&self, ptr: NonNull<u8>) -> bool {
        let start = self.data.as_ptr() as usize;
        let end = start + self.capacity * size_of::<usize>();
        let addr = ptr.as_ptr() as usize;
        addr >= start && addr < end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor(words: &mut [usize]) -> WordBump {
        let len = words.len();
        // SAFETY: `words` outlives the cursor in every test below.
        unsafe { WordBump::new(NonNull::from(words).cast(), len) }
    }

    #[test]
    fn bump_advances_by_words() {
        let mut storage = [0usize; 8];
        let bump = cursor(&mut storage);
        let a = bump.bump(2).unwrap();
        let b = bump.bump(3).unwrap();
        assert_eq!(bump.used(), 5);
        assert_eq!(
            b.as_ptr() as usize - a.as_ptr() as usize,
            2 * size_of::<usize>()
        );
    }

    #[test]
    fn bump_refuses_overflow() {
        let mut storage = [0usize; 4];
        let bump = cursor(&mut storage);
        assert!(bump.bump(4).is_some());
        assert!(bump.bump(1).is_none());
        assert!(bump.bump(usize::MAX).is_none());
        assert_eq!(bump.remaining(), 0);
    }

    #[test]
    fn wipe_zeroes_and_rewinds() {
        let mut storage = [7usize; 4];
        let mut bump = cursor(&mut storage);
        bump.bump(3).unwrap();
        bump.wipe();
        assert_eq!(bump.used(), 0);
        drop(bump);
        assert_eq!(storage, [0; 4]);
    }

    #[test]
    fn contains_checks_bounds() {
        let mut storage = [0usize; 4];
        let bump = cursor(&mut storage);
        let block = bump.bump(1).unwrap();
        assert!(bump.contains(block));
        let outside = 0u64;
        assert!(!bump.contains(NonNull::from(&outside).cast()));
    }
}
