//! Owned, zero-initialised word buffer
//!
//! A region is the unit of storage for the chained [`Arena`](super::Arena) and
//! the single buffer behind a [`FixedArena`](super::FixedArena).

use core::ptr::NonNull;
use std::alloc::{self, Layout};

use super::bump::WordBump;
use crate::error::{AllocError, AllocResult};
use crate::utils::WORD_SIZE;

/// Zeroed heap buffer of `capacity` words with a bump cursor
pub(crate) struct Region {
    bump: WordBump,
    layout: Layout,
}

impl Region {
    /// Allocates a zeroed region of `capacity` words
    ///
    /// A zero-capacity request still gets one word so every region owns a
    /// real allocation.
    pub(crate) fn new(capacity: usize) -> AllocResult<Self> {
        let capacity = capacity.max(1);
        let layout = Layout::array::<usize>(capacity)
            .map_err(|_| AllocError::size_overflow("region layout"))?;

        // SAFETY: `layout` has non-zero size.
        let ptr = unsafe { alloc::alloc_zeroed(layout) };
        let data = NonNull::new(ptr.cast::<usize>())
            .ok_or_else(|| AllocError::allocation_failed(capacity.saturating_mul(WORD_SIZE)))?;

        Ok(Self {
            // SAFETY: `data` is a live allocation of `capacity` words, freed
            // only in `Drop`.
            bump: unsafe { WordBump::new(data, capacity) },
            layout,
        })
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.bump.capacity()
    }

    #[inline]
    pub(crate) fn used(&self) -> usize {
        self.bump.used()
    }

    #[inline]
    pub(crate) fn remaining(&self) -> usize {
        self.bump.remaining()
    }

    #[inline]
    pub(crate) fn has_room(&self, words: usize) -> bool {
        self.bump.has_room(words)
    }

    #[inline]
    pub(crate) fn bump(&self, words: usize) -> Option<NonNull<u8>> {
        self.bump.bump(words)
    }

    /// Zeroes the buffer and makes all of it available again
    pub(crate) fn wipe(&mut self) {
        self.bump.wipe();
    }

    pub(crate) fn contains(&self, ptr: NonNull<u8>) -> bool {
        self.bump.contains(ptr)
    }
}

impl Drop for Region {
    fn drop(&mut self) {
        let base = self.bump.base();
        // SAFETY: `base` and `layout` are exactly what `alloc_zeroed` was
        // called with in `new`.
        unsafe { alloc::dealloc(base.as_ptr().cast(), self.layout) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_region_is_zeroed() {
        let region = Region::new(16).unwrap();
        let block = region.bump(16).unwrap();
        // SAFETY: The block spans 16 live words of this region.
        let words = unsafe { core::slice::from_raw_parts(block.cast::<usize>().as_ptr(), 16) };
        assert!(words.iter().all(|&w| w == 0));
    }

    #[test]
    fn zero_capacity_rounds_to_one_word() {
        let region = Region::new(0).unwrap();
        assert_eq!(region.capacity(), 1);
    }

    #[test]
    fn oversized_layout_is_overflow() {
        let err = Region::new(usize::MAX).err().unwrap();
        assert_eq!(err.code(), "MEM:ALLOC:OVERFLOW");
    }

    #[test]
    fn wipe_restores_capacity() {
        let mut region = Region::new(8).unwrap();
        region.bump(8).unwrap();
        assert!(!region.has_room(1));
        region.wipe();
        assert_eq!(region.used(), 0);
        assert_eq!(region.remaining(), 8);
    }
}
