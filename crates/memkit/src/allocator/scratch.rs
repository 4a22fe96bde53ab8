//! Scratch allocator over a caller-provided buffer
//!
//! Same behavior as [`FixedArena`](super::FixedArena), but the words belong to
//! the caller. The buffer is zeroed on construction and on reset, and it is
//! never freed by the allocator.

use core::fmt;
use core::marker::PhantomData;
use core::ptr::NonNull;

#[cfg(feature = "logging")]
use tracing::trace;

use super::bump::WordBump;
use super::traits::{Allocator, relocate};
use crate::core::traits::{MemoryUsage, Resettable};
use crate::error::{AllocError, AllocResult};
use crate::utils::{WORD_SIZE, words_for};

/// Bump allocator borrowing the caller's buffer for `'buf`
///
/// The exclusive borrow keeps the buffer out of reach for as long as the
/// allocator (and anything allocated from it) is alive.
///
/// # Examples
/// ```
/// use memkit::allocator::{Allocator, ScratchAllocator};
///
/// let mut buffer = [0usize; 16];
/// let scratch = ScratchAllocator::new(&mut buffer);
/// let block = scratch.allocate(24).unwrap();
/// assert_eq!(block.len(), 24);
/// assert_eq!(scratch.capacity_words(), 16);
/// ```
pub struct ScratchAllocator<'buf> {
    bump: WordBump,
    _buffer: PhantomData<&'buf mut [usize]>,
}

impl<'buf> ScratchAllocator<'buf> {
    /// Takes over `buffer`, zeroing it
    pub fn new(buffer: &'buf mut [usize]) -> Self {
        buffer.fill(0);
        let capacity = buffer.len();
        let data = NonNull::from(buffer).cast::<usize>();

        #[cfg(feature = "logging")]
        trace!(capacity, "scratch allocator over caller buffer");

        Self {
            // SAFETY: `data` covers `capacity` words borrowed exclusively for
            // `'buf`, which outlives `self`.
            bump: unsafe { WordBump::new(data, capacity) },
            _buffer: PhantomData,
        }
    }

    /// Takes over a byte buffer, using its word-aligned interior
    ///
    /// Up to one word of unaligned bytes at either end is left unused, so the
    /// capacity is `bytes.len() / WORD_SIZE` words or one less.
    pub fn from_bytes(bytes: &'buf mut [u8]) -> Self {
        // SAFETY: Every bit pattern is a valid `usize`, and the middle slice
        // is properly aligned by construction.
        let (_, words, _) = unsafe { bytes.align_to_mut::<usize>() };
        Self::new(words)
    }

    /// Capacity in words
    pub fn capacity_words(&self) -> usize {
        self.bump.capacity()
    }

    /// Words handed out since creation or the last reset
    pub fn used_words(&self) -> usize {
        self.bump.used()
    }

    /// Words still available
    pub fn remaining_words(&self) -> usize {
        self.bump.remaining()
    }
}

impl Resettable for ScratchAllocator<'_> {
    /// Zeroes the caller's buffer and makes all of it available again
    fn reset(&mut self) {
        self.bump.wipe();
    }
}

impl fmt::Debug for ScratchAllocator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScratchAllocator")
            .field("capacity_words", &self.capacity_words())
            .field("used_words", &self.used_words())
            .finish()
    }
}

// SAFETY: Blocks come from the borrowed buffer, which stays valid for `'buf`.
// The bump cursor never hands out a word twice and the buffer is word
// aligned.
unsafe impl Allocator for ScratchAllocator<'_> {
    fn allocate(&self, size: usize) -> AllocResult<NonNull<[u8]>> {
        let words = words_for(size).ok_or_else(|| AllocError::size_overflow("scratch allocate"))?;
        let block = self
            .bump
            .bump(words)
            .ok_or_else(|| AllocError::arena_exhausted("scratch", words, self.bump.remaining()))?;
        Ok(NonNull::slice_from_raw_parts(block, size))
    }

    unsafe fn reallocate(
        &self,
        block: NonNull<u8>,
        old_size: usize,
        new_size: usize,
    ) -> AllocResult<NonNull<[u8]>> {
        // SAFETY: Caller contract forwarded unchanged.
        unsafe { relocate(self, block, old_size, new_size) }
    }

    unsafe fn release(&self, _block: NonNull<u8>) {}

    fn name(&self) -> &'static str {
        "scratch"
    }
}

impl MemoryUsage for ScratchAllocator<'_> {
    fn used_memory(&self) -> usize {
        self.bump.used() * WORD_SIZE
    }

    fn available_memory(&self) -> Option<usize> {
        Some(self.bump.remaining() * WORD_SIZE)
    }
}
