//! Fixed-capacity arena
//!
//! One zeroed region, sized at construction, that never grows. Running out of
//! room is a recoverable error; `reset` wipes the region and starts over.

use core::fmt;
use core::ptr::NonNull;

#[cfg(feature = "logging")]
use tracing::debug;

use super::region::Region;
use super::traits::{Allocator, relocate};
use crate::core::traits::{MemoryUsage, Resettable};
use crate::error::{AllocError, AllocResult};
use crate::utils::{WORD_SIZE, words_for};

/// Arena with a fixed word capacity
///
/// # Examples
/// ```
/// use memkit::allocator::{Allocator, FixedArena};
///
/// let arena = FixedArena::new(4).unwrap();
/// assert!(arena.allocate(4 * memkit::utils::WORD_SIZE).is_ok());
/// assert!(arena.allocate(1).is_err());
/// ```
pub struct FixedArena {
    region: Region,
}

impl FixedArena {
    /// Creates an arena holding exactly `capacity_words` words, all zeroed
    pub fn new(capacity_words: usize) -> AllocResult<Self> {
        if capacity_words == 0 {
            return Err(AllocError::invalid_config(
                "fixed arena capacity must be non-zero",
            ));
        }
        Ok(Self {
            region: Region::new(capacity_words)?,
        })
    }

    /// Creates an arena large enough for `bytes` bytes, rounded up to words
    pub fn with_bytes(bytes: usize) -> AllocResult<Self> {
        let words =
            words_for(bytes).ok_or_else(|| AllocError::size_overflow("fixed arena capacity"))?;
        Self::new(words)
    }

    /// Capacity in words
    pub fn capacity_words(&self) -> usize {
        self.region.capacity()
    }

    /// Words handed out since creation or the last reset
    pub fn used_words(&self) -> usize {
        self.region.used()
    }

    /// Words still available
    pub fn remaining_words(&self) -> usize {
        self.region.remaining()
    }

    /// Whether `ptr` points into this arena
    pub fn owns(&self, ptr: NonNull<u8>) -> bool {
        self.region.contains(ptr)
    }
}

impl Resettable for FixedArena {
    /// Zeroes the entire buffer and makes the full capacity available again
    fn reset(&mut self) {
        #[cfg(feature = "logging")]
        debug!(used_words = self.region.used(), "resetting fixed arena");

        self.region.wipe();
    }
}

impl fmt::Debug for FixedArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixedArena")
            .field("capacity_words", &self.capacity_words())
            .field("used_words", &self.used_words())
            .finish()
    }
}

// SAFETY: Blocks are carved from one live region owned by `self` and freed
// only on drop. `reset` needs `&mut self`, so no block borrowed through
// `&self` survives it.
unsafe impl Allocator for FixedArena {
    fn allocate(&self, size: usize) -> AllocResult<NonNull<[u8]>> {
        let words =
            words_for(size).ok_or_else(|| AllocError::size_overflow("fixed arena allocate"))?;
        let block = self.region.bump(words).ok_or_else(|| {
            AllocError::arena_exhausted("fixed", words, self.region.remaining())
        })?;
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
        "fixed"
    }
}

impl MemoryUsage for FixedArena {
    fn used_memory(&self) -> usize {
        self.region.used() * WORD_SIZE
    }

    fn available_memory(&self) -> Option<usize> {
        Some(self.region.remaining() * WORD_SIZE)
    }
}
