//! Growable, region-chained arena allocator
//!
//! # Safety
//!
//! This module implements a single-threaded arena over a chain of regions:
//! - RefCell for the region chain (appended to, never reordered)
//! - Cell for the tail index and the used-word counter
//! - Regions are zeroed heap buffers freed in Drop
//!
//! ## Invariants
//!
//! - Chain order equals creation order; the tail index only moves forward
//! - Every region except possibly the tail is never bumped again once the tail
//!   moves past it
//! - Blocks never overlap and stay valid until `destroy` or drop
//! - `used_words` is the sum of word counts of every block handed out
//!
//! ## Memory Management
//!
//! - `release` is a no-op; memory comes back only when the arena is destroyed
//! - Oversized requests get a region sized to fit exactly
//!
//! ## Not Thread-Safe
//!
//! - Uses Cell/RefCell instead of atomics
//! - `Arena` is `!Sync`; share it by reference within one thread

use core::cell::{Cell, RefCell};
use core::fmt;
use core::ptr::NonNull;

#[cfg(feature = "logging")]
use tracing::debug;

use super::region::Region;
use super::traits::{Allocator, relocate};
use crate::core::config::{ArenaConfig, MemoryConfig};
use crate::core::traits::MemoryUsage;
use crate::error::{AllocError, AllocResult};
use crate::utils::{WORD_SIZE, words_for};

/// Growable arena built from a chain of zeroed regions
///
/// Allocation is a bump within the current tail region. When the tail lacks
/// room the arena walks forward to an existing successor that fits, and only
/// appends a new region when none does.
///
/// # Examples
/// ```
/// use memkit::allocator::{Allocator, Arena};
///
/// let arena = Arena::new();
/// let block = arena.allocate(100).unwrap();
/// assert_eq!(block.len(), 100);
/// assert_eq!(arena.region_count(), 1);
/// ```
pub struct Arena {
    regions: RefCell<Vec<Region>>,
    tail: Cell<usize>,
    used_words: Cell<usize>,
    config: ArenaConfig,
}

impl Arena {
    /// Creates an empty arena with default region size
    ///
    /// No memory is reserved until the first allocation.
    pub const fn new() -> Self {
        Self::with_config_unchecked(ArenaConfig::new())
    }

    /// Creates an empty arena with the given configuration
    pub fn with_config(config: ArenaConfig) -> AllocResult<Self> {
        config.validate()?;
        Ok(Self::with_config_unchecked(config))
    }

    /// Creates an empty arena from the arena section of `config`
    ///
    /// The whole bundle is validated, so a bad vector section is rejected too.
    pub fn from_memory_config(config: &MemoryConfig) -> AllocResult<Self> {
        config.validate()?;
        Ok(Self::with_config_unchecked(config.arena))
    }

    const fn with_config_unchecked(config: ArenaConfig) -> Self {
        Self {
            regions: RefCell::new(Vec::new()),
            tail: Cell::new(0),
            used_words: Cell::new(0),
            config,
        }
    }

    /// Arena configuration
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Number of regions in the chain
    pub fn region_count(&self) -> usize {
        self.regions.borrow().len()
    }

    /// Total words handed out across all regions
    pub fn used_words(&self) -> usize {
        self.used_words.get()
    }

    /// Total words reserved across all regions
    pub fn capacity_words(&self) -> usize {
        self.regions.borrow().iter().map(Region::capacity).sum()
    }

    /// Whether `ptr` points into one of this arena's regions
    pub fn owns(&self, ptr: NonNull<u8>) -> bool {
        self.regions.borrow().iter().any(|region| region.contains(ptr))
    }

    /// Releases every region at once
    ///
    /// All blocks previously handed out become invalid; the borrow checker
    /// enforces that none are still reachable through `&self` borrows. The
    /// arena stays usable and starts a fresh chain on the next allocation.
    pub fn destroy(&mut self) {
        let regions = self.regions.get_mut();

        #[cfg(feature = "logging")]
        debug!(
            regions = regions.len(),
            used_words = self.used_words.get(),
            "destroying arena"
        );

        regions.clear();
        self.tail.set(0);
        self.used_words.set(0);
    }

    fn new_region(&self, words: usize) -> AllocResult<Region> {
        let capacity = words.max(self.config.region_words);

        #[cfg(feature = "logging")]
        debug!(capacity, requested = words, "appending arena region");

        Region::new(capacity)
    }

    fn allocate_words(&self, words: usize) -> AllocResult<NonNull<u8>> {
        let mut regions = self.regions.borrow_mut();
        regions
            .try_reserve(1)
            .map_err(|_| AllocError::allocation_failed(size_of::<Region>()))?;

        if regions.is_empty() {
            regions.push(self.new_region(words)?);
            self.tail.set(0);
        }

        let mut tail = self.tail.get();
        while !regions[tail].has_room(words) && tail + 1 < regions.len() {
            tail += 1;
        }

        if !regions[tail].has_room(words) {
            regions.push(self.new_region(words)?);
            tail = regions.len() - 1;
        }
        self.tail.set(tail);

        let block = regions[tail]
            .bump(words)
            .ok_or_else(|| AllocError::invalid_state("arena tail region lost its room"))?;
        self.used_words.set(self.used_words.get() + words);
        Ok(block)
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Arena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("regions", &self.region_count())
            .field("tail", &self.tail.get())
            .field("used_words", &self.used_words.get())
            .field("region_words", &self.config.region_words)
            .finish()
    }
}

// SAFETY: Blocks are carved from live, zeroed regions that are only freed by
// `destroy(&mut self)` or drop. The bump cursor never hands out a word twice,
// and every block starts on a word boundary.
unsafe impl Allocator for Arena {
    fn allocate(&self, size: usize) -> AllocResult<NonNull<[u8]>> {
        let words = words_for(size).ok_or_else(|| AllocError::size_overflow("arena allocate"))?;
        let block = self.allocate_words(words)?;
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
        "arena"
    }
}

impl MemoryUsage for Arena {
    fn used_memory(&self) -> usize {
        self.used_words.get() * WORD_SIZE
    }

    /// Unbounded: the arena appends regions as needed.
    fn available_memory(&self) -> Option<usize> {
        None
    }

    fn total_memory(&self) -> Option<usize> {
        Some(self.capacity_words() * WORD_SIZE)
    }
}
