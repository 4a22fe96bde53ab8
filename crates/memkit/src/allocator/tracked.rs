//! Tracked allocator implementation
//!
//! Provides an allocator that counts operations by wrapping another allocator
//! implementation.
//!
//! # Safety
//!
//! This module wraps an underlying allocator and records every operation:
//! - All unsafe operations are forwarded to the inner allocator unchanged
//! - Counters are plain `Cell`s, matching the single-threaded strategies
//! - No memory safety invariants are added beyond those of the inner allocator
//!
//! ## Invariants
//!
//! - Every successful allocate, reallocate and duplicate is counted once
//! - Failures only bump the failure counter
//! - Releases are counted even for strategies that ignore them

use core::cell::Cell;
use core::fmt;
use core::ptr::NonNull;

use super::traits::Allocator;
use crate::core::traits::MemoryUsage;
use crate::error::AllocResult;

/// Snapshot of a [`TrackedAllocator`]'s counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllocatorStats {
    /// Successful allocations, including duplications
    pub allocation_count: usize,
    /// Successful reallocations
    pub reallocation_count: usize,
    /// Releases requested
    pub release_count: usize,
    /// Failed allocate, reallocate or duplicate calls
    pub failure_count: usize,
    /// Bytes requested across successful allocations and growths
    pub bytes_requested: usize,
}

impl fmt::Display for AllocatorStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "allocs: {}, reallocs: {}, releases: {}, failures: {}, bytes: {}",
            self.allocation_count,
            self.reallocation_count,
            self.release_count,
            self.failure_count,
            self.bytes_requested
        )
    }
}

/// A wrapper allocator that counts operations on the inner allocator
///
/// Useful for asserting how a collection drives its allocator.
///
/// # Examples
/// ```
/// use memkit::allocator::{Allocator, Arena, TrackedAllocator};
///
/// let tracked = TrackedAllocator::new(Arena::new());
/// tracked.allocate(32).unwrap();
/// assert_eq!(tracked.stats().allocation_count, 1);
/// ```
pub struct TrackedAllocator<A> {
    inner: A,
    stats: Cell<AllocatorStats>,
}

impl<A> TrackedAllocator<A> {
    /// Creates a new TrackedAllocator wrapping the provided allocator
    pub fn new(allocator: A) -> Self {
        Self {
            inner: allocator,
            stats: Cell::new(AllocatorStats::default()),
        }
    }

    /// Gets a reference to the underlying allocator
    pub fn inner(&self) -> &A {
        &self.inner
    }

    /// Gets a mutable reference to the underlying allocator
    pub fn inner_mut(&mut self) -> &mut A {
        &mut self.inner
    }

    /// Consumes the tracker and returns the underlying allocator
    pub fn into_inner(self) -> A {
        self.inner
    }

    /// Current counters
    pub fn stats(&self) -> AllocatorStats {
        self.stats.get()
    }

    /// Reset counters to zero
    pub fn reset_stats(&self) {
        self.stats.set(AllocatorStats::default());
    }

    /// Allocations (including duplications) never matched by a release
    pub fn outstanding(&self) -> usize {
        let stats = self.stats.get();
        stats.allocation_count.saturating_sub(stats.release_count)
    }

    fn record(&self, update: impl FnOnce(&mut AllocatorStats)) {
        let mut stats = self.stats.get();
        update(&mut stats);
        self.stats.set(stats);
    }

    fn record_result<T>(&self, result: &AllocResult<T>, bytes: usize, realloc: bool) {
        self.record(|stats| match result {
            Ok(_) if realloc => {
                stats.reallocation_count += 1;
                stats.bytes_requested += bytes;
            }
            Ok(_) => {
                stats.allocation_count += 1;
                stats.bytes_requested += bytes;
            }
            Err(_) => stats.failure_count += 1,
        });
    }
}

impl<A: fmt::Debug> fmt::Debug for TrackedAllocator<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackedAllocator")
            .field("inner", &self.inner)
            .field("stats", &self.stats.get())
            .finish()
    }
}

// SAFETY: TrackedAllocator forwards every call to the inner allocator and
// only updates counters around it.
unsafe impl<A: Allocator> Allocator for TrackedAllocator<A> {
    fn allocate(&self, size: usize) -> AllocResult<NonNull<[u8]>> {
        let result = self.inner.allocate(size);
        self.record_result(&result, size, false);
        result
    }

    unsafe fn reallocate(
        &self,
        block: NonNull<u8>,
        old_size: usize,
        new_size: usize,
    ) -> AllocResult<NonNull<[u8]>> {
        // SAFETY: Forwarding the caller's contract to the same allocator that
        // produced `block`.
        let result = unsafe { self.inner.reallocate(block, old_size, new_size) };
        self.record_result(&result, new_size.saturating_sub(old_size), true);
        result
    }

    fn duplicate(&self, data: &[u8]) -> AllocResult<NonNull<[u8]>> {
        let result = self.inner.duplicate(data);
        self.record_result(&result, data.len(), false);
        result
    }

    unsafe fn release(&self, block: NonNull<u8>) {
        // SAFETY: Forwarding the caller's contract to the inner allocator.
        unsafe { self.inner.release(block) };
        self.record(|stats| stats.release_count += 1);
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}

impl<A: MemoryUsage> MemoryUsage for TrackedAllocator<A> {
    fn used_memory(&self) -> usize {
        self.inner.used_memory()
    }

    fn available_memory(&self) -> Option<usize> {
        self.inner.available_memory()
    }

    fn total_memory(&self) -> Option<usize> {
        self.inner.total_memory()
    }
}
