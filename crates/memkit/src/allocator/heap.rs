//! Heap allocator
//!
//! Pass-through to the platform allocator (`calloc` / `realloc` / `free`).
//! Blocks are zeroed on allocation, individually releasable, and aligned to at
//! least a machine word by the platform's `malloc` guarantees.

use core::ffi::c_void;
use core::ptr::NonNull;

use super::traits::Allocator;
use crate::error::{AllocError, AllocResult};

/// Wrapper for the platform allocator
///
/// Stateless; every instance is interchangeable and blocks allocated through
/// one may be released through another.
///
/// # Examples
/// ```
/// use memkit::allocator::{Allocator, HeapAllocator};
///
/// let heap = HeapAllocator::new();
/// let block = heap.duplicate(b"heap").unwrap();
/// assert_eq!(unsafe { block.as_ref() }, b"heap");
/// unsafe { heap.release(block.cast()) };
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct HeapAllocator;

impl HeapAllocator {
    /// Creates a new HeapAllocator
    #[inline]
    pub const fn new() -> Self {
        HeapAllocator
    }
}

// SAFETY: `calloc` and `realloc` return blocks aligned for any fundamental
// type (at least word alignment) and valid until `free`. Zero-byte requests
// are bumped to one byte so a non-null, releasable pointer always comes back.
unsafe impl Allocator for HeapAllocator {
    fn allocate(&self, size: usize) -> AllocResult<NonNull<[u8]>> {
        // SAFETY: `calloc` has no preconditions; null signals failure.
        let ptr = unsafe { libc::calloc(size.max(1), 1) };
        let ptr = NonNull::new(ptr.cast::<u8>()).ok_or_else(|| AllocError::allocation_failed(size))?;
        Ok(NonNull::slice_from_raw_parts(ptr, size))
    }

    unsafe fn reallocate(
        &self,
        block: NonNull<u8>,
        old_size: usize,
        new_size: usize,
    ) -> AllocResult<NonNull<[u8]>> {
        if new_size <= old_size {
            return Ok(NonNull::slice_from_raw_parts(block, new_size));
        }

        // SAFETY: `block` came from this allocator (caller contract). On
        // failure `realloc` leaves it untouched and returns null.
        let ptr = unsafe { libc::realloc(block.as_ptr().cast::<c_void>(), new_size) };
        let ptr =
            NonNull::new(ptr.cast::<u8>()).ok_or_else(|| AllocError::allocation_failed(new_size))?;
        Ok(NonNull::slice_from_raw_parts(ptr, new_size))
    }

    unsafe fn release(&self, block: NonNull<u8>) {
        // SAFETY: `block` came from `calloc`/`realloc` and is released once
        // (caller contract).
        unsafe { libc::free(block.as_ptr().cast::<c_void>()) };
    }

    fn name(&self) -> &'static str {
        "heap"
    }
}
