//! Allocator traits
//!
//! The system is built around one object-safe trait:
//! - `Allocator`: allocate, reallocate, duplicate and release blocks of bytes
//!
//! plus a typed extension, `TypedAllocator`, implemented for every allocator.
//!
//! # Safety
//!
//! `Allocator` is an unsafe trait. Implementors promise that:
//! - Every returned block is valid for reads and writes of the requested size
//! - Every returned block is aligned to [`WORD_ALIGN`]
//! - Blocks handed out by one call never overlap blocks from another live call
//! - A block stays valid until it is released or the strategy is reset/dropped
//!
//! Failure is never fatal: every operation that can run out of memory returns
//! `Err`, and the caller decides what to do with it.

use core::mem;
use core::ptr::{self, NonNull};

use crate::error::{AllocError, AllocResult};
use crate::utils::WORD_ALIGN;

/// Pluggable allocation strategy
///
/// Consumers such as [`Vector`](crate::collections::Vector) hold a
/// `&dyn Allocator` and never know which strategy backs it.
///
/// # Safety
///
/// See the module documentation for the contract implementors must uphold.
pub unsafe trait Allocator {
    /// Allocates a word-aligned block of at least `size` bytes
    ///
    /// The returned slice has length `size`.
    fn allocate(&self, size: usize) -> AllocResult<NonNull<[u8]>>;

    /// Resizes a block, preserving its first `min(old_size, new_size)` bytes
    ///
    /// On failure the original block is left untouched and still owned by the
    /// caller.
    ///
    /// # Safety
    /// - `block` must have been returned by this allocator and not released
    /// - `old_size` must not exceed the size the block was allocated with
    /// - On success the caller must use the returned block instead of `block`
    unsafe fn reallocate(
        &self,
        block: NonNull<u8>,
        old_size: usize,
        new_size: usize,
    ) -> AllocResult<NonNull<[u8]>>;

    /// Allocates a copy of `data`
    fn duplicate(&self, data: &[u8]) -> AllocResult<NonNull<[u8]>> {
        let block = self.allocate(data.len())?;
        // SAFETY: `block` is a fresh allocation of `data.len()` bytes that
        // cannot overlap the borrowed `data`.
        unsafe {
            ptr::copy_nonoverlapping(data.as_ptr(), block.cast::<u8>().as_ptr(), data.len());
        }
        Ok(block)
    }

    /// Releases a block
    ///
    /// Arena-family strategies ignore this: their memory comes back only in
    /// bulk.
    ///
    /// # Safety
    /// - `block` must have been returned by this allocator and not released
    /// - `block` must not be used afterwards
    unsafe fn release(&self, block: NonNull<u8>);

    /// Short strategy name for diagnostics
    fn name(&self) -> &'static str;
}

// SAFETY: Forwards every call to the underlying `A: Allocator`, so the
// contract of `A` carries over unchanged.
unsafe impl<A: Allocator + ?Sized> Allocator for &A {
    #[inline]
    fn allocate(&self, size: usize) -> AllocResult<NonNull<[u8]>> {
        (**self).allocate(size)
    }

    #[inline]
    unsafe fn reallocate(
        &self,
        block: NonNull<u8>,
        old_size: usize,
        new_size: usize,
    ) -> AllocResult<NonNull<[u8]>> {
        // SAFETY: Caller upholds the contract for the same allocator.
        unsafe { (**self).reallocate(block, old_size, new_size) }
    }

    #[inline]
    fn duplicate(&self, data: &[u8]) -> AllocResult<NonNull<[u8]>> {
        (**self).duplicate(data)
    }

    #[inline]
    unsafe fn release(&self, block: NonNull<u8>) {
        // SAFETY: Caller upholds the contract for the same allocator.
        unsafe { (**self).release(block) }
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Typed helpers on top of [`Allocator`]
pub trait TypedAllocator: Allocator {
    /// Allocates room for one `T` and moves `value` into it
    ///
    /// # Panics
    /// Panics if `T` needs stricter alignment than a machine word.
    fn create<T: Copy>(&self, value: T) -> AllocResult<NonNull<T>> {
        assert!(
            mem::align_of::<T>() <= WORD_ALIGN,
            "type alignment exceeds word alignment"
        );
        let block = self.allocate(mem::size_of::<T>())?.cast::<T>();
        // SAFETY: Fresh, word-aligned block of `size_of::<T>()` bytes; the
        // alignment of `T` was checked above.
        unsafe { block.as_ptr().write(value) };
        Ok(block)
    }
}

impl<A: Allocator + ?Sized> TypedAllocator for A {}

/// Shrink-in-place / grow-by-copy reallocation shared by the bump strategies
///
/// Shrinking returns the same block; the freed tail stays unreachable until
/// the whole strategy is reset or dropped.
///
/// # Safety
/// Same contract as [`Allocator::reallocate`].
pub(crate) unsafe fn relocate<A: Allocator + ?Sized>(
    allocator: &A,
    block: NonNull<u8>,
    old_size: usize,
    new_size: usize,
) -> AllocResult<NonNull<[u8]>> {
    if new_size <= old_size {
        return Ok(NonNull::slice_from_raw_parts(block, new_size));
    }

    let fresh = allocator.allocate(new_size)?;
    // SAFETY: `block` is valid for `old_size` bytes (caller contract) and
    // `fresh` is a new, disjoint block of `new_size > old_size` bytes.
    unsafe {
        ptr::copy_nonoverlapping(block.as_ptr(), fresh.cast::<u8>().as_ptr(), old_size);
    }
    Ok(fresh)
}

/// Total byte size of `count` values of `T`, as an allocation error on overflow
pub(crate) fn array_bytes<T>(count: usize, operation: &str) -> AllocResult<usize> {
    count
        .checked_mul(mem::size_of::<T>())
        .filter(|bytes| isize::try_from(*bytes).is_ok())
        .ok_or_else(|| AllocError::size_overflow(operation))
}
