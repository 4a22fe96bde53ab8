//! Allocator-backed growable array
//!
//! # Safety
//!
//! This module manages a raw element buffer obtained from a borrowed
//! [`Allocator`]:
//! - Elements are `Copy`, so shifting is a plain `ptr::copy` and nothing needs
//!   dropping
//! - The element alignment is checked at compile time against the word
//!   alignment every strategy guarantees
//!
//! ## Invariants
//!
//! - `data` is `Some` iff `capacity > 0`
//! - While `data` is `Some`, `len <= capacity` and `[0, len)` is initialised
//! - After the allocator refuses a growth `data` is `None`, `capacity == 0`
//!   and `len` keeps its previous value (the failed state); `as_slice` is
//!   then empty
//! - A capacity whose byte size overflows `usize` is rejected before the
//!   allocator is asked, so the buffer is kept and no failed state is entered
//! - A failed vector with `len > 0` refuses to grow until `clear`, but
//!   shrinking it always succeeds

use core::fmt;
use core::ops::{Index, IndexMut};
use core::ptr::{self, NonNull};
use core::slice;

#[cfg(feature = "logging")]
use tracing::{trace, warn};

use crate::allocator::{Allocator, array_bytes};
use crate::core::config::{MemoryConfig, VectorConfig};
use crate::error::{MemoryError, MemoryResult};
use crate::utils::WORD_ALIGN;

/// Growable array of `T` living in a borrowed allocator
///
/// Growth doubles the capacity, starting from
/// [`VectorConfig::initial_capacity`]. Allocation failure never panics: the
/// operation returns `Err` and the vector enters the failed state described in
/// the module docs.
///
/// # Examples
/// ```
/// use memkit::allocator::Arena;
/// use memkit::collections::Vector;
///
/// let arena = Arena::new();
/// let mut numbers = Vector::new(&arena);
/// numbers.append(1).unwrap();
/// numbers.append_many(&[2, 3, 4]).unwrap();
/// numbers.insert(0, 0).unwrap();
/// assert_eq!(numbers.as_slice(), &[0, 1, 2, 3, 4]);
/// assert_eq!(numbers.capacity(), 64);
/// ```
pub struct Vector<'a, T: Copy> {
    allocator: &'a dyn Allocator,
    data: Option<NonNull<T>>,
    len: usize,
    capacity: usize,
    config: VectorConfig,
    failed: bool,
}

impl<'a, T: Copy> Vector<'a, T> {
    /// Creates an empty vector with default growth policy
    ///
    /// Nothing is allocated until the first growth.
    pub fn new(allocator: &'a dyn Allocator) -> Self {
        Self::with_config_unchecked(allocator, VectorConfig::new())
    }

    /// Creates an empty vector with the given growth policy
    pub fn with_config(allocator: &'a dyn Allocator, config: VectorConfig) -> MemoryResult<Self> {
        config.validate()?;
        Ok(Self::with_config_unchecked(allocator, config))
    }

    /// Creates an empty vector with the vector section of `config`
    pub fn from_memory_config(
        allocator: &'a dyn Allocator,
        config: &MemoryConfig,
    ) -> MemoryResult<Self> {
        config.validate()?;
        Ok(Self::with_config_unchecked(allocator, config.vector))
    }

    /// Creates an empty vector with exactly `capacity` slots reserved
    pub fn with_capacity(allocator: &'a dyn Allocator, capacity: usize) -> MemoryResult<Self> {
        let mut vector = Self::new(allocator);
        vector.reserve(capacity)?;
        Ok(vector)
    }

    fn with_config_unchecked(allocator: &'a dyn Allocator, config: VectorConfig) -> Self {
        const {
            assert!(
                align_of::<T>() <= WORD_ALIGN,
                "element alignment exceeds word alignment"
            );
        }

        Self {
            allocator,
            data: None,
            len: 0,
            capacity: 0,
            config,
            failed: false,
        }
    }

    /// Number of elements
    ///
    /// In the failed state this is the length before the failed operation,
    /// even though no storage backs it.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of elements the current buffer can hold
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether the last capacity change failed and dropped the buffer
    #[inline]
    pub fn is_failed(&self) -> bool {
        self.failed
    }

    /// Growth policy
    pub fn config(&self) -> &VectorConfig {
        &self.config
    }

    /// Allocator backing this vector
    pub fn allocator(&self) -> &'a dyn Allocator {
        self.allocator
    }

    /// Raw pointer to the buffer, null when there is none
    pub fn as_ptr(&self) -> *const T {
        self.data.map_or(ptr::null(), |data| data.as_ptr().cast_const())
    }

    /// Elements as a slice; empty when no buffer exists
    pub fn as_slice(&self) -> &[T] {
        match self.data {
            // SAFETY: `[0, len)` is initialised while the buffer exists.
            Some(data) => unsafe { slice::from_raw_parts(data.as_ptr(), self.len) },
            None => &[],
        }
    }

    /// Elements as a mutable slice; empty when no buffer exists
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        match self.data {
            // SAFETY: `[0, len)` is initialised and uniquely borrowed via
            // `&mut self`.
            Some(data) => unsafe { slice::from_raw_parts_mut(data.as_ptr(), self.len) },
            None => &mut [],
        }
    }

    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    pub fn first(&self) -> Option<&T> {
        self.as_slice().first()
    }

    pub fn last(&self) -> Option<&T> {
        self.as_slice().last()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    /// Overwrites the element at `index`
    ///
    /// # Panics
    /// Panics if `index >= len`.
    pub fn set(&mut self, index: usize, value: T) {
        self[index] = value;
    }

    // ------------------------------------------------------------------------
    // Capacity management
    // ------------------------------------------------------------------------

    /// Changes the length by `offset` elements
    ///
    /// Growing past capacity doubles the capacity (starting from the initial
    /// threshold) until it fits. New slots hold whatever the allocator left
    /// there. Shrinking never allocates and never fails.
    ///
    /// # Panics
    /// Panics if `offset` would make the length negative.
    pub fn resize(&mut self, offset: isize) -> MemoryResult<()> {
        if offset <= 0 {
            self.shrink_len(offset.unsigned_abs());
            Ok(())
        } else {
            self.grow_len(offset.unsigned_abs())
        }
    }

    /// Sets the capacity to exactly `new_capacity`
    ///
    /// A value below the current length truncates the vector first, which
    /// never fails, even in the failed state.
    pub fn reserve(&mut self, new_capacity: usize) -> MemoryResult<()> {
        if new_capacity < self.len {
            self.shrink_len(self.len - new_capacity);
        }

        if new_capacity == 0 {
            self.release_buffer();
            self.failed = false;
            return Ok(());
        }

        if self.data.is_none() && new_capacity <= self.len {
            // Failed vector truncated in place: nothing to allocate.
            return Ok(());
        }

        if new_capacity > self.capacity {
            self.set_capacity(new_capacity)
        } else {
            // Keeping the larger block is fine: `capacity` never overstates it.
            self.capacity = new_capacity;
            Ok(())
        }
    }

    /// Sets the length to zero, keeping the buffer
    ///
    /// Also clears the failed state.
    pub fn clear(&mut self) {
        self.len = 0;
        self.failed = false;
    }

    fn shrink_len(&mut self, count: usize) {
        assert!(count <= self.len, "cannot shrink vector below zero length");
        self.len -= count;
    }

    fn grow_len(&mut self, additional: usize) -> MemoryResult<()> {
        let required = self
            .len
            .checked_add(additional)
            .ok_or_else(|| MemoryError::size_overflow("vector length"))?;

        if required > self.capacity {
            let mut capacity = if self.capacity == 0 {
                self.config.initial_capacity
            } else {
                self.capacity
            };
            while capacity < required {
                capacity = capacity
                    .checked_mul(2)
                    .ok_or_else(|| MemoryError::size_overflow("vector growth"))?;
            }
            self.set_capacity(capacity)?;
        }

        self.len = required;
        Ok(())
    }

    fn set_capacity(&mut self, capacity: usize) -> MemoryResult<()> {
        if self.failed && self.len > 0 {
            return Err(MemoryError::invalid_state(
                "vector lost its buffer; clear it before growing again",
            ));
        }

        let new_bytes = array_bytes::<T>(capacity, "vector capacity")?;
        let result = match self.data {
            None => self.allocator.allocate(new_bytes),
            Some(data) => {
                let old_bytes = array_bytes::<T>(self.capacity, "vector capacity")?;
                // SAFETY: `data` came from this allocator with at least
                // `old_bytes` bytes and is replaced on success.
                unsafe {
                    self.allocator
                        .reallocate(data.cast(), old_bytes, new_bytes)
                }
            }
        };

        match result {
            Ok(block) => {
                #[cfg(feature = "logging")]
                trace!(
                    from = self.capacity,
                    to = capacity,
                    allocator = self.allocator.name(),
                    "vector capacity changed"
                );

                self.data = Some(block.cast());
                self.capacity = capacity;
                self.failed = false;
                Ok(())
            }
            Err(err) => {
                #[cfg(feature = "logging")]
                warn!(
                    len = self.len,
                    requested = capacity,
                    allocator = self.allocator.name(),
                    "vector growth failed, buffer dropped"
                );

                self.release_buffer();
                self.failed = true;
                Err(err)
            }
        }
    }

    fn release_buffer(&mut self) {
        if let Some(data) = self.data.take() {
            // SAFETY: `data` came from this allocator and is no longer
            // reachable after `take`.
            unsafe { self.allocator.release(data.cast()) };
        }
        self.capacity = 0;
    }

    /// Pointer to slot `index`; only called while the buffer exists
    #[inline]
    fn slot(&self, index: usize) -> *mut T {
        debug_assert!(index <= self.capacity);
        match self.data {
            // SAFETY: `index <= capacity`, so the offset stays in (or one past)
            // the buffer.
            Some(data) => unsafe { data.as_ptr().add(index) },
            None => ptr::null_mut(),
        }
    }

    // ------------------------------------------------------------------------
    // Insertion
    // ------------------------------------------------------------------------

    /// Appends one element at the end
    pub fn append(&mut self, item: T) -> MemoryResult<()> {
        self.grow_len(1)?;
        // SAFETY: Growth succeeded, so slot `len - 1` is inside the buffer.
        unsafe { self.slot(self.len - 1).write(item) };
        Ok(())
    }

    /// Appends a run of elements at the end
    pub fn append_many(&mut self, items: &[T]) -> MemoryResult<()> {
        if items.is_empty() {
            return Ok(());
        }
        let start = self.len;
        self.grow_len(items.len())?;
        // SAFETY: Slots `[start, len)` were just opened and cannot overlap the
        // borrowed `items`.
        unsafe { ptr::copy_nonoverlapping(items.as_ptr(), self.slot(start), items.len()) };
        Ok(())
    }

    /// Inserts `item` at `pos`, shifting later elements right
    ///
    /// `pos` past the end appends.
    pub fn insert(&mut self, pos: usize, item: T) -> MemoryResult<()> {
        let pos = pos.min(self.len);
        let tail = self.len - pos;
        self.grow_len(1)?;
        // SAFETY: The buffer holds `len` slots after growth; the tail
        // `[pos, pos + tail)` moves one slot right within it.
        unsafe {
            ptr::copy(self.slot(pos), self.slot(pos + 1), tail);
            self.slot(pos).write(item);
        }
        Ok(())
    }

    /// Inserts `items` at `pos`, shifting later elements right
    ///
    /// `pos` past the end appends.
    pub fn insert_many(&mut self, pos: usize, items: &[T]) -> MemoryResult<()> {
        if items.is_empty() {
            return Ok(());
        }
        let pos = pos.min(self.len);
        let tail = self.len - pos;
        self.grow_len(items.len())?;
        // SAFETY: After growth the tail moves `items.len()` slots right within
        // the buffer, then the gap is filled from the disjoint `items`.
        unsafe {
            ptr::copy(self.slot(pos), self.slot(pos + items.len()), tail);
            ptr::copy_nonoverlapping(items.as_ptr(), self.slot(pos), items.len());
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Removal
    // ------------------------------------------------------------------------

    /// Removes and returns the element at `pos`, shifting later elements left
    ///
    /// # Panics
    /// Panics if `pos >= len`.
    pub fn erase(&mut self, pos: usize) -> T {
        let removed = self[pos];
        self.erase_many(pos, 1);
        removed
    }

    /// Removes `count` elements starting at `pos`
    ///
    /// # Panics
    /// Panics if `pos + count > len` or the vector has no buffer.
    pub fn erase_many(&mut self, pos: usize, count: usize) {
        let end = pos
            .checked_add(count)
            .filter(|&end| end <= self.as_slice().len());
        let Some(end) = end else {
            panic!(
                "erase range {pos}..{} out of bounds for length {}",
                pos.saturating_add(count),
                self.len
            );
        };
        if count == 0 {
            return;
        }
        // SAFETY: `[end, len)` is initialised and moves left within the buffer.
        unsafe { ptr::copy(self.slot(end), self.slot(pos), self.len - end) };
        self.len -= count;
    }

    /// Copies `out.len()` elements starting at `pos` into `out`, then removes
    /// them
    ///
    /// # Panics
    /// Panics if `pos + out.len() > len`.
    pub fn erase_many_into(&mut self, pos: usize, out: &mut [T]) {
        let count = out.len();
        let Some(run) = pos
            .checked_add(count)
            .and_then(|end| self.as_slice().get(pos..end))
        else {
            panic!(
                "erase range {pos}..{} out of bounds for length {}",
                pos.saturating_add(count),
                self.len
            );
        };
        out.copy_from_slice(run);
        self.erase_many(pos, count);
    }

    /// Removes the element at `pos` by moving the last element into its place
    ///
    /// O(1), does not preserve order.
    ///
    /// # Panics
    /// Panics if `pos >= len`.
    pub fn unordered_erase(&mut self, pos: usize) -> T {
        let last = self.len.wrapping_sub(1);
        let removed = self[pos];
        if pos != last {
            self[pos] = self[last];
        }
        self.len -= 1;
        removed
    }

    /// Removes and returns the last element
    pub fn pop(&mut self) -> Option<T> {
        let value = *self.last()?;
        self.len -= 1;
        Some(value)
    }

    // ------------------------------------------------------------------------
    // Cloning
    // ------------------------------------------------------------------------

    /// Copies the elements into a new vector on `allocator`
    ///
    /// The clone gets `len + clone_slack` capacity and its own storage. On
    /// failure no clone exists.
    pub fn clone_in<'b>(&self, allocator: &'b dyn Allocator) -> MemoryResult<Vector<'b, T>> {
        if self.failed && self.len > 0 {
            return Err(MemoryError::invalid_state("cannot clone a failed vector"));
        }

        let capacity = self
            .len
            .checked_add(self.config.clone_slack)
            .ok_or_else(|| MemoryError::size_overflow("vector clone"))?;

        let mut clone = Vector::with_config_unchecked(allocator, self.config);
        if capacity > 0 {
            clone.set_capacity(capacity)?;
        }
        if self.len > 0 {
            // SAFETY: The clone's buffer holds `capacity >= len` slots and is a
            // distinct allocation from `self`'s.
            unsafe { ptr::copy_nonoverlapping(self.slot(0), clone.slot(0), self.len) };
        }
        clone.len = self.len;
        Ok(clone)
    }
}

impl<T: Copy> Drop for Vector<'_, T> {
    fn drop(&mut self) {
        self.release_buffer();
    }
}

impl<T: Copy> Index<usize> for Vector<'_, T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        let len = self.len;
        self.as_slice()
            .get(index)
            .unwrap_or_else(|| panic!("index {index} out of bounds for length {len}"))
    }
}

impl<T: Copy> IndexMut<usize> for Vector<'_, T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len;
        self.as_mut_slice()
            .get_mut(index)
            .unwrap_or_else(|| panic!("index {index} out of bounds for length {len}"))
    }
}

impl<'v, T: Copy> IntoIterator for &'v Vector<'_, T> {
    type Item = &'v T;
    type IntoIter = slice::Iter<'v, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Copy + fmt::Debug> fmt::Debug for Vector<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vector")
            .field("allocator", &self.allocator.name())
            .field("len", &self.len)
            .field("capacity", &self.capacity)
            .field("failed", &self.failed)
            .field("items", &self.as_slice())
            .finish()
    }
}
