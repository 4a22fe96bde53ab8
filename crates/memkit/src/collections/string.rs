//! Allocator-backed, NUL-terminated string
//!
//! An [`AllocString`] owns `len + 1` bytes in a borrowed allocator: the UTF-8
//! content followed by a single terminating zero byte. Construction failure
//! yields the empty sentinel (no buffer, `len == 0`) through the plain
//! constructors, or an `Err` through the `try_*` ones.

use core::fmt::{self, Write};
use core::ops::Deref;
use core::ptr::{self, NonNull};
use core::slice;

#[cfg(feature = "logging")]
use tracing::debug;

use crate::allocator::Allocator;
use crate::error::{AllocError, AllocResult};

/// Owned buffer plus the allocator it came from
struct Buffer<'a> {
    ptr: NonNull<u8>,
    allocator: &'a dyn Allocator,
}

/// NUL-terminated UTF-8 string stored in a borrowed allocator
///
/// # Examples
/// ```
/// use memkit::alloc_format;
/// use memkit::allocator::Arena;
/// use memkit::collections::AllocString;
///
/// let arena = Arena::new();
/// let name = AllocString::new(&arena, "Sam");
/// let line = alloc_format!(&arena, "{} is {}", name, 5);
/// assert_eq!(line.as_str(), "Sam is 5");
/// assert_eq!(line.len(), 8);
/// ```
pub struct AllocString<'a> {
    buffer: Option<Buffer<'a>>,
    len: usize,
}

impl<'a> AllocString<'a> {
    /// The empty sentinel: no buffer, zero length
    pub const fn empty() -> Self {
        Self {
            buffer: None,
            len: 0,
        }
    }

    /// Copies `text` into `allocator`
    pub fn try_new(allocator: &'a dyn Allocator, text: &str) -> AllocResult<Self> {
        let len = text.len();
        let size = len
            .checked_add(1)
            .ok_or_else(|| AllocError::size_overflow("string length"))?;
        let block = allocator.allocate(size)?.cast::<u8>();
        // SAFETY: `block` holds `len + 1` fresh bytes, disjoint from `text`.
        unsafe {
            ptr::copy_nonoverlapping(text.as_ptr(), block.as_ptr(), len);
            block.add(len).write(0);
        }
        Ok(Self::from_raw(block, len, allocator))
    }

    /// Copies `text` into `allocator`, or returns the empty sentinel
    pub fn new(allocator: &'a dyn Allocator, text: &str) -> Self {
        Self::or_sentinel(Self::try_new(allocator, text))
    }

    /// Formats `args` into a buffer of exactly `len + 1` bytes
    ///
    /// The arguments are formatted twice: once to measure, once to write.
    ///
    /// # Panics
    /// Panics if the two passes disagree on the length, which only happens
    /// when a `Display` impl is not deterministic.
    pub fn try_format(allocator: &'a dyn Allocator, args: fmt::Arguments<'_>) -> AllocResult<Self> {
        let mut measure = Measure(0);
        measure
            .write_fmt(args)
            .map_err(|_| AllocError::invalid_state("formatting trait returned an error"))?;
        let len = measure.0;

        let size = len
            .checked_add(1)
            .ok_or_else(|| AllocError::size_overflow("formatted string length"))?;
        let block = allocator.allocate(size)?.cast::<u8>();
        let string = Self::from_raw(block, len, allocator);

        // SAFETY: `block` holds `len + 1` fresh bytes owned by `string`.
        let target = unsafe { slice::from_raw_parts_mut(block.as_ptr(), size) };
        let mut fill = Fill {
            target,
            written: 0,
        };
        fill.write_fmt(args)
            .map_err(|_| AllocError::invalid_state("formatting trait returned an error"))?;
        assert_eq!(
            fill.written, len,
            "formatted length changed between measure and write passes"
        );
        fill.target[len] = 0;

        Ok(string)
    }

    /// Formats `args` into `allocator`, or returns the empty sentinel
    ///
    /// Usually called through [`alloc_format!`](crate::alloc_format).
    pub fn format(allocator: &'a dyn Allocator, args: fmt::Arguments<'_>) -> Self {
        Self::or_sentinel(Self::try_format(allocator, args))
    }

    /// Copies this string into `allocator` through its `duplicate` operation
    ///
    /// Duplicating the sentinel yields another sentinel.
    pub fn try_duplicate<'b>(&self, allocator: &'b dyn Allocator) -> AllocResult<AllocString<'b>> {
        if self.buffer.is_none() {
            return Ok(AllocString::empty());
        }
        let block = allocator.duplicate(self.as_bytes_with_nul())?.cast::<u8>();
        Ok(AllocString::from_raw(block, self.len, allocator))
    }

    /// Copies this string into `allocator`, or returns the empty sentinel
    pub fn duplicate<'b>(&self, allocator: &'b dyn Allocator) -> AllocString<'b> {
        AllocString::or_sentinel(self.try_duplicate(allocator))
    }

    fn from_raw(ptr: NonNull<u8>, len: usize, allocator: &'a dyn Allocator) -> Self {
        Self {
            buffer: Some(Buffer { ptr, allocator }),
            len,
        }
    }

    fn or_sentinel(result: AllocResult<Self>) -> Self {
        match result {
            Ok(string) => string,
            #[cfg_attr(not(feature = "logging"), allow(unused_variables))]
            Err(err) => {
                // The error constructor already reported the failure itself.
                #[cfg(feature = "logging")]
                debug!(code = err.code(), "returning empty string sentinel");

                Self::empty()
            }
        }
    }

    /// Content length in bytes, excluding the terminator
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether this is the sentinel (no buffer)
    #[inline]
    pub fn is_null(&self) -> bool {
        self.buffer.is_none()
    }

    /// Allocator holding the buffer, `None` for the sentinel
    pub fn allocator(&self) -> Option<&'a dyn Allocator> {
        self.buffer.as_ref().map(|buffer| buffer.allocator)
    }

    pub fn as_bytes(&self) -> &[u8] {
        match &self.buffer {
            // SAFETY: The buffer holds `len` initialised content bytes.
            Some(buffer) => unsafe { slice::from_raw_parts(buffer.ptr.as_ptr(), self.len) },
            None => &[],
        }
    }

    /// Content followed by the terminating zero byte
    ///
    /// The sentinel yields a lone terminator.
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        match &self.buffer {
            // SAFETY: The buffer holds `len + 1` initialised bytes.
            Some(buffer) => unsafe { slice::from_raw_parts(buffer.ptr.as_ptr(), self.len + 1) },
            None => b"\0",
        }
    }

    pub fn as_str(&self) -> &str {
        // SAFETY: Content is only ever written from `&str` or `fmt::Write`
        // output, both valid UTF-8.
        unsafe { core::str::from_utf8_unchecked(self.as_bytes()) }
    }
}

impl Drop for AllocString<'_> {
    fn drop(&mut self) {
        if let Some(buffer) = self.buffer.take() {
            // SAFETY: The buffer came from this allocator and is released
            // once.
            unsafe { buffer.allocator.release(buffer.ptr) };
        }
    }
}

impl Default for AllocString<'_> {
    fn default() -> Self {
        Self::empty()
    }
}

impl Clone for AllocString<'_> {
    /// Duplicates through the same allocator; failure yields the sentinel
    fn clone(&self) -> Self {
        match &self.buffer {
            Some(buffer) => self.duplicate(buffer.allocator),
            None => Self::empty(),
        }
    }
}

impl Deref for AllocString<'_> {
    type Target = str;

    fn deref(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<str> for AllocString<'_> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq for AllocString<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for AllocString<'_> {}

impl PartialEq<str> for AllocString<'_> {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for AllocString<'_> {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl fmt::Display for AllocString<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for AllocString<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            f.write_str("AllocString(null)")
        } else {
            fmt::Debug::fmt(self.as_str(), f)
        }
    }
}

/// Counts formatted bytes without storing them
struct Measure(usize);

impl Write for Measure {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0 += s.len();
        Ok(())
    }
}

/// Writes formatted bytes into a fixed slice, counting everything offered
///
/// Bytes past the end of `target` are dropped; the caller compares `written`
/// against the measured length.
struct Fill<'t> {
    target: &'t mut [u8],
    written: usize,
}

impl Write for Fill<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let start = self.written.min(self.target.len());
        let room = self.target.len() - start;
        let take = s.len().min(room);
        self.target[start..start + take].copy_from_slice(&s.as_bytes()[..take]);
        self.written += s.len();
        Ok(())
    }
}

/// Formats into an [`AllocString`] on the given allocator
///
/// Expands to [`AllocString::format`], so allocation failure yields the empty
/// sentinel.
///
/// ```
/// use memkit::alloc_format;
/// use memkit::allocator::HeapAllocator;
///
/// let heap = HeapAllocator::new();
/// let s = alloc_format!(&heap, "{}-{:02}", "id", 7);
/// assert_eq!(s, "id-07");
/// ```
#[macro_export]
macro_rules! alloc_format {
    ($allocator:expr, $($arg:tt)*) => {
        $crate::collections::AllocString::format($allocator, ::core::format_args!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::{Arena, FixedArena, HeapAllocator, TrackedAllocator};

    #[test]
    fn new_copies_and_terminates() {
        let arena = Arena::new();
        let s = AllocString::new(&arena, "hello");
        assert_eq!(s.len(), 5);
        assert_eq!(s.as_bytes_with_nul(), b"hello\0");
    }

    #[test]
    fn format_measures_exactly() {
        let arena = Arena::new();
        let s = alloc_format!(&arena, "{} is {}", "Sam", 5);
        assert_eq!(s.len(), 8);
        assert_eq!(s.as_str(), "Sam is 5");
        let bytes = s.as_bytes_with_nul();
        assert_eq!(bytes.iter().position(|&b| b == 0), Some(8));
    }

    #[test]
    fn format_handles_multibyte() {
        let heap = HeapAllocator::new();
        let s = alloc_format!(&heap, "{}→{}", "a", "ü");
        assert_eq!(s.as_str(), "a→ü");
        assert_eq!(s.len(), "a→ü".len());
    }

    #[test]
    fn failure_yields_sentinel() {
        let fixed = FixedArena::new(1).unwrap();
        let s = AllocString::new(&fixed, "this does not fit in one word");
        assert!(s.is_null());
        assert_eq!(s.len(), 0);
        assert_eq!(s.as_str(), "");
        assert_eq!(s.as_bytes_with_nul(), b"\0");
    }

    #[test]
    fn try_new_reports_error() {
        let fixed = FixedArena::new(1).unwrap();
        let err = AllocString::try_new(&fixed, "far too long for a word").unwrap_err();
        assert!(err.is_exhaustion());
    }

    #[test]
    fn duplicate_goes_through_target_allocator() {
        let arena = Arena::new();
        let heap = TrackedAllocator::new(HeapAllocator::new());
        let original = AllocString::new(&arena, "copy me");
        {
            let copy = original.duplicate(&heap);
            assert_eq!(copy, original);
            assert_eq!(heap.stats().allocation_count, 1);
        }
        assert_eq!(heap.outstanding(), 0);
    }

    #[test]
    fn duplicate_of_sentinel_is_sentinel() {
        let heap = HeapAllocator::new();
        let copy = AllocString::empty().duplicate(&heap);
        assert!(copy.is_null());
    }

    #[test]
    fn clone_uses_same_allocator() {
        let heap = TrackedAllocator::new(HeapAllocator::new());
        let s = AllocString::new(&heap, "twice");
        let t = s.clone();
        assert_eq!(t, "twice");
        assert_eq!(heap.stats().allocation_count, 2);
    }

    #[test]
    fn fill_counts_overflow() {
        let mut target = [0u8; 3];
        let mut fill = Fill {
            target: &mut target,
            written: 0,
        };
        fill.write_str("abcdef").unwrap();
        assert_eq!(fill.written, 6);
        assert_eq!(&target, b"abc");
    }

    #[test]
    fn debug_marks_sentinel() {
        assert_eq!(format!("{:?}", AllocString::empty()), "AllocString(null)");
        let arena = Arena::new();
        assert_eq!(format!("{:?}", AllocString::new(&arena, "x")), "\"x\"");
    }
}
