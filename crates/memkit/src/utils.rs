//! Utility functions and helpers for memkit
//!
//! Word arithmetic shared by every strategy. All strategies hand out
//! word-aligned blocks and account for their storage in machine words.

use core::mem;

/// Size of one machine word in bytes
pub const WORD_SIZE: usize = mem::size_of::<usize>();

/// Alignment of every block handed out by the crate's allocators
pub const WORD_ALIGN: usize = mem::align_of::<usize>();

/// Number of words needed to hold `size` bytes, rounded up
///
/// Returns `None` if the rounding would overflow.
///
/// # Examples
/// ```
/// use memkit::utils::words_for;
///
/// assert_eq!(words_for(0), Some(0));
/// assert_eq!(words_for(1), Some(1));
/// assert_eq!(words_for(memkit::utils::WORD_SIZE + 1), Some(2));
/// ```
#[inline]
pub const fn words_for(size: usize) -> Option<usize> {
    match size.checked_add(WORD_SIZE - 1) {
        Some(padded) => Some(padded / WORD_SIZE),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_round_up() {
        assert_eq!(words_for(WORD_SIZE), Some(1));
        assert_eq!(words_for(WORD_SIZE * 3 - 1), Some(3));
        assert_eq!(words_for(usize::MAX), None);
    }
}
