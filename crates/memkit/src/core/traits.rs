//! Core traits for memory management
//!
//! This module defines the reporting and reset traits implemented by the
//! allocator strategies.

/// Memory usage tracking trait
///
/// Implemented by allocators that know how much of their storage is in use.
/// Values are reported in bytes.
pub trait MemoryUsage {
    /// Get currently used memory in bytes
    fn used_memory(&self) -> usize;

    /// Get available memory in bytes (if known)
    fn available_memory(&self) -> Option<usize>;

    /// Get total memory capacity in bytes (if known)
    fn total_memory(&self) -> Option<usize> {
        match (self.used_memory(), self.available_memory()) {
            (used, Some(available)) => Some(used + available),
            _ => None,
        }
    }

    /// Returns memory usage as a percentage (0.0 to 100.0)
    ///
    /// Returns `None` if total memory is unknown.
    fn memory_usage_percent(&self) -> Option<f32> {
        self.total_memory().map(|total| {
            if total == 0 {
                0.0
            } else {
                (self.used_memory() as f32 / total as f32) * 100.0
            }
        })
    }

    /// Returns detailed memory usage information
    fn memory_usage(&self) -> BasicMemoryUsage {
        BasicMemoryUsage {
            used: self.used_memory(),
            available: self.available_memory(),
            total: self.total_memory(),
            usage_percent: self.memory_usage_percent(),
        }
    }
}

/// Basic memory usage information
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasicMemoryUsage {
    /// Currently used memory in bytes
    pub used: usize,
    /// Available memory in bytes (None if unlimited)
    pub available: Option<usize>,
    /// Total memory capacity in bytes (None if unlimited)
    pub total: Option<usize>,
    /// Memory usage as percentage (None if cannot be calculated)
    pub usage_percent: Option<f32>,
}

impl core::fmt::Display for BasicMemoryUsage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "used: {} bytes", self.used)?;

        if let Some(total) = self.total {
            write!(f, ", total: {total} bytes")?;
        }

        if let Some(percent) = self.usage_percent {
            write!(f, " ({percent:.1}%)")?;
        }

        Ok(())
    }
}

/// Resettable allocator
///
/// Resetting rewinds the allocator to empty and invalidates every block it
/// handed out. Taking `&mut self` means no collection can still be borrowing
/// the allocator when this runs.
pub trait Resettable {
    /// Reset allocator to its initial, empty state
    fn reset(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed {
        used: usize,
        cap: usize,
    }

    impl MemoryUsage for Fixed {
        fn used_memory(&self) -> usize {
            self.used
        }

        fn available_memory(&self) -> Option<usize> {
            Some(self.cap - self.used)
        }
    }

    struct Unbounded;

    impl MemoryUsage for Unbounded {
        fn used_memory(&self) -> usize {
            0
        }

        fn available_memory(&self) -> Option<usize> {
            None
        }
    }

    #[test]
    fn usage_percent_from_used_and_available() {
        let fixed = Fixed { used: 25, cap: 100 };
        assert_eq!(fixed.total_memory(), Some(100));
        assert_eq!(fixed.memory_usage_percent(), Some(25.0));
    }

    #[test]
    fn unbounded_has_no_total() {
        let usage = Unbounded.memory_usage();
        assert_eq!(usage.total, None);
        assert_eq!(usage.usage_percent, None);
        assert_eq!(usage.to_string(), "used: 0 bytes");
    }

    #[test]
    fn display_includes_percent() {
        let usage = Fixed { used: 50, cap: 200 }.memory_usage();
        assert_eq!(usage.to_string(), "used: 50 bytes, total: 200 bytes (25.0%)");
    }
}
