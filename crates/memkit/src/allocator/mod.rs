//! Allocation strategies
//!
//! Every strategy implements the object-safe [`Allocator`] trait, so consumers
//! can hold a `&dyn Allocator` and stay oblivious to which one backs them.
//!
//! - [`Arena`]: chain of zeroed regions, grows on demand, bulk release only
//! - [`FixedArena`]: one zeroed region of fixed capacity, resettable
//! - [`ScratchAllocator`]: fixed-capacity bump over a caller's buffer
//! - [`HeapAllocator`]: platform `calloc`/`realloc`/`free`
//! - [`TrackedAllocator`]: counts operations on any of the above

// Shared internals
mod bump;
mod region;
mod traits;

// Strategies
mod arena;
mod fixed;
mod heap;
mod scratch;
mod tracked;

pub use crate::error::{AllocError, AllocResult};
pub use arena::Arena;
pub use fixed::FixedArena;
pub use heap::HeapAllocator;
pub use scratch::ScratchAllocator;
pub use tracked::{AllocatorStats, TrackedAllocator};
pub use traits::{Allocator, TypedAllocator};

pub(crate) use traits::array_bytes;
