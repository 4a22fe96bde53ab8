//! # memkit
//!
//! Pluggable allocation strategies and the collections built on them.
//!
//! This crate provides:
//! - An object-safe [`Allocator`](allocator::Allocator) trait with allocate,
//!   reallocate, duplicate and release
//! - A region-chained arena, a fixed-capacity arena, a scratch allocator over
//!   a caller's buffer, and a heap pass-through
//! - A generic growable [`Vector`](collections::Vector) and a NUL-terminated
//!   [`AllocString`](collections::AllocString), both generic over the
//!   allocator they borrow
//!
//! ## Quick Start
//!
//! ```rust
//! use memkit::prelude::*;
//!
//! let arena = Arena::new();
//!
//! let mut ids = Vector::new(&arena);
//! ids.append_many(&[3u32, 1, 2])?;
//! ids.insert(0, 0)?;
//! assert_eq!(ids.as_slice(), &[0, 3, 1, 2]);
//!
//! let heap = HeapAllocator::new();
//! let copy = ids.clone_in(&heap)?;
//! assert_eq!(copy.len(), 4);
//!
//! let greeting = memkit::alloc_format!(&arena, "{} items", copy.len());
//! assert_eq!(greeting, "4 items");
//! # Ok::<(), MemoryError>(())
//! ```
//!
//! ## Failure model
//!
//! Running out of memory is never fatal: every fallible operation returns a
//! [`MemoryResult`]. Out-of-bounds indices and erase ranges are programming
//! errors and panic.
//!
//! ## Features
//!
//! - `logging` (default): structured logging through `tracing`

#![allow(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rust_2018_idioms)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
// Explicit lifetimes are clearer in allocator code even when elidable
#![allow(clippy::elidable_lifetime_names)]
// Returning &str tied to &self is fine for strategy names
#![allow(clippy::unnecessary_literal_bound)]
// #[must_use] on fns returning Result documents intent even if type is already must_use
#![allow(clippy::double_must_use)]
// Word buffers are reinterpreted as byte blocks and back on purpose
#![allow(clippy::cast_ptr_alignment)]

// Error types
pub mod error;

// Core modules
pub mod allocator;
pub mod collections;
pub mod core;
pub mod io;
pub mod utils;

// Re-export core types for convenience
pub use crate::core::MemoryConfig;
pub use crate::error::{MemoryError, MemoryResult, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Public API exports
pub mod prelude {
    //! Convenient re-exports of commonly used types and traits.

    // Core types
    pub use crate::core::traits::{MemoryUsage, Resettable};
    pub use crate::core::{ArenaConfig, MemoryConfig, VectorConfig};

    // Error types
    pub use crate::error::{MemoryError, MemoryResult, Result};

    // Allocator types
    pub use crate::allocator::{
        AllocError, AllocResult, Allocator, Arena, FixedArena, HeapAllocator, ScratchAllocator,
        TrackedAllocator, TypedAllocator,
    };

    // Collections
    pub use crate::collections::{AllocString, Vector};
}
