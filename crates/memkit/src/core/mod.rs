//! Core functionality for memkit
//!
//! This module contains the building blocks shared by every allocator
//! strategy and collection:
//! - Configuration structures
//! - Base traits for usage reporting and resetting

pub mod config;
pub mod traits;

// Re-export commonly used items
pub use crate::error::{MemoryError, MemoryResult};
pub use config::{ArenaConfig, MemoryConfig, VectorConfig};
pub use traits::{BasicMemoryUsage, MemoryUsage, Resettable};
