//! Allocator-backed collections
//!
//! Both types borrow their allocator as `&dyn Allocator` and release their
//! storage through it on drop.

mod string;
mod vector;

pub use string::AllocString;
pub use vector::Vector;
