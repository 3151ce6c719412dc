//! Foundation types: the allocation strategy, the `DynArr` growable array, hashing and formatting helpers.

pub mod alloc;
pub mod collections;
pub mod hashing;
pub mod fmt;

pub mod prelude;
