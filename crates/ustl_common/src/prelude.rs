pub use crate::alloc::{Allocator, Mallocator};
pub use crate::collections::{DynArr, OutOfRangeError, TryReserveError};
pub use crate::dynarr;
