mod alloc;
mod mallocator;
mod tracking;

pub use self::alloc::*;
pub use mallocator::*;
pub use tracking::*;
