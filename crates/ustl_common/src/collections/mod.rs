mod imp;

mod dynarr;

use core::alloc::Layout;

use ustl_logging::LogCategory;

pub use dynarr::*;

pub(crate) const LOG_CAT: LogCategory = LogCategory::new_with_sub("Collections", "DynArr");

//--------------------------------------------------------------

macro_rules! impl_slice_partial_eq_generic {
    ([$($vars:tt)*] $lhs:ty, $rhs:ty $(where $ty:ty: $bound:ident)?) => {
        impl<T, U, $($vars)*> PartialEq<$rhs> for $lhs  where
            T : PartialEq<U>,
            $($ty: $bound)?
        {
            #[inline]
            fn eq(&self, other: &$rhs) -> bool { self[..] == other[..] }
        }
    };
}
use impl_slice_partial_eq_generic;

//--------------------------------------------------------------

/// Error returned when a container could not reserve the requested capacity.
///
/// The container is left exactly as it was before the failed request.
#[derive(Clone, Copy, PartialEq, Eq, Debug, thiserror::Error)]
pub enum TryReserveError {
    /// The requested capacity exceeds `isize::MAX` bytes, or the element count overflowed.
    #[error("capacity overflow")]
    CapacityOverflow,
    /// The allocator failed to provide memory for the given layout.
    #[error("memory allocation of {} bytes (align {}) failed", .0.size(), .0.align())]
    AllocError(Layout),
}

/// Error returned by checked accessors when the index is not below the length.
#[derive(Clone, Copy, PartialEq, Eq, Debug, thiserror::Error)]
#[error("index out of range: the len is {len} but the index is {index}")]
pub struct OutOfRangeError {
    pub index: usize,
    pub len:   usize,
}

//--------------------------------------------------------------

/// A trait used to define a strategy to reserve additional memory for containers.
pub trait ReserveStrategy {
    /// `shrink_to_fit` only releases memory when the capacity is larger than `len * SHRINK_FACTOR`.
    ///
    /// This keeps a container that oscillates around a length from reallocating on every push/shrink pair.
    const SHRINK_FACTOR: usize = 2;

    /// Calculate the new capacity for a container.
    ///
    /// `len` represents the number of live elements in the container.
    ///
    /// `min_capacity` represents the minimum required capacity to be able to resize, and is always larger than the current capacity.
    ///
    /// Returns `None` if the capacity were to overflow
    fn calculate(len: usize, min_capacity: usize) -> Option<usize>;

    /// Check if a container with `len` elements and `capacity` slots should give back its slack.
    fn should_shrink(len: usize, capacity: usize) -> bool {
        capacity > len.saturating_mul(Self::SHRINK_FACTOR)
    }
}

/// A reserve strategy that will try to either return double the current length, or the minimum required capacity, whichever is bigger.
///
/// The first allocation holds at least [`DoubleOrMinReserveStrategy::MIN_CAPACITY`] elements.
pub struct DoubleOrMinReserveStrategy;

impl DoubleOrMinReserveStrategy {
    pub const MIN_CAPACITY: usize = 8;
}

impl ReserveStrategy for DoubleOrMinReserveStrategy {
    fn calculate(len: usize, min_capacity: usize) -> Option<usize> {
        let double_cap = len.checked_mul(2)?;
        let new_cap = double_cap.max(min_capacity).max(Self::MIN_CAPACITY);
        if new_cap <= isize::MAX as usize {
            Some(new_cap)
        } else {
            None
        }
    }
}

/// A reserve strategy that will return a power of 2 capacity
pub struct Pow2ReserveStrategy;

impl ReserveStrategy for Pow2ReserveStrategy {
    fn calculate(_len: usize, min_capacity: usize) -> Option<usize> {
        min_capacity.checked_next_power_of_two()
    }
}
