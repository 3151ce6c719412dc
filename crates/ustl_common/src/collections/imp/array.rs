use std::{
    alloc::{self, Layout},
    any::type_name,
    marker::PhantomData,
    mem::{align_of, size_of},
    ptr::{self, NonNull},
};

use ustl_logging::{log_error, log_verbose};

use crate::{
    alloc::Allocator,
    collections::{ReserveStrategy, TryReserveError, LOG_CAT},
};

/// Low level utility for more ergonomically allocating, reallocating, and deallocating
/// a buffer of memory in an allocator without having to worry about all the corner cases involved.
/// In particular:
///
/// - Produces a dangling pointer on zero-sized types
/// - Produces a dangling pointer on zero-length allocations.
/// - Avoids freeing the dangling pointer
/// - Catches all overflows in capacity computations (promotes them to "capacity overflow" errors).
/// - Reallocates by allocating the new block first, so a failed reallocation leaves the old block untouched.
///
/// This type does not in anyway inspect the memory it manages. When dropped it *will* free its memory, but it *won't* try to drop its contents.
/// It is up to the user of `RawArray` to handle the actual things *stored* inside of `RawArray`
///
/// Note that the capacity of a zero-sized type is always infinite, so `capacity()` always returns `usize::MAX`.
pub(crate) struct RawArray<T, A: Allocator, R: ReserveStrategy> {
    ptr:      NonNull<T>,
    cap:      usize,
    alloc:    A,
    _phantom: PhantomData<(T, fn() -> R)>,
}

unsafe impl<T: Send, A: Allocator + Send, R: ReserveStrategy> Send for RawArray<T, A, R> {}
unsafe impl<T: Sync, A: Allocator + Sync, R: ReserveStrategy> Sync for RawArray<T, A, R> {}

impl<T, A: Allocator, R: ReserveStrategy> RawArray<T, A, R> {
    const IS_ZST: bool = size_of::<T>() == 0;

    /// Creates the biggest possible `RawArray` without allocating.
    /// If `T` has a non-zero size, then this makes a `RawArray` with a capacity of `0`.
    /// If `T` is zero-sized, then it makes a `RawArray` with a capacity of `usize::MAX`.
    /// Useful for implementing delayed allocation.
    #[must_use]
    pub const fn new_in(alloc: A) -> Self {
        Self { ptr: NonNull::dangling(), cap: 0, alloc, _phantom: PhantomData }
    }

    /// Creates a `RawArray` with exactly the capacity and alignment requirements for a `[T; capacity]`.
    /// This is equivalent to calling `RawArray::new_in` when `capacity` is `0` or `T` is zero-sized.
    ///
    /// # Panics
    ///
    /// Panics if the requested capacity exceed `isize::MAX` bytes.
    ///
    /// # Aborts
    ///
    /// Aborts on OOM
    #[must_use]
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Self {
        match Self::try_with_capacity_in(capacity, alloc) {
            Ok(arr) => arr,
            Err(err) => handle_error(err),
        }
    }

    /// Tries to create a `RawArray` with exactly the capacity and alignment requirements for a `[T; capacity]`.
    pub fn try_with_capacity_in(capacity: usize, alloc: A) -> Result<Self, TryReserveError> {
        let mut arr = Self::new_in(alloc);
        // Don't allocate here, because `drop` will not deallocate when capacity is 0.
        if !Self::IS_ZST && capacity != 0 {
            // SAFETY: nothing is allocated yet, so there are no elements to move
            unsafe { arr.finalize_grow(Some(capacity), 0)? };
        }
        Ok(arr)
    }

    /// Get the capacity of the allocation.
    ///
    /// This will always be `usize::MAX` if `T` is zero-sized.
    #[inline]
    pub const fn capacity(&self) -> usize {
        if Self::IS_ZST {
            usize::MAX
        } else {
            self.cap
        }
    }

    /// Get the allocator used for the allocation.
    pub const fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Get a raw pointer to the start of the allocation.
    /// Note that this is a dangling pointer when either `capacity() == 0` or `T` is zero-sized.
    /// In the former case, you must be careful.
    #[inline]
    pub const fn ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    fn current_memory(&self) -> Option<(NonNull<u8>, Layout)> {
        if Self::IS_ZST || self.cap == 0 {
            None
        } else {
            // The memory has already been allocated, so the layout of the same capacity can't overflow.
            let layout = Layout::array::<T>(self.cap).ok()?;
            Some((self.ptr.cast(), layout))
        }
    }

    /// Ensures that the buffer contains at least enough space to hold `len + additional` elements.
    /// If it doesn't already have enough capacity, will reallocate enough space plus comfortable slack space to get amortized *O*(1) behavior.
    ///
    /// `len` may not exceed `self.capacity()`.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds `isize::MAX` bytes.
    ///
    /// # Aborts
    ///
    /// Aborts on OOM.
    #[inline]
    pub fn reserve(&mut self, len: usize, additional: usize) {
        // Callers expect this function to be very cheap when there is already sufficient capacity.
        // Therefore, all the resizing and error-handling logic is moved behind a cold call.
        #[cold]
        fn do_reserve_and_handle<T, A: Allocator, R: ReserveStrategy>(
            slf: &mut RawArray<T, A, R>,
            len: usize,
            additional: usize,
        ) {
            if let Err(err) = slf.grow_amortized(len, additional) {
                handle_error(err);
            }
        }

        if self.needs_to_grow(len, additional) {
            do_reserve_and_handle(self, len, additional);
        }
    }

    /// A specialized version of `self.reserve(len, 1)`, which requires the caller to ensure `len == self.capacity()`.
    pub fn grow_one(&mut self, len: usize) {
        debug_assert_eq!(len, self.capacity());
        if let Err(err) = self.grow_amortized(len, 1) {
            handle_error(err);
        }
    }

    /// The same as `reserve`, but returns on errors instead of panicking or aborting.
    pub fn try_reserve(&mut self, len: usize, additional: usize) -> Result<(), TryReserveError> {
        if self.needs_to_grow(len, additional) {
            self.grow_amortized(len, additional)?;
        }
        Ok(())
    }

    /// Ensures that the buffer contains at least enough space to hold `len + additional` elements.
    /// If it doesn't already, will reallocate the minimum possible amount of memory necessary.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds `isize::MAX` _bytes_.
    ///
    /// # Aborts
    ///
    /// Aborts on OOM.
    pub fn reserve_exact(&mut self, len: usize, additional: usize) {
        if let Err(err) = self.try_reserve_exact(len, additional) {
            handle_error(err);
        }
    }

    pub fn try_reserve_exact(&mut self, len: usize, additional: usize) -> Result<(), TryReserveError> {
        if self.needs_to_grow(len, additional) {
            self.grow_exact(len, additional)?;
        }
        Ok(())
    }

    /// Shrinks the buffer down to the specified capacity, moving the first `len` elements over.
    /// If the given amount is 0, actually completely deallocates.
    ///
    /// # Panics
    ///
    /// Panics if the given amount is *larger* than the current capacity, or smaller than `len`.
    ///
    /// # Aborts
    ///
    /// Aborts on OOM.
    pub fn shrink_to_fit(&mut self, cap: usize, len: usize) {
        if let Err(err) = self.shrink(cap, len) {
            handle_error(err);
        }
    }

    //--------------------------------------------------------------

    /// Returns if the buffer needs to grow to fulfill the needed extra capacity.
    /// Mainly used to make inlining reserve-calls possible without inlining `grow`.
    fn needs_to_grow(&self, len: usize, additional: usize) -> bool {
        additional > self.capacity().wrapping_sub(len)
    }

    fn grow_amortized(&mut self, len: usize, additional: usize) -> Result<(), TryReserveError> {
        debug_assert!(additional > 0);

        if Self::IS_ZST {
            // Since we return a capacity of `usize::MAX` when the element size is 0, getting here necessarily means that `RawArray` is overfull.
            return Err(TryReserveError::CapacityOverflow);
        }

        let required_cap = len.checked_add(additional).ok_or(TryReserveError::CapacityOverflow)?;
        let new_cap = R::calculate(len, required_cap).map(|cap| cap.max(required_cap));

        // SAFETY: `len` elements are initialized, per the caller
        unsafe { self.finalize_grow(new_cap, len) }
    }

    fn grow_exact(&mut self, len: usize, additional: usize) -> Result<(), TryReserveError> {
        if Self::IS_ZST {
            return Err(TryReserveError::CapacityOverflow);
        }

        let target_capacity = len.checked_add(additional);
        // SAFETY: `len` elements are initialized, per the caller
        unsafe { self.finalize_grow(target_capacity, len) }
    }

    fn shrink(&mut self, cap: usize, len: usize) -> Result<(), TryReserveError> {
        assert!(cap <= self.capacity(), "Tried to shrink to a larger capacity");
        assert!(len <= cap, "Tried to shrink below the length");

        if cap == self.cap {
            return Ok(());
        }
        let Some((old_ptr, old_layout)) = self.current_memory() else {
            return Ok(());
        };

        log_verbose!(LOG_CAT, "shrinking buffer of {} from {} to {} elements", type_name::<T>(), self.cap, cap);

        if cap == 0 {
            // SAFETY: `old_ptr` was allocated by `self.alloc` with `old_layout`
            unsafe { self.alloc.dealloc(old_ptr, old_layout) };
            self.ptr = NonNull::dangling();
            self.cap = 0;
            return Ok(());
        }

        // SAFETY: `cap >= len`, so all live elements fit in the new block
        unsafe { self.relocate(cap, len, old_ptr, old_layout) }
    }

    /// Allocate a block for `new_cap` elements and move `len` elements into it.
    ///
    /// # Safety
    ///
    /// The first `len` elements of the current block need to be initialized.
    unsafe fn finalize_grow(&mut self, new_cap: Option<usize>, len: usize) -> Result<(), TryReserveError> {
        let Some(new_cap) = new_cap else {
            return Err(TryReserveError::CapacityOverflow);
        };

        match self.current_memory() {
            None => {
                let layout = Self::layout_for(new_cap)?;
                self.ptr = self.allocate(layout)?;
                self.cap = new_cap;
                Ok(())
            },
            Some((old_ptr, old_layout)) => {
                log_verbose!(LOG_CAT, "growing buffer of {} from {} to {} elements", type_name::<T>(), self.cap, new_cap);
                self.relocate(new_cap, len, old_ptr, old_layout)
            },
        }
    }

    /// Move `len` elements to a newly allocated block of `new_cap` elements and release the old block.
    ///
    /// On failure, the old block is left untouched.
    ///
    /// # Safety
    ///
    /// - `old_ptr` and `old_layout` need to describe the current allocation.
    /// - The first `len` elements need to be initialized and `len <= new_cap`.
    unsafe fn relocate(&mut self, new_cap: usize, len: usize, old_ptr: NonNull<u8>, old_layout: Layout) -> Result<(), TryReserveError> {
        let layout = Self::layout_for(new_cap)?;
        let new_ptr = self.allocate(layout)?;

        ptr::copy_nonoverlapping(self.ptr.as_ptr(), new_ptr.as_ptr(), len);
        self.alloc.dealloc(old_ptr, old_layout);

        self.ptr = new_ptr;
        self.cap = new_cap;
        Ok(())
    }

    fn layout_for(cap: usize) -> Result<Layout, TryReserveError> {
        match Layout::array::<T>(cap) {
            Ok(layout) if layout.size() <= isize::MAX as usize => Ok(layout),
            _ => Err(TryReserveError::CapacityOverflow),
        }
    }

    fn allocate(&mut self, layout: Layout) -> Result<NonNull<T>, TryReserveError> {
        debug_assert!(layout.size() != 0 && layout.align() == align_of::<T>());

        // SAFETY: `layout` has a non-zero size, as both the capacity and the element size are non-zero
        match unsafe { self.alloc.alloc(layout) } {
            Some(ptr) => Ok(ptr.cast()),
            None => {
                log_error!(LOG_CAT, "failed to allocate {} bytes for a buffer of {}", layout.size(), type_name::<T>());
                Err(TryReserveError::AllocError(layout))
            },
        }
    }
}

impl<T, A: Allocator, R: ReserveStrategy> Drop for RawArray<T, A, R> {
    fn drop(&mut self) {
        if let Some((ptr, layout)) = self.current_memory() {
            // SAFETY: the memory was allocated by `self.alloc` with this layout
            unsafe { self.alloc.dealloc(ptr, layout) };
        }
    }
}

/// Central function for reserve error handling
#[cold]
#[track_caller]
pub(crate) fn handle_error(e: TryReserveError) -> ! {
    match e {
        TryReserveError::CapacityOverflow => capacity_overflow(),
        TryReserveError::AllocError(layout) => alloc::handle_alloc_error(layout),
    }
}

#[track_caller]
fn capacity_overflow() -> ! {
    panic!("capacity overflow");
}
