use std::{alloc::Layout, ptr::NonNull};

/// Allocation strategy that provides raw heap memory to the containers in this crate.
///
/// A container stores its allocator by value, clones it when the container is cloned and hands it along when ownership moves.
pub trait Allocator {
    /// Allocate memory for the given layout.
    ///
    /// # Return
    ///
    /// If no memory could be allocated, `None` should be returned.
    ///
    /// # Safety
    ///
    /// `layout` must have a non-zero size.
    unsafe fn alloc(&mut self, layout: Layout) -> Option<NonNull<u8>>;

    /// Deallocate an allocation
    ///
    /// # Safety
    ///
    /// - `ptr` must have been returned by `alloc` on this allocator, or a clone of it.
    /// - `layout` must be the layout the memory was allocated with.
    unsafe fn dealloc(&mut self, ptr: NonNull<u8>, layout: Layout);
}

impl<A: Allocator + ?Sized> Allocator for &mut A {
    unsafe fn alloc(&mut self, layout: Layout) -> Option<NonNull<u8>> {
        (**self).alloc(layout)
    }

    unsafe fn dealloc(&mut self, ptr: NonNull<u8>, layout: Layout) {
        (**self).dealloc(ptr, layout)
    }
}
